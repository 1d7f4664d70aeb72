mod host;

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use clap_derive::Parser;
use climate_card::logging::{LogConfig, setup_file_logging};
use climate_card::view::Rgba;
use climate_card::{
    CARD_TYPE, CardRegistry, EntityState, Node, PushOutcome, RenderableCard, register_cards,
};
use host::{SAMPLE_ENTITY, SAMPLE_SENSOR, SimulatedHost};
use ratatui::{
    DefaultTerminal,
    buffer::Buffer,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    layout::{Constraint, Layout, Rect},
    style::{
        Color, Modifier, Style, Stylize,
        palette::tailwind::{SLATE, YELLOW},
    },
    text::{Line, Span},
    widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap},
};
use serde_json::{Value, json};
use tracing::info;

const CARD_BG: Color = SLATE.c950;
const TEXT_FG_COLOR: Color = SLATE.c200;
const MUTED_FG_COLOR: Color = SLATE.c400;
const SELECTED_STYLE: Style = Style::new()
    .fg(YELLOW.c400)
    .add_modifier(Modifier::UNDERLINED);
const ACTIVE_STYLE: Style = Style::new()
    .fg(SLATE.c950)
    .bg(SLATE.c200)
    .add_modifier(Modifier::BOLD);

#[derive(Parser, Debug)]
#[command(about = "Preview a climate card in the terminal against a simulated host")]
struct Params {
    /// Card configuration file (defaults to a built-in living room card)
    #[clap(long)]
    config: Option<String>,
    /// Host state table file (defaults to built-in sample states)
    #[clap(long)]
    states: Option<String>,
    /// Directory for the preview log file
    #[clap(long, default_value = ".")]
    log_dir: String,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {path}"))
}

fn sample_config() -> Value {
    json!({
        "type": CARD_TYPE,
        "entity": SAMPLE_ENTITY,
        "house_temp_sensor": SAMPLE_SENSOR,
    })
}

fn main() -> Result<()> {
    color_eyre::install().map_err(|e| anyhow!("Failed to install Color Eyre: {e}"))?;
    let params = Params::parse();
    let _guard = setup_file_logging(&LogConfig {
        log_dir: params.log_dir.clone(),
        log_prefix: "climate-card-tui".to_string(),
        ..LogConfig::default()
    })?;

    let raw_config = match &params.config {
        Some(path) => read_json(path)?,
        None => sample_config(),
    };
    let host = match &params.states {
        Some(path) => SimulatedHost::new(read_json::<HashMap<String, EntityState>>(path)?),
        None => SimulatedHost::sample(),
    };

    let terminal = ratatui::init();
    let app_result = App::new(host, raw_config).and_then(|app| app.run(terminal));
    ratatui::restore();
    app_result
}

struct App {
    should_exit: bool,
    host: SimulatedHost,
    card: RenderableCard,
    selected: usize,
    status: String,
}

impl App {
    fn new(host: SimulatedHost, raw_config: Value) -> Result<Self> {
        let mut registry = CardRegistry::new();
        register_cards(&mut registry)?;
        let card_type = raw_config
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(CARD_TYPE)
            .to_string();
        let card = registry.create(&card_type, raw_config)?.bind(&host);
        let status = match card.rendered() {
            Some(_) => "Ready".to_string(),
            None => format!("Entity {} not found", card.config().entity),
        };

        Ok(Self {
            should_exit: false,
            host,
            card,
            selected: 0,
            status,
        })
    }

    fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_exit {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            };
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('h') | KeyCode::Left => self.select_previous(),
            KeyCode::Char('l') | KeyCode::Right => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.press_selected(),
            KeyCode::Char('f') => {
                let entity = self.card.config().entity.clone();
                self.host.cycle_fan(&entity);
                self.refresh("Fan speed changed");
            }
            KeyCode::Char('u') => {
                if let Some(sensor) = self.card.config().house_temp_sensor.clone() {
                    self.host.toggle_sensor(&sensor);
                    self.refresh("House sensor toggled");
                }
            }
            _ => {}
        }
    }

    fn button_count(&self) -> usize {
        self.card
            .rendered()
            .map_or(0, |rendered| rendered.tree.buttons().len())
    }

    fn select_next(&mut self) {
        let count = self.button_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    fn select_previous(&mut self) {
        let count = self.button_count();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    fn press_selected(&mut self) {
        let interaction = self.card.rendered().and_then(|rendered| {
            rendered
                .tree
                .buttons()
                .get(self.selected)
                .and_then(|button| button.on_press())
                .cloned()
        });
        let Some(interaction) = interaction else {
            return;
        };
        if let Some(command) = self.card.press(interaction, &mut self.host) {
            info!("Pressed button {} -> {command:?}", self.selected);
            self.refresh(&format!("Sent {command:?}"));
        }
    }

    /// Pushes the host's current table into the card.
    fn refresh(&mut self, status: &str) {
        self.status = match self.card.push(&self.host) {
            PushOutcome::Rendered => status.to_string(),
            PushOutcome::Skipped => format!("{status} (entity missing, showing last render)"),
        };
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header_area, main_area, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .areas(area);

        App::render_header(header_area, buf);
        self.render_card(main_area, buf);
        self.render_footer(footer_area, buf);
    }
}

/// Rendering logic for the app
impl App {
    fn render_header(area: Rect, buf: &mut Buffer) {
        Paragraph::new("Climate Card Preview")
            .bold()
            .centered()
            .render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(vec![
            Line::raw(self.status.as_str()).fg(MUTED_FG_COLOR),
            Line::raw("←→ select, Enter press, f fan speed, u house sensor, q quit"),
        ])
        .centered()
        .render(area, buf);
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer) {
        let Some(rendered) = self.card.rendered() else {
            Paragraph::new("Nothing rendered yet...")
                .centered()
                .render(area, buf);
            return;
        };
        let glow = match &rendered.tree {
            Node::Card { glow, .. } => rgb(glow),
            _ => MUTED_FG_COLOR,
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(glow))
            .bg(CARD_BG)
            .padding(Padding::uniform(1));

        let lines = TreePainter::new(self.selected).lines(&rendered.tree);
        Paragraph::new(lines)
            .block(block)
            .fg(TEXT_FG_COLOR)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Lays out a card's primitive tree as terminal lines, one per top-level child.
struct TreePainter {
    selected: usize,
    next_button: usize,
}

impl TreePainter {
    fn new(selected: usize) -> Self {
        Self {
            selected,
            next_button: 0,
        }
    }

    fn lines(&mut self, root: &Node) -> Vec<Line<'static>> {
        root.children()
            .iter()
            .map(|child| Line::from(self.spans(child)))
            .collect()
    }

    fn spans(&mut self, node: &Node) -> Vec<Span<'static>> {
        match node {
            Node::Text { class, text } => vec![Span::styled(text.clone(), text_style(class))],
            Node::Icon { icon } => vec![Span::raw(glyph(icon))],
            Node::Row { children, .. } | Node::Card { children, .. } => {
                let mut spans = Vec::new();
                for child in children {
                    spans.extend(self.spans(child));
                    spans.push(Span::raw(" "));
                }
                spans
            }
            Node::Button {
                active,
                color,
                children,
                ..
            } => {
                let index = self.next_button;
                self.next_button += 1;
                let label = children
                    .iter()
                    .map(|child| match child {
                        Node::Icon { icon } => glyph(icon).to_string(),
                        other => other.text_content(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let mut style = if *active {
                    ACTIVE_STYLE
                } else {
                    Style::new()
                };
                if let Some(color) = color {
                    style = style.fg(rgb(color));
                }
                if index == self.selected {
                    style = style.patch(SELECTED_STYLE);
                }
                vec![Span::styled(format!("[ {label} ]"), style)]
            }
        }
    }
}

fn text_style(class: &str) -> Style {
    match class {
        "title" => Style::new().add_modifier(Modifier::BOLD),
        "action" | "house-temp" => Style::new().fg(MUTED_FG_COLOR),
        "setpoint" => Style::new().add_modifier(Modifier::BOLD),
        _ => Style::new(),
    }
}

const fn rgb(color: &Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Terminal stand-in for a named icon.
fn glyph(icon: &str) -> &'static str {
    match icon {
        "mdi:power" => "⏻",
        "mdi:snowflake" => "❄",
        "mdi:fire" => "♨",
        "mdi:fan" => "✣",
        "mdi:fan-off" => "✕",
        "mdi:fan-speed-1" => "▁",
        "mdi:fan-speed-2" => "▃",
        "mdi:fan-speed-3" => "▇",
        "mdi:thermostat-auto" => "Ⓐ",
        "mdi:thermostat" => "°",
        _ => "•",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_card::StateSource;

    fn app() -> App {
        App::new(SimulatedHost::sample(), sample_config()).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn pressing_a_mode_button_updates_the_host() {
        let mut app = app();
        // off, cool
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        let rendered = app.card.rendered().unwrap();
        assert_eq!(rendered.view.mode.label, "Cool");
        assert_eq!(
            app.host.entity(SAMPLE_ENTITY).unwrap().state,
            "cool".to_string()
        );
    }

    #[test]
    fn power_button_toggles_off_and_back() {
        let mut app = app();
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.selected, app.button_count() - 1);
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.card.rendered().unwrap().view.power.on);
        app.handle_key(key(KeyCode::Enter));
        let view = &app.card.rendered().unwrap().view;
        assert!(view.power.on);
        assert_eq!(view.mode.label, "Heat");
    }

    #[test]
    fn sensor_toggle_shows_placeholder() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('u')));
        let view = &app.card.rendered().unwrap().view;
        assert_eq!(view.house_temp_text, "🏠 House Temp: --°");
    }

    #[test]
    fn painter_marks_only_the_selected_button() {
        let app = app();
        let tree = &app.card.rendered().unwrap().tree;
        let lines = TreePainter::new(2).lines(tree);
        let underlined: Vec<String> = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .filter(|span| span.style.add_modifier.contains(Modifier::UNDERLINED))
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(underlined, vec!["[ ♨ Heat ]".to_string()]);
    }

    #[test]
    fn quit_key_exits() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_exit);
    }
}
