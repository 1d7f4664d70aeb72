use serde::Serialize;

use crate::command::Interaction;
use crate::view::{ModeButton, Rgba, ViewModel};

/// A host visual primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Node {
    Card {
        glow: Rgba,
        children: Vec<Node>,
    },
    Row {
        class: &'static str,
        children: Vec<Node>,
    },
    Text {
        class: &'static str,
        text: String,
    },
    /// Opaque icon element; only the icon name is supplied.
    Icon { icon: String },
    Button {
        class: &'static str,
        active: bool,
        color: Option<Rgba>,
        children: Vec<Node>,
        on_press: Interaction,
    },
}

impl Node {
    fn text(class: &'static str, text: impl Into<String>) -> Self {
        Node::Text {
            class,
            text: text.into(),
        }
    }

    fn icon(icon: &str) -> Self {
        Node::Icon {
            icon: icon.to_string(),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Card { children, .. }
            | Node::Row { children, .. }
            | Node::Button { children, .. } => children,
            Node::Text { .. } | Node::Icon { .. } => &[],
        }
    }

    /// Pressable nodes in document order.
    pub fn buttons(&self) -> Vec<&Node> {
        let mut buttons = Vec::new();
        self.collect_buttons(&mut buttons);
        buttons
    }

    fn collect_buttons<'a>(&'a self, out: &mut Vec<&'a Node>) {
        if let Node::Button { .. } = self {
            out.push(self);
        }
        for child in self.children() {
            child.collect_buttons(out);
        }
    }

    /// The interaction fired when this node is pressed, if any.
    pub fn on_press(&self) -> Option<&Interaction> {
        match self {
            Node::Button { on_press, .. } => Some(on_press),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants, space separated.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Node::Text { text, .. } = self {
            out.push(text);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }

    pub fn find_text(&self, class: &str) -> Option<&str> {
        match self {
            Node::Text { class: c, text } if *c == class => Some(text.as_str()),
            _ => self.children().iter().find_map(|child| child.find_text(class)),
        }
    }
}

fn mode_button(button: &ModeButton, with_icon: bool) -> Node {
    let mut children = Vec::with_capacity(2);
    if with_icon {
        children.push(Node::icon(&button.icon));
    }
    children.push(Node::text("mode-label", button.label.as_str()));
    Node::Button {
        class: "mode-button",
        active: button.active,
        color: None,
        children,
        on_press: button.interaction(),
    }
}

/// Builds the complete primitive tree for `view`.
pub fn render(view: &ViewModel) -> Node {
    let header = Node::Row {
        class: "header",
        children: vec![
            Node::text("title", view.title.as_str()),
            Node::text("action", view.action_label.as_str()),
        ],
    };
    let status = Node::Row {
        class: "status",
        children: vec![
            Node::icon(&view.mode.icon),
            Node::text("mode", view.mode.label.as_str()),
            Node::text("setpoint", view.setpoint_text.as_str()),
        ],
    };
    let fan = Node::Row {
        class: "fan",
        children: vec![
            Node::icon(&view.fan.icon),
            Node::text("fan", view.fan.label.as_str()),
        ],
    };
    let house = Node::text("house-temp", view.house_temp_text.as_str());
    let modes = Node::Row {
        class: "modes",
        children: view
            .mode_buttons
            .iter()
            .map(|button| mode_button(button, view.display_mode_icons))
            .collect(),
    };
    let power = Node::Button {
        class: "power",
        active: view.power.on,
        color: Some(view.power.color),
        children: vec![Node::text("power-label", view.power.label.as_str())],
        on_press: view.power.interaction(),
    };

    Node::Card {
        glow: view.glow,
        children: vec![header, status, fan, house, modes, power],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::HvacMode;
    use crate::config::WidgetConfig;
    use crate::extract::extract;
    use crate::host::EntityState;
    use crate::view::{GLOW_HEATING, map_to_view};

    fn view(display_mode_icons: bool) -> ViewModel {
        let config = WidgetConfig::builder()
            .entity("climate.hallway")
            .display_mode_icons(display_mode_icons)
            .build()
            .unwrap();
        let device = EntityState::new("heat")
            .with_attribute("hvac_action", "heating")
            .with_attribute("fan_mode", "low")
            .with_attribute("temperature", 68);
        map_to_view(&extract(&device, None, &config), &config)
    }

    #[test]
    fn tree_layout() {
        let tree = render(&view(true));
        let Node::Card { glow, children } = &tree else {
            panic!("root is not a card");
        };
        assert_eq!(*glow, GLOW_HEATING);
        assert_eq!(children.len(), 6);
        assert_eq!(tree.find_text("setpoint"), Some("68°"));
        assert_eq!(tree.find_text("fan"), Some("Low"));
        assert_eq!(tree.find_text("house-temp"), Some("🏠 House Temp: --°"));
        assert_eq!(tree.find_text("power-label"), Some("Turn Off"));
    }

    #[test]
    fn buttons_in_order() {
        let tree = render(&view(true));
        let presses: Vec<_> = tree
            .buttons()
            .into_iter()
            .filter_map(Node::on_press)
            .cloned()
            .collect();
        assert_eq!(
            presses,
            vec![
                Interaction::SelectMode(HvacMode::Off),
                Interaction::SelectMode(HvacMode::Cool),
                Interaction::SelectMode(HvacMode::Heat),
                Interaction::SelectMode(HvacMode::FanOnly),
                Interaction::SelectMode(HvacMode::Auto),
                Interaction::TogglePower,
            ]
        );
    }

    #[test]
    fn icon_mode_controls_button_content() {
        let with_icons = render(&view(true));
        let without_icons = render(&view(false));

        let first = with_icons.buttons()[0];
        assert!(matches!(first.children()[0], Node::Icon { .. }));

        let first = without_icons.buttons()[0];
        assert_eq!(first.children().len(), 1);
        assert!(matches!(first.children()[0], Node::Text { .. }));

        let active = |tree: &Node| -> Vec<bool> {
            tree.buttons()
                .iter()
                .filter_map(|node| match node {
                    Node::Button {
                        class: "mode-button",
                        active,
                        ..
                    } => Some(*active),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(active(&with_icons), active(&without_icons));
        assert_eq!(active(&with_icons), vec![false, false, true, false, false]);
    }

    #[test]
    fn render_is_idempotent() {
        let view = view(true);
        let first = serde_json::to_string(&render(&view)).unwrap();
        let second = serde_json::to_string(&render(&view)).unwrap();
        assert_eq!(first, second);
    }
}
