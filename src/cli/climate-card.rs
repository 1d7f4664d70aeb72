use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use clap_derive::{Parser, Subcommand, ValueEnum};
use climate_card::logging::{
    LogConfig, LogGuard, RotationPeriod, setup_console_logging, setup_file_logging,
};
use climate_card::{
    CARD_TYPE, CardRegistry, EntityState, HtmlRenderer, HvacMode, Interaction, ServiceCall,
    register_cards,
};
use serde_json::Value;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(about = "Render a climate card from JSON state and simulate button presses")]
struct Params {
    /// Card configuration file (JSON object with at least "entity")
    #[clap(long, global = true)]
    config: Option<String>,
    /// Host state table file (JSON object mapping entity ids to state records)
    #[clap(long, global = true)]
    states: Option<String>,
    /// Directory for rotated log files (if not set, logs go to stderr)
    #[clap(long)]
    log_dir: Option<String>,
    /// Log rotation period: hourly, daily or never
    #[clap(long, default_value = "daily")]
    log_rotation: RotationPeriod,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the rendered card
    Render {
        #[clap(long, value_enum, default_value = "html")]
        format: Format,
    },
    /// Print the service call a button press produces
    Press {
        /// Press the button of this mode (off, cool, heat, fan_only, auto)
        #[clap(long, conflicts_with = "power", required_unless_present = "power")]
        mode: Option<String>,
        /// Press the power button
        #[clap(long)]
        power: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    /// Derived view model as JSON
    View,
    /// Primitive tree as JSON
    Tree,
    /// Card markup
    Html,
}

impl Params {
    /// Both input files; the flags are global so they may follow the subcommand.
    fn input_paths(&self) -> Result<(&str, &str)> {
        let config = self
            .config
            .as_deref()
            .ok_or_else(|| anyhow!("--config <file> is required"))?;
        let states = self
            .states
            .as_deref()
            .ok_or_else(|| anyhow!("--states <file> is required"))?;
        Ok((config, states))
    }
}

fn setup_logging(params: &Params) -> Result<LogGuard> {
    match &params.log_dir {
        Some(dir) => {
            let config = LogConfig {
                log_dir: dir.clone(),
                log_prefix: "climate-card-cli".to_string(),
                rotation: params.log_rotation,
                ..LogConfig::default()
            };
            setup_file_logging(&config).context("Failed to set up file logging")
        }
        None => Ok(setup_console_logging()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {path}"))
}

fn main() -> Result<()> {
    let params = Params::parse();
    let _guard = setup_logging(&params)?;

    let mut registry = CardRegistry::new();
    register_cards(&mut registry)?;

    let (config_path, states_path) = params.input_paths()?;

    let raw_config: Value = read_json(config_path)?;
    let card_type = raw_config
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(CARD_TYPE)
        .to_string();
    let card = registry.create(&card_type, raw_config)?;

    let states: HashMap<String, EntityState> = read_json(states_path)?;
    let card = card.bind(&states);
    let Some(rendered) = card.rendered() else {
        warn!(
            "Entity {} is not in {}, nothing to render",
            card.config().entity,
            states_path
        );
        return Ok(());
    };

    match params.command {
        Commands::Render { format } => {
            let output = match format {
                Format::View => serde_json::to_string_pretty(&rendered.view)?,
                Format::Tree => serde_json::to_string_pretty(&rendered.tree)?,
                Format::Html => HtmlRenderer::new()?.render(&rendered.view)?,
            };
            println!("{output}");
        }
        Commands::Press { mode, power } => {
            let interaction = match mode {
                Some(mode) if !power => Interaction::SelectMode(HvacMode::from(mode)),
                _ => Interaction::TogglePower,
            };
            let mut calls: Vec<ServiceCall> = Vec::new();
            card.press(interaction, &mut calls);
            for call in calls {
                println!("{}", serde_json::to_string_pretty(&call)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_flags_accepted_after_subcommand() {
        let params = Params::try_parse_from([
            "climate-card-cli",
            "render",
            "--config",
            "card.json",
            "--states",
            "states.json",
            "--format",
            "view",
        ])
        .unwrap();
        assert_eq!(params.config.as_deref(), Some("card.json"));
        assert_eq!(params.states.as_deref(), Some("states.json"));
        assert!(matches!(
            params.command,
            Commands::Render {
                format: Format::View
            }
        ));
    }

    #[test]
    fn file_flags_accepted_before_subcommand() {
        let params = Params::try_parse_from([
            "climate-card-cli",
            "--config",
            "card.json",
            "--states",
            "states.json",
            "press",
            "--power",
        ])
        .unwrap();
        assert!(matches!(
            params.command,
            Commands::Press {
                mode: None,
                power: true
            }
        ));
    }

    #[test]
    fn missing_state_file_is_rejected() {
        let params =
            Params::try_parse_from(["climate-card-cli", "render", "--config", "card.json"])
                .unwrap();
        let err = params.input_paths().unwrap_err();
        assert!(err.to_string().contains("--states"));
    }

    #[test]
    fn press_needs_exactly_one_target() {
        let base = ["climate-card-cli", "press", "--config", "a", "--states", "b"];
        assert!(Params::try_parse_from(base).is_err());

        let both = [&base[..], &["--mode", "heat", "--power"][..]].concat();
        assert!(Params::try_parse_from(both).is_err());

        let mode = [&base[..], &["--mode", "heat"][..]].concat();
        let params = Params::try_parse_from(mode).unwrap();
        assert!(matches!(
            params.command,
            Commands::Press { mode: Some(ref m), power: false } if m == "heat"
        ));
    }
}
