//! Dashboard card for a single climate entity.
//!
//! The host pushes entity state into a [`RenderableCard`], which normalizes it
//! ([`extract`]), maps it to a [`ViewModel`] ([`view`]) and rebuilds the
//! primitive tree ([`render`]). Presses on rendered controls come back as
//! [`Interaction`]s and leave as exactly one [`ServiceCall`] each.

pub mod card;
pub mod climate;
pub mod command;
pub mod config;
pub mod error;
pub mod extract;
pub mod host;
pub mod logging;
pub mod registry;
pub mod render;
pub mod view;

pub use card::{
    CARD_TYPE, ClimateCard, ConfiguredCard, PushOutcome, RenderableCard, RenderedCard,
};
pub use climate::{FanMode, HvacAction, HvacMode};
pub use command::{Command, Interaction, dispatch};
pub use config::WidgetConfig;
pub use error::CardError;
pub use extract::{AuxReading, NormalizedState, Setpoint, extract};
pub use host::{EntityState, Service, ServiceCall, ServiceCaller, StateSource};
pub use registry::{CardRegistry, register_cards};
pub use render::{HtmlRenderer, Node};
pub use view::{ViewModel, map_to_view};
