//! Materialization of a [`ViewModel`](crate::view::ViewModel) into host primitives.
//!
//! Both renderers rebuild their whole output on every call and read nothing but
//! their input, so equal views always produce equal output.

pub mod html;
pub mod tree;

pub use html::HtmlRenderer;
pub use tree::{Node, render};
