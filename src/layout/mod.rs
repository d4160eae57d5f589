//! Layout composition for the two-view shell
//!
//! A pass flows through the stages in order:
//!
//! - [`resolver`] decides which panels take part
//! - [`calculator`] turns that decision into rectangles
//! - [`positioner`] orders every placement into one host transaction
//! - [`coordinator`] restores focus and repaints what changed
//!
//! [`engine::LayoutEngine`] drives a pass and guards against re-entrancy.

pub mod calculator;
pub mod coordinator;
pub mod engine;
pub mod positioner;
pub mod resolver;

pub use calculator::{LayoutGeometry, ViewGeometry};
pub use engine::{LayoutEngine, LayoutOutcome, LayoutPhase, LayoutRequest, LayoutResult};
pub use positioner::{BatchEntry, PanelRole};
pub use resolver::{PassSnapshot, RelevanceSet, ViewRelevance};
