//! duoview - layout composition for a two-view editor shell
//!
//! The shell hosts a main view and an optional slave view side by side. Each
//! view shows the focused page's edit surface plus optional secondary panels
//! (symbol sidebar, document map, result pane, query table). This crate
//! decides which of them take part in a pass, computes their rectangles and
//! applies everything as one atomic batch through a [`host::WindowHost`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod error;
pub mod host;
pub mod layout;
pub mod messages;
pub mod model;
pub mod scenario;
pub mod shell;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::{LayoutConfig, ScaledMetrics};
pub use error::LayoutError;
pub use host::{MemoryHost, WindowHost};
pub use layout::{LayoutEngine, LayoutOutcome, LayoutResult};
pub use messages::Msg;
pub use model::{PageId, PanelHandle, PanelRegistry, Rect, ShellModel, ViewSide};
pub use shell::ShellContext;
