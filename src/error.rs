//! Error types for layout passes

use thiserror::Error;

use crate::layout::LayoutPhase;

/// Why a layout pass was aborted.
///
/// None of these are shown to the user: the previous geometry stays on
/// screen and the next triggering event recomputes from current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Host refused to open a positioning batch for {panels} panels")]
    BatchUnavailable { panels: usize },

    #[error("Host failed to commit positioning batch: {0}")]
    CommitFailed(String),

    #[error("Layout pass requested while another pass is {0:?}")]
    Reentrant(LayoutPhase),
}
