//! Host windowing seam
//!
//! The layout core never talks to a concrete windowing system. Everything it
//! needs (liveness checks, deferred multi-window positioning, focus and
//! repaint requests) goes through [`WindowHost`]. A platform backend
//! implements it with its native batching primitive; platforms lacking one
//! can suppress redraw, apply placements sequentially inside
//! [`LayoutTransaction::commit`] and repaint once at the end.
//!
//! [`MemoryHost`] is a complete in-process implementation used by the CLI,
//! tests and benchmarks.

mod memory;

pub use memory::{CommitRecord, MemoryHost, PanelState};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::messages::Msg;
use crate::model::{PageId, PanelHandle, Rect};

/// Target state of a panel in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Show(Rect),
    Hide,
}

impl Placement {
    pub fn is_shown(&self) -> bool {
        matches!(self, Placement::Show(_))
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Placement::Show(rect) => Some(*rect),
            Placement::Hide => None,
        }
    }
}

/// Where a panel lands in the z-order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZOrder {
    Top,
    Bottom,
}

/// Scroll work requested of an edit surface after layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollRequest {
    /// First activation: jump to the position remembered for the page
    RestoreLastPosition(PageId),
    /// Move the caret of a hex page to a byte position
    GotoPosition { page: PageId, position: usize },
    /// Scroll the caret of a text page into view
    ScrollCaret(PageId),
    /// Scroll a freshly shown result pane to its current match
    ResultJump(PageId),
}

/// One open deferred-positioning transaction.
///
/// Nothing added becomes visible until [`commit`](Self::commit) succeeds,
/// and a failed commit leaves the previous geometry on screen.
pub trait LayoutTransaction {
    fn add(&mut self, panel: PanelHandle, placement: Placement, z: ZOrder);

    fn commit(self: Box<Self>) -> Result<(), LayoutError>;
}

/// Everything the layout core consumes from the windowing system
pub trait WindowHost {
    /// Current client area of the shell window
    fn client_rect(&self) -> Rect;

    /// DPI scale factor of the shell window (1.0 = 96 DPI)
    fn scale_factor(&self) -> f64;

    /// Whether a handle still refers to a live surface
    fn is_live(&self, panel: PanelHandle) -> bool;

    /// Whether a surface is currently shown
    fn is_visible(&self, panel: PanelHandle) -> bool;

    /// Open a deferred-positioning transaction sized for `capacity` panels
    fn begin_batch(
        &mut self,
        capacity: usize,
    ) -> Result<Box<dyn LayoutTransaction + '_>, LayoutError>;

    fn set_focus(&mut self, panel: PanelHandle);

    /// Tear down a surface; its handle stops being live
    fn destroy(&mut self, panel: PanelHandle);

    /// Queue a repaint of one surface
    fn invalidate(&mut self, panel: PanelHandle);

    /// Repaint a surface and its children immediately
    fn update_now(&mut self, panel: PanelHandle);

    fn scroll(&mut self, request: ScrollRequest);

    /// Messages posted to the shell while a pass was running
    fn take_posted(&mut self) -> Vec<Msg> {
        Vec::new()
    }
}
