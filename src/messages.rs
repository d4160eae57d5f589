//! Message types for the Elm-style architecture
//!
//! Everything that can change the shell's layout arrives as a [`Msg`]. Update
//! functions turn messages into model changes plus an optional [`Cmd`]; they
//! never run a layout pass inline.
//!
//! [`Cmd`]: crate::commands::Cmd

use crate::model::{PageId, PanelToggle, SidebarStyle, ViewSide};

/// Top-level window events
#[derive(Debug, Clone, PartialEq)]
pub enum WindowMsg {
    /// Client area resized (zero width or height means minimized)
    Resize { width: i32, height: i32 },
    /// Window minimized without a size event
    Minimized,
    /// Monitor DPI changed
    DpiChanged(f64),
    /// Theme or visual style changed; everything needs repainting
    ThemeChanged,
}

/// Secondary-panel commands.
///
/// `page: None` targets the focused page of the active view.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelMsg {
    /// Flip a panel's "wants to show" flag
    Toggle {
        page: Option<PageId>,
        panel: PanelToggle,
    },
    /// Set a panel's "wants to show" flag
    Set {
        page: Option<PageId>,
        panel: PanelToggle,
        shown: bool,
    },
    /// Recreate the symbol sidebar in another form
    SetSidebarStyle {
        page: Option<PageId>,
        style: SidebarStyle,
    },
    /// Splitter drag on the sidebar column (logical px)
    ResizeSidebar { page: Option<PageId>, width: i32 },
    /// Splitter drag between edit area and result pane
    SetResultRatio { page: Option<PageId>, ratio: f32 },
    /// Splitter drag between result pane and query table
    SetQueryRatio { page: Option<PageId>, ratio: f32 },
    /// Splitter drag between the two views
    SetViewSplit(f32),
}

/// Page and view lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum TabMsg {
    /// Open a new page in a view
    Open {
        side: ViewSide,
        title: String,
        hex: bool,
    },
    /// Open a page hosted by a remote-viewer plugin
    OpenPlugin { side: ViewSide, title: String },
    Close(PageId),
    /// Tab click
    Activate(PageId),
    /// Drag a page to the other view
    Move { page: PageId, to: ViewSide },
    /// Create (or re-show) the slave view
    Split,
    /// Destroy the slave view, moving its pages to main
    Unsplit,
    /// Show or hide the slave view without destroying it
    SetSlaveVisible(bool),
    /// Caret moved; remembered for the next activation
    SetCaret { page: PageId, position: usize },
}

/// All messages the shell handles
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Window(WindowMsg),
    Panel(PanelMsg),
    Tab(TabMsg),
    /// Periodic 100 ms timer
    Tick,
}

// Convenience constructors for common messages
impl Msg {
    pub fn resize(width: i32, height: i32) -> Self {
        Msg::Window(WindowMsg::Resize { width, height })
    }

    pub fn toggle(panel: PanelToggle) -> Self {
        Msg::Panel(PanelMsg::Toggle { page: None, panel })
    }

    pub fn show(page: PageId, panel: PanelToggle) -> Self {
        Msg::Panel(PanelMsg::Set {
            page: Some(page),
            panel,
            shown: true,
        })
    }

    pub fn hide(page: PageId, panel: PanelToggle) -> Self {
        Msg::Panel(PanelMsg::Set {
            page: Some(page),
            panel,
            shown: false,
        })
    }

    pub fn open(side: ViewSide, title: impl Into<String>) -> Self {
        Msg::Tab(TabMsg::Open {
            side,
            title: title.into(),
            hex: false,
        })
    }

    pub fn activate(page: PageId) -> Self {
        Msg::Tab(TabMsg::Activate(page))
    }
}
