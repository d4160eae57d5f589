//! Shell model - views, pages and the registry of layout participants

pub mod geometry;
pub mod page;
pub mod registry;
pub mod view;

pub use geometry::{split_horizontal, split_vertical, Orientation, Rect};
pub use page::{
    Page, PageGeometry, PageId, PanelProportions, PanelToggle, PanelVisibility, SidebarKind,
    SidebarStyle,
};
pub use registry::{PanelHandle, PanelRegistry, SplitterId};
pub use view::{View, ViewSide};

use crate::config::{LayoutConfig, ScaledMetrics};

/// Complete state the update functions operate on
#[derive(Debug, Clone)]
pub struct ShellModel {
    pub registry: PanelRegistry,
    pub config: LayoutConfig,
    /// DPI scale factor of the shell window
    pub scale: f64,
    /// Last non-empty client area reported by the window
    pub client: Rect,
    pub minimized: bool,
    /// 100 ms ticks seen since creation
    pub ticks: u64,
    /// The one-shot update check still has to fire
    pub update_check_armed: bool,
    /// Emit an autosave on every tick
    pub session_saving: bool,
}

impl ShellModel {
    pub fn new(config: LayoutConfig, client: Rect, scale: f64) -> Self {
        let mut registry = PanelRegistry::new();
        registry.view_split_ratio = config.default_view_split;
        registry.install_default_splitters();
        Self {
            registry,
            session_saving: config.session_autosave,
            config,
            scale,
            client,
            minimized: client.is_empty(),
            ticks: 0,
            update_check_armed: true,
        }
    }

    /// Pixel constants for the current scale factor
    pub fn metrics(&self) -> ScaledMetrics {
        ScaledMetrics::new(&self.config, self.scale)
    }

    /// Resolve an optional page reference to a live page, defaulting to the
    /// focused page of the active view
    pub fn target_page(&self, page: Option<PageId>) -> Option<PageId> {
        match page {
            Some(id) => self.registry.page(id).map(|p| p.id),
            None => self
                .registry
                .focused_page(self.registry.active_side)
                .map(|p| p.id),
        }
    }
}
