//! Pages - one open document/tab and the panel state that travels with it

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::registry::PanelHandle;
use super::view::ViewSide;

/// Unique identifier for a page (tab)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(pub u64);

/// Form of the symbol sidebar widget a page hosts.
///
/// List and tree forms are mutually exclusive, so a page carries at most one
/// sidebar widget handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarKind {
    #[default]
    None,
    List(PanelHandle),
    Tree(PanelHandle),
}

impl SidebarKind {
    pub fn handle(&self) -> Option<PanelHandle> {
        match self {
            SidebarKind::None => None,
            SidebarKind::List(h) | SidebarKind::Tree(h) => Some(*h),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, SidebarKind::List(_))
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, SidebarKind::Tree(_))
    }
}

/// A secondary panel a page can ask to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelToggle {
    Sidebar,
    Result,
    QueryTable,
    DocumentMap,
}

/// Stored "wants to show" flags of a page.
///
/// Flags only change through [`PanelVisibility::set`] and
/// [`PanelVisibility::toggle`]; command handling never pokes at them directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelVisibility {
    sidebar: bool,
    result: bool,
    query_table: bool,
    document_map: bool,
}

impl PanelVisibility {
    pub fn sidebar_shown(&self) -> bool {
        self.sidebar
    }

    pub fn result_shown(&self) -> bool {
        self.result
    }

    pub fn query_table_shown(&self) -> bool {
        self.query_table
    }

    pub fn map_shown(&self) -> bool {
        self.document_map
    }

    pub fn is_shown(&self, panel: PanelToggle) -> bool {
        match panel {
            PanelToggle::Sidebar => self.sidebar,
            PanelToggle::Result => self.result,
            PanelToggle::QueryTable => self.query_table,
            PanelToggle::DocumentMap => self.document_map,
        }
    }

    /// Set a flag; returns true if it changed
    pub fn set(&mut self, panel: PanelToggle, shown: bool) -> bool {
        let slot = match panel {
            PanelToggle::Sidebar => &mut self.sidebar,
            PanelToggle::Result => &mut self.result,
            PanelToggle::QueryTable => &mut self.query_table,
            PanelToggle::DocumentMap => &mut self.document_map,
        };
        let changed = *slot != shown;
        *slot = shown;
        changed
    }

    /// Flip a flag and return its new value
    pub fn toggle(&mut self, panel: PanelToggle) -> bool {
        let shown = !self.is_shown(panel);
        self.set(panel, shown);
        shown
    }
}

/// Which widget form to create when attaching a sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarStyle {
    List,
    Tree,
}

/// Proportions remembered from earlier passes or splitter drags.
///
/// `None` means "never recorded", in which case the configured default applies.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelProportions {
    /// Sidebar column width in logical (unscaled) pixels
    pub sidebar_width: Option<i32>,
    /// Share of the edit/result stack given to the edit area
    pub result_ratio: Option<f32>,
    /// Share of the result region given to the result list (rest is the query table)
    pub query_ratio: Option<f32>,
}

/// Last valid rectangles of a page's panels.
///
/// Hidden panels keep their previous rectangle here so a later show has
/// geometry to start from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageGeometry {
    pub content: Option<Rect>,
    pub sidebar: Option<Rect>,
    pub result: Option<Rect>,
    pub query_table: Option<Rect>,
    pub map: Option<Rect>,
}

/// One open document/tab
#[derive(Debug, Clone)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// View that currently owns this page
    pub view: ViewSide,
    /// The text/hex edit surface
    pub content: Option<PanelHandle>,
    pub sidebar: SidebarKind,
    pub result: Option<PanelHandle>,
    pub query_table: Option<PanelHandle>,
    pub visibility: PanelVisibility,
    pub proportions: PanelProportions,
    pub geometry: PageGeometry,
    /// Hosted by a remote-viewer plugin; such pages own their whole surface
    pub plugin: bool,
    pub hex_mode: bool,
    /// Remembered caret position, restored on activation
    pub caret_pos: Option<usize>,
    /// Set once the first activation bookkeeping ran
    pub initialized: bool,
}

impl Page {
    pub fn new(id: PageId, view: ViewSide, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            view,
            content: None,
            sidebar: SidebarKind::None,
            result: None,
            query_table: None,
            visibility: PanelVisibility::default(),
            proportions: PanelProportions::default(),
            geometry: PageGeometry::default(),
            plugin: false,
            hex_mode: false,
            caret_pos: None,
            initialized: false,
        }
    }

    /// Every handle this page owns, content surface first
    pub fn owned_panels(&self) -> impl Iterator<Item = PanelHandle> + '_ {
        self.content
            .into_iter()
            .chain(self.sidebar.handle())
            .chain(self.result)
            .chain(self.query_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_and_reports() {
        let mut flags = PanelVisibility::default();
        assert!(flags.toggle(PanelToggle::Result));
        assert!(flags.result_shown());
        assert!(!flags.toggle(PanelToggle::Result));
        assert!(!flags.set(PanelToggle::Result, false));
        assert!(flags.set(PanelToggle::DocumentMap, true));
        assert!(flags.map_shown());
    }

    #[test]
    fn test_owned_panels_lists_content_first() {
        let mut page = Page::new(PageId(1), ViewSide::Main, "a");
        page.content = Some(PanelHandle(5));
        page.result = Some(PanelHandle(9));
        page.sidebar = SidebarKind::Tree(PanelHandle(7));
        let owned: Vec<_> = page.owned_panels().collect();
        assert_eq!(owned, vec![PanelHandle(5), PanelHandle(7), PanelHandle(9)]);
    }
}
