//! Panel registry - identity and optional presence of every layout participant
//!
//! The registry is populated when the shell window is created and mutated by
//! split/unsplit, page lifecycle and panel-creation operations. Layout passes
//! only read it, apart from writing back each page's last valid rectangles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::geometry::Orientation;
use super::page::{Page, PageId, SidebarKind, SidebarStyle};
use super::view::{View, ViewSide};

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque handle of a host surface (window) taking part in layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelHandle(pub u64);

/// The fixed set of splitter surfaces owned by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitterId {
    /// Between the main and slave views
    ViewGap,
    /// Leading edge of a view's sidebar column
    Sidebar(ViewSide),
    /// Between a view's edit area and its result pane
    Result(ViewSide),
    /// Between a view's result pane and its query table
    QueryTable(ViewSide),
}

impl SplitterId {
    pub fn side(&self) -> Option<ViewSide> {
        match self {
            SplitterId::ViewGap => None,
            SplitterId::Sidebar(side) | SplitterId::Result(side) | SplitterId::QueryTable(side) => {
                Some(*side)
            }
        }
    }

    /// Direction of the bar on screen
    pub fn orientation(&self) -> Orientation {
        match self {
            SplitterId::ViewGap | SplitterId::Sidebar(_) => Orientation::Vertical,
            SplitterId::Result(_) | SplitterId::QueryTable(_) => Orientation::Horizontal,
        }
    }

    /// Every splitter belonging to one view
    pub fn for_side(side: ViewSide) -> [SplitterId; 3] {
        [
            SplitterId::Sidebar(side),
            SplitterId::Result(side),
            SplitterId::QueryTable(side),
        ]
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Identity and presence of all views, pages and shared surfaces
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    main: View,
    slave: Option<View>,
    pages: HashMap<PageId, Page>,
    splitters: HashMap<SplitterId, PanelHandle>,
    /// Shared document-map surface (there is only ever one)
    document_map: Option<PanelHandle>,
    /// View that received the most recent tab activation
    pub active_side: ViewSide,
    /// Share of the client width given to the main view when split
    pub view_split_ratio: f32,

    next_handle: u64,
    next_page_id: u64,
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelRegistry {
    /// Create a registry holding only the main view
    pub fn new() -> Self {
        let main_strip = PanelHandle(1);
        Self {
            main: View::new(ViewSide::Main, main_strip),
            slave: None,
            pages: HashMap::new(),
            splitters: HashMap::new(),
            document_map: None,
            active_side: ViewSide::Main,
            view_split_ratio: 0.5,
            next_handle: 2,
            next_page_id: 1,
        }
    }

    /// Generate a new panel handle
    pub fn alloc_handle(&mut self) -> PanelHandle {
        let handle = PanelHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn next_page_id(&mut self) -> PageId {
        let id = PageId(self.next_page_id);
        self.next_page_id += 1;
        id
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The view for `side`, if it exists (the slave may be absent)
    pub fn get_view(&self, side: ViewSide) -> Option<&View> {
        match side {
            ViewSide::Main => Some(&self.main),
            ViewSide::Slave => self.slave.as_ref(),
        }
    }

    pub fn get_view_mut(&mut self, side: ViewSide) -> Option<&mut View> {
        match side {
            ViewSide::Main => Some(&mut self.main),
            ViewSide::Slave => self.slave.as_mut(),
        }
    }

    pub fn get_splitter(&self, id: SplitterId) -> Option<PanelHandle> {
        self.splitters.get(&id).copied()
    }

    pub fn document_map(&self) -> Option<PanelHandle> {
        self.document_map
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(&id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The focused page of a view
    pub fn focused_page(&self, side: ViewSide) -> Option<&Page> {
        self.get_view(side)
            .and_then(|v| v.focused)
            .and_then(|id| self.pages.get(&id))
    }

    /// Pages of a view in tab order
    pub fn pages_in(&self, side: ViewSide) -> impl Iterator<Item = &Page> + '_ {
        self.get_view(side)
            .into_iter()
            .flat_map(|v| v.pages.iter())
            .filter_map(move |id| self.pages.get(id))
    }

    /// Every surface the registry knows about
    pub fn all_panels(&self) -> Vec<PanelHandle> {
        let mut panels: Vec<PanelHandle> = ViewSide::ALL
            .into_iter()
            .filter_map(|side| self.get_view(side).map(|v| v.tab_strip))
            .chain(self.splitters.values().copied())
            .chain(self.document_map)
            .chain(self.pages.values().flat_map(|p| p.owned_panels()))
            .collect();
        panels.sort();
        panels
    }

    /// True when the slave view exists and is shown
    pub fn slave_visible(&self) -> bool {
        self.slave.as_ref().is_some_and(|v| v.visible)
    }

    // =========================================================================
    // Shared surfaces
    // =========================================================================

    /// Create (or return) the surface for a splitter
    pub fn install_splitter(&mut self, id: SplitterId) -> PanelHandle {
        if let Some(handle) = self.splitters.get(&id) {
            return *handle;
        }
        let handle = self.alloc_handle();
        self.splitters.insert(id, handle);
        handle
    }

    /// Create every splitter the shell uses for the views that exist
    pub fn install_default_splitters(&mut self) {
        for id in SplitterId::for_side(ViewSide::Main) {
            self.install_splitter(id);
        }
        if self.slave.is_some() {
            self.install_splitter(SplitterId::ViewGap);
            for id in SplitterId::for_side(ViewSide::Slave) {
                self.install_splitter(id);
            }
        }
    }

    pub fn remove_splitter(&mut self, id: SplitterId) -> Option<PanelHandle> {
        self.splitters.remove(&id)
    }

    /// Create (or return) the shared document-map surface
    pub fn install_document_map(&mut self) -> PanelHandle {
        if let Some(handle) = self.document_map {
            return handle;
        }
        let handle = self.alloc_handle();
        self.document_map = Some(handle);
        handle
    }

    // =========================================================================
    // Split / unsplit
    // =========================================================================

    /// Create the slave view (or re-show it) and its splitters
    pub fn split(&mut self) -> ViewSide {
        if let Some(slave) = self.slave.as_mut() {
            slave.visible = true;
        } else {
            let strip = self.alloc_handle();
            self.slave = Some(View::new(ViewSide::Slave, strip));
            self.install_splitter(SplitterId::ViewGap);
            for id in SplitterId::for_side(ViewSide::Slave) {
                self.install_splitter(id);
            }
        }
        ViewSide::Slave
    }

    /// Destroy the slave view, migrating its pages to the main view.
    ///
    /// Returns the handles of the surfaces that no longer exist.
    pub fn unsplit(&mut self) -> Vec<PanelHandle> {
        let Some(slave) = self.slave.take() else {
            return Vec::new();
        };

        for id in &slave.pages {
            if let Some(page) = self.pages.get_mut(id) {
                page.view = ViewSide::Main;
            }
            self.main.pages.push(*id);
        }
        if self.main.focused.is_none() {
            self.main.focused = slave.focused.or_else(|| self.main.pages.first().copied());
        }
        self.active_side = ViewSide::Main;

        let mut destroyed = vec![slave.tab_strip];
        if let Some(handle) = self.splitters.remove(&SplitterId::ViewGap) {
            destroyed.push(handle);
        }
        for id in SplitterId::for_side(ViewSide::Slave) {
            if let Some(handle) = self.splitters.remove(&id) {
                destroyed.push(handle);
            }
        }
        destroyed
    }

    /// Show or hide an existing slave view without destroying it
    pub fn set_slave_visible(&mut self, visible: bool) -> bool {
        match self.slave.as_mut() {
            Some(slave) => {
                slave.visible = visible;
                if !visible && self.active_side == ViewSide::Slave {
                    self.active_side = ViewSide::Main;
                }
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Page lifecycle
    // =========================================================================

    /// Open a new page in a view; it becomes that view's focused page.
    ///
    /// Returns `None` when the requested view does not exist.
    pub fn open_page(&mut self, side: ViewSide, title: impl Into<String>) -> Option<PageId> {
        self.get_view(side)?;
        let id = self.next_page_id();
        let content = self.alloc_handle();
        let mut page = Page::new(id, side, title);
        page.content = Some(content);
        self.pages.insert(id, page);

        let view = self.get_view_mut(side)?;
        view.pages.push(id);
        view.focused = Some(id);
        Some(id)
    }

    /// Close a page. Its handles are returned with it so the caller can
    /// destroy the surfaces.
    pub fn close_page(&mut self, id: PageId) -> Option<Page> {
        let page = self.pages.remove(&id)?;
        if let Some(view) = self.get_view_mut(page.view) {
            view.remove(id);
        }
        Some(page)
    }

    /// Make `id` its view's focused page and that view the active one
    pub fn focus_page(&mut self, id: PageId) -> bool {
        let Some(side) = self.pages.get(&id).map(|p| p.view) else {
            return false;
        };
        match self.get_view_mut(side) {
            Some(view) => {
                view.focused = Some(id);
                self.active_side = side;
                true
            }
            None => false,
        }
    }

    /// Transfer a page to the other view, where it becomes focused
    pub fn move_page(&mut self, id: PageId, to: ViewSide) -> bool {
        let Some(from) = self.pages.get(&id).map(|p| p.view) else {
            return false;
        };
        if from == to || self.get_view(to).is_none() {
            return false;
        }

        if let Some(view) = self.get_view_mut(from) {
            view.remove(id);
        }
        if let Some(view) = self.get_view_mut(to) {
            view.pages.push(id);
            view.focused = Some(id);
        }
        if let Some(page) = self.pages.get_mut(&id) {
            page.view = to;
        }
        self.active_side = to;
        true
    }

    // =========================================================================
    // Page-owned panels
    // =========================================================================

    /// Create the symbol sidebar widget for a page, replacing any existing one.
    ///
    /// Returns the new handle and the replaced one (if any).
    pub fn attach_sidebar(
        &mut self,
        id: PageId,
        style: SidebarStyle,
    ) -> Option<(PanelHandle, Option<PanelHandle>)> {
        self.pages.get(&id)?;
        let handle = self.alloc_handle();
        let page = self.pages.get_mut(&id)?;
        let previous = page.sidebar.handle();
        page.sidebar = match style {
            SidebarStyle::List => SidebarKind::List(handle),
            SidebarStyle::Tree => SidebarKind::Tree(handle),
        };
        Some((handle, previous))
    }

    pub fn detach_sidebar(&mut self, id: PageId) -> Option<PanelHandle> {
        let page = self.pages.get_mut(&id)?;
        std::mem::take(&mut page.sidebar).handle()
    }

    /// Create (or return) the result pane of a page
    pub fn attach_result(&mut self, id: PageId) -> Option<PanelHandle> {
        if let Some(existing) = self.pages.get(&id)?.result {
            return Some(existing);
        }
        let handle = self.alloc_handle();
        self.pages.get_mut(&id)?.result = Some(handle);
        Some(handle)
    }

    /// Create (or return) the query-result table of a page
    pub fn attach_query_table(&mut self, id: PageId) -> Option<PanelHandle> {
        if let Some(existing) = self.pages.get(&id)?.query_table {
            return Some(existing);
        }
        let handle = self.alloc_handle();
        self.pages.get_mut(&id)?.query_table = Some(handle);
        Some(handle)
    }
}

// ============================================================================
// Debug Invariant Validation
// ============================================================================

impl PanelRegistry {
    /// Validate internal invariants in debug builds.
    ///
    /// Checks that every page belongs to exactly one view, that each view's
    /// focused page is one of its own pages, and that page ownership agrees
    /// with the view's tab list.
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        for side in ViewSide::ALL {
            let Some(view) = self.get_view(side) else {
                continue;
            };
            if let Some(focused) = view.focused {
                assert!(
                    view.pages.contains(&focused),
                    "{} view focuses {:?} which it does not own",
                    side.name(),
                    focused
                );
            }
            for id in &view.pages {
                let page = self
                    .pages
                    .get(id)
                    .unwrap_or_else(|| panic!("{} view lists missing page {:?}", side.name(), id));
                assert_eq!(page.view, side, "page {:?} ownership mismatch", id);
            }
        }

        for (id, page) in &self.pages {
            let owners = ViewSide::ALL
                .iter()
                .filter(|side| self.get_view(**side).is_some_and(|v| v.contains(*id)))
                .count();
            assert_eq!(owners, 1, "page {:?} ({}) owned by {} views", id, page.title, owners);
        }
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants(&self) {}
}
