//! Visibility resolver - decides which panels take part in a layout pass
//!
//! The resolver is a pure function of a [`PassSnapshot`] (the two views and
//! their focused pages, with dead handles already filtered out). It never
//! looks at non-focused pages: their secondary panels are never relevant.

use std::collections::HashMap;

use crate::model::{
    Page, PageId, PanelHandle, PanelProportions, PanelRegistry, PanelVisibility, SidebarKind,
    SplitterId, ViewSide,
};

// ============================================================================
// Pass snapshot
// ============================================================================

/// What the layout pass knows about a view's focused page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub id: PageId,
    pub content: Option<PanelHandle>,
    pub sidebar: SidebarKind,
    pub result: Option<PanelHandle>,
    pub query_table: Option<PanelHandle>,
    pub visibility: PanelVisibility,
    pub proportions: PanelProportions,
    pub plugin: bool,
}

impl PageSnapshot {
    fn capture(page: &Page, is_live: &dyn Fn(PanelHandle) -> bool) -> Self {
        let live = |h: Option<PanelHandle>| h.filter(|h| is_live(*h));
        let sidebar = match page.sidebar {
            SidebarKind::List(h) if is_live(h) => SidebarKind::List(h),
            SidebarKind::Tree(h) if is_live(h) => SidebarKind::Tree(h),
            _ => SidebarKind::None,
        };
        Self {
            id: page.id,
            content: live(page.content),
            sidebar,
            result: live(page.result),
            query_table: live(page.query_table),
            visibility: page.visibility,
            proportions: page.proportions,
            plugin: page.plugin,
        }
    }
}

/// What the layout pass knows about one view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub side: ViewSide,
    pub tab_strip: Option<PanelHandle>,
    pub visible: bool,
    pub page: Option<PageSnapshot>,
}

/// Everything downstream stages read, captured once per pass
#[derive(Debug, Clone, PartialEq)]
pub struct PassSnapshot {
    pub main: ViewSnapshot,
    pub slave: Option<ViewSnapshot>,
    pub view_split_ratio: f32,
    pub document_map: Option<PanelHandle>,
    pub splitters: HashMap<SplitterId, PanelHandle>,
}

impl PassSnapshot {
    /// Capture the registry, treating handles `is_live` rejects as absent
    pub fn capture(registry: &PanelRegistry, is_live: &dyn Fn(PanelHandle) -> bool) -> Self {
        let view = |side: ViewSide| {
            registry.get_view(side).map(|v| ViewSnapshot {
                side,
                tab_strip: Some(v.tab_strip).filter(|h| is_live(*h)),
                visible: v.visible,
                page: registry
                    .focused_page(side)
                    .map(|p| PageSnapshot::capture(p, is_live)),
            })
        };

        let splitters = [SplitterId::ViewGap]
            .into_iter()
            .chain(SplitterId::for_side(ViewSide::Main))
            .chain(SplitterId::for_side(ViewSide::Slave))
            .filter_map(|id| {
                registry
                    .get_splitter(id)
                    .filter(|h| is_live(*h))
                    .map(|h| (id, h))
            })
            .collect();

        Self {
            main: view(ViewSide::Main).unwrap_or(ViewSnapshot {
                side: ViewSide::Main,
                tab_strip: None,
                visible: true,
                page: None,
            }),
            slave: view(ViewSide::Slave),
            view_split_ratio: registry.view_split_ratio,
            document_map: registry.document_map().filter(|h| is_live(*h)),
            splitters,
        }
    }

    pub fn splitter(&self, id: SplitterId) -> Option<PanelHandle> {
        self.splitters.get(&id).copied()
    }

    pub fn view(&self, side: ViewSide) -> Option<&ViewSnapshot> {
        match side {
            ViewSide::Main => Some(&self.main),
            ViewSide::Slave => self.slave.as_ref(),
        }
    }

    pub fn page(&self, side: ViewSide) -> Option<&PageSnapshot> {
        self.view(side).and_then(|v| v.page.as_ref())
    }
}

// ============================================================================
// Relevance
// ============================================================================

/// Which of a view's panels take part in this pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRelevance {
    pub active: bool,
    pub sidebar: bool,
    pub result: bool,
    pub query_table: bool,
}

/// Normalized output of the resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelevanceSet {
    pub main: ViewRelevance,
    pub slave: ViewRelevance,
    /// View the document map attaches to this pass, if any
    pub map_owner: Option<ViewSide>,
}

impl RelevanceSet {
    pub fn view(&self, side: ViewSide) -> &ViewRelevance {
        match side {
            ViewSide::Main => &self.main,
            ViewSide::Slave => &self.slave,
        }
    }

    pub fn slave_view_active(&self) -> bool {
        self.slave.active
    }

    pub fn main_sidebar_active(&self) -> bool {
        self.main.sidebar
    }

    pub fn slave_sidebar_active(&self) -> bool {
        self.slave.sidebar
    }

    pub fn main_result_active(&self) -> bool {
        self.main.result
    }

    pub fn slave_result_active(&self) -> bool {
        self.slave.result
    }

    pub fn main_query_table_active(&self) -> bool {
        self.main.query_table
    }

    pub fn slave_query_table_active(&self) -> bool {
        self.slave.query_table
    }

    pub fn map_active(&self) -> bool {
        self.map_owner.is_some()
    }

    /// True when the view's trailing column (sidebar and/or map) is reserved
    pub fn has_column(&self, side: ViewSide) -> bool {
        self.view(side).sidebar || self.map_owner == Some(side)
    }
}

fn resolve_view(view: Option<&ViewSnapshot>) -> ViewRelevance {
    let Some(view) = view.filter(|v| v.visible) else {
        return ViewRelevance::default();
    };
    let Some(page) = view.page.as_ref().filter(|p| !p.plugin) else {
        return ViewRelevance {
            active: true,
            ..ViewRelevance::default()
        };
    };

    let flags = page.visibility;
    let result = flags.result_shown() && page.result.is_some();
    ViewRelevance {
        active: true,
        sidebar: flags.sidebar_shown() && page.sidebar.handle().is_some(),
        result,
        query_table: result && flags.query_table_shown() && page.query_table.is_some(),
    }
}

/// Decide panel relevance for one pass.
///
/// `trigger` breaks document-map ties: when both views' focused pages ask
/// for the map, the view holding `trigger` as its focused page wins, and the
/// main view wins otherwise.
pub fn resolve(snapshot: &PassSnapshot, trigger: Option<PageId>) -> RelevanceSet {
    let main = resolve_view(Some(&snapshot.main));
    let slave = resolve_view(snapshot.slave.as_ref());

    let wants_map = |side: ViewSide, relevance: &ViewRelevance| {
        relevance.active
            && snapshot
                .page(side)
                .is_some_and(|p| !p.plugin && p.visibility.map_shown())
    };

    let map_owner = if snapshot.document_map.is_none() {
        None
    } else {
        match (
            wants_map(ViewSide::Main, &main),
            wants_map(ViewSide::Slave, &slave),
        ) {
            (false, false) => None,
            (true, false) => Some(ViewSide::Main),
            (false, true) => Some(ViewSide::Slave),
            (true, true) => {
                let slave_triggered = trigger.is_some()
                    && snapshot.page(ViewSide::Slave).map(|p| p.id) == trigger;
                Some(if slave_triggered {
                    ViewSide::Slave
                } else {
                    ViewSide::Main
                })
            }
        }
    };

    RelevanceSet {
        main,
        slave,
        map_owner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PanelToggle;

    fn page(id: u64) -> PageSnapshot {
        PageSnapshot {
            id: PageId(id),
            content: Some(PanelHandle(100 + id)),
            sidebar: SidebarKind::List(PanelHandle(200 + id)),
            result: Some(PanelHandle(300 + id)),
            query_table: None,
            visibility: PanelVisibility::default(),
            proportions: PanelProportions::default(),
            plugin: false,
        }
    }

    fn split_snapshot() -> PassSnapshot {
        PassSnapshot {
            main: ViewSnapshot {
                side: ViewSide::Main,
                tab_strip: Some(PanelHandle(1)),
                visible: true,
                page: Some(page(1)),
            },
            slave: Some(ViewSnapshot {
                side: ViewSide::Slave,
                tab_strip: Some(PanelHandle(2)),
                visible: true,
                page: Some(page(2)),
            }),
            view_split_ratio: 0.5,
            document_map: Some(PanelHandle(9)),
            splitters: HashMap::new(),
        }
    }

    fn flags_mut(snapshot: &mut PassSnapshot, side: ViewSide) -> &mut PanelVisibility {
        let view = match side {
            ViewSide::Main => &mut snapshot.main,
            ViewSide::Slave => snapshot.slave.as_mut().unwrap(),
        };
        &mut view.page.as_mut().unwrap().visibility
    }

    #[test]
    fn test_flag_without_widget_is_not_relevant() {
        let mut snapshot = split_snapshot();
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::Result, true);
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::QueryTable, true);
        let relevance = resolve(&snapshot, None);
        assert!(relevance.main_result_active());
        // no query table widget was ever created
        assert!(!relevance.main_query_table_active());
    }

    #[test]
    fn test_hidden_slave_is_inactive() {
        let mut snapshot = split_snapshot();
        if let Some(slave) = snapshot.slave.as_mut() {
            slave.visible = false;
        }
        flags_mut(&mut snapshot, ViewSide::Slave).set(PanelToggle::Sidebar, true);
        let relevance = resolve(&snapshot, None);
        assert!(!relevance.slave_view_active());
        assert!(!relevance.slave_sidebar_active());
    }

    #[test]
    fn test_plugin_page_gets_no_secondary_panels() {
        let mut snapshot = split_snapshot();
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::Sidebar, true);
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::DocumentMap, true);
        if let Some(p) = snapshot.main.page.as_mut() {
            p.plugin = true;
        }
        let relevance = resolve(&snapshot, None);
        assert!(relevance.main.active);
        assert!(!relevance.main_sidebar_active());
        assert!(!relevance.has_column(ViewSide::Main));

        // The slave's text page still gets the map
        flags_mut(&mut snapshot, ViewSide::Slave).set(PanelToggle::DocumentMap, true);
        assert_eq!(resolve(&snapshot, None).map_owner, Some(ViewSide::Slave));
    }

    #[test]
    fn test_map_tie_goes_to_triggering_view() {
        let mut snapshot = split_snapshot();
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::DocumentMap, true);
        flags_mut(&mut snapshot, ViewSide::Slave).set(PanelToggle::DocumentMap, true);

        assert_eq!(resolve(&snapshot, None).map_owner, Some(ViewSide::Main));
        assert_eq!(
            resolve(&snapshot, Some(PageId(2))).map_owner,
            Some(ViewSide::Slave)
        );
        assert_eq!(
            resolve(&snapshot, Some(PageId(1))).map_owner,
            Some(ViewSide::Main)
        );
    }

    #[test]
    fn test_map_needs_registered_surface() {
        let mut snapshot = split_snapshot();
        snapshot.document_map = None;
        flags_mut(&mut snapshot, ViewSide::Main).set(PanelToggle::DocumentMap, true);
        assert!(!resolve(&snapshot, None).map_active());
    }
}
