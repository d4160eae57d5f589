//! Geometry calculator - turns a relevance set into concrete rectangles
//!
//! Stages, in order:
//! 1. tab-strip header band per active view (side by side when split)
//! 2. splitter gap between the views
//! 3. trailing sidebar column (symbol sidebar and/or document map)
//! 4. vertical edit / result / query-table stack
//!
//! All inputs are already DPI-scaled; the calculator never sees a zero-area
//! client rectangle because the engine skips the pass before getting here.

use crate::config::ScaledMetrics;
use crate::model::{split_horizontal, split_vertical, Rect, ViewSide};

use super::resolver::{PassSnapshot, RelevanceSet};

/// Rectangles for one view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewGeometry {
    /// Whole column owned by the view (header band plus body)
    pub column: Rect,
    pub tab_strip: Rect,
    pub body: Rect,
    /// Edit surface of the focused page; `None` for an empty view
    pub content: Option<Rect>,
    pub sidebar_splitter: Option<Rect>,
    /// Trailing column shared by the symbol sidebar and the document map
    pub sidebar_column: Option<Rect>,
    /// Reserved symbol-sidebar rectangle (kept even while the map covers it)
    pub sidebar: Option<Rect>,
    pub sidebar_visible: bool,
    pub map: Option<Rect>,
    pub result_splitter: Option<Rect>,
    pub result: Option<Rect>,
    pub query_splitter: Option<Rect>,
    pub query_table: Option<Rect>,
}

impl ViewGeometry {
    /// Content rectangles that are visible this pass (splitters excluded)
    pub fn visible_regions(&self) -> Vec<Rect> {
        let mut regions = Vec::with_capacity(5);
        regions.extend(self.content);
        regions.extend(self.result);
        regions.extend(self.query_table);
        if self.sidebar_visible {
            regions.extend(self.sidebar);
        }
        regions.extend(self.map);
        regions
    }

    /// Splitter rectangles inside the view body
    pub fn splitter_gaps(&self) -> Vec<Rect> {
        self.sidebar_splitter
            .into_iter()
            .chain(self.result_splitter)
            .chain(self.query_splitter)
            .collect()
    }
}

/// Geometry of a whole pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutGeometry {
    pub client: Rect,
    pub main: ViewGeometry,
    pub slave: Option<ViewGeometry>,
    /// Splitter between the views; present only when both are active
    pub view_gap: Option<Rect>,
}

impl LayoutGeometry {
    pub fn view(&self, side: ViewSide) -> Option<&ViewGeometry> {
        match side {
            ViewSide::Main => Some(&self.main),
            ViewSide::Slave => self.slave.as_ref(),
        }
    }
}

/// Compute every rectangle for this pass
pub fn compute(
    client: Rect,
    relevance: &RelevanceSet,
    snapshot: &PassSnapshot,
    metrics: &ScaledMetrics,
) -> LayoutGeometry {
    let (main_column, view_gap, slave_column) = if relevance.slave_view_active() {
        let (left, gap, right) =
            split_horizontal(client, snapshot.view_split_ratio, 0, metrics.view_gap);
        (left, Some(gap), Some(right))
    } else {
        (client, None, None)
    };

    let main = compute_view(ViewSide::Main, main_column, relevance, snapshot, metrics);
    let slave =
        slave_column.map(|c| compute_view(ViewSide::Slave, c, relevance, snapshot, metrics));

    LayoutGeometry {
        client,
        main,
        slave,
        view_gap,
    }
}

fn compute_view(
    side: ViewSide,
    column: Rect,
    relevance: &RelevanceSet,
    snapshot: &PassSnapshot,
    metrics: &ScaledMetrics,
) -> ViewGeometry {
    let (tab_strip, body) = column.take_top(metrics.tab_header_height);
    let mut geometry = ViewGeometry {
        column,
        tab_strip,
        body,
        ..ViewGeometry::default()
    };

    // A view with no focused page shows only its tab strip
    let Some(page) = snapshot.page(side) else {
        return geometry;
    };
    let flags = relevance.view(side);

    let owns_map = relevance.map_owner == Some(side);
    let column_width = if relevance.has_column(side) {
        let wanted = match page.proportions.sidebar_width {
            Some(logical) => metrics.scale(logical),
            None if flags.sidebar => metrics.default_sidebar_width,
            None => metrics.default_map_width,
        };
        let max_width = (body.width - metrics.split_width - metrics.min_edit_width).max(0);
        wanted.clamp(0, max_width)
    } else {
        0
    };

    // No room for the column: the edit stack keeps the whole body
    let stack = if column_width > 0 {
        let (rest, sidebar_column) = body.take_right(column_width);
        let (stack, splitter) = rest.take_right(metrics.split_width);

        geometry.sidebar_splitter = Some(splitter);
        geometry.sidebar_column = Some(sidebar_column);
        if flags.sidebar {
            geometry.sidebar = Some(sidebar_column);
            // The map takes the column; the sidebar keeps its reservation
            geometry.sidebar_visible = !owns_map;
        }
        if owns_map {
            geometry.map = Some(sidebar_column);
        }
        stack
    } else {
        body
    };

    if !flags.result {
        geometry.content = Some(stack);
        return geometry;
    }

    let ratio = page
        .proportions
        .result_ratio
        .unwrap_or(metrics.default_result_ratio);
    let (edit, result_splitter, result_region) =
        split_vertical(stack, ratio, metrics.min_edit_height, metrics.split_width);
    geometry.content = Some(edit);
    geometry.result_splitter = Some(result_splitter);

    if flags.query_table {
        let ratio = page
            .proportions
            .query_ratio
            .unwrap_or(metrics.default_query_ratio);
        let (result, query_splitter, query_table) = split_vertical(
            result_region,
            ratio,
            metrics.min_edit_height,
            metrics.split_width,
        );
        geometry.result = Some(result);
        geometry.query_splitter = Some(query_splitter);
        geometry.query_table = Some(query_table);
    } else {
        geometry.result = Some(result_region);
    }

    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::resolver::{PageSnapshot, ViewRelevance, ViewSnapshot};
    use crate::model::{PageId, PanelHandle, PanelProportions, PanelVisibility, SidebarKind};

    fn page(id: u64) -> PageSnapshot {
        PageSnapshot {
            id: PageId(id),
            content: Some(PanelHandle(100 + id)),
            sidebar: SidebarKind::List(PanelHandle(200 + id)),
            result: Some(PanelHandle(300 + id)),
            query_table: Some(PanelHandle(400 + id)),
            visibility: PanelVisibility::default(),
            proportions: PanelProportions::default(),
            plugin: false,
        }
    }

    fn snapshot(with_slave: bool) -> PassSnapshot {
        PassSnapshot {
            main: ViewSnapshot {
                side: ViewSide::Main,
                tab_strip: Some(PanelHandle(1)),
                visible: true,
                page: Some(page(1)),
            },
            slave: with_slave.then(|| ViewSnapshot {
                side: ViewSide::Slave,
                tab_strip: Some(PanelHandle(2)),
                visible: true,
                page: Some(page(2)),
            }),
            view_split_ratio: 0.5,
            document_map: Some(PanelHandle(9)),
            splitters: std::collections::HashMap::new(),
        }
    }

    fn active() -> ViewRelevance {
        ViewRelevance {
            active: true,
            ..ViewRelevance::default()
        }
    }

    #[test]
    fn test_single_view_fills_client() {
        let relevance = RelevanceSet {
            main: active(),
            ..RelevanceSet::default()
        };
        let metrics = ScaledMetrics::default();
        let g = compute(
            Rect::from_size(1000, 800),
            &relevance,
            &snapshot(false),
            &metrics,
        );
        assert_eq!(g.main.tab_strip, Rect::new(0, 0, 1000, 28));
        assert_eq!(g.main.content, Some(Rect::new(0, 28, 1000, 772)));
        assert!(g.slave.is_none());
        assert!(g.view_gap.is_none());
    }

    #[test]
    fn test_sidebar_carved_from_trailing_edge() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                sidebar: true,
                ..active()
            },
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(1000, 800),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        assert_eq!(g.main.sidebar, Some(Rect::new(760, 28, 240, 772)));
        assert_eq!(g.main.sidebar_splitter, Some(Rect::new(759, 28, 1, 772)));
        assert_eq!(g.main.content, Some(Rect::new(0, 28, 759, 772)));
        assert!(g.main.sidebar_visible);
    }

    #[test]
    fn test_column_dropped_when_body_too_narrow() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                sidebar: true,
                ..active()
            },
            map_owner: Some(ViewSide::Main),
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(100, 200),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        assert_eq!(g.main.sidebar_column, None);
        assert_eq!(g.main.sidebar_splitter, None);
        assert_eq!(g.main.sidebar, None);
        assert_eq!(g.main.map, None);
        assert_eq!(g.main.content, Some(Rect::new(0, 28, 100, 172)));
    }

    #[test]
    fn test_recorded_sidebar_width_is_scaled() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                sidebar: true,
                ..active()
            },
            ..RelevanceSet::default()
        };
        let mut snap = snapshot(false);
        if let Some(p) = snap.main.page.as_mut() {
            p.proportions.sidebar_width = Some(200);
        }
        let metrics = ScaledMetrics::new(&crate::config::LayoutConfig::default(), 2.0);
        let g = compute(Rect::from_size(2000, 1600), &relevance, &snap, &metrics);
        assert_eq!(g.main.sidebar.map(|r| r.width), Some(400));
    }

    #[test]
    fn test_map_takes_column_but_keeps_sidebar_reservation() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                sidebar: true,
                ..active()
            },
            map_owner: Some(ViewSide::Main),
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(1000, 800),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        assert_eq!(g.main.map, g.main.sidebar);
        assert!(g.main.map.is_some());
        assert!(!g.main.sidebar_visible);
        assert_eq!(g.main.visible_regions().len(), 2);
    }

    #[test]
    fn test_map_alone_uses_map_width() {
        let relevance = RelevanceSet {
            main: active(),
            map_owner: Some(ViewSide::Main),
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(1000, 800),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        assert_eq!(g.main.map.map(|r| r.width), Some(120));
        assert!(g.main.sidebar.is_none());
    }

    #[test]
    fn test_query_table_subdivides_result_region() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                result: true,
                query_table: true,
                ..active()
            },
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(1000, 800),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        let edit = g.main.content.unwrap();
        let result = g.main.result.unwrap();
        let query = g.main.query_table.unwrap();
        let result_split = g.main.result_splitter.unwrap();
        let query_split = g.main.query_splitter.unwrap();
        assert_eq!(result_split.y, edit.bottom());
        assert_eq!(result.y, result_split.bottom());
        assert_eq!(query_split.y, result.bottom());
        assert_eq!(query.y, query_split.bottom());
        assert_eq!(query.bottom(), 800);
    }

    #[test]
    fn test_cramped_body_never_inverts() {
        let relevance = RelevanceSet {
            main: ViewRelevance {
                sidebar: true,
                result: true,
                query_table: true,
                ..active()
            },
            ..RelevanceSet::default()
        };
        let g = compute(
            Rect::from_size(50, 40),
            &relevance,
            &snapshot(false),
            &ScaledMetrics::default(),
        );
        for r in g.main.visible_regions() {
            assert!(r.width >= 0 && r.height >= 0);
            assert!(g.main.body.intersection(&r) == Some(r) || r.is_empty());
        }
    }
}
