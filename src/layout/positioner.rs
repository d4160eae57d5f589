//! Batch positioner - orders every placement of a pass into one transaction
//!
//! Submission order inside a batch:
//! 1. panels being hidden, pushed to the bottom of the z-order
//! 2. splitters (back-most)
//! 3. tab strips, then secondary panels (sidebar, map, result, query table)
//! 4. edit surfaces, the one receiving focus last so it ends on top
//!
//! Panels absent from the registry this pass are omitted rather than hidden.

use serde::Serialize;

use crate::error::LayoutError;
use crate::host::{Placement, WindowHost, ZOrder};
use crate::model::{PageId, PanelHandle, PanelRegistry, Rect, SplitterId, ViewSide};

use super::calculator::LayoutGeometry;
use super::resolver::PassSnapshot;

/// What a batch entry positions, for logging and inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelRole {
    TabStrip(ViewSide),
    Splitter(SplitterId),
    Content(PageId),
    Sidebar(PageId),
    DocumentMap,
    Result(PageId),
    QueryTable(PageId),
}

/// One (panel, rect-or-hide, z) tuple of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    pub panel: PanelHandle,
    pub role: PanelRole,
    pub placement: Placement,
    pub z: ZOrder,
}

impl BatchEntry {
    fn show(panel: PanelHandle, role: PanelRole, rect: Rect) -> Self {
        Self {
            panel,
            role,
            placement: Placement::Show(rect),
            z: ZOrder::Top,
        }
    }

    fn hide(panel: PanelHandle, role: PanelRole) -> Self {
        Self {
            panel,
            role,
            placement: Placement::Hide,
            z: ZOrder::Bottom,
        }
    }
}

#[derive(Default)]
struct BatchBuilder {
    hidden: Vec<BatchEntry>,
    splitters: Vec<BatchEntry>,
    strips: Vec<BatchEntry>,
    secondary: Vec<BatchEntry>,
    content: Vec<BatchEntry>,
    focused_content: Option<BatchEntry>,
}

impl BatchBuilder {
    fn hide(&mut self, panel: Option<PanelHandle>, role: PanelRole) {
        if let Some(panel) = panel {
            self.hidden.push(BatchEntry::hide(panel, role));
        }
    }

    fn splitter(&mut self, snapshot: &PassSnapshot, id: SplitterId, rect: Option<Rect>) {
        let Some(panel) = snapshot.splitter(id) else {
            return;
        };
        match rect {
            Some(rect) => self
                .splitters
                .push(BatchEntry::show(panel, PanelRole::Splitter(id), rect)),
            None => self.hide(Some(panel), PanelRole::Splitter(id)),
        }
    }

    /// Show `panel` at `rect` when both exist, hide it when only the panel does
    fn secondary(
        &mut self,
        panel: Option<PanelHandle>,
        role: PanelRole,
        rect: Option<Rect>,
    ) {
        match (panel, rect) {
            (Some(panel), Some(rect)) => self.secondary.push(BatchEntry::show(panel, role, rect)),
            (panel, _) => self.hide(panel, role),
        }
    }

    fn finish(self) -> Vec<BatchEntry> {
        let mut entries = self.hidden;
        entries.extend(self.splitters);
        entries.extend(self.strips);
        entries.extend(self.secondary);
        entries.extend(self.content);
        entries.extend(self.focused_content);
        entries
    }
}

/// Build the ordered batch for one pass.
///
/// `focus_side` is the view whose edit surface is submitted last.
pub fn build_batch(
    geometry: &LayoutGeometry,
    snapshot: &PassSnapshot,
    focus_side: ViewSide,
) -> Vec<BatchEntry> {
    let mut batch = BatchBuilder::default();

    batch.splitter(snapshot, SplitterId::ViewGap, geometry.view_gap);

    for side in ViewSide::ALL {
        let Some(view) = snapshot.view(side) else {
            continue;
        };

        let Some(rects) = geometry.view(side) else {
            // View exists but is not laid out: its strip and splitters go away
            batch.hide(view.tab_strip, PanelRole::TabStrip(side));
            for id in SplitterId::for_side(side) {
                batch.hide(snapshot.splitter(id), PanelRole::Splitter(id));
            }
            continue;
        };

        if let Some(strip) = view.tab_strip {
            batch
                .strips
                .push(BatchEntry::show(strip, PanelRole::TabStrip(side), rects.tab_strip));
        }
        batch.splitter(snapshot, SplitterId::Sidebar(side), rects.sidebar_splitter);
        batch.splitter(snapshot, SplitterId::Result(side), rects.result_splitter);
        batch.splitter(snapshot, SplitterId::QueryTable(side), rects.query_splitter);

        let Some(page) = view.page.as_ref() else {
            continue;
        };

        let sidebar_rect = rects.sidebar.filter(|_| rects.sidebar_visible);
        batch.secondary(page.sidebar.handle(), PanelRole::Sidebar(page.id), sidebar_rect);
        batch.secondary(page.result, PanelRole::Result(page.id), rects.result);
        batch.secondary(
            page.query_table,
            PanelRole::QueryTable(page.id),
            rects.query_table,
        );

        if let (Some(panel), Some(rect)) = (page.content, rects.content) {
            let entry = BatchEntry::show(panel, PanelRole::Content(page.id), rect);
            if side == focus_side {
                batch.focused_content = Some(entry);
            } else {
                batch.content.push(entry);
            }
        }
    }

    let map_rect = geometry
        .main
        .map
        .or_else(|| geometry.slave.and_then(|s| s.map));
    batch.secondary(snapshot.document_map, PanelRole::DocumentMap, map_rect);

    batch.finish()
}

/// Build the follow-up batch hiding every panel of non-focused pages.
///
/// Covers all pages of an inactive slave view. Plugin pages own their
/// surfaces and are left alone.
pub fn build_cleanup(
    registry: &PanelRegistry,
    is_live: &dyn Fn(PanelHandle) -> bool,
) -> Vec<BatchEntry> {
    let mut entries = Vec::new();
    for side in ViewSide::ALL {
        let Some(view) = registry.get_view(side) else {
            continue;
        };
        let active = side == ViewSide::Main || registry.slave_visible();
        let keep = if active { view.focused } else { None };

        for page in registry.pages_in(side) {
            if Some(page.id) == keep || page.plugin {
                continue;
            }
            let owned = [
                (page.result, PanelRole::Result(page.id)),
                (page.query_table, PanelRole::QueryTable(page.id)),
                (page.sidebar.handle(), PanelRole::Sidebar(page.id)),
                (page.content, PanelRole::Content(page.id)),
            ];
            entries.extend(
                owned
                    .into_iter()
                    .filter_map(|(panel, role)| panel.filter(|p| is_live(*p)).map(|p| (p, role)))
                    .map(|(panel, role)| BatchEntry::hide(panel, role)),
            );
        }
    }
    entries
}

/// Apply a batch as one host transaction sized to its entry count.
///
/// An empty batch opens no transaction at all.
pub fn apply_batch(host: &mut dyn WindowHost, entries: &[BatchEntry]) -> Result<(), LayoutError> {
    if entries.is_empty() {
        return Ok(());
    }

    let mut transaction = host.begin_batch(entries.len())?;
    for entry in entries {
        tracing::trace!(
            panel = entry.panel.0,
            role = ?entry.role,
            placement = ?entry.placement,
            "defer"
        );
        transaction.add(entry.panel, entry.placement, entry.z);
    }
    transaction.commit()
}
