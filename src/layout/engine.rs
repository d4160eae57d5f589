//! Layout engine - runs one synchronous pass through every stage
//!
//! `Idle → Resolving → Calculating → Batching → Committed → FocusRestored → Idle`
//!
//! Every transition happens inside a single call. A pass that fails while
//! batching aborts on the spot (no cleanup, focus or repaint) and the engine
//! returns to `Idle`; the previous geometry stays on screen.

use crate::config::ScaledMetrics;
use crate::error::LayoutError;
use crate::host::{Placement, ScrollRequest, WindowHost};
use crate::model::{PageId, PanelHandle, PanelRegistry, Rect, ViewSide};

use super::calculator::{self, LayoutGeometry};
use super::coordinator::{self, AppliedPlacements};
use super::positioner::{apply_batch, build_batch, build_cleanup, BatchEntry, PanelRole};
use super::resolver::{resolve, PassSnapshot, RelevanceSet};

/// Stage a pass is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    Resolving,
    Calculating,
    Batching,
    Committed,
    FocusRestored,
}

/// Inputs of one pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutRequest {
    /// Client area to lay out; the host's current client area when `None`
    pub client: Option<Rect>,
    /// Page whose view wins ties and receives focus
    pub trigger: Option<PageId>,
    /// Force both views' root surfaces to repaint immediately
    pub full_redraw: bool,
}

/// Everything a committed pass did
#[derive(Debug, Clone)]
pub struct LayoutResult {
    pub client: Rect,
    pub relevance: RelevanceSet,
    pub geometry: LayoutGeometry,
    /// Main batch in submission order
    pub batch: Vec<BatchEntry>,
    /// Follow-up batch hiding panels of non-focused pages
    pub cleanup: Vec<BatchEntry>,
    pub repainted: Vec<PanelHandle>,
    pub focused: Option<PanelHandle>,
    pub scroll_requests: Vec<ScrollRequest>,
}

impl LayoutResult {
    /// Panels left visible once both batches applied
    pub fn visible_panels(&self) -> Vec<PanelHandle> {
        let mut visible: Vec<PanelHandle> = self
            .batch
            .iter()
            .filter(|e| e.placement.is_shown())
            .map(|e| e.panel)
            .filter(|p| !self.cleanup.iter().any(|c| c.panel == *p))
            .collect();
        visible.sort();
        visible.dedup();
        visible
    }

    /// Final placement of a panel in this pass, if it took part
    pub fn placement(&self, panel: PanelHandle) -> Option<Placement> {
        self.batch
            .iter()
            .chain(self.cleanup.iter())
            .rev()
            .find(|e| e.panel == panel)
            .map(|e| e.placement)
    }

    /// Shown rectangle for a role, if the role is visible this pass
    pub fn rect_of(&self, role: PanelRole) -> Option<Rect> {
        self.batch
            .iter()
            .find(|e| e.role == role)
            .and_then(|e| e.placement.rect())
    }
}

/// Result of asking for a pass
#[derive(Debug, Clone)]
pub enum LayoutOutcome {
    Applied(Box<LayoutResult>),
    /// Zero-area client rectangle (minimized window); nothing was touched
    Skipped,
}

impl LayoutOutcome {
    pub fn result(&self) -> Option<&LayoutResult> {
        match self {
            LayoutOutcome::Applied(result) => Some(&**result),
            LayoutOutcome::Skipped => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, LayoutOutcome::Applied(_))
    }
}

/// Drives layout passes and remembers what the last one applied
#[derive(Debug, Default)]
pub struct LayoutEngine {
    phase: LayoutPhase,
    applied: AppliedPlacements,
    passes: u64,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Number of passes that reached `Committed`
    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn transition(&mut self, next: LayoutPhase) {
        tracing::trace!(from = ?self.phase, to = ?next, "layout phase");
        self.phase = next;
    }

    /// Run one full pass
    pub fn recompute_layout(
        &mut self,
        registry: &mut PanelRegistry,
        host: &mut dyn WindowHost,
        metrics: &ScaledMetrics,
        request: LayoutRequest,
    ) -> Result<LayoutOutcome, LayoutError> {
        if self.phase != LayoutPhase::Idle {
            return Err(LayoutError::Reentrant(self.phase));
        }

        let outcome = self.run_pass(registry, host, metrics, request);
        if let Err(e) = &outcome {
            tracing::warn!("Layout pass aborted: {}", e);
        }
        self.transition(LayoutPhase::Idle);
        outcome
    }

    /// Activate a tab: lay out scoped to it, then scroll to the remembered
    /// caret. First-activation bookkeeping runs inside the pass once the page
    /// is laid out as focused.
    ///
    /// If the main batch never reaches the screen, the previous focus is put
    /// back so the registry keeps describing what the host shows.
    pub fn notify_tab_activated(
        &mut self,
        registry: &mut PanelRegistry,
        host: &mut dyn WindowHost,
        metrics: &ScaledMetrics,
        page: PageId,
        scroll_to_cursor: bool,
    ) -> Result<LayoutOutcome, LayoutError> {
        let Some(side) = registry.page(page).map(|p| p.view) else {
            tracing::debug!("Ignoring activation of unknown page {:?}", page);
            return Ok(LayoutOutcome::Skipped);
        };
        let previous_focus = registry.get_view(side).and_then(|v| v.focused);
        let previous_side = registry.active_side;
        let committed = self.passes;
        registry.focus_page(page);

        let request = LayoutRequest {
            client: None,
            trigger: Some(page),
            full_redraw: false,
        };
        let mut outcome = match self.recompute_layout(registry, host, metrics, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                if self.passes == committed {
                    if let Some(view) = registry.get_view_mut(side) {
                        view.focused = previous_focus;
                    }
                    registry.active_side = previous_side;
                }
                return Err(e);
            }
        };

        if let LayoutOutcome::Applied(result) = &mut outcome {
            let caret = registry
                .page(page)
                .filter(|_| scroll_to_cursor)
                .and_then(|p| p.caret_pos.map(|position| (position, p.hex_mode)));
            let request = match caret {
                Some((position, true)) => Some(ScrollRequest::GotoPosition { page, position }),
                Some((_, false)) => Some(ScrollRequest::ScrollCaret(page)),
                None => None,
            };
            if let Some(request) = request {
                host.scroll(request);
                result.scroll_requests.push(request);
            }
        }
        Ok(outcome)
    }

    /// Re-derive geometry from the host's client area and repaint everything
    pub fn force_full_redraw(
        &mut self,
        registry: &mut PanelRegistry,
        host: &mut dyn WindowHost,
        metrics: &ScaledMetrics,
    ) -> Result<LayoutOutcome, LayoutError> {
        if self.phase == LayoutPhase::Idle {
            self.applied.clear();
        }
        self.recompute_layout(
            registry,
            host,
            metrics,
            LayoutRequest {
                client: None,
                trigger: None,
                full_redraw: true,
            },
        )
    }

    fn run_pass(
        &mut self,
        registry: &mut PanelRegistry,
        host: &mut dyn WindowHost,
        metrics: &ScaledMetrics,
        request: LayoutRequest,
    ) -> Result<LayoutOutcome, LayoutError> {
        let client = request.client.unwrap_or_else(|| host.client_rect());
        if client.is_empty() {
            tracing::debug!(
                "Skipping layout for empty client area {}x{}",
                client.width,
                client.height
            );
            return Ok(LayoutOutcome::Skipped);
        }

        self.transition(LayoutPhase::Resolving);
        let snapshot = {
            let host: &dyn WindowHost = host;
            PassSnapshot::capture(registry, &|p| host.is_live(p))
        };
        let relevance = resolve(&snapshot, request.trigger);

        self.transition(LayoutPhase::Calculating);
        let geometry = calculator::compute(client, &relevance, &snapshot, metrics);
        let focus_side = focus_side(registry, &relevance, request.trigger);
        let batch = build_batch(&geometry, &snapshot, focus_side);

        self.transition(LayoutPhase::Batching);
        apply_batch(host, &batch)?;
        self.transition(LayoutPhase::Committed);
        self.passes += 1;

        // The main batch is on screen from here on, even if cleanup fails
        record_geometry(registry, &snapshot, &geometry);
        let changed = coordinator::changed_panels(&self.applied, &batch);
        coordinator::remember(&mut self.applied, &batch);

        let cleanup = {
            let host: &dyn WindowHost = host;
            build_cleanup(registry, &|p| host.is_live(p))
        };
        apply_batch(host, &cleanup)?;
        coordinator::remember(&mut self.applied, &cleanup);

        let focused = coordinator::restore_focus(
            host,
            snapshot.page(focus_side).and_then(|p| p.content),
        );
        let roots: Vec<PanelHandle> = ViewSide::ALL
            .into_iter()
            .filter(|side| relevance.view(*side).active)
            .filter_map(|side| snapshot.view(side).and_then(|v| v.tab_strip))
            .collect();
        coordinator::repaint(host, &changed, &roots, request.full_redraw);

        let mut scroll_requests = first_activations(registry, &relevance);
        scroll_requests.extend(
            ViewSide::ALL
                .into_iter()
                .filter(|side| relevance.view(*side).result)
                .filter_map(|side| snapshot.page(side))
                .map(|p| ScrollRequest::ResultJump(p.id)),
        );
        for request in &scroll_requests {
            host.scroll(*request);
        }
        self.transition(LayoutPhase::FocusRestored);

        tracing::debug!(
            client = ?client,
            batch = batch.len(),
            cleanup = cleanup.len(),
            repainted = changed.len(),
            slave = relevance.slave_view_active(),
            map = ?relevance.map_owner,
            "layout pass committed"
        );

        Ok(LayoutOutcome::Applied(Box::new(LayoutResult {
            client,
            relevance,
            geometry,
            batch,
            cleanup,
            repainted: changed,
            focused,
            scroll_requests,
        })))
    }
}

/// View whose edit surface ends on top and receives focus
fn focus_side(
    registry: &PanelRegistry,
    relevance: &RelevanceSet,
    trigger: Option<PageId>,
) -> ViewSide {
    let triggered = trigger.and_then(|id| registry.page(id)).filter(|page| {
        relevance.view(page.view).active
            && registry
                .get_view(page.view)
                .is_some_and(|v| v.is_focused(page.id))
    });
    if let Some(page) = triggered {
        return page.view;
    }
    if relevance.view(registry.active_side).active {
        registry.active_side
    } else {
        ViewSide::Main
    }
}

/// Mark focused pages of active views initialized, requesting a jump to
/// their remembered position the first time they are laid out
fn first_activations(registry: &mut PanelRegistry, relevance: &RelevanceSet) -> Vec<ScrollRequest> {
    let focused: Vec<PageId> = ViewSide::ALL
        .into_iter()
        .filter(|side| relevance.view(*side).active)
        .filter_map(|side| registry.get_view(side).and_then(|v| v.focused))
        .collect();

    let mut requests = Vec::new();
    for id in focused {
        if let Some(page) = registry.page_mut(id).filter(|p| !p.initialized) {
            page.initialized = true;
            requests.push(ScrollRequest::RestoreLastPosition(id));
        }
    }
    requests
}

/// Store this pass's rectangles on the laid-out pages.
///
/// Panels hidden this pass keep whatever rectangle they had before.
fn record_geometry(registry: &mut PanelRegistry, snapshot: &PassSnapshot, geometry: &LayoutGeometry) {
    for side in ViewSide::ALL {
        let (Some(page), Some(rects)) = (snapshot.page(side), geometry.view(side)) else {
            continue;
        };
        let Some(page) = registry.page_mut(page.id) else {
            continue;
        };
        let stored = &mut page.geometry;
        stored.content = rects.content.or(stored.content);
        stored.sidebar = rects.sidebar.or(stored.sidebar);
        stored.result = rects.result.or(stored.result);
        stored.query_table = rects.query_table.or(stored.query_table);
        stored.map = rects.map.or(stored.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn test_pass_requested_mid_flight_is_rejected() {
        let mut registry = PanelRegistry::new();
        registry.open_page(ViewSide::Main, "a.rs");
        let mut host = MemoryHost::new(800, 600);
        let mut engine = LayoutEngine::new();
        engine.phase = LayoutPhase::Batching;

        let err = engine
            .recompute_layout(
                &mut registry,
                &mut host,
                &ScaledMetrics::default(),
                LayoutRequest::default(),
            )
            .unwrap_err();
        assert_eq!(err, LayoutError::Reentrant(LayoutPhase::Batching));
        assert!(host.commits.is_empty());
    }

    #[test]
    fn test_engine_returns_to_idle_after_abort() {
        let mut registry = PanelRegistry::new();
        registry.open_page(ViewSide::Main, "a.rs");
        let mut host = MemoryHost::new(800, 600);
        host.fail_next_commit = true;
        let mut engine = LayoutEngine::new();

        let metrics = ScaledMetrics::default();
        assert!(engine
            .recompute_layout(&mut registry, &mut host, &metrics, LayoutRequest::default())
            .is_err());
        assert_eq!(engine.phase(), LayoutPhase::Idle);
        assert_eq!(engine.passes(), 0);

        assert!(engine
            .recompute_layout(&mut registry, &mut host, &metrics, LayoutRequest::default())
            .is_ok());
        assert_eq!(engine.passes(), 1);
    }
}
