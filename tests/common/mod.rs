//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use duoview::config::LayoutConfig;
use duoview::host::MemoryHost;
use duoview::layout::{LayoutOutcome, LayoutResult, ViewGeometry};
use duoview::messages::{Msg, TabMsg};
use duoview::model::{Page, PageId, PanelToggle, Rect, ViewSide};
use duoview::shell::{DispatchReport, ShellContext};

/// A shell wired to an in-memory host
pub struct Harness {
    pub shell: ShellContext,
    pub host: MemoryHost,
}

/// Create a harness with default config and the given client size
pub fn harness(width: i32, height: i32) -> Harness {
    harness_with_config(width, height, LayoutConfig::default())
}

pub fn harness_with_config(width: i32, height: i32, config: LayoutConfig) -> Harness {
    let host = MemoryHost::new(width, height);
    let shell = ShellContext::create(config, &host);
    Harness { shell, host }
}

impl Harness {
    pub fn send(&mut self, msg: Msg) -> DispatchReport {
        self.shell.dispatch(&mut self.host, msg)
    }

    /// Open a page and return its id
    pub fn open(&mut self, side: ViewSide, title: &str) -> PageId {
        self.send(Msg::open(side, title));
        self.shell
            .registry()
            .focused_page(side)
            .map(|p| p.id)
            .expect("page was opened")
    }

    pub fn show(&mut self, page: PageId, panel: PanelToggle) {
        self.send(Msg::show(page, panel));
    }

    pub fn hide(&mut self, page: PageId, panel: PanelToggle) {
        self.send(Msg::hide(page, panel));
    }

    pub fn split(&mut self) {
        self.send(Msg::Tab(TabMsg::Split));
    }

    pub fn page(&self, id: PageId) -> &Page {
        self.shell.registry().page(id).expect("page exists")
    }

    /// Run a pass on the host's current client area
    pub fn relayout(&mut self) -> LayoutResult {
        self.relayout_with(None, None)
    }

    pub fn relayout_for(&mut self, page: PageId) -> LayoutResult {
        self.relayout_with(None, Some(page))
    }

    pub fn relayout_with(&mut self, client: Option<Rect>, trigger: Option<PageId>) -> LayoutResult {
        let outcome = self
            .shell
            .recompute_layout(&mut self.host, client, trigger)
            .expect("layout pass succeeds");
        applied(outcome)
    }

    pub fn activate(&mut self, page: PageId) -> LayoutResult {
        let outcome = self
            .shell
            .notify_tab_activated(&mut self.host, page)
            .expect("activation succeeds");
        applied(outcome)
    }
}

/// Unwrap an applied outcome
pub fn applied(outcome: LayoutOutcome) -> LayoutResult {
    match outcome {
        LayoutOutcome::Applied(result) => *result,
        LayoutOutcome::Skipped => panic!("expected an applied pass, got Skipped"),
    }
}

/// Assert that a view's visible regions and splitter gaps tile its body:
/// pairwise disjoint, inside the body, and covering its whole area.
pub fn assert_tiles_body(view: &ViewGeometry) {
    let mut parts = view.visible_regions();
    parts.extend(view.splitter_gaps());

    for (i, a) in parts.iter().enumerate() {
        assert!(a.width >= 0 && a.height >= 0, "inverted rect {:?}", a);
        if !a.is_empty() {
            assert_eq!(
                view.body.intersection(a),
                Some(*a),
                "{:?} escapes body {:?}",
                a,
                view.body
            );
        }
        for b in parts.iter().skip(i + 1) {
            assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
        }
    }

    let covered: i64 = parts.iter().map(Rect::area).sum();
    assert_eq!(covered, view.body.area(), "body {:?} not fully covered", view.body);
}
