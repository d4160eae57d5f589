//! Benchmarks for layout passes
//!
//! Run with: cargo bench layout

mod support;
use support::make_shell;

use duoview::config::ScaledMetrics;
use duoview::host::WindowHost;
use duoview::layout::calculator;
use duoview::layout::resolver::{resolve, PassSnapshot};
use duoview::Rect;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

// ============================================================================
// Whole passes
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn recompute_single_view(bencher: divan::Bencher, pages: usize) {
    let (mut shell, mut host) = make_shell(pages, false);
    bencher.bench_local(|| {
        let outcome = shell.recompute_layout(&mut host, None, None);
        host.clear_records();
        divan::black_box(outcome)
    });
}

#[divan::bench(args = [1, 10, 100])]
fn recompute_split_views(bencher: divan::Bencher, pages: usize) {
    let (mut shell, mut host) = make_shell(pages, true);
    bencher.bench_local(|| {
        let outcome = shell.recompute_layout(&mut host, None, None);
        host.clear_records();
        divan::black_box(outcome)
    });
}

#[divan::bench(args = [10, 100])]
fn tab_switch(bencher: divan::Bencher, pages: usize) {
    let (mut shell, mut host) = make_shell(pages, true);
    let ids: Vec<_> = shell
        .registry()
        .pages_in(duoview::ViewSide::Main)
        .map(|p| p.id)
        .collect();
    let mut next = 0;
    bencher.bench_local(|| {
        next = (next + 1) % ids.len();
        let outcome = shell.notify_tab_activated(&mut host, ids[next]);
        host.clear_records();
        divan::black_box(outcome)
    });
}

#[divan::bench]
fn full_redraw(bencher: divan::Bencher) {
    let (mut shell, mut host) = make_shell(10, true);
    bencher.bench_local(|| {
        let outcome = shell.force_full_redraw(&mut host);
        host.clear_records();
        divan::black_box(outcome)
    });
}

// ============================================================================
// Individual stages
// ============================================================================

#[divan::bench]
fn resolve_relevance(bencher: divan::Bencher) {
    let (shell, host) = make_shell(10, true);
    let snapshot = PassSnapshot::capture(shell.registry(), &|p| host.is_live(p));
    bencher.bench_local(|| divan::black_box(resolve(&snapshot, None)));
}

#[divan::bench(args = [1.0, 1.5, 2.0])]
fn compute_geometry(bencher: divan::Bencher, scale: f64) {
    let (shell, host) = make_shell(10, true);
    let snapshot = PassSnapshot::capture(shell.registry(), &|p| host.is_live(p));
    let relevance = resolve(&snapshot, None);
    let metrics = ScaledMetrics::new(&shell.model().config, scale);
    let client = Rect::from_size(1920, 1080);
    bencher.bench_local(|| {
        divan::black_box(calculator::compute(client, &relevance, &snapshot, &metrics))
    });
}
