//! Shared helpers for benchmarks

use duoview::host::MemoryHost;
use duoview::messages::{Msg, TabMsg};
use duoview::model::{PanelToggle, ViewSide};
use duoview::{LayoutConfig, ShellContext};

/// Create a shell at 1920x1080 with `pages` pages per view, each focused
/// page showing every secondary panel
#[allow(dead_code)]
pub fn make_shell(pages: usize, split: bool) -> (ShellContext, MemoryHost) {
    let mut host = MemoryHost::new(1920, 1080);
    let mut shell = ShellContext::create(LayoutConfig::default(), &host);

    if split {
        shell.dispatch(&mut host, Msg::Tab(TabMsg::Split));
    }
    let sides: &[ViewSide] = if split {
        &ViewSide::ALL
    } else {
        &[ViewSide::Main]
    };

    for side in sides {
        for i in 0..pages {
            shell.dispatch(&mut host, Msg::open(*side, format!("{}_{}.rs", side.name(), i)));
        }
        let Some(page) = shell.registry().focused_page(*side).map(|p| p.id) else {
            continue;
        };
        for panel in [
            PanelToggle::Sidebar,
            PanelToggle::Result,
            PanelToggle::QueryTable,
            PanelToggle::DocumentMap,
        ] {
            shell.dispatch(&mut host, Msg::show(page, panel));
        }
    }

    host.clear_records();
    (shell, host)
}
