//! Update functions for the Elm-style architecture
//!
//! All shell state transformations flow through these functions. None of them
//! lays anything out; they return the [`Cmd`] that will.

use crate::commands::Cmd;
use crate::messages::{Msg, PanelMsg, TabMsg, WindowMsg};
use crate::model::{PageId, PanelHandle, PanelToggle, Rect, ShellModel, SidebarStyle};

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut ShellModel, msg: Msg) -> Option<Cmd> {
    let result = match msg {
        Msg::Window(m) => update_window(model, m),
        Msg::Panel(m) => update_panel(model, m),
        Msg::Tab(m) => update_tab(model, m),
        Msg::Tick => update_tick(model),
    };

    model.registry.assert_invariants();
    result
}

/// Handle top-level window events
pub fn update_window(model: &mut ShellModel, msg: WindowMsg) -> Option<Cmd> {
    match msg {
        WindowMsg::Resize { width, height } => {
            let client = Rect::from_size(width, height);
            if client.is_empty() {
                model.minimized = true;
                return None;
            }
            model.minimized = false;
            model.client = client;
            Some(Cmd::Relayout {
                client: Some(client),
                trigger: None,
                full_redraw: true,
            })
        }

        WindowMsg::Minimized => {
            model.minimized = true;
            None
        }

        WindowMsg::DpiChanged(scale) => {
            if !(scale.is_finite() && scale > 0.0) {
                tracing::warn!("Ignoring invalid DPI scale {}", scale);
                return None;
            }
            model.scale = scale;
            (!model.minimized).then_some(Cmd::FullRedraw)
        }

        WindowMsg::ThemeChanged => (!model.minimized).then_some(Cmd::FullRedraw),
    }
}

/// Handle secondary-panel commands
pub fn update_panel(model: &mut ShellModel, msg: PanelMsg) -> Option<Cmd> {
    match msg {
        PanelMsg::Toggle { page, panel } => {
            let page = model.target_page(page)?;
            let shown = model
                .registry
                .page(page)
                .is_some_and(|p| !p.visibility.is_shown(panel));
            set_panel(model, page, panel, shown)
        }

        PanelMsg::Set { page, panel, shown } => {
            let page = model.target_page(page)?;
            set_panel(model, page, panel, shown)
        }

        PanelMsg::SetSidebarStyle { page, style } => {
            let page = model.target_page(page)?;
            let current = model.registry.page(page)?.sidebar;
            let unchanged = match style {
                SidebarStyle::List => current.is_list(),
                SidebarStyle::Tree => current.is_tree(),
            };
            if unchanged {
                return None;
            }
            let (_, replaced) = model.registry.attach_sidebar(page, style)?;
            Some(with_destroyed(
                replaced.into_iter().collect(),
                Cmd::relayout_for(page),
            ))
        }

        PanelMsg::ResizeSidebar { page, width } => {
            let page = model.target_page(page)?;
            model.registry.page_mut(page)?.proportions.sidebar_width = Some(width.max(0));
            Some(Cmd::relayout_for(page))
        }

        PanelMsg::SetResultRatio { page, ratio } => {
            let page = model.target_page(page)?;
            model.registry.page_mut(page)?.proportions.result_ratio = Some(clamp_ratio(ratio));
            Some(Cmd::relayout_for(page))
        }

        PanelMsg::SetQueryRatio { page, ratio } => {
            let page = model.target_page(page)?;
            model.registry.page_mut(page)?.proportions.query_ratio = Some(clamp_ratio(ratio));
            Some(Cmd::relayout_for(page))
        }

        PanelMsg::SetViewSplit(ratio) => {
            model.registry.view_split_ratio = clamp_ratio(ratio);
            model
                .registry
                .slave_visible()
                .then(Cmd::relayout)
        }
    }
}

/// Handle page and view lifecycle
pub fn update_tab(model: &mut ShellModel, msg: TabMsg) -> Option<Cmd> {
    match msg {
        TabMsg::Open { side, title, hex } => {
            let Some(page) = model.registry.open_page(side, title) else {
                tracing::warn!("Cannot open a page in the missing {} view", side.name());
                return None;
            };
            if let Some(p) = model.registry.page_mut(page) {
                p.hex_mode = hex;
            }
            Some(Cmd::TabActivated(page))
        }

        TabMsg::OpenPlugin { side, title } => {
            let page = model.registry.open_page(side, title)?;
            model.registry.page_mut(page)?.plugin = true;
            Some(Cmd::TabActivated(page))
        }

        TabMsg::Close(page) => {
            let closed = model.registry.close_page(page)?;
            let destroyed: Vec<PanelHandle> = closed.owned_panels().collect();
            let next = model
                .registry
                .focused_page(closed.view)
                .map(|p| p.id)
                .filter(|_| closed.view == model.registry.active_side);
            let then = match next {
                Some(next) => Cmd::TabActivated(next),
                None => Cmd::relayout(),
            };
            Some(with_destroyed(destroyed, then))
        }

        TabMsg::Activate(page) => {
            model.registry.page(page)?;
            Some(Cmd::TabActivated(page))
        }

        TabMsg::Move { page, to } => {
            if !model.registry.move_page(page, to) {
                tracing::debug!("Page {:?} cannot move to the {} view", page, to.name());
                return None;
            }
            Some(Cmd::TabActivated(page))
        }

        TabMsg::Split => {
            model.registry.split();
            Some(Cmd::relayout())
        }

        TabMsg::Unsplit => {
            let destroyed = model.registry.unsplit();
            if destroyed.is_empty() {
                return None;
            }
            Some(with_destroyed(destroyed, Cmd::relayout()))
        }

        TabMsg::SetSlaveVisible(visible) => model
            .registry
            .set_slave_visible(visible)
            .then(Cmd::relayout),

        TabMsg::SetCaret { page, position } => {
            model.registry.page_mut(page)?.caret_pos = Some(position);
            None
        }
    }
}

/// Handle the periodic timer. Ticks never relayout.
pub fn update_tick(model: &mut ShellModel) -> Option<Cmd> {
    model.ticks += 1;

    let mut cmds = Vec::new();
    if model.update_check_armed && model.ticks >= u64::from(model.config.update_check_ticks) {
        model.update_check_armed = false;
        cmds.push(Cmd::StartUpdateCheck);
    }
    if model.session_saving {
        cmds.push(Cmd::Autosave);
    }

    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(Cmd::Batch(cmds)),
    }
}

/// Set a page's flag, creating the widget the first time it is shown
fn set_panel(model: &mut ShellModel, page: PageId, panel: PanelToggle, shown: bool) -> Option<Cmd> {
    if shown {
        ensure_widget(model, page, panel)?;
    }
    let changed = model.registry.page_mut(page)?.visibility.set(panel, shown);
    if !changed {
        return None;
    }
    tracing::debug!(page = page.0, panel = ?panel, shown, "panel flag changed");
    Some(Cmd::relayout_for(page))
}

fn ensure_widget(model: &mut ShellModel, page: PageId, panel: PanelToggle) -> Option<PanelHandle> {
    let registry = &mut model.registry;
    match panel {
        PanelToggle::Sidebar => match registry.page(page)?.sidebar.handle() {
            Some(existing) => Some(existing),
            None => registry
                .attach_sidebar(page, SidebarStyle::List)
                .map(|(handle, _)| handle),
        },
        PanelToggle::Result => registry.attach_result(page),
        PanelToggle::QueryTable => registry.attach_query_table(page),
        PanelToggle::DocumentMap => Some(registry.install_document_map()),
    }
}

fn with_destroyed(destroyed: Vec<PanelHandle>, then: Cmd) -> Cmd {
    if destroyed.is_empty() {
        then
    } else {
        Cmd::Batch(vec![Cmd::DestroyPanels(destroyed), then])
    }
}

fn clamp_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        0.5
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
