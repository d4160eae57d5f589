//! Shell context - owns everything one shell window needs to lay itself out
//!
//! All layout work happens on the thread that created the context. Messages
//! posted by the host while a pass is running are queued and only handled
//! once the engine is back to `Idle`.

use std::collections::VecDeque;
use std::thread::{self, ThreadId};

use crate::commands::Cmd;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::host::WindowHost;
use crate::layout::{LayoutEngine, LayoutOutcome, LayoutPhase, LayoutRequest};
use crate::messages::Msg;
use crate::model::{PageId, PanelRegistry, Rect, ShellModel};
use crate::update::update;

/// What a call to [`ShellContext::dispatch`] ended up doing
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Messages run through `update`, including ones posted mid-pass
    pub handled: usize,
    pub outcomes: Vec<LayoutOutcome>,
    pub errors: Vec<LayoutError>,
    pub update_checks: usize,
    pub autosaves: usize,
}

impl DispatchReport {
    /// Outcome of the most recent layout pass, if any ran
    pub fn last_outcome(&self) -> Option<&LayoutOutcome> {
        self.outcomes.last()
    }
}

#[derive(Debug)]
pub struct ShellContext {
    model: ShellModel,
    engine: LayoutEngine,
    queue: VecDeque<Msg>,
    owner: ThreadId,
}

impl ShellContext {
    /// Set up the registry (main view and its splitters) for a new window
    pub fn create(config: LayoutConfig, host: &dyn WindowHost) -> Self {
        let model = ShellModel::new(config, host.client_rect(), host.scale_factor());
        tracing::debug!(
            client = ?model.client,
            scale = model.scale,
            "shell context created"
        );
        Self {
            model,
            engine: LayoutEngine::new(),
            queue: VecDeque::new(),
            owner: thread::current().id(),
        }
    }

    /// Tear down every surface the registry still holds
    pub fn destroy(self, host: &mut dyn WindowHost) {
        self.check_owner();
        let panels = self.model.registry.all_panels();
        tracing::debug!("Destroying shell context with {} surfaces", panels.len());
        for panel in panels {
            host.destroy(panel);
        }
    }

    pub fn model(&self) -> &ShellModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ShellModel {
        &mut self.model
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.model.registry
    }

    pub fn registry_mut(&mut self) -> &mut PanelRegistry {
        &mut self.model.registry
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Messages waiting to be handled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn check_owner(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.owner,
            "shell context used off its owning thread"
        );
    }

    /// Run a message (and anything the host posts meanwhile) to completion
    pub fn dispatch(&mut self, host: &mut dyn WindowHost, msg: Msg) -> DispatchReport {
        self.check_owner();
        self.queue.push_back(msg);

        let mut report = DispatchReport::default();
        if self.engine.phase() != LayoutPhase::Idle {
            return report;
        }

        while let Some(msg) = self.queue.pop_front() {
            report.handled += 1;
            if let Some(cmd) = update(&mut self.model, msg) {
                for cmd in cmd.flatten() {
                    self.execute(host, cmd, &mut report);
                }
            }
            // Engine is idle again; pick up whatever arrived during the pass
            self.queue.extend(host.take_posted());
        }
        report
    }

    fn execute(&mut self, host: &mut dyn WindowHost, cmd: Cmd, report: &mut DispatchReport) {
        if self.model.minimized && cmd.needs_layout() {
            if let Cmd::TabActivated(page) = cmd {
                self.model.registry.focus_page(page);
            }
            tracing::debug!("Window minimized, deferring layout");
            return;
        }

        let outcome = match cmd {
            Cmd::None => return,
            Cmd::Relayout {
                client,
                trigger,
                full_redraw,
            } => {
                let metrics = self.model.metrics();
                self.engine.recompute_layout(
                    &mut self.model.registry,
                    host,
                    &metrics,
                    LayoutRequest {
                        client,
                        trigger,
                        full_redraw,
                    },
                )
            }
            Cmd::TabActivated(page) => self.notify_tab_activated(host, page),
            Cmd::FullRedraw => self.force_full_redraw(host),
            Cmd::DestroyPanels(panels) => {
                for panel in panels {
                    host.destroy(panel);
                }
                return;
            }
            Cmd::StartUpdateCheck => {
                tracing::info!("Starting update check after {} ticks", self.model.ticks);
                report.update_checks += 1;
                return;
            }
            Cmd::Autosave => {
                tracing::debug!("Autosaving session");
                report.autosaves += 1;
                return;
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(host, cmd, report);
                }
                return;
            }
        };

        match outcome {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(e) => report.errors.push(e),
        }
    }

    /// Lay out the window now.
    ///
    /// `client` defaults to the host's current client area; `trigger` is the
    /// page whose view wins ties and receives focus.
    pub fn recompute_layout(
        &mut self,
        host: &mut dyn WindowHost,
        client: Option<Rect>,
        trigger: Option<PageId>,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.check_owner();
        let metrics = self.model.metrics();
        self.engine.recompute_layout(
            &mut self.model.registry,
            host,
            &metrics,
            LayoutRequest {
                client,
                trigger,
                full_redraw: false,
            },
        )
    }

    /// A tab was clicked or a page was opened
    pub fn notify_tab_activated(
        &mut self,
        host: &mut dyn WindowHost,
        page: PageId,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.check_owner();
        let metrics = self.model.metrics();
        let scroll_to_cursor = self.model.config.scroll_to_cursor;
        self.engine.notify_tab_activated(
            &mut self.model.registry,
            host,
            &metrics,
            page,
            scroll_to_cursor,
        )
    }

    /// Re-derive all geometry and repaint both views
    pub fn force_full_redraw(
        &mut self,
        host: &mut dyn WindowHost,
    ) -> Result<LayoutOutcome, LayoutError> {
        self.check_owner();
        let metrics = self.model.metrics();
        self.engine
            .force_full_redraw(&mut self.model.registry, host, &metrics)
    }

    /// One 100 ms timer tick
    pub fn tick(&mut self, host: &mut dyn WindowHost) -> DispatchReport {
        self.dispatch(host, Msg::Tick)
    }

    /// Disarm the one-shot update check
    pub fn stop_update_counter(&mut self) {
        self.model.update_check_armed = false;
    }
}
