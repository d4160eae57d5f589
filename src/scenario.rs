//! YAML scenarios - declarative window setups replayed on a [`MemoryHost`]
//!
//! ```yaml
//! name: split-with-results
//! width: 1200
//! height: 800
//! split: true
//! pages:
//!   - title: main.rs
//!     show: [result]
//!   - title: notes.md
//!     view: slave
//!     show: [sidebar, document_map]
//! steps:
//!   - op: activate
//!     page: 1
//!   - op: tick
//!     count: 5
//! ```
//!
//! Pages are referenced by their 1-based position in `pages`; pages opened by
//! `open` steps continue the numbering.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::host::{MemoryHost, ScrollRequest};
use crate::layout::{BatchEntry, LayoutOutcome};
use crate::messages::{Msg, PanelMsg, TabMsg, WindowMsg};
use crate::model::{PageId, PanelHandle, PanelToggle, Rect, SidebarStyle, ViewSide};
use crate::shell::{DispatchReport, ShellContext};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Create the slave view before opening pages
    #[serde(default)]
    pub split: bool,
    #[serde(default)]
    pub pages: Vec<ScenarioPage>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioPage {
    pub title: String,
    #[serde(default = "default_view")]
    pub view: ViewSide,
    /// Panels whose flag is set once the page is open
    #[serde(default)]
    pub show: Vec<PanelToggle>,
    #[serde(default)]
    pub sidebar_style: Option<SidebarStyle>,
    #[serde(default)]
    pub hex: bool,
    #[serde(default)]
    pub plugin: bool,
    #[serde(default)]
    pub caret: Option<usize>,
}

/// One scripted event, run after the pages are set up
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Resize {
        width: i32,
        height: i32,
    },
    Minimize,
    Dpi {
        scale: f64,
    },
    ThemeChanged,
    Toggle {
        #[serde(default)]
        page: Option<usize>,
        panel: PanelToggle,
    },
    Show {
        page: usize,
        panel: PanelToggle,
    },
    Hide {
        page: usize,
        panel: PanelToggle,
    },
    ResizeSidebar {
        page: usize,
        width: i32,
    },
    SetViewSplit {
        ratio: f32,
    },
    Open {
        title: String,
        #[serde(default = "default_view")]
        view: ViewSide,
    },
    Close {
        page: usize,
    },
    Activate {
        page: usize,
    },
    Move {
        page: usize,
        to: ViewSide,
    },
    Split,
    Unsplit,
    Tick {
        #[serde(default = "default_ticks")]
        count: u32,
    },
    FullRedraw,
}

fn default_name() -> String {
    "scenario".to_string()
}
fn default_width() -> i32 {
    1200
}
fn default_height() -> i32 {
    800
}
fn default_scale() -> f64 {
    1.0
}
fn default_view() -> ViewSide {
    ViewSide::Main
}
fn default_ticks() -> u32 {
    1
}

impl Scenario {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("parsing scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }
}

/// State left behind by a replayed scenario
#[derive(Debug)]
pub struct ScenarioRun {
    pub host: MemoryHost,
    pub shell: ShellContext,
    /// Page ids in scenario numbering order
    pub pages: Vec<PageId>,
    /// Outcome of the final layout pass
    pub last: Option<LayoutOutcome>,
    pub errors: Vec<LayoutError>,
    pub update_checks: usize,
}

impl ScenarioRun {
    fn absorb(&mut self, report: DispatchReport) {
        if let Some(outcome) = report.outcomes.into_iter().last() {
            self.last = Some(outcome);
        }
        self.errors.extend(report.errors);
        self.update_checks += report.update_checks;
    }

    fn dispatch(&mut self, msg: Msg) {
        let report = self.shell.dispatch(&mut self.host, msg);
        self.absorb(report);
    }

    /// Run a pass on the host's current client area, as a host does after
    /// a size change
    fn relayout_now(&mut self) {
        match self.shell.recompute_layout(&mut self.host, None, None) {
            Ok(outcome) => self.last = Some(outcome),
            Err(e) => self.errors.push(e),
        }
    }

    fn page(&self, number: usize) -> Result<PageId> {
        match number.checked_sub(1).and_then(|i| self.pages.get(i)) {
            Some(id) => Ok(*id),
            None => bail!("scenario refers to page {} but only {} exist", number, self.pages.len()),
        }
    }

    fn open(&mut self, msg: Msg, view: ViewSide) -> Result<PageId> {
        let before = self.shell.registry().page_count();
        self.dispatch(msg);
        if self.shell.registry().page_count() == before {
            bail!("could not open a page in the {} view", view.name());
        }
        let id = self
            .shell
            .registry()
            .get_view(view)
            .and_then(|v| v.pages.last().copied())
            .with_context(|| format!("no page opened in the {} view", view.name()))?;
        self.pages.push(id);
        Ok(id)
    }

    fn setup_page(&mut self, page: &ScenarioPage) -> Result<()> {
        let msg = if page.plugin {
            Msg::Tab(TabMsg::OpenPlugin {
                side: page.view,
                title: page.title.clone(),
            })
        } else {
            Msg::Tab(TabMsg::Open {
                side: page.view,
                title: page.title.clone(),
                hex: page.hex,
            })
        };
        let id = self.open(msg, page.view)?;

        if let Some(style) = page.sidebar_style {
            self.dispatch(Msg::Panel(PanelMsg::SetSidebarStyle {
                page: Some(id),
                style,
            }));
        }
        for panel in &page.show {
            self.dispatch(Msg::show(id, *panel));
        }
        if let Some(position) = page.caret {
            self.dispatch(Msg::Tab(TabMsg::SetCaret { page: id, position }));
        }
        Ok(())
    }

    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Resize { width, height } => {
                self.host.resize(*width, *height);
                self.dispatch(Msg::resize(*width, *height));
                if self.shell.model().minimized {
                    self.relayout_now();
                }
            }
            Step::Minimize => {
                self.host.resize(0, 0);
                self.dispatch(Msg::Window(WindowMsg::Minimized));
                self.relayout_now();
            }
            Step::Dpi { scale } => {
                self.host.set_scale(*scale);
                self.dispatch(Msg::Window(WindowMsg::DpiChanged(*scale)));
            }
            Step::ThemeChanged => self.dispatch(Msg::Window(WindowMsg::ThemeChanged)),
            Step::Toggle { page, panel } => {
                let page = page.map(|n| self.page(n)).transpose()?;
                self.dispatch(Msg::Panel(PanelMsg::Toggle {
                    page,
                    panel: *panel,
                }));
            }
            Step::Show { page, panel } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::show(page, *panel));
            }
            Step::Hide { page, panel } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::hide(page, *panel));
            }
            Step::ResizeSidebar { page, width } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::Panel(PanelMsg::ResizeSidebar {
                    page: Some(page),
                    width: *width,
                }));
            }
            Step::SetViewSplit { ratio } => {
                self.dispatch(Msg::Panel(PanelMsg::SetViewSplit(*ratio)));
            }
            Step::Open { title, view } => {
                self.open(Msg::open(*view, title.clone()), *view)?;
            }
            Step::Close { page } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::Tab(TabMsg::Close(page)));
            }
            Step::Activate { page } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::activate(page));
            }
            Step::Move { page, to } => {
                let page = self.page(*page)?;
                self.dispatch(Msg::Tab(TabMsg::Move { page, to: *to }));
            }
            Step::Split => self.dispatch(Msg::Tab(TabMsg::Split)),
            Step::Unsplit => self.dispatch(Msg::Tab(TabMsg::Unsplit)),
            Step::Tick { count } => {
                for _ in 0..*count {
                    let report = self.shell.tick(&mut self.host);
                    self.absorb(report);
                }
            }
            Step::FullRedraw => match self.shell.force_full_redraw(&mut self.host) {
                Ok(outcome) => self.last = Some(outcome),
                Err(e) => self.errors.push(e),
            },
        }
        Ok(())
    }
}

/// Replay a scenario from scratch on a fresh in-memory host
pub fn run(scenario: &Scenario, config: LayoutConfig) -> Result<ScenarioRun> {
    let host = MemoryHost::new(scenario.width, scenario.height).with_scale(scenario.scale);
    let shell = ShellContext::create(config, &host);
    let mut run = ScenarioRun {
        host,
        shell,
        pages: Vec::new(),
        last: None,
        errors: Vec::new(),
        update_checks: 0,
    };

    if scenario.split {
        run.dispatch(Msg::Tab(TabMsg::Split));
    }
    for page in &scenario.pages {
        run.setup_page(page)?;
    }
    for step in &scenario.steps {
        run.step(step)?;
    }

    if run.last.is_none() {
        run.relayout_now();
    }
    tracing::debug!(
        name = %scenario.name,
        pages = run.pages.len(),
        passes = run.shell.engine().passes(),
        "scenario replayed"
    );
    Ok(run)
}

/// Serializable summary of a scenario's final pass
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub client: Option<Rect>,
    pub skipped: bool,
    pub passes: u64,
    pub batch: Vec<BatchEntry>,
    pub cleanup: Vec<BatchEntry>,
    pub focused: Option<PanelHandle>,
    pub scroll_requests: Vec<ScrollRequest>,
    pub errors: Vec<String>,
}

impl ScenarioReport {
    pub fn new(scenario: &Scenario, run: &ScenarioRun) -> Self {
        let result = run.last.as_ref().and_then(|o| o.result());
        Self {
            name: scenario.name.clone(),
            client: result.map(|r| r.client),
            skipped: result.is_none(),
            passes: run.shell.engine().passes(),
            batch: result.map(|r| r.batch.clone()).unwrap_or_default(),
            cleanup: result.map(|r| r.cleanup.clone()).unwrap_or_default(),
            focused: result.and_then(|r| r.focused),
            scroll_requests: result.map(|r| r.scroll_requests.clone()).unwrap_or_default(),
            errors: run.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}
