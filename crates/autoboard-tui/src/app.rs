use std::rc::Rc;
use std::time::{Duration, Instant};

use autoboard_core::{
    AppConfig, AutoScrollManager, Difficulty, HostSignal, Interaction, Phase, RefreshEvent,
    SurfaceId, SurfaceRef,
};
use chrono::{DateTime, Local};

use crate::panel::BoardPanel;

/// Application state shared by the event loop and the widgets
pub struct App {
    pub config: AppConfig,
    pub panels: Vec<Rc<BoardPanel>>,
    pub autoscroll: AutoScrollManager,
    /// Panel holding keyboard focus
    pub focused: Option<usize>,
    /// Panel under the mouse pointer
    pub hovered: Option<usize>,
    /// Whether the terminal window currently has focus
    pub visible: bool,
    /// Last refresh error, cleared by the next successful refresh
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub is_refreshing: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
    origin: Instant,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let panels = Difficulty::ALL
            .iter()
            .map(|&d| {
                Rc::new(BoardPanel::new(
                    d,
                    config.ui.row_height_px,
                    config.autoscroll.bottom_tolerance_px,
                ))
            })
            .collect();
        let autoscroll = AutoScrollManager::new(config.autoscroll.clone());

        Self {
            config,
            panels,
            autoscroll,
            focused: None,
            hovered: None,
            visible: true,
            error: None,
            last_updated: None,
            is_refreshing: false,
            status_message: None,
            should_quit: false,
            origin: Instant::now(),
        }
    }

    /// Time since the app started; the auto-scroll clock
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    pub fn surfaces(&self) -> Vec<SurfaceRef> {
        self.panels
            .iter()
            .map(|p| p.clone() as SurfaceRef)
            .collect()
    }

    fn surface_id(&self, index: usize) -> Option<SurfaceId> {
        self.panels
            .get(index)
            .map(|p| SurfaceId::of(&(p.clone() as SurfaceRef)))
    }

    /// Apply a finished poll to the panels
    pub fn apply_refresh(&mut self, event: RefreshEvent) {
        self.is_refreshing = false;
        match event {
            RefreshEvent::Loaded(snapshot) => {
                tracing::debug!("Leaderboard loaded: {} rows", snapshot.total_rows());
                for panel in &self.panels {
                    panel.set_rows(snapshot.rows(panel.difficulty).to_vec());
                }
                self.error = None;
                self.last_updated = Some(Local::now());
                self.restart_scrolling();
            }
            RefreshEvent::Failed { message } => {
                tracing::debug!("Stopping auto-scroll after failed refresh");
                self.error = Some(message);
                self.autoscroll.stop_all();
            }
        }
    }

    /// Re-evaluate overflow for every panel and restart their loops
    pub fn restart_scrolling(&mut self) {
        let surfaces = self.surfaces();
        self.autoscroll.refresh_all(&surfaces);
    }

    /// Fire due auto-scroll callbacks
    pub fn tick(&mut self) {
        let now = self.now();
        self.autoscroll.advance(now);
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self) -> Duration {
        let idle = Duration::from_millis(self.config.ui.tick_rate_ms);
        self.autoscroll
            .next_wake(self.now())
            .map_or(idle, |wake| wake.min(idle))
    }

    fn signal(&mut self, index: usize, interaction: Interaction) {
        if let Some(surface) = self.surface_id(index) {
            self.autoscroll.handle_signal(HostSignal::Interaction {
                surface,
                interaction,
            });
        }
    }

    /// Track which panel the pointer is over
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let over = self.panels.iter().position(|p| p.contains(column, row));
        if over == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered {
            self.signal(previous, Interaction::PointerLeave);
        }
        if let Some(current) = over {
            self.signal(current, Interaction::PointerEnter);
        }
        self.hovered = over;
    }

    fn move_focus(&mut self, next: Option<usize>) {
        if next == self.focused {
            return;
        }
        if let Some(previous) = self.focused {
            self.signal(previous, Interaction::FocusOut);
        }
        if let Some(current) = next {
            self.signal(current, Interaction::FocusIn);
        }
        self.focused = next;
    }

    pub fn focus_next(&mut self) {
        let count = self.panels.len();
        let next = match self.focused {
            Some(i) => (i + 1) % count,
            None => 0,
        };
        self.move_focus(Some(next));
    }

    pub fn focus_prev(&mut self) {
        let count = self.panels.len();
        let prev = match self.focused {
            Some(i) => (i + count - 1) % count,
            None => count - 1,
        };
        self.move_focus(Some(prev));
    }

    pub fn clear_focus(&mut self) {
        self.move_focus(None);
    }

    /// Terminal focus change, treated as page visibility
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;
        self.autoscroll
            .handle_signal(HostSignal::VisibilityChanged { hidden: !visible });
    }

    /// Toggle the manual pause of the focused panel, or of every panel
    pub fn toggle_pause(&mut self) {
        let targets: Vec<usize> = match self.focused {
            Some(i) => vec![i],
            None => (0..self.panels.len()).collect(),
        };
        let pause = !targets.iter().all(|&i| self.is_manually_paused(i));

        for &i in &targets {
            let surface = self.panels[i].clone() as SurfaceRef;
            self.autoscroll.set_paused(&surface, pause);
        }

        let scope = match self.focused {
            Some(i) => self.panels[i].difficulty.label(),
            None => "all panels",
        };
        let verb = if pause { "Paused" } else { "Resumed" };
        self.set_status(format!("{} {}", verb, scope));
    }

    pub fn is_manually_paused(&self, index: usize) -> bool {
        self.surface_id(index)
            .and_then(|id| self.autoscroll.state(id))
            .is_some_and(|s| s.holds.manual)
    }

    pub fn is_paused(&self, index: usize) -> bool {
        self.surface_id(index)
            .is_some_and(|id| self.autoscroll.is_paused(id))
    }

    pub fn phase(&self, index: usize) -> Option<Phase> {
        self.surface_id(index).and_then(|id| self.autoscroll.phase(id))
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
