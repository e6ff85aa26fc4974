//! Phase state machine and frame loop
//!
//! Each surface runs one chain: frames while in `Run`, then a deadline for
//! `BottomPause`, then a deadline for `TopPause`, then frames again. Every
//! callback carries the handle it was armed with and is ignored unless that
//! handle is still the one recorded in the surface's state.

use std::time::Duration;

use tracing::debug;

use super::clock::{FrameClock, WakeHandle, WakeKind};
use super::state::{Phase, StateStore};
use super::surface::{SurfaceId, SurfaceRef};
use crate::config::AutoScrollConfig;

pub struct Scheduler {
    config: AutoScrollConfig,
    clock: FrameClock,
}

impl Scheduler {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            clock: FrameClock::new(),
        }
    }

    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Cancel any chain, jump to the top and begin the frame loop
    pub fn start(&mut self, store: &mut StateStore, surface: &SurfaceRef) {
        let (id, _) = store.get_or_create(surface);
        self.stop(store, id);
        surface.set_scroll_offset(0.0);

        let Some(state) = store.get_mut(id) else {
            return;
        };
        state.active = true;
        // A paused surface gets its first frame from resume
        if !state.is_paused() {
            state.frame_handle = Some(self.clock.request_frame(id));
        }
        debug!(?id, "auto-scroll started");
    }

    /// Cancel the frame callback and phase timer in one step
    pub fn stop(&mut self, store: &mut StateStore, id: SurfaceId) {
        let Some(state) = store.get_mut(id) else {
            return;
        };
        if let Some(handle) = state.frame_handle.take() {
            self.clock.cancel(handle);
        }
        if let Some(handle) = state.pending_timer.take() {
            self.clock.cancel(handle);
        }
        if state.active {
            debug!(?id, phase = ?state.phase, "auto-scroll stopped");
        }
        state.reset();
    }

    /// Stop a surface's chain and forget its state entirely
    pub fn discard(&mut self, store: &mut StateStore, id: SurfaceId) {
        self.stop(store, id);
        store.remove(id);
    }

    /// Pull the chain of a paused surface off the clock
    ///
    /// A pending phase timer keeps its remaining delay so the pause does not
    /// shorten or skip the hold.
    pub fn suspend(&mut self, store: &mut StateStore, id: SurfaceId, now: Duration) {
        let Some(state) = store.get_mut(id) else {
            return;
        };
        if let Some(handle) = state.frame_handle.take() {
            self.clock.cancel(handle);
        }
        if let Some(handle) = state.pending_timer.take() {
            if let Some(wake) = self.clock.cancel(handle) {
                if let WakeKind::Deadline(at) = wake.kind {
                    state.held_delay = Some(at.saturating_sub(now));
                }
            }
        }
    }

    /// Put a resumed surface back on the clock unless something is already scheduled
    pub fn resume(&mut self, store: &mut StateStore, id: SurfaceId, now: Duration) {
        let Some(state) = store.get_mut(id) else {
            return;
        };
        if !state.active || state.is_paused() || state.is_scheduled() {
            return;
        }
        match state.held_delay.take() {
            Some(delay) if state.phase != Phase::Run => {
                state.pending_timer = Some(self.clock.set_deadline(id, now + delay));
            }
            _ => {
                state.last_frame_time = None;
                state.frame_handle = Some(self.clock.request_frame(id));
            }
        }
    }

    /// Fire everything due at `now`: phase timers first, then frames
    ///
    /// A frame requested by a phase timer runs in this same pump. Frames
    /// requested by other frames wait for the next pump.
    pub fn advance(&mut self, store: &mut StateStore, now: Duration) {
        while let Some(wake) = self.clock.pop_due_deadline(now) {
            self.on_deadline(store, wake.surface, wake.handle, now);
        }
        for wake in self.clock.take_frames() {
            self.frame(store, wake.surface, wake.handle, now);
        }
    }

    /// How long the host may wait before the next callback is due
    pub fn next_wake(&self, now: Duration) -> Option<Duration> {
        let deadline = self.clock.next_deadline().map(|at| at.saturating_sub(now));
        if self.clock.has_frames() {
            let frame = self.config.frame_interval();
            Some(deadline.map_or(frame, |d| d.min(frame)))
        } else {
            deadline
        }
    }

    /// One frame tick for `id`
    pub fn frame(&mut self, store: &mut StateStore, id: SurfaceId, handle: WakeHandle, timestamp: Duration) {
        let Some(surface) = store.surface(id) else {
            // Host dropped the surface mid-cycle
            self.discard(store, id);
            return;
        };
        let Some(state) = store.get_mut(id) else {
            return;
        };
        if state.frame_handle != Some(handle) {
            return;
        }
        state.frame_handle = None;

        if state.is_paused() {
            return;
        }

        let elapsed = state
            .last_frame_time
            .map(|last| timestamp.saturating_sub(last).min(self.config.max_frame_delta()))
            .unwrap_or(Duration::ZERO);
        state.last_frame_time = Some(timestamp);

        let max_scroll = surface.content_height() - surface.viewport_height();
        // Also rejects NaN from degenerate measurements
        if !(max_scroll > 0.0) {
            return;
        }

        match state.phase {
            Phase::Run => {
                let step = self.config.speed_px_per_sec * elapsed.as_secs_f64();
                let offset = (surface.scroll_offset() + step).min(max_scroll);
                surface.set_scroll_offset(offset);

                if offset >= max_scroll - self.config.bottom_tolerance_px {
                    state.phase = Phase::BottomPause;
                    state.pending_timer =
                        Some(self.clock.set_deadline(id, timestamp + self.config.bottom_pause()));
                    debug!(?id, offset, "reached bottom");
                    return;
                }
            }
            // Pause phases are driven by their deadline alone
            Phase::BottomPause | Phase::TopPause => return,
        }

        state.frame_handle = Some(self.clock.request_frame(id));
    }

    /// Delayed phase wake-up for `id`
    pub fn on_deadline(&mut self, store: &mut StateStore, id: SurfaceId, handle: WakeHandle, now: Duration) {
        let Some(surface) = store.surface(id) else {
            self.discard(store, id);
            return;
        };
        let Some(state) = store.get_mut(id) else {
            return;
        };
        if state.pending_timer != Some(handle) {
            return;
        }
        state.pending_timer = None;

        match state.phase {
            Phase::BottomPause => {
                surface.set_scroll_offset(0.0);
                state.phase = Phase::TopPause;
                state.pending_timer = Some(self.clock.set_deadline(id, now + self.config.top_pause()));
                debug!(?id, "snapped to top");
            }
            Phase::TopPause => {
                state.phase = Phase::Run;
                state.last_frame_time = None;
                state.frame_handle = Some(self.clock.request_frame(id));
                debug!(?id, "running");
            }
            Phase::Run => {}
        }
    }
}
