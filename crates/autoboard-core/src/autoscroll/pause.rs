//! Interaction and visibility handling

use std::time::Duration;

use super::scheduler::Scheduler;
use super::state::{PauseSource, StateStore};
use super::surface::SurfaceId;

/// User engagement with a single surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
}

impl Interaction {
    /// Pause source and whether the signal takes or releases the hold
    pub fn hold(self) -> (PauseSource, bool) {
        match self {
            Interaction::PointerEnter => (PauseSource::Pointer, true),
            Interaction::PointerLeave => (PauseSource::Pointer, false),
            Interaction::FocusIn => (PauseSource::Focus, true),
            Interaction::FocusOut => (PauseSource::Focus, false),
        }
    }
}

/// Signals a host forwards to the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    Interaction {
        surface: SurfaceId,
        interaction: Interaction,
    },
    VisibilityChanged {
        hidden: bool,
    },
}

/// Toggles pause holds and keeps the scheduler in step
#[derive(Debug, Default)]
pub struct PauseController {
    hidden: bool,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the host last reported itself hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn on_enter_interaction(
        &self,
        scheduler: &mut Scheduler,
        store: &mut StateStore,
        id: SurfaceId,
        source: PauseSource,
        now: Duration,
    ) {
        self.set_hold(scheduler, store, id, source, true, now);
    }

    pub fn on_exit_interaction(
        &self,
        scheduler: &mut Scheduler,
        store: &mut StateStore,
        id: SurfaceId,
        source: PauseSource,
        now: Duration,
    ) {
        self.set_hold(scheduler, store, id, source, false, now);
    }

    /// Apply hidden/visible to every tracked surface at once
    pub fn on_visibility_change(
        &mut self,
        scheduler: &mut Scheduler,
        store: &mut StateStore,
        tracked: &[SurfaceId],
        hidden: bool,
        now: Duration,
    ) {
        self.hidden = hidden;
        for &id in tracked {
            self.set_hold(scheduler, store, id, PauseSource::Hidden, hidden, now);
        }
    }

    fn set_hold(
        &self,
        scheduler: &mut Scheduler,
        store: &mut StateStore,
        id: SurfaceId,
        source: PauseSource,
        held: bool,
        now: Duration,
    ) {
        let Some(state) = store.get_mut(id) else {
            return;
        };
        let was_paused = state.is_paused();
        state.holds.set(source, held);
        let paused = state.is_paused();

        if paused && !was_paused {
            scheduler.suspend(store, id, now);
        } else if !paused && was_paused {
            scheduler.resume(store, id, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::Phase;
    use super::super::surface::testing::{as_ref, TestSurface};
    use super::*;
    use crate::config::AutoScrollConfig;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_pause_yields_zero_callbacks_resume_yields_one() {
        let mut scheduler = Scheduler::new(AutoScrollConfig::default());
        let mut store = StateStore::new();
        let pause = PauseController::new();
        let surface = TestSurface::new(1000.0, 200.0);
        let shared = as_ref(&surface);
        let id = SurfaceId::of(&shared);

        scheduler.start(&mut store, &shared);
        scheduler.advance(&mut store, ms(0));
        scheduler.advance(&mut store, ms(500));
        let offset = surface.offset.get();

        pause.on_enter_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(500));
        assert_eq!(scheduler.clock().pending_for(id), 0);

        scheduler.advance(&mut store, ms(3_000));
        assert_eq!(surface.offset.get(), offset);

        pause.on_exit_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(3_000));
        assert_eq!(scheduler.clock().pending_for(id), 1);
        assert!(store.get(id).unwrap().last_frame_time.is_none());

        // First frame after resume applies no motion
        scheduler.advance(&mut store, ms(3_016));
        assert_eq!(surface.offset.get(), offset);
    }

    #[test]
    fn test_pointer_and_focus_are_symmetric() {
        let mut scheduler = Scheduler::new(AutoScrollConfig::default());
        let mut store = StateStore::new();
        let pause = PauseController::new();
        let shared = as_ref(&TestSurface::new(1000.0, 200.0));
        let id = SurfaceId::of(&shared);
        scheduler.start(&mut store, &shared);

        let (source, held) = Interaction::FocusIn.hold();
        assert!(held);
        pause.on_enter_interaction(&mut scheduler, &mut store, id, source, ms(0));
        pause.on_enter_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(0));
        assert_eq!(scheduler.clock().pending_for(id), 0);

        // Focus still holds after the pointer leaves
        pause.on_exit_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(10));
        assert_eq!(scheduler.clock().pending_for(id), 0);

        pause.on_exit_interaction(&mut scheduler, &mut store, id, PauseSource::Focus, ms(20));
        assert_eq!(scheduler.clock().pending_for(id), 1);
    }

    #[test]
    fn test_pause_holds_phase() {
        let mut scheduler = Scheduler::new(AutoScrollConfig::default());
        let mut store = StateStore::new();
        let pause = PauseController::new();
        let shared = as_ref(&TestSurface::new(210.0, 200.0));
        let id = SurfaceId::of(&shared);
        scheduler.start(&mut store, &shared);

        // 10px at 40px/s: bottom after ~250ms
        let mut t = 0;
        while store.get(id).unwrap().phase == Phase::Run {
            scheduler.advance(&mut store, ms(t));
            t += 16;
        }
        assert_eq!(store.get(id).unwrap().phase, Phase::BottomPause);

        pause.on_enter_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(t));
        scheduler.advance(&mut store, ms(t + 10_000));
        assert_eq!(store.get(id).unwrap().phase, Phase::BottomPause);
        assert_eq!(scheduler.clock().pending_for(id), 0);
    }

    #[test]
    fn test_resume_after_stop_stays_idle() {
        let mut scheduler = Scheduler::new(AutoScrollConfig::default());
        let mut store = StateStore::new();
        let pause = PauseController::new();
        let shared = as_ref(&TestSurface::new(1000.0, 200.0));
        let id = SurfaceId::of(&shared);
        scheduler.start(&mut store, &shared);

        pause.on_enter_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(0));
        scheduler.stop(&mut store, id);
        pause.on_exit_interaction(&mut scheduler, &mut store, id, PauseSource::Pointer, ms(10));
        assert_eq!(scheduler.clock().pending_for(id), 0);
    }

    #[test]
    fn test_visibility_applies_to_all() {
        let mut scheduler = Scheduler::new(AutoScrollConfig::default());
        let mut store = StateStore::new();
        let mut pause = PauseController::new();
        let a = as_ref(&TestSurface::new(1000.0, 200.0));
        let b = as_ref(&TestSurface::new(600.0, 100.0));
        let ids = [SurfaceId::of(&a), SurfaceId::of(&b)];
        scheduler.start(&mut store, &a);
        scheduler.start(&mut store, &b);

        pause.on_visibility_change(&mut scheduler, &mut store, &ids, true, ms(0));
        assert!(pause.is_hidden());
        assert!(ids.iter().all(|&id| scheduler.clock().pending_for(id) == 0));

        pause.on_visibility_change(&mut scheduler, &mut store, &ids, false, ms(60_000));
        assert!(ids.iter().all(|&id| scheduler.clock().pending_for(id) == 1));
    }
}
