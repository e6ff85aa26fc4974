//! Public entry point: tracks surfaces and forwards host signals

use std::time::Duration;

use tracing::debug;

use super::pause::{HostSignal, PauseController};
use super::scheduler::Scheduler;
use super::state::{PauseSource, Phase, ScrollState, StateStore};
use super::surface::{overflows, SurfaceId, SurfaceRef, SurfaceSource};
use crate::config::AutoScrollConfig;

/// Surfaces the manager currently knows about, plus their state
#[derive(Default)]
struct Registry {
    store: StateStore,
    tracked: Vec<SurfaceId>,
}

impl Registry {
    fn track(&mut self, id: SurfaceId) {
        if !self.tracked.contains(&id) {
            self.tracked.push(id);
        }
    }
}

/// Drives auto-scrolling for every tracked surface
///
/// All calls are synchronous and only arm or disarm future callbacks. The
/// host pumps the manager with `advance(now)` once per display frame, where
/// `now` is measured from any fixed origin.
pub struct AutoScrollManager {
    registry: Registry,
    scheduler: Scheduler,
    pause: PauseController,
    now: Duration,
}

impl AutoScrollManager {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            registry: Registry::default(),
            scheduler: Scheduler::new(config),
            pause: PauseController::new(),
            now: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &AutoScrollConfig {
        self.scheduler.config()
    }

    /// Time of the latest `advance`
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Begin auto-scrolling `surface` from the top
    pub fn start(&mut self, surface: &SurfaceRef) {
        let id = self.register(surface);
        self.scheduler.start(&mut self.registry.store, surface);
        self.registry.track(id);
    }

    pub fn stop(&mut self, surface: &SurfaceRef) {
        self.scheduler
            .stop(&mut self.registry.store, SurfaceId::of(surface));
    }

    /// Manual pause, independent of pointer, focus and visibility
    pub fn set_paused(&mut self, surface: &SurfaceRef, paused: bool) {
        let id = self.register(surface);
        self.registry.track(id);
        self.apply_hold(id, PauseSource::Manual, paused);
    }

    /// Rescan the host's surfaces and restart the ones that overflow
    pub fn refresh_all<S: SurfaceSource + ?Sized>(&mut self, source: &S) {
        let surfaces: Vec<SurfaceRef> = source
            .surfaces()
            .into_iter()
            .filter(|s| s.is_auto_scroll())
            .collect();
        let next: Vec<SurfaceId> = surfaces.iter().map(SurfaceId::of).collect();

        for id in std::mem::take(&mut self.registry.tracked) {
            if !next.contains(&id) {
                self.scheduler.discard(&mut self.registry.store, id);
            }
        }

        let mut started = 0;
        for surface in &surfaces {
            let id = self.register(surface);
            self.registry.track(id);
            self.scheduler.stop(&mut self.registry.store, id);
            if overflows(&**surface) {
                self.scheduler.start(&mut self.registry.store, surface);
                started += 1;
            } else {
                surface.set_scroll_offset(0.0);
            }
        }

        for id in self.registry.store.prune() {
            self.registry.tracked.retain(|t| *t != id);
        }
        debug!(tracked = self.registry.tracked.len(), started, "auto-scroll refreshed");
    }

    /// Stop every tracked surface, e.g. when the data source fails
    pub fn stop_all(&mut self) {
        for &id in &self.registry.tracked {
            self.scheduler.stop(&mut self.registry.store, id);
        }
        debug!(tracked = self.registry.tracked.len(), "auto-scroll stopped for all");
    }

    pub fn handle_signal(&mut self, signal: HostSignal) {
        match signal {
            HostSignal::Interaction { surface, interaction } => {
                let (source, held) = interaction.hold();
                self.apply_hold(surface, source, held);
            }
            HostSignal::VisibilityChanged { hidden } => {
                debug!(hidden, "visibility changed");
                self.pause.on_visibility_change(
                    &mut self.scheduler,
                    &mut self.registry.store,
                    &self.registry.tracked,
                    hidden,
                    self.now,
                );
            }
        }
    }

    /// Fire all callbacks due at `now`
    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
        self.scheduler.advance(&mut self.registry.store, self.now);
        if self.registry.tracked.len() != self.registry.store.len() {
            let store = &self.registry.store;
            self.registry.tracked.retain(|id| store.contains(*id));
        }
    }

    /// How long the host may sleep before calling `advance` again
    pub fn next_wake(&self, now: Duration) -> Option<Duration> {
        self.scheduler.next_wake(now)
    }

    pub fn state(&self, id: SurfaceId) -> Option<&ScrollState> {
        self.registry.store.get(id)
    }

    pub fn phase(&self, id: SurfaceId) -> Option<Phase> {
        self.state(id).map(|s| s.phase)
    }

    pub fn is_paused(&self, id: SurfaceId) -> bool {
        self.state(id).is_some_and(|s| s.is_paused())
    }

    /// Outstanding frame callbacks and phase timers for one surface
    pub fn active_callbacks(&self, id: SurfaceId) -> usize {
        self.scheduler.clock().pending_for(id)
    }

    pub fn tracked(&self) -> &[SurfaceId] {
        &self.registry.tracked
    }

    fn register(&mut self, surface: &SurfaceRef) -> SurfaceId {
        let hidden = self.pause.is_hidden();
        let (id, state) = self.registry.store.get_or_create(surface);
        // Surfaces that appear while hidden start out paused
        if hidden {
            state.holds.set(PauseSource::Hidden, true);
        }
        id
    }

    fn apply_hold(&mut self, id: SurfaceId, source: PauseSource, held: bool) {
        let store = &mut self.registry.store;
        if held {
            self.pause
                .on_enter_interaction(&mut self.scheduler, store, id, source, self.now);
        } else {
            self.pause
                .on_exit_interaction(&mut self.scheduler, store, id, source, self.now);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::super::pause::Interaction;
    use super::super::surface::testing::{as_ref, TestSurface};
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn manager() -> AutoScrollManager {
        AutoScrollManager::new(AutoScrollConfig::default())
    }

    fn panels() -> (Vec<Rc<TestSurface>>, Vec<SurfaceRef>) {
        let raw = vec![
            TestSurface::new(1000.0, 200.0),
            TestSurface::new(400.0, 300.0),
            TestSurface::new(100.0, 300.0),
        ];
        let shared = raw.iter().map(as_ref).collect();
        (raw, shared)
    }

    fn pump(manager: &mut AutoScrollManager, from: u64, to: u64) {
        let mut t = from;
        while t <= to {
            manager.advance(ms(t));
            t += 16;
        }
    }

    #[test]
    fn test_refresh_all_starts_only_overflowing() {
        let mut manager = manager();
        let (raw, shared) = panels();
        raw[2].offset.set(50.0);

        manager.refresh_all(&shared);
        let ids: Vec<SurfaceId> = shared.iter().map(SurfaceId::of).collect();

        assert_eq!(manager.tracked().len(), 3);
        assert_eq!(manager.active_callbacks(ids[0]), 1);
        assert_eq!(manager.active_callbacks(ids[1]), 1);
        assert_eq!(manager.active_callbacks(ids[2]), 0);
        assert_eq!(raw[2].offset.get(), 0.0);
        assert_eq!(manager.phase(ids[2]), Some(Phase::Run));
    }

    #[test]
    fn test_refresh_all_twice_has_no_duplicates() {
        let mut manager = manager();
        let (_raw, shared) = panels();

        manager.refresh_all(&shared);
        pump(&mut manager, 0, 500);
        manager.refresh_all(&shared);
        manager.refresh_all(&shared);

        for id in shared.iter().map(SurfaceId::of) {
            assert!(manager.active_callbacks(id) <= 1);
        }
        pump(&mut manager, 516, 2_000);
        for id in shared.iter().map(SurfaceId::of) {
            assert!(manager.active_callbacks(id) <= 1);
        }
    }

    #[test]
    fn test_refresh_all_skips_untracked_surfaces() {
        let mut manager = manager();
        let (raw, shared) = panels();
        raw[0].tracked.set(false);

        manager.refresh_all(&shared);
        assert_eq!(manager.tracked().len(), 2);
        assert!(manager.state(SurfaceId::of(&shared[0])).is_none());
    }

    #[test]
    fn test_refresh_all_discards_removed_surfaces() {
        let mut manager = manager();
        let (_raw, shared) = panels();
        manager.refresh_all(&shared);

        let first = SurfaceId::of(&shared[0]);
        manager.refresh_all(&shared[1..]);
        assert!(manager.state(first).is_none());
        assert_eq!(manager.active_callbacks(first), 0);
        assert_eq!(manager.tracked().len(), 2);
    }

    #[test]
    fn test_stop_all() {
        let mut manager = manager();
        let (_raw, shared) = panels();
        manager.refresh_all(&shared);
        pump(&mut manager, 0, 1_000);

        manager.stop_all();
        for id in shared.iter().map(SurfaceId::of) {
            assert_eq!(manager.active_callbacks(id), 0);
            let state = manager.state(id).unwrap();
            assert_eq!(state.phase, Phase::Run);
            assert!(state.last_frame_time.is_none());
        }

        // Interaction after an error must not restart stale content
        let id = SurfaceId::of(&shared[0]);
        manager.handle_signal(HostSignal::Interaction { surface: id, interaction: Interaction::PointerEnter });
        manager.handle_signal(HostSignal::Interaction { surface: id, interaction: Interaction::PointerLeave });
        assert_eq!(manager.active_callbacks(id), 0);
    }

    #[test]
    fn test_visibility_round_trip_has_no_jump() {
        let mut manager = manager();
        let (raw, shared) = panels();
        manager.refresh_all(&shared);
        pump(&mut manager, 0, 1_000);

        manager.handle_signal(HostSignal::VisibilityChanged { hidden: true });
        let offsets: Vec<f64> = raw.iter().map(|s| s.offset.get()).collect();
        for id in shared.iter().map(SurfaceId::of) {
            assert!(manager.is_paused(id));
            assert_eq!(manager.active_callbacks(id), 0);
        }

        manager.advance(ms(60_000));
        manager.handle_signal(HostSignal::VisibilityChanged { hidden: false });
        manager.advance(ms(60_016));

        let after: Vec<f64> = raw.iter().map(|s| s.offset.get()).collect();
        assert_eq!(offsets, after);
        let ids: Vec<SurfaceId> = shared.iter().map(SurfaceId::of).collect();
        assert_eq!(manager.active_callbacks(ids[0]), 1);
        assert_eq!(manager.active_callbacks(ids[1]), 1);
        assert!(!manager.is_paused(ids[2]));
    }

    #[test]
    fn test_refresh_while_hidden_stays_paused() {
        let mut manager = manager();
        let (_raw, shared) = panels();
        manager.handle_signal(HostSignal::VisibilityChanged { hidden: true });
        manager.refresh_all(&shared);

        let id = SurfaceId::of(&shared[0]);
        assert!(manager.is_paused(id));
        assert_eq!(manager.active_callbacks(id), 0);

        manager.handle_signal(HostSignal::VisibilityChanged { hidden: false });
        assert_eq!(manager.active_callbacks(id), 1);
    }

    #[test]
    fn test_set_paused() {
        let mut manager = manager();
        let (_raw, shared) = panels();
        manager.refresh_all(&shared);
        let id = SurfaceId::of(&shared[0]);

        manager.set_paused(&shared[0], true);
        assert_eq!(manager.active_callbacks(id), 0);
        // Visibility does not override a manual pause
        manager.handle_signal(HostSignal::VisibilityChanged { hidden: true });
        manager.handle_signal(HostSignal::VisibilityChanged { hidden: false });
        assert_eq!(manager.active_callbacks(id), 0);

        manager.set_paused(&shared[0], false);
        assert_eq!(manager.active_callbacks(id), 1);
    }

    #[test]
    fn test_scenario_full_cycle() {
        let mut manager = manager();
        let surface = TestSurface::new(1000.0, 200.0);
        let shared = as_ref(&surface);
        let id = SurfaceId::of(&shared);
        manager.start(&shared);

        let mut t = 0;
        let mut phases = vec![Phase::Run];
        while t <= 22_000 {
            manager.advance(ms(t));
            let phase = manager.phase(id).unwrap();
            if phases.last() != Some(&phase) {
                if phase == Phase::BottomPause {
                    assert!((surface.offset.get() - 800.0).abs() <= 1.0);
                    assert!(t >= 19_900 && t <= 20_100, "bottom reached at {t}");
                }
                if phase == Phase::TopPause {
                    assert_eq!(surface.offset.get(), 0.0);
                }
                phases.push(phase);
            }
            t += 16;
        }
        assert_eq!(
            phases,
            vec![Phase::Run, Phase::BottomPause, Phase::TopPause, Phase::Run]
        );
    }

    #[test]
    fn test_dropped_panel_leaves_tracked_set() {
        let mut manager = manager();
        let (raw, mut shared) = panels();
        manager.refresh_all(&shared);
        let id = SurfaceId::of(&shared[0]);

        shared.remove(0);
        drop(raw);
        manager.advance(ms(0));
        assert!(manager.state(id).is_none());
        assert_eq!(manager.tracked().len(), 2);
    }
}
