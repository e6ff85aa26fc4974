//! Per-surface scroll state and the weak side-table that owns it

use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::clock::WakeHandle;
use super::surface::{ScrollSurface, SurfaceId, SurfaceRef};

/// Stage of the auto-scroll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Advancing toward the bottom every frame
    #[default]
    Run,
    /// Holding at the bottom before snapping back
    BottomPause,
    /// Holding at the top before running again
    TopPause,
}

/// Where a pause request came from
///
/// Each source holds its own flag, so a pointer leaving a panel does not
/// resume it while keyboard focus is still inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseSource {
    Pointer,
    Focus,
    Hidden,
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseHolds {
    pub pointer: bool,
    pub focus: bool,
    pub hidden: bool,
    pub manual: bool,
}

impl PauseHolds {
    #[inline]
    pub fn any(&self) -> bool {
        self.pointer || self.focus || self.hidden || self.manual
    }

    pub fn set(&mut self, source: PauseSource, held: bool) {
        match source {
            PauseSource::Pointer => self.pointer = held,
            PauseSource::Focus => self.focus = held,
            PauseSource::Hidden => self.hidden = held,
            PauseSource::Manual => self.manual = held,
        }
    }
}

/// Ephemeral scroll bookkeeping for one surface
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub phase: Phase,
    pub holds: PauseHolds,
    /// Timestamp of the previous frame; `None` means the next frame applies no motion
    pub last_frame_time: Option<Duration>,
    pub frame_handle: Option<WakeHandle>,
    pub pending_timer: Option<WakeHandle>,
    /// Remaining delay of a phase timer suspended by a pause
    pub held_delay: Option<Duration>,
    /// Armed by `start`, cleared by `stop`
    pub active: bool,
}

impl ScrollState {
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.holds.any()
    }

    /// Whether a frame callback or phase timer is outstanding
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.frame_handle.is_some() || self.pending_timer.is_some()
    }

    /// Back to the initial phase; pause holds survive
    pub fn reset(&mut self) {
        self.phase = Phase::Run;
        self.last_frame_time = None;
        self.frame_handle = None;
        self.pending_timer = None;
        self.held_delay = None;
        self.active = false;
    }
}

struct Entry {
    surface: Weak<dyn ScrollSurface>,
    state: ScrollState,
}

/// Side-table from surface identity to scroll state
///
/// Entries reference their surface weakly; `prune` discards the ones whose
/// surface has been dropped by the host.
#[derive(Default)]
pub struct StateStore {
    entries: HashMap<SurfaceId, Entry>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the state for `surface`, creating a fresh one on first sight
    pub fn get_or_create(&mut self, surface: &SurfaceRef) -> (SurfaceId, &mut ScrollState) {
        let id = SurfaceId::of(surface);
        let entry = self.entries.entry(id).or_insert_with(|| Entry {
            surface: Rc::downgrade(surface),
            state: ScrollState::default(),
        });
        (id, &mut entry.state)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&ScrollState> {
        self.entries.get(&id).map(|e| &e.state)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut ScrollState> {
        self.entries.get_mut(&id).map(|e| &mut e.state)
    }

    /// Upgrade the weak reference; `None` once the host dropped the surface
    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceRef> {
        self.entries.get(&id).and_then(|e| e.surface.upgrade())
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn remove(&mut self, id: SurfaceId) -> Option<ScrollState> {
        self.entries.remove(&id).map(|e| e.state)
    }

    /// Drop entries whose surface no longer exists, returning their ids
    pub fn prune(&mut self) -> Vec<SurfaceId> {
        let dead: Vec<SurfaceId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.surface.strong_count() == 0)
            .map(|(id, _)| *id)
            .collect();
        for id in &dead {
            self.entries.remove(id);
        }
        dead
    }

    pub fn ids(&self) -> Vec<SurfaceId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::super::surface::testing::{as_ref, TestSurface};
    use super::*;

    #[test]
    fn test_get_or_create_defaults() {
        let mut store = StateStore::new();
        let surface = as_ref(&TestSurface::new(1000.0, 200.0));

        let (_, state) = store.get_or_create(&surface);
        assert_eq!(state.phase, Phase::Run);
        assert!(!state.is_paused());
        assert!(state.last_frame_time.is_none());
        assert!(state.frame_handle.is_none());
        assert!(state.pending_timer.is_none());
    }

    #[test]
    fn test_get_or_create_returns_existing() {
        let mut store = StateStore::new();
        let surface = as_ref(&TestSurface::new(1000.0, 200.0));

        let (id, state) = store.get_or_create(&surface);
        state.phase = Phase::TopPause;

        let (again, state) = store.get_or_create(&surface);
        assert_eq!(id, again);
        assert_eq!(state.phase, Phase::TopPause);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_does_not_keep_surface_alive() {
        let mut store = StateStore::new();
        let surface = as_ref(&TestSurface::new(1000.0, 200.0));
        let (id, _) = store.get_or_create(&surface);
        assert!(store.surface(id).is_some());

        drop(surface);
        assert!(store.surface(id).is_none());
        assert_eq!(store.prune(), vec![id]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_reset_keeps_holds() {
        let mut state = ScrollState::default();
        state.phase = Phase::BottomPause;
        state.last_frame_time = Some(Duration::from_millis(10));
        state.holds.set(PauseSource::Pointer, true);
        state.active = true;

        state.reset();
        assert_eq!(state.phase, Phase::Run);
        assert!(state.last_frame_time.is_none());
        assert!(!state.active);
        assert!(state.is_paused());
    }

    #[test]
    fn test_pause_holds_are_independent() {
        let mut holds = PauseHolds::default();
        holds.set(PauseSource::Pointer, true);
        holds.set(PauseSource::Focus, true);
        holds.set(PauseSource::Pointer, false);
        assert!(holds.any());
        holds.set(PauseSource::Focus, false);
        assert!(!holds.any());
    }
}
