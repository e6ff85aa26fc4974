//! Frame requests and one-shot deadlines behind a single wake abstraction
//!
//! The clock does not run anything itself. The scheduler asks it for due
//! wakes each time the host pumps, and cancellation removes the wake from the
//! queue so it can never fire.

use std::time::Duration;

use super::surface::SurfaceId;

/// Token identifying one requested wake; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WakeHandle(u64);

/// What a wake waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeKind {
    /// The next display frame
    Frame,
    /// A fixed point on the host clock
    Deadline(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wake {
    pub handle: WakeHandle,
    pub surface: SurfaceId,
    pub kind: WakeKind,
}

#[derive(Debug, Default)]
pub struct FrameClock {
    next_handle: u64,
    pending: Vec<Wake>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, surface: SurfaceId, kind: WakeKind) -> WakeHandle {
        self.next_handle += 1;
        let handle = WakeHandle(self.next_handle);
        self.pending.push(Wake { handle, surface, kind });
        handle
    }

    pub fn request_frame(&mut self, surface: SurfaceId) -> WakeHandle {
        self.push(surface, WakeKind::Frame)
    }

    pub fn set_deadline(&mut self, surface: SurfaceId, at: Duration) -> WakeHandle {
        self.push(surface, WakeKind::Deadline(at))
    }

    /// Remove a wake before it fires; a no-op for handles that already fired
    pub fn cancel(&mut self, handle: WakeHandle) -> Option<Wake> {
        let index = self.pending.iter().position(|w| w.handle == handle)?;
        Some(self.pending.swap_remove(index))
    }

    /// Remove the earliest deadline at or before `now`
    ///
    /// Ties are broken by request order.
    pub fn pop_due_deadline(&mut self, now: Duration) -> Option<Wake> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter_map(|(i, w)| match w.kind {
                WakeKind::Deadline(at) if at <= now => Some((at, w.handle, i)),
                _ => None,
            })
            .min()
            .map(|(_, _, i)| i)?;
        Some(self.pending.remove(index))
    }

    /// Take every frame request made so far, in request order
    pub fn take_frames(&mut self) -> Vec<Wake> {
        let (mut frames, rest): (Vec<Wake>, Vec<Wake>) = self
            .pending
            .drain(..)
            .partition(|w| w.kind == WakeKind::Frame);
        self.pending = rest;
        frames.sort_by_key(|w| w.handle);
        frames
    }

    pub fn has_frames(&self) -> bool {
        self.pending.iter().any(|w| w.kind == WakeKind::Frame)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .filter_map(|w| match w.kind {
                WakeKind::Deadline(at) => Some(at),
                WakeKind::Frame => None,
            })
            .min()
    }

    /// Number of outstanding wakes for one surface
    pub fn pending_for(&self, surface: SurfaceId) -> usize {
        self.pending.iter().filter(|w| w.surface == surface).count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
