//! Host-facing surface abstraction
//!
//! The manager never owns a surface. Hosts hand out `Rc<dyn ScrollSurface>`
//! and the manager keeps only `Weak` references, so dropping a panel on the
//! host side is enough to retire its scroll state.

use std::rc::Rc;

/// A scrollable region measured in pixels
///
/// The offset setter takes `&self`: hosts keep the offset in a `Cell` so the
/// manager can drive it through a shared reference.
pub trait ScrollSurface {
    /// Total height of the scrollable content
    fn content_height(&self) -> f64;

    /// Height of the visible window onto the content
    fn viewport_height(&self) -> f64;

    /// Current scroll offset from the top
    fn scroll_offset(&self) -> f64;

    fn set_scroll_offset(&self, offset: f64);

    /// Whether `refresh_all` should pick this surface up
    fn is_auto_scroll(&self) -> bool {
        true
    }
}

pub type SurfaceRef = Rc<dyn ScrollSurface>;

/// Stable identity of a surface, derived from its allocation address
///
/// The store holds a `Weak` to every registered surface, which keeps the
/// allocation (not the value) alive, so an id is never reused while its
/// entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(usize);

impl SurfaceId {
    pub fn of(surface: &SurfaceRef) -> Self {
        Self(Rc::as_ptr(surface) as *const () as usize)
    }
}

/// Anything that can enumerate the surfaces currently on screen
pub trait SurfaceSource {
    fn surfaces(&self) -> Vec<SurfaceRef>;
}

impl SurfaceSource for [SurfaceRef] {
    fn surfaces(&self) -> Vec<SurfaceRef> {
        self.to_vec()
    }
}

impl SurfaceSource for Vec<SurfaceRef> {
    fn surfaces(&self) -> Vec<SurfaceRef> {
        self.clone()
    }
}

/// Whether the content is taller than its viewport
#[inline]
pub fn overflows(surface: &dyn ScrollSurface) -> bool {
    surface.content_height() > surface.viewport_height()
}
