//! Auto-scroll manager for leaderboard panels
//!
//! Keeps any number of independently sized panels scrolling on their own:
//! run to the bottom, hold, snap to the top, hold, run again. Scrolling
//! pauses while a panel is hovered or focused and while the host is hidden,
//! and restarts cleanly whenever the panel contents are replaced.
//!
//! # Layout
//!
//! - `surface` - the `ScrollSurface` trait hosts implement, and surface identity
//! - `state` - per-surface `ScrollState` held in a weak `StateStore`
//! - `clock` - frame requests and one-shot deadlines behind one wake type
//! - `scheduler` - the phase state machine and frame loop
//! - `pause` - interaction and visibility signals
//! - `orchestrator` - `AutoScrollManager`, the public entry point
//!
//! # Usage
//!
//! ```ignore
//! use autoboard_core::{AutoScrollConfig, AutoScrollManager};
//!
//! let mut manager = AutoScrollManager::new(AutoScrollConfig::default());
//!
//! // After repainting panel contents
//! manager.refresh_all(&panels);
//!
//! // Once per display frame
//! manager.advance(origin.elapsed());
//! ```

pub mod clock;
pub mod orchestrator;
pub mod pause;
pub mod scheduler;
pub mod state;
pub mod surface;

pub use clock::{WakeHandle, WakeKind};
pub use orchestrator::AutoScrollManager;
pub use pause::{HostSignal, Interaction};
pub use state::{PauseSource, Phase, ScrollState};
pub use surface::{ScrollSurface, SurfaceId, SurfaceRef, SurfaceSource};
