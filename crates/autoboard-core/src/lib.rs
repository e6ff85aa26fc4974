pub mod autoscroll;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod refresh;

pub use autoscroll::{AutoScrollManager, HostSignal, Interaction, Phase, ScrollSurface, SurfaceId, SurfaceRef};
pub use config::{AppConfig, AutoScrollConfig};
pub use error::{Error, Result};
pub use leaderboard::{Difficulty, LeaderboardClient, LeaderboardRow, LeaderboardSnapshot, LeaderboardSource};
pub use refresh::{RefreshEvent, RefreshService};
