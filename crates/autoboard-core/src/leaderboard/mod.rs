mod client;
mod models;

pub use client::{LeaderboardClient, LeaderboardSource};
pub use models::{CellValue, Difficulty, LeaderboardResponse, LeaderboardRow, LeaderboardSnapshot};
