mod board;
mod status_bar;

pub use board::{fit_width, BoardWidget};
pub use status_bar::StatusBarWidget;
