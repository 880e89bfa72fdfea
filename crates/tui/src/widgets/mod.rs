//! Widget components for the hireboard TUI.
//!
//! Each widget is a plain function rendering data into a buffer, which
//! keeps them easy to test and compose.
//!
//! # Modules
//!
//! - [`board`]: the full board, one column per visible stage, plus the drag ghost
//! - [`lane`]: a single stage column
//! - [`card`]: an application card
//! - [`detail`]: the application detail screen
//! - [`notice`]: the status line with notices and key hints
//! - [`prompt`]: the stage label prompt
//! - [`help`]: the key binding overlay
//!
//! # Colors
//!
//! Cards and columns take their stage's configured color; the focused
//! column is cyan and the column under a dragged card is yellow.

pub mod board;
pub mod card;
pub mod detail;
pub mod help;
pub mod lane;
pub mod notice;
pub mod prompt;

pub use board::{BoardView, render_board};
pub use card::{CardView, icon_glyph, rating_stars, render_card, stage_color};
pub use detail::{
    DetailContext, body_area_dimensions, max_scroll_offset, render_detail_panel, verdict_indicator,
};
pub use help::render_help_overlay;
pub use lane::{LaneView, render_lane};
pub use notice::{notice_color, render_notice};
pub use prompt::render_prompt;

#[cfg(test)]
mod tests;
