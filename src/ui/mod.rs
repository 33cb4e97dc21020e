//! Terminal rendering
//!
//! Drawing only reads the model; the one thing it writes back is each
//! panel's scroll origin, through [`Gui::visible_rows`](crate::app::Gui::visible_rows).

pub mod helpers;
mod render;
pub mod theme;

pub use render::render;
