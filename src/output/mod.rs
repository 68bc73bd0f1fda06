//! Rendering of the update report for the terminal

pub mod text;

pub use text::{render_report, RenderOptions};
