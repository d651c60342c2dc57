//! Report rendering

pub mod console;
pub mod html;

pub use console::render_console;
pub use html::{render_html, write_html_report};
