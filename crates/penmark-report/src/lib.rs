//! penmark-report: self-contained HTML rendering of assessment reports.

pub mod html;

pub use html::{generate_html, render_highlighted, write_html_report};
