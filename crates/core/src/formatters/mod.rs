pub mod text;

pub use text::{TextConfig, convert_to_text, html_to_text, wrap_text};
