//! Console and terminal-UI views of the escape grid

pub mod renderer;
pub mod text;

pub use renderer::{Renderer, StatusLine};
pub use text::render_text;
