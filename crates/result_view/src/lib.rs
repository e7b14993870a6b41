//! View-model for availability search results

mod panel;
pub use panel::*;
mod renderer;
pub use renderer::*;
