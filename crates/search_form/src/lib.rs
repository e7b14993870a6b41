//! Search form state kept in sync with the persisted selection

mod controls;
pub use controls::*;
mod state;
pub use state::*;
