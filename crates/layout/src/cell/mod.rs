//! Layout cells: one grid position each, with connection state, generation
//! status and ownership of streamed content.

pub mod layout_cell;
pub mod state;


pub use layout_cell::*;
pub use state::*;
