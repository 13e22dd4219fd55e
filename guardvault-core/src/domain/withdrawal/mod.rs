pub mod model;
pub mod results;
pub mod state_machine;
pub mod validation;

pub use model::*;
