//! Chart aggregate: renderable series, trade markers and axis breaks.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
