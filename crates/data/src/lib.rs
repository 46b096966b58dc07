//! Loading and validation of balance data.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
