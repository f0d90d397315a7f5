//! Configuration loader and schema types.
//!
//! The schema is an explicit object handed to each component at construction;
//! nothing reads configuration from global state.

mod load;
mod schema;

pub use schema::*;
