//! Core configuration store types.

mod builder;
pub mod coerce;
mod path;
mod store;
mod tree;
mod validation;
mod value;

pub use builder::StoreBuilder;
pub use path::{KeyPath, SEPARATOR};
pub use store::Store;
pub use tree::{delete, lookup, merge, upsert};
pub use validation::{Checker, check, require_keys};
pub use value::{Mapping, Value};
