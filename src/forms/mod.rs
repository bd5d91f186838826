//! Form input and field-level validation.
//!
//! Forms sit in front of the API: they turn raw user input into a request or
//! a set of per-field messages. Nothing here touches the cache.

mod car;
mod validation;

pub use car::CarForm;
pub use validation::ValidationErrors;
