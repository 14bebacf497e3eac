//! Object-access layer between handlers and the store.

mod objects;
pub use objects::Objects;
