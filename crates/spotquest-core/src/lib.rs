// Re-export the wire types so callers can use spotquest_core::protocol::*
pub use spotquest_protocol as protocol;

// Internal Modules
pub mod consts;
pub mod difficulty;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod hints;
pub mod scoring;
pub mod session;
pub mod timer;
