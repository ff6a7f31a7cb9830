// Wire types shared between the game client and the remote backend.
pub mod protocol;
pub mod types;

pub use protocol::*;
pub use types::*;
