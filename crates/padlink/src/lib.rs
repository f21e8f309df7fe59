pub mod ipc;
mod macros;
pub mod pad;

pub use ipc::SocketPath;
pub use pad::{ButtonMap, PadButton, PadCommand, PadFrame, StickVector};
