use crate::pad::PadCommand;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::os::unix::net::UnixStream;
use thiserror::Error;

/// Environment override the wheel daemon reads for `wheel.socket_path`.
pub const SOCKET_PATH_ENV: &str = "WHEEL__WHEEL__SOCKET_PATH";

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/wheel.sock";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SocketPath(String);

crate::impl_string_newtype!(SocketPath);

impl Default for SocketPath {
    fn default() -> Self {
        Self::from(DEFAULT_SOCKET_PATH)
    }
}

#[derive(Debug, Error)]
pub enum IpcError {
    #[error("Failed to connect to wheel daemon at {path}: {source}. Is wheel running?")]
    Connect {
        path: SocketPath,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One command per line. Unknown lines are ignored by the daemon.
pub fn parse_line(line: &str) -> Option<PadCommand> {
    line.trim().parse().ok()
}

pub fn send_command(path: &SocketPath, cmd: PadCommand) -> Result<(), IpcError> {
    let mut stream = UnixStream::connect(path.as_str()).map_err(|source| IpcError::Connect {
        path: path.clone(),
        source,
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
