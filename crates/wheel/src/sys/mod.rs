pub mod frame;
pub mod runtime;
pub mod server;
