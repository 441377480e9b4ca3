use async_trait::async_trait;
use std::io;

mod pipe;
mod tcp;

pub use pipe::*;
pub use tcp::*;

/// A line oriented channel to the other player.
#[async_trait]
pub trait Remote {
    /// Receives a message.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] once the peer hangs up.
    async fn recv(&mut self) -> io::Result<String>;

    /// Sends a message.
    async fn send(&mut self, msg: &str) -> io::Result<()>;

    /// Flushes the internal buffers.
    async fn flush(&mut self) -> io::Result<()>;
}
