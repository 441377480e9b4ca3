use super::{Pipe, Remote};
use async_trait::async_trait;
use derive_more::DebugCustom;
use std::fmt::Debug;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::BufWriter;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs, UdpSocket};
use tracing::{info, instrument};

/// A [`Remote`] over a TCP connection.
#[derive(DebugCustom)]
#[debug(fmt = "Tcp({})", peer)]
pub struct Tcp {
    peer: SocketAddr,
    pipe: Pipe<BufWriter<OwnedWriteHalf>, OwnedReadHalf>,
}

impl Tcp {
    /// The default port.
    pub const PORT: u16 = 5555;

    /// Listens on `port` on all interfaces.
    #[instrument(level = "trace", err)]
    pub async fn listen(port: u16) -> io::Result<TcpListener> {
        TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await
    }

    /// The address a peer on the local network should join `listener` at.
    ///
    /// Falls back to the loopback address if no network route is available.
    #[instrument(level = "trace", ret, err)]
    pub async fn advertised(listener: &TcpListener) -> io::Result<SocketAddr> {
        let mut address = listener.local_addr()?;

        if address.ip().is_unspecified() {
            address.set_ip(lan_address().await.unwrap_or(Ipv4Addr::LOCALHOST.into()));
        }

        info!(%address, "waiting for a peer to join");
        Ok(address)
    }

    /// Waits for one peer to connect to `listener`.
    #[instrument(level = "trace", err)]
    pub async fn accept(listener: &TcpListener) -> io::Result<Self> {
        let (socket, _) = listener.accept().await?;
        Tcp::new(socket)
    }

    /// Connects to a peer hosting at `address`.
    #[instrument(level = "trace", err)]
    pub async fn join<A: ToSocketAddrs + Debug>(address: A) -> io::Result<Self> {
        Tcp::new(TcpStream::connect(address).await?)
    }

    /// The address of the peer.
    #[inline]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    fn new(socket: TcpStream) -> io::Result<Self> {
        let peer = socket.peer_addr()?;
        socket.set_nodelay(true)?;
        info!(%peer, "connected");

        let (reader, writer) = socket.into_split();

        Ok(Tcp {
            peer,
            pipe: Pipe::new(BufWriter::new(writer), reader),
        })
    }
}

/// The address of the interface that routes outside traffic.
///
/// Connecting a UDP socket only selects a route, no packet is sent.
async fn lan_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await.ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).await.ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

#[async_trait]
impl Remote for Tcp {
    #[instrument(level = "trace", err)]
    async fn recv(&mut self) -> io::Result<String> {
        self.pipe.recv().await
    }

    #[instrument(level = "trace", err)]
    async fn send(&mut self, msg: &str) -> io::Result<()> {
        self.pipe.send(msg).await
    }

    #[instrument(level = "trace", err)]
    async fn flush(&mut self) -> io::Result<()> {
        self.pipe.flush().await
    }
}
