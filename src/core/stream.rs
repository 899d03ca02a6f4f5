//! The byte-stream capability a connection driver needs: `{read, write}`.
//! Plain TCP sockets and (under the `tls` feature) TLS sessions both
//! implement it, so the rest of the core never has to know which one it
//! holds.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

pub trait ConnStream: Read + Write + Send {
    fn peer_addr(&self) -> io::Result<SocketAddr>;
    fn shutdown(&self);
}

impl ConnStream for TcpStream {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        TcpStream::peer_addr(self)
    }

    fn shutdown(&self) {
        let _ = TcpStream::shutdown(self, std::net::Shutdown::Both);
    }
}

#[cfg(feature = "tls")]
impl ConnStream for native_tls::TlsStream<TcpStream> {
    fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.get_ref().peer_addr()
    }

    fn shutdown(&self) {
        let _ = self.get_ref().shutdown(std::net::Shutdown::Both);
    }
}
