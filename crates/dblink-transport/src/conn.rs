use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};

/// A single blocking TCP connection.
///
/// One `TcpConn` owns one socket, exclusively. The timeout given at connect
/// time applies to establishment and to every subsequent read and write.
/// After [`close`](Self::close), all I/O fails with
/// [`TransportError::NotConnected`].
pub struct TcpConn {
    stream: Option<TcpStream>,
    timeout: Duration,
}

impl TcpConn {
    /// Connect to `host:port`, bounded by `timeout`.
    ///
    /// The same timeout is installed as the read and write timeout of the
    /// resulting connection. When the host resolves to several addresses,
    /// each is tried in turn and the last failure is reported.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let candidates = addr.to_socket_addrs().map_err(|e| TransportError::Connect {
            addr: addr.clone(),
            source: e,
        })?;

        let mut last_err: Option<std::io::Error> = None;
        for candidate in candidates {
            match TcpStream::connect_timeout(&candidate, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    debug!(%addr, ?timeout, "connected");
                    return Ok(Self {
                        stream: Some(stream),
                        timeout,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }

        let source = last_err.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::AddrNotAvailable, "host resolved to no addresses")
        });
        if is_timeout(&source) {
            Err(TransportError::ConnectTimeout { addr, timeout })
        } else {
            Err(TransportError::Connect { addr, source })
        }
    }

    /// Write the full buffer to the socket.
    ///
    /// Loops on partial writes; returns only once the OS has accepted every
    /// byte or the connection failed.
    pub fn send_all(&mut self, bytes: &[u8]) -> Result<()> {
        let timeout = self.timeout;
        let want = bytes.len();
        let stream = self.stream_mut()?;

        let mut offset = 0usize;
        while offset < want {
            match stream.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Closed { got: offset, want }),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_timeout(&err) => return Err(TransportError::TimedOut { timeout }),
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match stream.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_timeout(&err) => return Err(TransportError::TimedOut { timeout }),
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    /// Read exactly `n` bytes, aggregating across as many socket reads as it
    /// takes.
    ///
    /// An EOF before `n` bytes yields [`TransportError::Closed`] carrying the
    /// count actually received; the protocol layer uses that as its
    /// premature-disconnect sentinel. The outcome is always exactly `n`
    /// bytes or an error, never a short buffer.
    pub fn recv_exact(&mut self, n: usize) -> Result<Bytes> {
        let timeout = self.timeout;
        let stream = self.stream_mut()?;

        let mut buf = BytesMut::zeroed(n);
        let mut filled = 0usize;
        while filled < n {
            match stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(TransportError::Closed { got: filled, want: n }),
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_timeout(&err) => return Err(TransportError::TimedOut { timeout }),
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        Ok(buf.freeze())
    }

    /// Close the connection. Safe to call any number of times, including on
    /// a connection that already failed.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!("connection closed");
        }
    }

    /// Whether the connection is still open locally.
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Address of the connected peer, if available.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    /// The timeout bounding every blocking operation on this connection.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn stream_mut(&mut self) -> Result<&mut TcpStream> {
        self.stream.as_mut().ok_or(TransportError::NotConnected)
    }
}

impl std::fmt::Debug for TcpConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpConn")
            .field("peer", &self.peer_addr())
            .field("open", &self.is_open())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sockets with `SO_RCVTIMEO`/`SO_SNDTIMEO` set report an expired timeout as
/// `WouldBlock` on Unix and `TimedOut` on Windows.
fn is_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn listen() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("local addr should resolve");
        (listener, addr)
    }

    #[test]
    fn connect_send_recv_roundtrip() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            let mut buf = [0u8; 5];
            stream.read_exact(&mut buf).expect("read should succeed");
            assert_eq!(&buf, b"hello");
            stream.write_all(b"world").expect("write should succeed");
        });

        let mut conn = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).expect("connect");
        conn.send_all(b"hello").expect("send_all should succeed");
        let reply = conn.recv_exact(5).expect("recv_exact should succeed");
        assert_eq!(reply.as_ref(), b"world");

        server.join().expect("server thread should complete");
    }

    #[test]
    fn recv_exact_aggregates_fragmented_reads() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            for byte in b"abcdef" {
                stream.write_all(&[*byte]).expect("write should succeed");
                stream.flush().expect("flush should succeed");
                thread::sleep(Duration::from_millis(5));
            }
        });

        let mut conn = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).expect("connect");
        let data = conn.recv_exact(6).expect("recv_exact should succeed");
        assert_eq!(data.as_ref(), b"abcdef");

        server.join().expect("server thread should complete");
    }

    #[test]
    fn recv_exact_reports_premature_close() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            stream.write_all(b"ab").expect("write should succeed");
        });

        let mut conn = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).expect("connect");
        let err = conn.recv_exact(4).unwrap_err();
        assert!(matches!(err, TransportError::Closed { got: 2, want: 4 }));

        server.join().expect("server thread should complete");
    }

    #[test]
    fn recv_exact_times_out_on_silence() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (_stream, _) = listener.accept().expect("accept should succeed");
            thread::sleep(Duration::from_millis(300));
        });

        let mut conn =
            TcpConn::connect("127.0.0.1", addr.port(), Duration::from_millis(50)).expect("connect");
        let err = conn.recv_exact(1).unwrap_err();
        assert!(matches!(err, TransportError::TimedOut { .. }));

        server.join().expect("server thread should complete");
    }

    #[test]
    fn close_is_idempotent() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (_stream, _) = listener.accept().expect("accept should succeed");
        });

        let mut conn = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).expect("connect");
        assert!(conn.is_open());
        conn.close();
        conn.close();
        assert!(!conn.is_open());

        server.join().expect("server thread should complete");
    }

    #[test]
    fn io_after_close_fails_with_not_connected() {
        let (listener, addr) = listen();

        let server = thread::spawn(move || {
            let (_stream, _) = listener.accept().expect("accept should succeed");
        });

        let mut conn = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).expect("connect");
        conn.close();

        assert!(matches!(
            conn.send_all(b"x").unwrap_err(),
            TransportError::NotConnected
        ));
        assert!(matches!(
            conn.recv_exact(1).unwrap_err(),
            TransportError::NotConnected
        ));

        server.join().expect("server thread should complete");
    }

    #[test]
    fn connect_to_dead_port_fails() {
        let (listener, addr) = listen();
        drop(listener);

        let err = TcpConn::connect("127.0.0.1", addr.port(), TIMEOUT).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn connect_to_unresolvable_host_fails() {
        let err = TcpConn::connect("host.invalid", 1, TIMEOUT).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
