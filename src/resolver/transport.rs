use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::{debug, instrument};

use crate::DnsError;

pub const DNS_PORT: u16 = 53;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// One request, one reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_and_receive(&self, server: Ipv4Addr, payload: &[u8]) -> Result<Bytes, DnsError>;
}

/// Sends each query from a fresh ephemeral socket and waits for the first
/// datagram back. Nothing is retried.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    port: u16,
    timeout: Duration,
    buffer_size: usize,
}

impl UdpTransport {
    pub fn new(port: u16, timeout: Duration, buffer_size: usize) -> Self {
        Self {
            port,
            timeout,
            buffer_size,
        }
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new(DNS_PORT, DEFAULT_TIMEOUT, DEFAULT_BUFFER_SIZE)
    }
}

#[async_trait]
impl Transport for UdpTransport {
    #[instrument(level = "debug", skip(self, payload))]
    async fn send_and_receive(&self, server: Ipv4Addr, payload: &[u8]) -> Result<Bytes, DnsError> {
        let sock = UdpSocket::bind(("0.0.0.0", 0)).await?;
        // only accept datagrams from the server we asked
        sock.connect((server, self.port)).await?;
        sock.send(payload).await?;

        let mut buf = vec![0; self.buffer_size];
        let len = tokio::time::timeout(self.timeout, sock.recv(&mut buf))
            .await
            .map_err(|_| DnsError::Timeout {
                server,
                timeout: self.timeout,
            })??;

        if len == buf.len() {
            debug!(len, "reply filled the receive buffer, it may have been cut short");
        }

        buf.truncate(len);
        Ok(buf.into())
    }
}
