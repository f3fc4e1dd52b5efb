//! TCP transport

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use spremote_core::Frame;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Callback invoked with the command text before each frame is written
pub type CommandObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// TCP transport for SP Remote terminals
///
/// Opens a fresh connection for every exchange and closes it once the
/// terminal has closed its side. No timeout is applied unless configured, so
/// a silent terminal blocks the exchange indefinitely.
pub struct TcpTransport {
    addr: String,
    port: u16,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    on_command_sent: Option<CommandObserver>,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            connect_timeout: None,
            read_timeout: None,
            on_command_sent: None,
        }
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set read timeout (covers the whole read-until-close phase)
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Notify `observer` with the command text of every outgoing frame
    pub fn with_command_observer(mut self, observer: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_command_sent = Some(Arc::new(observer));
        self
    }

    /// Resolve address to SocketAddr
    async fn resolve_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.addr, self.port);

        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();

        addrs
            .first()
            .copied()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))
    }

    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream> {
        debug!("Connecting to {}...", addr);

        let stream = within(self.connect_timeout, Error::ConnectionTimeout, TcpStream::connect(addr))
            .await?
            .map_err(|source| Error::Connect {
                addr: addr.to_string(),
                source,
            })?;

        stream.set_nodelay(true)?;

        debug!("Connected to {}", addr);
        Ok(stream)
    }
}

async fn within<F, T>(limit: Option<Duration>, elapsed: Error, future: F) -> Result<T>
where
    F: Future<Output = T>,
{
    match limit {
        Some(limit) => timeout(limit, future).await.map_err(|_| elapsed),
        None => Ok(future.await),
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exchange(&mut self, frame: &Frame) -> Result<BytesMut> {
        let addr = self.resolve_addr().await?;

        if let Some(observer) = &self.on_command_sent {
            observer(&frame.command);
        }

        let mut stream = self.connect(addr).await?;

        let data = frame.encode();
        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        stream.write_all(&data).await?;
        stream.flush().await?;

        let mut buf = BytesMut::with_capacity(1024);
        let n = within(self.read_timeout, Error::ReadTimeout, async {
            let mut total = 0;
            loop {
                match stream.read_buf(&mut buf).await? {
                    0 => break Ok::<usize, std::io::Error>(total),
                    n => total += n,
                }
            }
        })
        .await??;

        trace!("Received {} bytes: {:02X?}", n, &buf[..n.min(32)]);

        // Terminal has already closed its side
        let _ = stream.shutdown().await;
        debug!("Exchange with {} complete", addr);

        Ok(buf)
    }

    fn remote_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

impl fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpTransport")
            .field("addr", &self.remote_addr())
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("observer", &self.on_command_sent.is_some())
            .finish()
    }
}
