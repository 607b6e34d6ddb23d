//! Connection lifecycle, outbound writes, and inbound line reads.
//!
//! The TCP stream is split in two. The write half lives in the writer slot
//! and the read half in the reader slot used by the dispatcher. The link slot
//! holds only the close signal, and its mutex is the disconnect critical
//! section, so no I/O ever runs under it. Tearing the link down flips a watch
//! channel that pending reads and writes are selecting on, which turns them
//! into [`ChatError::ConnectionClosed`].

use super::observer::ObserverSet;
use crate::error::{ChatError, ErrorSlot};
use crate::protocol::command;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Longest server line accepted, excluding the terminator.
pub(crate) const MAX_LINE_LEN: usize = 64 * 1024;

struct Link {
    closed: watch::Sender<bool>,
    peer: Option<SocketAddr>,
}

struct LineWriter {
    half: OwnedWriteHalf,
    closed: watch::Receiver<bool>,
}

struct LineReader {
    lines: BufReader<OwnedReadHalf>,
    closed: watch::Receiver<bool>,
}

pub(crate) struct Connection {
    link: Mutex<Option<Link>>,
    writer: Mutex<Option<LineWriter>>,
    reader: Mutex<Option<LineReader>>,
    active: AtomicBool,
    observers: Arc<ObserverSet>,
    last_error: ErrorSlot,
}

impl Connection {
    pub(crate) fn new(observers: Arc<ObserverSet>) -> Self {
        Self {
            link: Mutex::new(None),
            writer: Mutex::new(None),
            reader: Mutex::new(None),
            active: AtomicBool::new(false),
            observers,
            last_error: ErrorSlot::default(),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub(crate) fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    pub(crate) fn record_error(&self, err: impl std::fmt::Display) {
        self.last_error.record(err);
    }

    /// Open a TCP connection to `host:port`, optionally bounded by `timeout`.
    /// Nothing is kept on failure.
    pub(crate) async fn connect(
        &self,
        host: &str,
        port: u16,
        timeout: Option<Duration>,
    ) -> Result<(), ChatError> {
        let mut link = self.link.lock().await;
        if link.is_some() {
            return Err(ChatError::AlreadyConnected);
        }

        let addr = format!("{}:{}", host, port);
        let stream = match open_stream(&addr, timeout).await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "connect failed");
                self.last_error.record(&err);
                return Err(err);
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "could not disable Nagle's algorithm");
        }

        let peer = stream.peer_addr().ok();
        let (read_half, write_half) = stream.into_split();
        let (closed_tx, closed_rx) = watch::channel(false);

        *self.reader.lock().await = Some(LineReader {
            lines: BufReader::new(read_half),
            closed: closed_rx.clone(),
        });
        *self.writer.lock().await = Some(LineWriter {
            half: write_half,
            closed: closed_rx,
        });
        *link = Some(Link {
            closed: closed_tx,
            peer,
        });
        self.last_error.clear();
        self.active.store(true, Ordering::SeqCst);

        info!(%addr, "connected");
        Ok(())
    }

    /// Close the connection and notify observers. Only one caller performs
    /// the teardown; concurrent callers wait for it and then find nothing to do.
    ///
    /// Pending reads and writes are cancelled first, so teardown never waits
    /// on a peer that has stopped reading or writing.
    pub(crate) async fn disconnect(&self) {
        let mut slot = self.link.lock().await;
        let Some(link) = slot.take() else {
            return;
        };
        self.active.store(false, Ordering::SeqCst);
        link.closed.send_replace(true);

        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.half.shutdown().await {
                // The peer may already be gone; the socket is dropped below regardless.
                debug!(error = %e, "error while shutting down connection");
            }
        }
        self.reader.lock().await.take();

        match link.peer {
            Some(peer) => info!(%peer, "disconnected"),
            None => info!("disconnected"),
        }
        drop(link);

        self.observers.notify_disconnect();
    }

    /// Write one framed command line. A write failure tears the connection down.
    pub(crate) async fn send_line(&self, line: &str) -> Result<(), ChatError> {
        if !self.is_active() {
            return Err(ChatError::NotConnected);
        }

        match self.write_line(line).await {
            Ok(()) => {
                debug!(%line, "sent");
                Ok(())
            }
            Err(err) => {
                // A write interrupted by our own teardown is not worth reporting.
                if self.is_active() {
                    warn!(error = %err, "failed to send command");
                    self.last_error.record(&err);
                }
                self.disconnect().await;
                Err(err)
            }
        }
    }

    async fn write_line(&self, line: &str) -> Result<(), ChatError> {
        let mut slot = self.writer.lock().await;
        let Some(LineWriter { half, closed }) = slot.as_mut() else {
            return Err(ChatError::NotConnected);
        };

        let framed = command::frame(line);
        tokio::select! {
            written = write_all_flush(half, framed.as_bytes()) => Ok(written?),
            _ = closed.wait_for(|closed| *closed) => Err(ChatError::ConnectionClosed),
        }
    }

    /// Block until the server sends one line, returned without its terminator.
    ///
    /// On failure the connection is torn down before the error is returned,
    /// so callers should treat any `Err` as the end of the session.
    pub(crate) async fn wait_server_response(&self) -> Result<String, ChatError> {
        match self.read_line().await {
            Ok(line) => Ok(line),
            Err(err) => {
                // A read interrupted by our own teardown is not worth reporting.
                if self.is_active() {
                    warn!(error = %err, "lost connection to server");
                    self.last_error.record(&err);
                }
                self.disconnect().await;
                Err(err)
            }
        }
    }

    async fn read_line(&self) -> Result<String, ChatError> {
        let mut slot = self.reader.lock().await;
        let Some(LineReader { lines, closed }) = slot.as_mut() else {
            return Err(ChatError::NotConnected);
        };

        // One byte past the limit leaves room for the `\n` of a maximal line.
        let mut limited = (&mut *lines).take(MAX_LINE_LEN as u64 + 1);
        let mut buf = Vec::new();
        tokio::select! {
            read = limited.read_until(b'\n', &mut buf) => {
                if read? == 0 {
                    return Err(ChatError::ConnectionClosed);
                }
                if buf.len() > MAX_LINE_LEN && buf.last() != Some(&b'\n') {
                    return Err(ChatError::LineTooLong { limit: MAX_LINE_LEN });
                }
                let line = String::from_utf8_lossy(&buf);
                Ok(line.trim_end_matches(['\r', '\n']).to_string())
            }
            _ = closed.wait_for(|closed| *closed) => Err(ChatError::ConnectionClosed),
        }
    }
}

async fn open_stream(addr: &str, timeout: Option<Duration>) -> Result<TcpStream, ChatError> {
    let connecting = TcpStream::connect(addr);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, connecting)
            .await
            .map_err(|_| ChatError::ConnectTimeout {
                addr: addr.to_string(),
            })?,
        None => connecting.await,
    };
    result.map_err(|source| ChatError::Connect {
        addr: addr.to_string(),
        source,
    })
}

async fn write_all_flush(writer: &mut OwnedWriteHalf, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}
