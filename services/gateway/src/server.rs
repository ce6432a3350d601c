//! TLS session server
//!
//! Accepts connections, handshakes them, and runs one reader and one
//! writer task per session. The reader parses request lines and answers
//! through the session's response channel; the writer interleaves those
//! responses with fill notifications from the engine. Either side
//! failing tears the session down; orders already queued still execute.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

use matching_engine::dispatcher::Dispatcher;
use matching_engine::notifier::FillNotifier;
use matching_engine::sessions::SessionRegistry;
use types::fill::Fill;
use types::ids::SessionId;

use crate::config::QueueLimits;
use crate::protocol::{self, ParseError, Request};

pub struct Server {
    dispatcher: Arc<Dispatcher>,
    notifier: Arc<FillNotifier>,
    sessions: Arc<SessionRegistry>,
    acceptor: TlsAcceptor,
    limits: QueueLimits,
    /// The acceptor owns the session-id counter.
    next_session_id: AtomicU64,
}

impl Server {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        notifier: Arc<FillNotifier>,
        sessions: Arc<SessionRegistry>,
        acceptor: TlsAcceptor,
        limits: QueueLimits,
    ) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            notifier,
            sessions,
            acceptor,
            limits,
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Accept loop; runs until the listener fails or the future is dropped.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = Arc::clone(&self);
            tokio::spawn(async move {
                server.handle_connection(stream, peer).await;
            });
        }
    }

    async fn handle_connection(self: Arc<Self>, stream: TcpStream, peer: SocketAddr) {
        let session = SessionId::new(self.next_session_id.fetch_add(1, Ordering::Relaxed));
        let tls = match self.acceptor.accept(stream).await {
            Ok(tls) => tls,
            Err(err) => {
                tracing::warn!(%peer, %err, "TLS handshake failed");
                return;
            }
        };
        tracing::info!(session = session.as_u64(), %peer, "session connected");
        self.sessions.connect(session);

        let (fill_tx, fill_rx) = mpsc::channel(self.limits.session_fill_queue);
        let (response_tx, response_rx) = mpsc::channel(self.limits.session_response_queue);
        self.notifier.register(session, fill_tx);

        let (read_half, write_half) = tokio::io::split(tls);
        let mut writer = tokio::spawn(write_lines(write_half, response_rx, fill_rx));

        // The writer finishing first means the session was evicted (fill
        // queue overflow) or the peer is unwritable; stop reading too.
        tokio::select! {
            _ = self.read_loop(read_half, session, response_tx) => {}
            _ = &mut writer => {}
        }

        self.notifier.unregister(session);
        self.sessions.disconnect(session);
        if !writer.is_finished() {
            // Both channel senders are gone now, so the writer drains its
            // remaining lines and exits.
            let _ = writer.await;
        }
        tracing::info!(session = session.as_u64(), "session closed");
    }

    async fn read_loop(
        &self,
        read_half: ReadHalf<TlsStream<TcpStream>>,
        session: SessionId,
        responses: mpsc::Sender<String>,
    ) {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let reply = self.handle_line(session, line.trim_end()).await;
                    if responses.send(reply).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::debug!(session = session.as_u64(), %err, "read failed");
                    break;
                }
            }
        }
    }

    async fn handle_line(&self, session: SessionId, line: &str) -> String {
        match protocol::parse_line(line) {
            Ok(Request::Login { user, pass }) => {
                if self.sessions.login(session, &user, &pass) {
                    protocol::LOGIN_OK.to_string()
                } else {
                    protocol::LOGIN_FAILED.to_string()
                }
            }
            Ok(Request::Order {
                side,
                kind,
                price,
                quantity,
            }) => {
                let request = protocol::order_request(side, kind, price, quantity);
                match self.dispatcher.submit(request, session).await {
                    Ok(order_id) => {
                        tracing::debug!(
                            session = session.as_u64(),
                            order = order_id.as_u64(),
                            "order accepted"
                        );
                        protocol::ORDER_ACCEPTED.to_string()
                    }
                    Err(err) => protocol::render_error(&err),
                }
            }
            Err(ParseError::UnknownCommand) => protocol::UNKNOWN_COMMAND.to_string(),
            Err(err) => protocol::render_error(&err),
        }
    }
}

/// The session's single writer: command responses and fill pushes share
/// one sink so lines never interleave mid-write. Responses are preferred
/// so an order's acceptance tends to precede its own fills.
async fn write_lines(
    mut sink: WriteHalf<TlsStream<TcpStream>>,
    mut responses: mpsc::Receiver<String>,
    mut fills: mpsc::Receiver<Fill>,
) {
    loop {
        let line = tokio::select! {
            biased;
            response = responses.recv() => match response {
                Some(line) => line,
                None => break,
            },
            fill = fills.recv() => match fill {
                Some(fill) => protocol::render_fill(&fill),
                None => break,
            },
        };
        if sink.write_all(line.as_bytes()).await.is_err() {
            break;
        }
        if sink.write_all(b"\n").await.is_err() {
            break;
        }
    }
    let _ = sink.shutdown().await;
}
