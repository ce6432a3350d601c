//! Order dispatcher
//!
//! The serialization point between concurrent sessions and the book: a
//! bounded FIFO with a single consumer task that exclusively owns the
//! `OrderBook`. Orders are validated and stamped on entry, applied in
//! queue order, and each pass's fills are handed to the notifier before
//! the next order is touched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use types::errors::SubmitError;
use types::ids::{OrderId, SessionId};
use types::numeric::Price;
use types::order::{Order, OrderKind, Side};

use crate::book::OrderBook;
use crate::notifier::FillNotifier;
use crate::sessions::SessionRegistry;

/// An order as parsed from a session, before the dispatcher assigns its
/// id and arrival stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub side: Side,
    pub kind: OrderKind,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
    pub quantity: u64,
}

/// Handle to the dispatch queue and its consumer task.
///
/// Owns the process-global order-id counter and the monotonic arrival
/// clock. Cloneable via `Arc`; `shutdown` closes the queue, drains it,
/// and waits for the consumer to exit.
pub struct Dispatcher {
    sender: Mutex<Option<mpsc::Sender<Order>>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
    sessions: Arc<SessionRegistry>,
    next_order_id: AtomicU64,
    epoch: Instant,
    last_arrival: AtomicU64,
}

impl Dispatcher {
    /// Spawn the consumer task and return the shared handle.
    pub fn start(
        book: OrderBook,
        notifier: Arc<FillNotifier>,
        sessions: Arc<SessionRegistry>,
        queue_capacity: usize,
    ) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(queue_capacity);
        let consumer = tokio::spawn(consume(book, rx, notifier));
        Arc::new(Self {
            sender: Mutex::new(Some(tx)),
            consumer: Mutex::new(Some(consumer)),
            sessions,
            next_order_id: AtomicU64::new(1),
            epoch: Instant::now(),
            last_arrival: AtomicU64::new(0),
        })
    }

    /// Validate, stamp, and enqueue one order.
    ///
    /// Rejects before the book ever sees the order: the session must hold
    /// an authenticated principal, quantity must be positive, a limit
    /// needs a limit price and a stop needs a trigger. On a full queue
    /// the caller waits for a slot; the matcher itself is never blocked
    /// by producers.
    pub async fn submit(
        &self,
        request: OrderRequest,
        session: SessionId,
    ) -> Result<OrderId, SubmitError> {
        if !self.sessions.is_authenticated(session) {
            return Err(SubmitError::NotLoggedIn);
        }
        if request.quantity == 0 {
            return Err(SubmitError::InvalidQuantity(0));
        }
        match request.kind {
            OrderKind::Limit if request.limit_price.is_none() => {
                return Err(SubmitError::InvalidPrice(
                    "limit order requires a positive price".to_string(),
                ));
            }
            OrderKind::StopLoss if request.stop_price.is_none() => {
                return Err(SubmitError::InvalidPrice(
                    "stop order requires a positive trigger price".to_string(),
                ));
            }
            _ => {}
        }

        let sender = {
            let guard = self.sender.lock().await;
            match guard.as_ref() {
                Some(tx) => tx.clone(),
                None => return Err(SubmitError::ShuttingDown),
            }
        };

        let id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::Relaxed));
        let order = Order {
            id,
            session,
            side: request.side,
            kind: request.kind,
            limit_price: match request.kind {
                OrderKind::Limit => request.limit_price,
                _ => None,
            },
            stop_price: match request.kind {
                OrderKind::StopLoss => request.stop_price,
                _ => None,
            },
            quantity: request.quantity,
            arrival: self.stamp_arrival(),
        };

        tracing::debug!(
            order = id.as_u64(),
            session = session.as_u64(),
            "order accepted onto dispatch queue"
        );
        sender.send(order).await.map_err(|_| SubmitError::ShuttingDown)?;
        Ok(id)
    }

    /// Close the queue, let the consumer drain everything already
    /// accepted, and wait for it to exit.
    pub async fn shutdown(&self) {
        self.sender.lock().await.take();
        if let Some(handle) = self.consumer.lock().await.take() {
            if let Err(err) = handle.await {
                tracing::error!(%err, "matcher task terminated abnormally");
            }
        }
    }

    /// Monotonic nanosecond stamp, never decreasing even when two
    /// producers race the clock read.
    fn stamp_arrival(&self) -> u64 {
        let now = self.epoch.elapsed().as_nanos() as u64;
        let prev = self.last_arrival.fetch_max(now, Ordering::AcqRel);
        now.max(prev)
    }
}

/// The consumer loop: sole mutator of the book. Runs until the queue is
/// closed and drained.
async fn consume(mut book: OrderBook, mut queue: mpsc::Receiver<Order>, notifier: Arc<FillNotifier>) {
    while let Some(order) = queue.recv().await {
        let order_id = order.id;
        let fills = book.submit(order);
        if !fills.is_empty() {
            tracing::debug!(
                order = order_id.as_u64(),
                fills = fills.len(),
                "order matched"
            );
        }
        for fill in &fills {
            notifier.notify(fill);
        }
    }
    tracing::info!("order queue drained, matcher task exiting");
}
