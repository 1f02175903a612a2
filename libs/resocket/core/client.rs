use crate::config::LinkConfig;
use crate::connection_state::{AtomicCounters, AtomicLinkState, LinkState};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Internal command messages for link control
#[derive(Debug)]
enum LinkCommand {
    /// Send a frame to the server
    Send(Frame),
    /// Shutdown the link
    Shutdown,
}

/// Link transition events, observable via a non-blocking channel
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// Transport handshake completed
    Connected,
    /// Link went down
    Disconnected,
    /// Retry scheduled (attempt number)
    Reconnecting(usize),
    /// Retry budget spent; the link stays down until externally revived
    Exhausted,
    /// Transport-level error
    Error(String),
}

/// Snapshot of link counters
#[derive(Debug, Clone)]
pub struct LinkCounters {
    pub frames_received: u64,
    pub frames_sent: u64,
    pub reconnects: u64,
}

/// How a live connection ended
#[derive(Debug)]
enum Disconnect {
    /// Server sent a normal close (1000); no reconnect
    Normal,
    /// Any other close code, or the stream ended without one
    Abnormal(String),
    /// Shutdown was requested on our side
    ShuttingDown,
}

/// A self-healing WebSocket link
///
/// One driver task owns the socket for the lifetime of the handle. Inbound
/// data frames are delivered to the configured [`FrameSink`] inline, in
/// arrival order; the next frame is not read until the sink returns. After
/// an abnormal close the driver consults the [`ReconnectPolicy`]; a normal
/// server close parks the link in `Idle` instead.
pub struct SocketLink {
    /// Atomic link state, shared with the driver
    state: Arc<AtomicLinkState>,
    /// Atomic counters, shared with the driver
    counters: Arc<AtomicCounters>,
    /// Command channel sender
    command_tx: Sender<LinkCommand>,
    /// Event channel receiver
    event_rx: Receiver<LinkEvent>,
    /// Driver task handle
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// Shutdown flag - when false, the driver stops and never reconnects
    shutdown_flag: Arc<AtomicBool>,
}

impl SocketLink {
    /// Spawn the driver task for a configured link
    ///
    /// Called by the builder's `build()`; requires a Tokio runtime context.
    pub(crate) fn spawn(config: LinkConfig) -> Self {
        let config = Arc::new(config);
        let state = Arc::new(AtomicLinkState::new(LinkState::Idle));
        let counters = Arc::new(AtomicCounters::new());
        let shutdown_flag = Arc::clone(&config.shutdown_flag);

        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let task_handle = {
            let config = Arc::clone(&config);
            let state = Arc::clone(&state);
            let counters = Arc::clone(&counters);

            tokio::spawn(async move {
                run_link(config, state, counters, command_rx, event_tx).await;
            })
        };

        Self {
            state,
            counters,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            shutdown_flag,
        }
    }

    /// Send a frame over the link
    pub fn send(&self, frame: Frame) -> Result<()> {
        self.command_tx
            .send(LinkCommand::Send(frame))
            .map_err(|e| ResocketError::ChannelSend(e.to_string()))
    }

    /// Get current link state
    #[inline]
    pub fn state(&self) -> LinkState {
        self.state.get()
    }

    /// Check if connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Check if the driver is live or trying to get there
    ///
    /// An external reconnect request should be a no-op while this is true:
    /// the driver is already handling recovery.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Get a shareable handle to the link state
    ///
    /// Lets callers query status without holding the link itself.
    pub fn state_handle(&self) -> Arc<AtomicLinkState> {
        Arc::clone(&self.state)
    }

    /// Get a snapshot of the link counters
    pub fn counters(&self) -> LinkCounters {
        LinkCounters {
            frames_received: self.counters.frames_received(),
            frames_sent: self.counters.frames_sent(),
            reconnects: self.counters.reconnects(),
        }
    }

    /// Get a shareable handle to the link counters
    pub fn counters_handle(&self) -> Arc<AtomicCounters> {
        Arc::clone(&self.counters)
    }

    /// Try to receive a link event (non-blocking)
    pub fn try_recv_event(&self) -> Option<LinkEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Get a clone of the event receiver for external observation
    pub fn event_receiver(&self) -> Receiver<LinkEvent> {
        self.event_rx.clone()
    }

    /// Get a reference to the shutdown flag
    ///
    /// Setting the flag to false triggers graceful shutdown: the driver
    /// closes the socket, abandons any pending retry sleep, and exits.
    pub fn shutdown_flag(&self) -> &Arc<AtomicBool> {
        &self.shutdown_flag
    }

    /// Shutdown the link
    ///
    /// Cancels any pending reconnect sleep, closes the socket if open, and
    /// waits for the driver task to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("shutting down socket link");

        // Prevent any further reconnection attempt
        self.shutdown_flag.store(false, Ordering::Release);

        // Wake the driver if it is inside the connection loop
        let _ = self.command_tx.send(LinkCommand::Shutdown);

        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }

        Ok(())
    }
}

/// Main driver loop: connect, drive, decide on reconnect
async fn run_link(
    config: Arc<LinkConfig>,
    state: Arc<AtomicLinkState>,
    counters: Arc<AtomicCounters>,
    command_rx: Receiver<LinkCommand>,
    event_tx: Sender<LinkEvent>,
) {
    let mut attempt: usize = 0;
    let shutdown_flag = &config.shutdown_flag;

    loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("shutdown flag cleared, exiting driver");
            break;
        }

        state.set(if attempt == 0 {
            LinkState::Connecting
        } else {
            LinkState::Reconnecting
        });

        if attempt > 0 {
            let _ = event_tx.send(LinkEvent::Reconnecting(attempt));
        }

        match connect_async(config.url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!(url = %config.url, "link established");
                state.set(LinkState::Connected);
                let _ = event_tx.send(LinkEvent::Connected);
                config.sink.on_open().await;

                attempt = 0;

                let outcome =
                    drive_connection(ws_stream, &config, &counters, &command_rx).await;

                state.set(LinkState::Disconnected);
                let _ = event_tx.send(LinkEvent::Disconnected);
                config.sink.on_close().await;

                match outcome {
                    Ok(Disconnect::ShuttingDown) => break,
                    Ok(Disconnect::Normal) => {
                        info!("server closed the link normally, not reconnecting");
                        state.set(LinkState::Idle);
                        return;
                    }
                    Ok(Disconnect::Abnormal(reason)) => {
                        warn!(%reason, "link lost");
                        let _ = event_tx.send(LinkEvent::Error(reason));
                    }
                    Err(e) => {
                        error!("link error: {}", e);
                        let _ = event_tx.send(LinkEvent::Error(e.to_string()));
                    }
                }
            }
            Err(e) => {
                error!(url = %config.url, "failed to connect: {}", e);
                let _ = event_tx.send(LinkEvent::Error(e.to_string()));
                state.set(LinkState::Disconnected);
            }
        }

        if !shutdown_flag.load(Ordering::Acquire) {
            debug!("shutdown flag cleared after disconnect, stopping");
            break;
        }

        // Consult the reconnect policy; only abnormal paths reach this point
        match config.reconnect.next_delay(attempt) {
            Some(delay) => {
                info!(?delay, attempt = attempt + 1, "scheduling reconnect");
                if !sleep_interruptible(delay, shutdown_flag).await {
                    debug!("shutdown during reconnect delay");
                    break;
                }
                attempt += 1;
                counters.increment_reconnects();
            }
            None => {
                warn!(attempts = attempt, "reconnect budget exhausted, link stays down");
                state.set(LinkState::Exhausted);
                let _ = event_tx.send(LinkEvent::Exhausted);
                return;
            }
        }
    }

    state.set(LinkState::ShuttingDown);
    debug!("link driver exiting");
}

/// Drive an established connection until it ends
///
/// Returns how the connection ended so the caller can decide on reconnect.
async fn drive_connection(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    config: &Arc<LinkConfig>,
    counters: &Arc<AtomicCounters>,
    command_rx: &Receiver<LinkCommand>,
) -> Result<Disconnect> {
    let (mut write, mut read) = ws_stream.split();
    let shutdown_flag = &config.shutdown_flag;

    loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            let _ = write.close().await;
            return Ok(Disconnect::ShuttingDown);
        }

        tokio::select! {
            // Inbound frames: delivered to the sink inline, one at a time
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        counters.increment_received();
                        config.sink.on_frame(Frame::Text(text)).await;
                    }
                    Some(Ok(Message::Binary(data))) => {
                        counters.increment_received();
                        config.sink.on_frame(Frame::Binary(data)).await;
                    }
                    Some(Ok(Message::Close(close_frame))) => {
                        let normal = close_frame
                            .as_ref()
                            .map(|f| f.code == CloseCode::Normal)
                            .unwrap_or(false);

                        if normal {
                            debug!("close frame received (normal)");
                            return Ok(Disconnect::Normal);
                        }

                        let reason = close_frame
                            .map(|f| format!("{:?}: {}", f.code, f.reason))
                            .unwrap_or_else(|| "closed without a close frame".to_string());
                        debug!(%reason, "close frame received (abnormal)");
                        return Ok(Disconnect::Abnormal(reason));
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {
                        // Transport liveness is tungstenite's business
                    }
                    Some(Err(e)) => {
                        return Err(ResocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        return Err(ResocketError::ConnectionClosed("stream ended".to_string()));
                    }
                }
            }

            // Commands (blocking recv with timeout so the select stays live)
            cmd = async {
                let rx = command_rx.clone();
                tokio::task::spawn_blocking(move || {
                    rx.recv_timeout(Duration::from_millis(100))
                }).await.ok()
            } => {
                match cmd {
                    Some(Ok(LinkCommand::Send(frame))) => {
                        let msg = frame_to_message(&frame);
                        write.send(msg).await.map_err(|e| {
                            ResocketError::WebSocket(e.to_string())
                        })?;
                        counters.increment_sent();
                    }
                    Some(Ok(LinkCommand::Shutdown)) => {
                        info!("received shutdown command");
                        let _ = write.close().await;
                        return Ok(Disconnect::ShuttingDown);
                    }
                    Some(Err(_)) => {
                        // Timeout, keep looping
                    }
                    None => {
                        debug!("command channel closed");
                        return Ok(Disconnect::ShuttingDown);
                    }
                }
            }
        }
    }
}

/// Sleep in small steps, bailing out early on shutdown
///
/// Returns false if shutdown was requested during the sleep.
async fn sleep_interruptible(duration: Duration, shutdown_flag: &Arc<AtomicBool>) -> bool {
    let check_interval = Duration::from_millis(50);
    let mut elapsed = Duration::ZERO;

    while elapsed < duration {
        if !shutdown_flag.load(Ordering::Acquire) {
            return false;
        }
        let step = std::cmp::min(check_interval, duration - elapsed);
        tokio::time::sleep(step).await;
        elapsed += step;
    }

    shutdown_flag.load(Ordering::Acquire)
}

/// Convert a Frame to a tungstenite Message
fn frame_to_message(frame: &Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text.clone()),
        Frame::Binary(data) => Message::Binary(data.clone()),
    }
}
