//! Common test utilities for cargolink integration tests

use cargolink::realtime::QueryInvalidator;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Invalidator double that records every invalidated key
#[derive(Default)]
pub struct RecordingInvalidator {
    keys: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn count_of(&self, key: &str) -> usize {
        self.keys.lock().unwrap().iter().filter(|k| *k == key).count()
    }
}

impl QueryInvalidator for RecordingInvalidator {
    fn invalidate(&self, key: &str) {
        self.keys.lock().unwrap().push(key.to_string());
    }
}

/// Sound hook double backed by a counter
#[allow(dead_code)]
pub fn counting_sound_hook() -> (cargolink::realtime::SoundHook, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let hook_counter = Arc::clone(&counter);
    let hook: cargolink::realtime::SoundHook = Arc::new(move || {
        hook_counter.fetch_add(1, Ordering::SeqCst);
    });
    (hook, counter)
}

/// What the mock server does with each accepted connection
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum ServerBehavior {
    /// Echo data frames back, stay open until shutdown
    Echo,
    /// Stay open; push the given text frame 250ms after the handshake
    Push(String),
    /// Immediately close with the given close code
    CloseWith(u16),
    /// Drop the TCP stream before the WebSocket handshake
    Reject,
}

/// A mock realtime server that counts accepted connections
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    pub async fn start_with(behavior: ServerBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let connections = Arc::new(AtomicUsize::new(0));

        let shutdown_clone = shutdown.clone();
        let connections_clone = connections.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                connections_clone.fetch_add(1, Ordering::SeqCst);
                                let behavior = behavior.clone();
                                let shutdown = shutdown_clone.clone();
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, behavior, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            connections,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        behavior: ServerBehavior,
        shutdown: Arc<Notify>,
    ) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
        use tokio_tungstenite::tungstenite::protocol::CloseFrame;
        use tokio_tungstenite::tungstenite::Message;

        if matches!(behavior, ServerBehavior::Reject) {
            drop(stream);
            return;
        }

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        match behavior {
            ServerBehavior::CloseWith(code) => {
                let frame = CloseFrame {
                    code: CloseCode::from(code),
                    reason: "test close".into(),
                };
                let _ = write.send(Message::Close(Some(frame))).await;
                while let Some(msg) = read.next().await {
                    if msg.is_err() {
                        break;
                    }
                }
                return;
            }
            ServerBehavior::Push(text) => {
                // Small delay so the client has settled before the push
                tokio::time::sleep(std::time::Duration::from_millis(250)).await;
                if write.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            ServerBehavior::Echo => {}
            ServerBehavior::Reject => unreachable!("handled before the handshake"),
        }

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            if msg.is_text() || msg.is_binary() {
                                if write.send(msg).await.is_err() {
                                    break;
                                }
                            } else if msg.is_close() {
                                break;
                            }
                        }
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// Base ws:// URL for this server (no path)
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Number of connections accepted so far
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown.notify_waiters();
    }
}

/// Poll a condition until it holds or the timeout elapses
pub async fn wait_for(timeout: std::time::Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }
    condition()
}
