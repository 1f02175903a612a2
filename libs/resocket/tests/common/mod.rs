//! Common test utilities for resocket integration tests

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// What the mock server does with each accepted connection
#[derive(Debug, Clone, Copy)]
pub enum ServerBehavior {
    /// Echo data frames back, stay open until shutdown
    Echo,
    /// Immediately close with the given close code
    CloseWith(u16),
    /// Drop the TCP stream before the WebSocket handshake
    Reject,
}

/// A mock WebSocket server that counts accepted connections
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    connections: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Start an echo server
    #[allow(dead_code)]
    pub async fn start() -> Self {
        Self::start_with(ServerBehavior::Echo).await
    }

    /// Start a server with the given per-connection behavior
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

        if let ServerBehavior::CloseWith(code) = behavior {
            let frame = CloseFrame {
                code: CloseCode::from(code),
                reason: "test close".into(),
            };
            let _ = write.send(Message::Close(Some(frame))).await;
            // Drain until the peer hangs up so the close handshake completes
            while let Some(msg) = read.next().await {
                if msg.is_err() {
                    break;
                }
            }
            return;
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
                            } else if msg.is_ping() {
                                let pong = Message::Pong(msg.into_data());
                                if write.send(pong).await.is_err() {
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

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Number of connections accepted so far
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Poll a condition until it holds or the timeout elapses
#[allow(dead_code)]
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
