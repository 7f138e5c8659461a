//! Push Stream
//!
//! Holds the WebSocket connection to the notification server and forwards
//! every text frame to the controller as a [`BadgeEvent::Push`]. Payloads are
//! not decoded here; a malformed frame is the controller's problem and never
//! stops the read loop.

use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::{COOKIE, ORIGIN};
use url::Url;

use crate::badge::{BadgeError, BadgeEvent, StreamState};
use crate::net::{BadgeConfig, NotificationEndpoints, ReconnectPolicy};

/// Close code used when the connection ends without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How one connection attempt ended.
enum ConnectionEnd {
    Closed { code: u16, reason: String },
    /// Nobody is listening for events any more
    ReceiverGone,
}

pub struct PushStream {
    url: Url,
    origin: String,
    cookie: Option<String>,
    policy: ReconnectPolicy,
    state: Arc<AtomicU32>,
    /// Signalled on every re-open so the caller can re-fetch the count
    reopened: Option<mpsc::UnboundedSender<()>>,
}

impl PushStream {
    pub fn new(endpoints: &NotificationEndpoints, config: &BadgeConfig) -> Self {
        Self {
            url: endpoints.push_url().clone(),
            origin: endpoints.origin().to_string(),
            cookie: config.session_cookie.clone(),
            policy: config.reconnect.clone(),
            state: Arc::new(AtomicU32::new(StreamState::Connecting as u32)),
            reopened: None,
        }
    }

    /// Notify `tx` each time the stream opens again after a disconnect.
    pub fn with_reopen_signal(mut self, tx: mpsc::UnboundedSender<()>) -> Self {
        self.reopened = Some(tx);
        self
    }

    /// Shared handle to the connection state.
    pub fn state_handle(&self) -> Arc<AtomicU32> {
        self.state.clone()
    }

    pub fn state(&self) -> StreamState {
        StreamState::from_u32(self.state.load(Ordering::SeqCst))
    }

    /// Connect and read until the stream is closed for good.
    pub async fn run(self, events: mpsc::Sender<BadgeEvent>) {
        let mut attempt: u32 = 0;
        let mut opened_before = false;

        loop {
            if !self.transition(StreamState::Connecting, &events).await {
                return;
            }

            let end = match self.connect().await {
                Ok(ws) => {
                    if !self.transition(StreamState::Open, &events).await {
                        return;
                    }
                    if opened_before {
                        self.signal_reopen();
                    }
                    opened_before = true;

                    let opened_at = Instant::now();
                    let end = self.read_until_closed(ws, &events).await;
                    if self.policy.is_stable(opened_at.elapsed()) {
                        attempt = 0;
                    }
                    end
                }
                Err(end) => end,
            };

            let (code, reason) = match end {
                ConnectionEnd::Closed { code, reason } => (code, reason),
                ConnectionEnd::ReceiverGone => {
                    log::info!("[PushStream] Event receiver dropped, stopping");
                    self.state.store(StreamState::Closed as u32, Ordering::SeqCst);
                    return;
                }
            };

            self.state.store(StreamState::Closed as u32, Ordering::SeqCst);
            let reconnecting = self.policy.should_retry(attempt);
            log::warn!(
                "[PushStream] Closed ({}): {} (reconnecting: {})",
                code,
                reason,
                reconnecting
            );

            let closed = BadgeEvent::StreamClosed {
                code,
                reason,
                reconnecting,
            };
            if events.send(closed).await.is_err() || !reconnecting {
                return;
            }

            let delay = self.policy.delay_for_attempt(attempt);
            attempt += 1;
            log::info!(
                "[PushStream] Reconnect attempt {} in {}ms",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn signal_reopen(&self) {
        if let Some(ref tx) = self.reopened {
            if tx.send(()).is_err() {
                log::debug!("[PushStream] Nobody listening for re-opens");
            }
        }
    }

    async fn transition(&self, state: StreamState, events: &mpsc::Sender<BadgeEvent>) -> bool {
        self.state.store(state as u32, Ordering::SeqCst);
        events
            .send(BadgeEvent::StreamStateChanged(state))
            .await
            .is_ok()
    }

    fn build_request(&self) -> Result<Request, BadgeError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| BadgeError::InvalidUrl(e.to_string()))?;

        let origin = HeaderValue::from_str(&self.origin)
            .map_err(|e| BadgeError::InvalidHeader(e.to_string()))?;
        request.headers_mut().insert(ORIGIN, origin);

        if let Some(ref cookie) = self.cookie {
            let cookie = HeaderValue::from_str(cookie)
                .map_err(|e| BadgeError::InvalidHeader(e.to_string()))?;
            request.headers_mut().insert(COOKIE, cookie);
        }

        Ok(request)
    }

    async fn connect(&self) -> Result<WsStream, ConnectionEnd> {
        let request = self.build_request().map_err(|e| ConnectionEnd::Closed {
            code: ABNORMAL_CLOSURE,
            reason: e.to_string(),
        })?;

        log::info!("[PushStream] Connecting to {}", self.url);

        match tokio_tungstenite::connect_async(request).await {
            Ok((stream, response)) => {
                log::info!(
                    "[PushStream] Connected (status: {})",
                    response.status()
                );
                Ok(stream)
            }
            Err(e) => {
                log::error!("[PushStream] Handshake failed: {}", e);
                Err(ConnectionEnd::Closed {
                    code: ABNORMAL_CLOSURE,
                    reason: format!("Handshake failed: {}", e),
                })
            }
        }
    }

    async fn read_until_closed(
        &self,
        mut ws: WsStream,
        events: &mpsc::Sender<BadgeEvent>,
    ) -> ConnectionEnd {
        while let Some(msg_result) = ws.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    let text = text.as_str().to_owned();
                    log::debug!(
                        "[PushStream] Received: {}",
                        text.chars().take(100).collect::<String>()
                    );
                    if events.send(BadgeEvent::Push(text)).await.is_err() {
                        return ConnectionEnd::ReceiverGone;
                    }
                }
                Ok(Message::Binary(data)) => {
                    log::debug!(
                        "[PushStream] Ignoring binary frame ({} bytes)",
                        data.len()
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Handled by tungstenite
                }
                Ok(Message::Close(frame)) => {
                    let (code, reason) = frame
                        .map(|f| (f.code.into(), f.reason.to_string()))
                        .unwrap_or((1000, String::new()));
                    return ConnectionEnd::Closed { code, reason };
                }
                Ok(Message::Frame(_)) => {}
                Err(e) => {
                    log::error!("[PushStream] Read error: {}", e);
                    return ConnectionEnd::Closed {
                        code: ABNORMAL_CLOSURE,
                        reason: e.to_string(),
                    };
                }
            }
        }

        ConnectionEnd::Closed {
            code: ABNORMAL_CLOSURE,
            reason: "Connection ended without close frame".to_string(),
        }
    }
}
