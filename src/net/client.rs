use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio::sync::mpsc;

use crate::badge::{BadgeError, BadgeEvent, StreamState};
use crate::net::fetch::{build_http_client, fetch_unread_count, mark_all_read, mark_read};
use crate::net::{BadgeConfig, NotificationEndpoints, PushStream};

/// Capacity of the worker → controller event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Commands that can be sent to the network worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Re-fetch the unread count
    Refresh,
    MarkRead(u64),
    MarkAllRead,
    Shutdown,
}

/// Create an event channel for feeding a [`BadgeEventReceiver`] by hand.
pub fn badge_event_channel(capacity: usize) -> (mpsc::Sender<BadgeEvent>, BadgeEventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (tx, BadgeEventReceiver { rx: Mutex::new(rx) })
}

/// Receiving end of the worker's events, safe to poll from any thread.
pub struct BadgeEventReceiver {
    rx: Mutex<mpsc::Receiver<BadgeEvent>>,
}

impl BadgeEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<BadgeEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }
}

/// Handle to the network worker.
///
/// Cheap to clone. When every handle is dropped the worker stops.
#[derive(Clone)]
pub struct NotificationClient {
    commands: mpsc::UnboundedSender<ClientCommand>,
    stream_state: Arc<AtomicU32>,
}

impl NotificationClient {
    /// Validate the configuration and start the worker thread.
    ///
    /// The worker immediately fetches the unread count and opens the push
    /// stream; both run concurrently and report through the returned receiver.
    pub fn start(config: BadgeConfig) -> Result<(Self, BadgeEventReceiver), BadgeError> {
        let endpoints = NotificationEndpoints::from_config(&config)?;
        let http = build_http_client(&config)?;
        let stream = PushStream::new(&endpoints, &config);
        let stream_state = stream.state_handle();

        let (event_tx, receiver) = badge_event_channel(EVENT_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        // Own runtime on a separate thread so the host app needs none
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .thread_name("notify-badge-io")
            .build()
            .map_err(|e| BadgeError::Runtime(e.to_string()))?;

        std::thread::Builder::new()
            .name("notify-badge".to_string())
            .spawn(move || {
                runtime.block_on(run_worker(http, endpoints, stream, event_tx, command_rx));
                log::info!("[NotificationClient] Worker stopped");
            })
            .map_err(|e| BadgeError::Runtime(e.to_string()))?;

        Ok((
            Self {
                commands: command_tx,
                stream_state,
            },
            receiver,
        ))
    }

    fn send(&self, command: ClientCommand) {
        if let Err(e) = self.commands.send(command) {
            log::warn!("Notification worker is gone, dropping {:?}", e.0);
        }
    }

    /// Re-fetch the unread count.
    pub fn refresh(&self) {
        self.send(ClientCommand::Refresh);
    }

    pub fn mark_read(&self, notification_id: u64) {
        self.send(ClientCommand::MarkRead(notification_id));
    }

    pub fn mark_all_read(&self) {
        self.send(ClientCommand::MarkAllRead);
    }

    /// Stop the worker and close the push stream.
    pub fn shutdown(&self) {
        self.send(ClientCommand::Shutdown);
    }

    pub fn stream_state(&self) -> StreamState {
        StreamState::from_u32(self.stream_state.load(Ordering::SeqCst))
    }
}

async fn run_worker(
    http: Client,
    endpoints: NotificationEndpoints,
    stream: PushStream,
    events: mpsc::Sender<BadgeEvent>,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
) {
    // Refresh requests raised from inside the worker (mark-read acks, stream re-opens)
    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel::<()>();

    let stream = stream.with_reopen_signal(refresh_tx.clone());
    let stream_task = tokio::spawn(stream.run(events.clone()));

    // Only one count request runs at a time; a newer one aborts the older
    let mut count_task = tokio::spawn(refresh_count(
        http.clone(),
        endpoints.clone(),
        events.clone(),
    ));

    loop {
        let command = tokio::select! {
            command = commands.recv() => match command {
                Some(command) => command,
                None => break,
            },
            Some(()) = refresh_rx.recv() => ClientCommand::Refresh,
        };

        log::debug!("[NotificationClient] Command: {:?}", command);
        let (http, endpoints, events) = (http.clone(), endpoints.clone(), events.clone());
        match command {
            ClientCommand::Refresh => {
                count_task.abort();
                count_task = tokio::spawn(refresh_count(http, endpoints, events));
            }
            ClientCommand::MarkRead(id) => {
                let refresh = refresh_tx.clone();
                tokio::spawn(async move {
                    match mark_read(&http, &endpoints, id).await {
                        Ok(()) => request_refresh(&refresh),
                        Err(e) => report(&events, BadgeEvent::RequestFailed(e)).await,
                    }
                });
            }
            ClientCommand::MarkAllRead => {
                let refresh = refresh_tx.clone();
                tokio::spawn(async move {
                    match mark_all_read(&http, &endpoints).await {
                        Ok(()) => request_refresh(&refresh),
                        Err(e) => report(&events, BadgeEvent::RequestFailed(e)).await,
                    }
                });
            }
            ClientCommand::Shutdown => break,
        }
    }

    count_task.abort();
    stream_task.abort();
}

fn request_refresh(refresh: &mpsc::UnboundedSender<()>) {
    if refresh.send(()).is_err() {
        log::debug!("[NotificationClient] Worker stopped before refresh");
    }
}

async fn refresh_count(http: Client, endpoints: NotificationEndpoints, events: mpsc::Sender<BadgeEvent>) {
    let event = match fetch_unread_count(&http, &endpoints).await {
        Ok(count) => BadgeEvent::CountSnapshot(count),
        Err(e) => BadgeEvent::FetchFailed(e),
    };
    report(&events, event).await;
}

async fn report(events: &mpsc::Sender<BadgeEvent>, event: BadgeEvent) {
    if events.send(event).await.is_err() {
        log::debug!("[NotificationClient] Event receiver dropped");
    }
}
