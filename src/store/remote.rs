use super::{MessageStore, Subscribers, Subscription};
use crate::message::{Message, MessageId, Snapshot};
use crate::transport::message::{ClientRequest, ServerEvent};
use crate::utils::ChatError;
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

enum Command {
    Append {
        message: Message,
        ack: oneshot::Sender<Result<MessageId, ChatError>>,
    },
    Remove {
        id: MessageId,
    },
}

/// Websocket client of the relay server.
///
/// A background task owns the connection and reconnects silently when it
/// drops; the server replays the full snapshot on every (re)connect, so
/// subscribers resume without gaps. Writes issued while the connection is
/// down fail with [`ChatError::StoreUnavailable`] and are not retried:
/// losing a message is acceptable for an ephemeral channel.
#[derive(Clone)]
pub struct RemoteStore {
    commands: UnboundedSender<Command>,
    subscribers: Subscribers,
    latest: Arc<Mutex<Snapshot>>,
}

impl RemoteStore {
    /// Create a store handle for the relay at `url` (e.g.
    /// `ws://127.0.0.1:8080`). The connection is established and maintained
    /// by a background task; this call itself does not touch the network.
    pub fn connect(url: impl Into<String>) -> Self {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let subscribers = Subscribers::new();
        let latest = Arc::new(Mutex::new(Snapshot::new()));

        tokio::spawn(run_connection(
            url.into(),
            commands_rx,
            subscribers.clone(),
            Arc::clone(&latest),
        ));

        Self {
            commands,
            subscribers,
            latest,
        }
    }
}

impl MessageStore for RemoteStore {
    async fn append(&self, message: Message) -> Result<MessageId, ChatError> {
        let (ack, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::Append { message, ack })
            .map_err(|_| ChatError::StoreUnavailable("connection task gone".into()))?;
        ack_rx
            .await
            .map_err(|_| ChatError::StoreUnavailable("append dropped mid-flight".into()))?
    }

    async fn remove(&self, id: &MessageId) -> Result<(), ChatError> {
        self.commands
            .send(Command::Remove { id: id.clone() })
            .map_err(|_| ChatError::StoreUnavailable("connection task gone".into()))
    }

    fn subscribe(&self) -> Subscription {
        // The most recent server snapshot doubles as the initial delivery;
        // before the first connect this is the empty set.
        self.subscribers.add(self.latest.lock().unwrap().clone())
    }
}

/// Connection task: connect, run a session until it breaks, reconnect.
/// Exits when every store handle has been dropped.
async fn run_connection(
    url: String,
    mut commands: UnboundedReceiver<Command>,
    subscribers: Subscribers,
    latest: Arc<Mutex<Snapshot>>,
) {
    loop {
        let ws = match connect_async(url.as_str()).await {
            Ok((ws, _)) => ws,
            Err(e) => {
                warn!("relay connect failed: {e}");
                if reject_queued_writes(&mut commands) {
                    return;
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };
        info!("connected to relay at {url}");

        match run_session(ws, &mut commands, &subscribers, &latest).await {
            SessionEnd::HandlesDropped => return,
            SessionEnd::ConnectionLost => {
                warn!("relay connection lost, reconnecting");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

enum SessionEnd {
    HandlesDropped,
    ConnectionLost,
}

async fn run_session(
    ws: tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    commands: &mut UnboundedReceiver<Command>,
    subscribers: &Subscribers,
    latest: &Arc<Mutex<Snapshot>>,
) -> SessionEnd {
    let (mut ws_sender, mut ws_receiver) = ws.split();

    // Acks for in-flight appends. The websocket preserves order, so the
    // server's `appended` events pair up first-in-first-out.
    let mut pending: VecDeque<oneshot::Sender<Result<MessageId, ChatError>>> = VecDeque::new();

    let end = loop {
        tokio::select! {
            cmd = commands.recv() => match cmd {
                None => break SessionEnd::HandlesDropped,
                Some(Command::Append { message, ack }) => {
                    let request = ClientRequest::Append { message };
                    let text = match serde_json::to_string(&request) {
                        Ok(text) => text,
                        Err(e) => {
                            let _ = ack.send(Err(ChatError::StoreUnavailable(format!(
                                "failed to serialize append: {e}"
                            ))));
                            continue;
                        }
                    };
                    if ws_sender.send(WsMessage::text(text)).await.is_err() {
                        let _ = ack.send(Err(ChatError::StoreUnavailable(
                            "connection lost during append".into(),
                        )));
                        break SessionEnd::ConnectionLost;
                    }
                    pending.push_back(ack);
                }
                Some(Command::Remove { id }) => {
                    let request = ClientRequest::Remove { id };
                    let text = match serde_json::to_string(&request) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("failed to serialize remove: {e}");
                            continue;
                        }
                    };
                    if ws_sender.send(WsMessage::text(text)).await.is_err() {
                        break SessionEnd::ConnectionLost;
                    }
                }
            },

            incoming = ws_receiver.next() => match incoming {
                Some(Ok(msg)) if msg.is_text() => {
                    let text = match msg.to_text() {
                        Ok(text) => text,
                        Err(_) => continue,
                    };
                    match serde_json::from_str::<ServerEvent>(text) {
                        Ok(ServerEvent::Snapshot { messages }) => {
                            *latest.lock().unwrap() = messages.clone();
                            subscribers.broadcast(&messages);
                        }
                        Ok(ServerEvent::Appended { id }) => {
                            match pending.pop_front() {
                                Some(ack) => { let _ = ack.send(Ok(id)); }
                                None => debug!("unsolicited append ack for {id}"),
                            }
                        }
                        Err(e) => warn!("unparseable relay event: {e} | {text}"),
                    }
                }
                Some(Ok(_)) => {} // ping/pong and friends
                Some(Err(e)) => {
                    warn!("relay read error: {e}");
                    break SessionEnd::ConnectionLost;
                }
                None => break SessionEnd::ConnectionLost,
            },
        }
    };

    for ack in pending {
        let _ = ack.send(Err(ChatError::StoreUnavailable(
            "connection lost before ack".into(),
        )));
    }
    end
}

/// Fail any writes queued while disconnected. Returns true when all store
/// handles are gone and the connection task should exit.
fn reject_queued_writes(commands: &mut UnboundedReceiver<Command>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(Command::Append { ack, .. }) => {
                let _ = ack.send(Err(ChatError::StoreUnavailable("relay unreachable".into())));
            }
            Ok(Command::Remove { .. }) => {}
            Err(mpsc::error::TryRecvError::Empty) => return false,
            Err(mpsc::error::TryRecvError::Disconnected) => return true,
        }
    }
}
