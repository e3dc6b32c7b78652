use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::spawn;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tracing::{error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use std::sync::{Arc, Mutex};

use super::message::{ClientRequest, ServerEvent};
use super::relay::Relay;

/// Accept chat clients and serve the relay protocol until the process
/// exits. Each connection gets its own forwarding channel so a slow client
/// never stalls the hub.
pub async fn start_relay_server(addr: &str, relay: Arc<Mutex<Relay>>) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");

    info!("relay listening on ws://{addr}");

    while let Ok((stream, _)) = listener.accept().await {
        let relay = relay.clone();
        let client_id = format!("client-{}", uuid::Uuid::new_v4());

        tokio::spawn(async move {
            let ws_stream = match accept_async(stream).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("websocket handshake error: {e}");
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();

            // Channel for events pushed to this client.
            let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

            // Registration also delivers the initial full snapshot.
            {
                let mut relay = relay.lock().unwrap();
                relay.register_client(client_id.clone(), tx.clone());
            }
            info!("{client_id} connected");

            // Forward hub events to the websocket.
            let client_id_clone = client_id.clone();
            spawn(async move {
                while let Some(msg) = rx.recv().await {
                    if let Err(e) = ws_sender.send(msg).await {
                        warn!("failed to send to {client_id_clone}: {e}");
                        break;
                    }
                }
            });

            while let Some(Ok(msg)) = ws_receiver.next().await {
                if !msg.is_text() {
                    continue;
                }
                let text = match msg.to_text() {
                    Ok(text) => text,
                    Err(_) => continue,
                };
                match serde_json::from_str::<ClientRequest>(text) {
                    Ok(ClientRequest::Append { message }) => {
                        let id = {
                            let mut relay = relay.lock().unwrap();
                            relay.append(message)
                        };
                        // Ack goes only to the writer; everyone already got
                        // the snapshot through the hub.
                        if let Ok(ack) = serde_json::to_string(&ServerEvent::Appended { id }) {
                            let _ = tx.send(WsMessage::text(ack));
                        }
                    }

                    Ok(ClientRequest::Remove { id }) => {
                        let mut relay = relay.lock().unwrap();
                        relay.remove(&id);
                    }

                    Err(err) => {
                        warn!("invalid client request: {err} | {text}");
                    }
                }
            }

            info!("{client_id} disconnected");

            {
                let mut relay = relay.lock().unwrap();
                relay.remove_client(&client_id);
            }
        });
    }
}
