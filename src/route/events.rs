use axum::{
	extract::{
		ws::{Message, WebSocket, WebSocketUpgrade},
		State,
	},
	response::Response,
	routing::get,
	Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{error::RecvError, Receiver};

use crate::{
	notify::{Broadcast, Event},
	AppState,
};

pub fn routes() -> Router<AppState> {
	Router::new().route("/events", get(events))
}

/// Upgrades to a WebSocket that receives every published [`Event`].
async fn events(State(events): State<Broadcast>, ws: WebSocketUpgrade) -> Response {
	let receiver = events.subscribe();

	ws.on_upgrade(move |socket| forward(socket, receiver))
}

async fn forward(socket: WebSocket, mut events: Receiver<Event>) {
	let (mut sender, mut incoming) = socket.split();

	tracing::debug!("event subscriber connected");

	loop {
		tokio::select! {
			event = events.recv() => match event {
				Ok(event) => {
					let text = match serde_json::to_string(&event) {
						Ok(text) => text,
						Err(error) => {
							tracing::error!(%error, "failed to serialize event");
							continue;
						}
					};

					if sender.send(Message::Text(text)).await.is_err() {
						break;
					}
				}
				Err(RecvError::Lagged(skipped)) => {
					tracing::debug!(skipped, "event subscriber lagged");
				}
				Err(RecvError::Closed) => break,
			},
			message = incoming.next() => match message {
				Some(Ok(Message::Close(..)) | Err(..)) | None => break,
				Some(Ok(..)) => {}
			},
		}
	}

	tracing::debug!("event subscriber disconnected");
}
