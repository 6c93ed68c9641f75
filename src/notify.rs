use serde::Serialize;
use tokio::sync::broadcast;

use crate::route::profile::model::PublicProfile;

/// Number of events a slow subscriber may fall behind before it starts skipping.
pub const CHANNEL_CAPACITY: usize = 64;

/// An event pushed to every connected client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Event {
	ProfileUpdated(PublicProfile),
}

/// Publishes events outside of the request/response cycle.
///
/// Delivery is at-most-once with no acknowledgement or replay.
pub trait Publisher: Send + Sync {
	fn publish(&self, event: Event);
}

/// In-process fan-out to every open WebSocket connection.
#[derive(Clone)]
pub struct Broadcast {
	sender: broadcast::Sender<Event>,
}

impl Broadcast {
	pub fn new(capacity: usize) -> Self {
		Self {
			sender: broadcast::channel(capacity).0,
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.sender.subscribe()
	}
}

impl Default for Broadcast {
	fn default() -> Self {
		Self::new(CHANNEL_CAPACITY)
	}
}

impl Publisher for Broadcast {
	fn publish(&self, event: Event) {
		// `send` only fails when nobody is listening.
		match self.sender.send(event) {
			Ok(receivers) => tracing::debug!(receivers, "event published"),
			Err(..) => tracing::debug!("event dropped, no subscribers"),
		}
	}
}
