//! Application lifecycle events (foreground/background)

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Transition of the hosting application between foreground and background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Foreground,
    Background,
}

impl LifecycleEvent {
    /// Parse the path segment used by the lifecycle endpoint
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "foreground" | "active" => Some(Self::Foreground),
            "background" | "inactive" => Some(Self::Background),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }
}

/// Fan-out point for lifecycle events. Producers publish, each consumer
/// holds a subscription for as long as it wants events.
#[derive(Debug, Clone)]
pub struct LifecycleBus {
    tx: broadcast::Sender<LifecycleEvent>,
}

impl LifecycleBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Publish an event to every current subscriber
    pub fn publish(&self, event: LifecycleEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => {
                debug!("Lifecycle event {} delivered to {} subscribers", event.as_str(), receivers);
                receivers
            }
            Err(_) => {
                warn!("Lifecycle event {} dropped, no subscribers", event.as_str());
                0
            }
        }
    }

    /// Start receiving events. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> LifecycleSubscription {
        LifecycleSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LifecycleBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Live subscription to a [`LifecycleBus`]
#[derive(Debug)]
pub struct LifecycleSubscription {
    rx: broadcast::Receiver<LifecycleEvent>,
}

impl LifecycleSubscription {
    /// Next event, or `None` once every publisher is gone.
    /// Events missed because the subscriber lagged are skipped.
    pub async fn recv(&mut self) -> Option<LifecycleEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Lifecycle subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_names() {
        assert_eq!(LifecycleEvent::from_name("foreground"), Some(LifecycleEvent::Foreground));
        assert_eq!(LifecycleEvent::from_name("active"), Some(LifecycleEvent::Foreground));
        assert_eq!(LifecycleEvent::from_name("background"), Some(LifecycleEvent::Background));
        assert_eq!(LifecycleEvent::from_name("sleep"), None);
    }

    #[tokio::test]
    async fn subscription_receives_and_unsubscribes_on_drop() {
        let bus = LifecycleBus::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        assert_eq!(bus.publish(LifecycleEvent::Background), 1);
        assert_eq!(sub.recv().await, Some(LifecycleEvent::Background));

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(LifecycleEvent::Foreground), 0);
    }

    #[tokio::test]
    async fn closed_bus_ends_subscription() {
        let bus = LifecycleBus::new();
        let mut sub = bus.subscribe();
        drop(bus);
        assert_eq!(sub.recv().await, None);
    }
}
