//! Assignment notification: message rendering and best-effort delivery

pub mod messages;
pub mod notifier;

pub use notifier::{DeliveryFailure, Notifier, NotifySummary};
