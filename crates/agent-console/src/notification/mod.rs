//! # Transfer Notifications
//!
//! Data types, the countdown store and request sources for the transfer
//! notification lifecycle:
//!
//! ```text
//! PENDING ──accept──▶ ACCEPTED
//!    │ ────reject──▶ REJECTED
//!    │ ──countdown─▶ EXPIRED
//!    └──dismiss all▶ DISMISSED
//! ```
//!
//! Every terminal state is observed the same way: the notification and its
//! countdown entry leave the store. The [`Resolution`] is reported through
//! [`NotificationEvent::Resolved`](crate::events::NotificationEvent::Resolved).
//!
//! - [`types`]: notifications, requests and resolutions
//! - [`store`]: pending set plus countdown entries
//! - [`source`]: simulated and live-feed request sources

pub mod source;
pub mod store;
pub mod types;

pub use source::{ChannelSource, SimulatedSource, TransferRequestSource};
pub use store::{NotificationStore, SharedStore};
pub use types::{NotificationId, Resolution, TransferNotification, TransferRequest};
