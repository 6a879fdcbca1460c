//! Collaborators reached during the best-effort phase of the saga.

pub mod notification;

pub use notification::{
    Delivery, InMemoryNotificationSink, LogNotificationSink, NotificationSink, compose_message,
};
