mod channel;
mod event_handler;

pub use channel::{Callback, Channel, EventEmitter, EventObserver, SubscriptionId};
pub use event_handler::EventHandler;
