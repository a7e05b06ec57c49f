use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

struct Listeners<T> {
    next_id: SubscriptionId,
    callbacks: BTreeMap<SubscriptionId, Callback<T>>,
}

/// Single-threaded fan-out. The session holds the emitter, the host holds
/// the observer; both ends share one listener list.
pub struct Channel;

impl Channel {
    pub fn new<T: std::fmt::Debug>() -> (EventEmitter<T>, EventObserver<T>) {
        let listeners = Rc::new(RefCell::new(Listeners {
            next_id: 0,
            callbacks: BTreeMap::new(),
        }));
        (
            EventEmitter {
                listeners: Rc::clone(&listeners),
            },
            EventObserver { listeners },
        )
    }
}

pub struct EventEmitter<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    /// Listeners run in subscription order.
    pub fn emit(&self, event: &T) {
        // Snapshot so a listener may subscribe or unsubscribe while handling.
        let callbacks: Vec<Callback<T>> = self
            .listeners
            .borrow()
            .callbacks
            .values()
            .cloned()
            .collect();
        trace!(target: "events", "emitting to {} listeners: {:?}", callbacks.len(), event);
        for callback in callbacks {
            callback(event);
        }
    }
}

pub struct EventObserver<T> {
    listeners: Rc<RefCell<Listeners<T>>>,
}

impl<T> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.callbacks.insert(id, Rc::new(callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().callbacks.remove(&id).is_some()
    }
}
