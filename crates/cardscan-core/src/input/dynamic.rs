//! Observable value with a single listener slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::queue::QueueHandle;

/// Callback receiving the current value.
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Shared<T> {
    value: Mutex<T>,
    listener: Mutex<Option<Listener<T>>>,
}

/// A value whose changes are delivered to one listener on the main queue.
///
/// Binding a listener replaces the previous one. Every `set` schedules a
/// delivery carrying the value it stored, even when the value did not change.
pub struct Dynamic<T> {
    shared: Arc<Shared<T>>,
    queue: QueueHandle,
}

impl<T> Clone for Dynamic<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<T> Dynamic<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(value: T, queue: QueueHandle) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: Mutex::new(value),
                listener: Mutex::new(None),
            }),
            queue,
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        lock(&self.shared.value).clone()
    }

    /// Store a new value and schedule its delivery to the listener.
    pub fn set(&self, value: T) {
        *lock(&self.shared.value) = value.clone();

        let shared = self.shared.clone();
        let delivery = self.queue.dispatch(move || {
            // Read the slot at delivery time: a listener bound in between gets it.
            let listener = lock(&shared.listener).clone();
            if let Some(listener) = listener {
                listener(value);
            }
        });

        if let Err(e) = delivery {
            debug!("dropping change notification: {}", e);
        }
    }

    /// Listen for future changes, replacing any previous listener.
    pub fn bind<F>(&self, listener: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        *lock(&self.shared.listener) = Some(Arc::new(listener));
    }

    /// Listen for future changes and receive the current value right away.
    pub fn bind_and_fire<F>(&self, listener: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let listener: Listener<T> = Arc::new(listener);
        *lock(&self.shared.listener) = Some(listener.clone());
        listener(self.get());
    }

    /// Remove the listener. Deliveries already queued are dropped on arrival.
    pub fn unbind(&self) {
        *lock(&self.shared.listener) = None;
    }

    /// True while a listener is bound.
    pub fn is_bound(&self) -> bool {
        lock(&self.shared.listener).is_some()
    }
}

/// Lock a mutex, recovering the data if a listener panicked while holding it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
