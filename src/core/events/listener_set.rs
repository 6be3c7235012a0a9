//=========================================================================
// Listener Set Trait
//=========================================================================
//
// Type-erased trait for per-event listener lists that allows storage in
// a HashMap without knowing the payload type at compile time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any};

//=== Internal Dependencies ===============================================

use super::Payload;
use crate::core::listener::ListenerId;

//=========================================================================

/// Boxed callback for payload type `P`.
pub(super) type Callback<P> = Box<dyn FnMut(&P) + Send>;

/// Type-erased listener list operations.
pub(super) trait ListenerSet: Send {
    /// Number of registered listeners.
    fn len(&self) -> usize;

    /// Removes the listener with `id`. Returns whether it was present.
    fn remove(&mut self, id: ListenerId) -> bool;

    /// Name of the payload type this set was created for.
    fn payload_type(&self) -> &'static str;

    /// Downcasts to `&mut dyn Any` for type-specific operations.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=========================================================================

/// Ordered listeners for one event bound to payload type `P`.
pub(super) struct Listeners<P: Payload> {
    entries: Vec<(ListenerId, Callback<P>)>,
}

impl<P: Payload> Listeners<P> {
    pub(super) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(super) fn push(&mut self, id: ListenerId, callback: Callback<P>) {
        self.entries.push((id, callback));
    }

    /// Invokes every listener in registration order.
    pub(super) fn invoke(&mut self, payload: &P) -> usize {
        for (_, callback) in &mut self.entries {
            callback(payload);
        }
        self.entries.len()
    }
}

impl<P: Payload> ListenerSet for Listeners<P> {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|(existing, _)| *existing == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    fn payload_type(&self) -> &'static str {
        type_name::<P>()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::listener::ListenerIds;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn invoke_runs_in_registration_order() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let mut ids = ListenerIds::default();
        let mut listeners: Listeners<i32> = Listeners::new();

        for tag in 0..3 {
            let seen = Arc::clone(&seen);
            listeners.push(ids.next(), Box::new(move |value: &i32| seen.lock().push(tag * 10 + value)));
        }

        assert_eq!(listeners.invoke(&1), 3);
        assert_eq!(*seen.lock(), vec![1, 11, 21]);
    }

    #[test]
    fn remove_by_id() {
        let total = Arc::new(AtomicI32::new(0));
        let mut ids = ListenerIds::default();
        let mut listeners: Listeners<i32> = Listeners::new();

        let first = ids.next();
        let counter = Arc::clone(&total);
        listeners.push(first, Box::new(move |v: &i32| {
            counter.fetch_add(*v, Ordering::SeqCst);
        }));

        let set: &mut dyn ListenerSet = &mut listeners;
        assert_eq!(set.len(), 1);
        assert!(set.remove(first));
        assert!(!set.remove(first));
        assert_eq!(set.len(), 0);

        listeners.invoke(&5);
        assert_eq!(total.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn downcast_matches_payload_type() {
        let mut listeners: Listeners<String> = Listeners::new();
        let set: &mut dyn ListenerSet = &mut listeners;

        assert_eq!(set.payload_type(), type_name::<String>());
        assert!(set.as_any_mut().downcast_mut::<Listeners<String>>().is_some());
        assert!(set.as_any_mut().downcast_mut::<Listeners<u32>>().is_none());
    }
}
