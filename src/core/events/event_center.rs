//=========================================================================
// Event Center
//=========================================================================
//
// Named publish/subscribe registry with typed payloads.
//
// Architecture:
//   add_listener<P>(name) → HashMap<String, Box<dyn ListenerSet>>
//                                      ↓ (bound to P on first use)
//   trigger<P>(name, &P)  → downcast → every listener, in order
//
// Each event name is bound to one payload type. Using the name with a
// different type fails with EventError::TypeMismatch.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::listener_set::{ListenerSet, Listeners};
use crate::core::listener::{ListenerId, ListenerIds};

//=== Public API ==========================================================

/// Marker trait for event payload types.
///
/// Automatically implemented for all `'static` types.
pub trait Payload: 'static {}

// Blanket implementation
impl<T: 'static> Payload for T {}

/// Errors raised by the [`EventCenter`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The event name is bound to a different payload type.
    #[error("event '{event}' carries {expected}, not {found}")]
    TypeMismatch {
        /// Event name.
        event: String,
        /// Payload type the event is bound to.
        expected: &'static str,
        /// Payload type that was used.
        found: &'static str,
    },
}

/// Result type for event operations.
pub type EventResult<T> = Result<T, EventError>;

//=========================================================================

/// Named event registry with type-checked payloads.
///
/// # Example
///
/// ```rust
/// use recycler::core::events::EventCenter;
///
/// let mut events = EventCenter::new();
///
/// let id = events
///     .add_listener("ScoreChanged", |score: &u32| println!("score: {}", score))
///     .unwrap();
///
/// assert_eq!(events.trigger("ScoreChanged", &10u32), Ok(1));
/// assert!(events.trigger("ScoreChanged", &"ten").is_err());
///
/// events.remove_listener("ScoreChanged", id);
/// ```
#[derive(Default)]
pub struct EventCenter {
    events: HashMap<String, Box<dyn ListenerSet>>,
    ids: ListenerIds,
}

impl EventCenter {
    /// Creates an empty event center.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers `listener` for events named `name` carrying `P`.
    ///
    /// The first registration binds `name` to `P`.
    ///
    /// # Errors
    ///
    /// [`EventError::TypeMismatch`] if `name` is already bound to another
    /// payload type.
    pub fn add_listener<P, F>(&mut self, name: impl Into<String>, listener: F) -> EventResult<ListenerId>
    where
        P: Payload,
        F: FnMut(&P) + Send + 'static,
    {
        let name = name.into();
        let set = self
            .events
            .entry(name.clone())
            .or_insert_with(|| Box::new(Listeners::<P>::new()));

        let listeners = downcast_mut::<P>(set.as_mut(), &name)?;
        let id = self.ids.next();
        listeners.push(id, Box::new(listener));

        debug!("Listener {:?} added to event '{}'", id, name);
        Ok(id)
    }

    /// Registers a listener for a payload-less event.
    pub fn add_unit_listener<F>(&mut self, name: impl Into<String>, mut listener: F) -> EventResult<ListenerId>
    where
        F: FnMut() + Send + 'static,
    {
        self.add_listener(name, move |_: &()| listener())
    }

    /// Unregisters listener `id` from `name`.
    ///
    /// Returns whether the listener was found. The event keeps its payload
    /// binding even when its last listener is removed.
    pub fn remove_listener(&mut self, name: &str, id: ListenerId) -> bool {
        self.events
            .get_mut(name)
            .map(|set| set.remove(id))
            .unwrap_or(false)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Invokes every listener registered for `name` with `payload`.
    ///
    /// Returns the number of listeners invoked; unknown names invoke none.
    ///
    /// # Errors
    ///
    /// [`EventError::TypeMismatch`] if `name` is bound to another payload type.
    pub fn trigger<P: Payload>(&mut self, name: &str, payload: &P) -> EventResult<usize> {
        let Some(set) = self.events.get_mut(name) else {
            return Ok(0);
        };

        let listeners = downcast_mut::<P>(set.as_mut(), name).map_err(|e| {
            warn!("{}", e);
            e
        })?;

        Ok(listeners.invoke(payload))
    }

    /// Triggers a payload-less event.
    pub fn trigger_unit(&mut self, name: &str) -> EventResult<usize> {
        self.trigger(name, &())
    }

    //--- Cleanup ----------------------------------------------------------

    /// Removes every event and listener.
    pub fn clear(&mut self) {
        debug!("Clearing {} events", self.events.len());
        self.events.clear();
    }

    /// Removes one event, unbinding its payload type.
    ///
    /// Returns whether the event existed.
    pub fn clear_event(&mut self, name: &str) -> bool {
        self.events.remove(name).is_some()
    }

    //--- Query API --------------------------------------------------------

    /// Number of listeners registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.events.get(name).map_or(0, |set| set.len())
    }

    /// Returns true if `name` has been registered.
    pub fn contains_event(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Payload type `name` is bound to.
    pub fn payload_type(&self, name: &str) -> Option<&'static str> {
        self.events.get(name).map(|set| set.payload_type())
    }

    /// Number of registered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no event is registered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=== Internal Helpers ====================================================

fn downcast_mut<'a, P: Payload>(set: &'a mut dyn ListenerSet, name: &str) -> EventResult<&'a mut Listeners<P>> {
    let expected = set.payload_type();
    set.as_any_mut()
        .downcast_mut::<Listeners<P>>()
        .ok_or_else(|| EventError::TypeMismatch {
            event: name.to_string(),
            expected,
            found: type_name::<P>(),
        })
}

//=========================================================================
// Tests
//=========================================================================
