//=========================================================================
// Singleton
//=========================================================================
//
// Lazily-constructed, process-wide shared instance.
//
//   static POOLS: Singleton<T> = Singleton::new();
//   POOLS.get_or_init(|| ...)  → constructs once, returns a guard
//   POOLS.instance()           → same, for T: Default
//
// Construction runs at most once even under contention. Every access
// goes through one mutex, which is also the coarse lock callers need to
// share a pool registry across threads.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::type_name;
use std::sync::OnceLock;

use log::debug;
use parking_lot::{Mutex, MutexGuard};

//=== Singleton ===========================================================

/// Holder for a single shared instance created on first access.
///
/// # Example
///
/// ```rust
/// use recycler::core::events::EventCenter;
/// use recycler::core::singleton::Singleton;
///
/// static EVENTS: Singleton<EventCenter> = Singleton::new();
///
/// EVENTS.instance().add_unit_listener("Ready", || {}).unwrap();
/// assert_eq!(EVENTS.instance().listener_count("Ready"), 1);
/// ```
pub struct Singleton<T> {
    cell: OnceLock<Mutex<T>>,
}

impl<T> Singleton<T> {
    /// Creates an empty holder. Usable in `static` items.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Locks the shared instance, constructing it with `init` on first access.
    ///
    /// `init` is ignored once the instance exists.
    pub fn get_or_init<F>(&self, init: F) -> MutexGuard<'_, T>
    where
        F: FnOnce() -> T,
    {
        self.cell
            .get_or_init(|| {
                debug!("Initializing singleton {}", type_name::<T>());
                Mutex::new(init())
            })
            .lock()
    }

    /// Locks the shared instance if it has been constructed.
    pub fn get(&self) -> Option<MutexGuard<'_, T>> {
        self.cell.get().map(|mutex| mutex.lock())
    }

    /// Returns true once the instance has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Default> Singleton<T> {
    /// Locks the shared instance, default-constructing it on first access.
    pub fn instance(&self) -> MutexGuard<'_, T> {
        self.get_or_init(T::default)
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
