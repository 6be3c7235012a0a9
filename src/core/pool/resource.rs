//=========================================================================
// Pool Collaborators
//=========================================================================
//
// Traits the pool relies on but does not implement itself:
//
//   PoolKey          identifies a class of interchangeable instances
//   Poolable         activation + grouping hooks on an instance
//   ResourceFactory  produces a new instance for a key
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use super::error::PoolResult;
use super::group::PoolGroup;

//=== PoolKey =============================================================

/// Marker trait for pool keys.
///
/// Automatically implemented for every `Clone + Eq + Hash + Debug + Send`
/// type, so `String`, `&'static str` and game-specific enums all qualify.
pub trait PoolKey: Clone + Eq + Hash + Debug + Send + 'static {}

// Blanket implementation
impl<T: Clone + Eq + Hash + Debug + Send + 'static> PoolKey for T {}

//=== Poolable ============================================================

/// Hooks the pool calls when an instance changes hands.
///
/// Only `set_active` is required. Grouping hooks are no-ops unless the
/// instance cares about where it is placed while idle.
///
/// ```rust
/// use recycler::core::pool::Poolable;
///
/// struct Bullet { visible: bool }
///
/// impl Poolable for Bullet {
///     fn set_active(&mut self, active: bool) {
///         self.visible = active;
///     }
/// }
/// ```
pub trait Poolable: Send + 'static {
    /// Toggled `true` on checkout and `false` on release.
    fn set_active(&mut self, active: bool);

    /// Called on release when grouping is enabled.
    fn attach_to_group(&mut self, _group: &PoolGroup) {}

    /// Called on checkout when grouping is enabled.
    fn detach_from_group(&mut self) {}
}

//=== ResourceFactory =====================================================

/// Produces new instances for a key.
///
/// Invoked exactly once per creation decision. Implemented for any
/// `FnMut(&K) -> T` closure; wrap a fallible closure in
/// [`FallibleFactory`] to surface creation errors.
pub trait ResourceFactory<K: PoolKey, T>: Send {
    /// Creates one new instance for `key`.
    fn create(&mut self, key: &K) -> PoolResult<T>;
}

impl<K, T, F> ResourceFactory<K, T> for F
where
    K: PoolKey,
    F: FnMut(&K) -> T + Send,
{
    fn create(&mut self, key: &K) -> PoolResult<T> {
        Ok(self(key))
    }
}

/// Adapter for factories that can fail, e.g. an asset lookup miss.
pub struct FallibleFactory<F>(pub F);

impl<K, T, F> ResourceFactory<K, T> for FallibleFactory<F>
where
    K: PoolKey,
    F: FnMut(&K) -> PoolResult<T> + Send,
{
    fn create(&mut self, key: &K) -> PoolResult<T> {
        (self.0)(key)
    }
}

//=========================================================================
// Tests
//=========================================================================
