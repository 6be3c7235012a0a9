//=========================================================================
// Pool Registry
//=========================================================================
//
// Keyed entry point for the object pool.
//
// Architecture:
//   acquire(key) ─┬─ no entry ──────────────────────► factory → new entry
//                 ├─ idle == 0 && in_use < ceiling ─► factory → record_in_use
//                 └─ otherwise ─────────────────────► entry.checkout()
//                                                     (idle first, then steal)
//   release(handle) ──► entries[handle.key].release(slot)
//   reset_all()     ──► drop every entry, bump epoch
//
// The registry grows a key's pool whenever nothing is idle and the
// ceiling allows it, and only falls back to reuse or steal otherwise.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::entry::{PoolEntry, PoolStats};
use super::error::{PoolError, PoolResult};
use super::group::PoolGroup;
use super::handle::PoolHandle;
use super::resource::{PoolKey, Poolable, ResourceFactory};
use crate::core::config::PoolConfig;

//=== PoolRegistry ========================================================

/// Keyed pool of reusable instances.
///
/// Instances are created on demand by a [`ResourceFactory`], owned by the
/// registry, and lent out through [`PoolHandle`]s.
///
/// # Ceiling and stealing
///
/// Once a key has `ceiling` instances in use and none idle, further
/// acquisitions reclaim the instance that has been in use the longest.
/// Its previous holder keeps an identical handle and is not told. Callers
/// that acquire at the ceiling must accept that an older handle may now
/// address an instance someone else is using.
///
/// # Threading
///
/// No internal locking. Share across threads by wrapping the whole
/// registry in one mutex, e.g. [`crate::core::singleton::Singleton`].
///
/// # Example
///
/// ```rust
/// use recycler::core::pool::{PoolRegistry, Poolable};
///
/// struct Bullet { active: bool }
///
/// impl Poolable for Bullet {
///     fn set_active(&mut self, active: bool) { self.active = active; }
/// }
///
/// let mut pools: PoolRegistry<&'static str, Bullet> =
///     PoolRegistry::new(|_key: &&'static str| Bullet { active: false });
///
/// let handle = pools.acquire("Bullet").unwrap();
/// assert!(pools.get(&handle).unwrap().active);
///
/// pools.release(&handle).unwrap();
/// assert_eq!(pools.idle_count(&"Bullet"), 1);
/// ```
pub struct PoolRegistry<K: PoolKey, T: Poolable> {
    entries: HashMap<K, PoolEntry<K, T>>,
    factory: Box<dyn ResourceFactory<K, T>>,
    config: PoolConfig,
    root_group: Option<PoolGroup>,
    epoch: u64,
}

impl<K: PoolKey, T: Poolable> PoolRegistry<K, T> {
    //--- Construction -----------------------------------------------------

    /// Creates a registry with default configuration.
    pub fn new<F>(factory: F) -> Self
    where
        F: ResourceFactory<K, T> + 'static,
    {
        Self::with_config(factory, PoolConfig::default())
    }

    /// Creates a registry with explicit configuration.
    pub fn with_config<F>(factory: F, config: PoolConfig) -> Self
    where
        F: ResourceFactory<K, T> + 'static,
    {
        debug!(
            "Creating pool registry (ceiling: {}, grouping: {})",
            config.default_ceiling, config.grouping_enabled
        );

        Self {
            entries: HashMap::new(),
            factory: Box::new(factory),
            config,
            root_group: None,
            epoch: 0,
        }
    }

    //--- Pool Operations --------------------------------------------------

    /// Acquires an instance for `key` using the configured default ceiling.
    ///
    /// See [`PoolRegistry::acquire_with_ceiling`].
    pub fn acquire(&mut self, key: K) -> PoolResult<PoolHandle<K>> {
        let ceiling = self.config.default_ceiling;
        self.acquire_with_ceiling(key, ceiling)
    }

    /// Acquires an instance for `key`, creating one while the key has
    /// nothing idle and fewer than `ceiling` instances in use.
    ///
    /// Otherwise reuses the most recently released instance, or steals the
    /// oldest in-use one if nothing is idle.
    ///
    /// # Errors
    ///
    /// - [`PoolError::Factory`] if creation fails; the registry is unchanged.
    /// - [`PoolError::StealInvariant`] if an entry's bookkeeping is corrupt.
    pub fn acquire_with_ceiling(&mut self, key: K, ceiling: usize) -> PoolResult<PoolHandle<K>> {
        if self.config.grouping_enabled && self.root_group.is_none() {
            self.root_group = Some(PoolGroup::root(self.config.root_group_name.clone()));
        }

        let slot = match self.entries.get_mut(&key) {
            Some(entry) if entry.idle_count() > 0 || entry.in_use_count() >= ceiling => {
                entry.checkout()?
            }
            Some(entry) => {
                let instance = Self::create_active(self.factory.as_mut(), &key)?;
                entry.record_in_use(instance)
            }
            None => {
                let instance = Self::create_active(self.factory.as_mut(), &key)?;
                debug!("Registering pool for {:?}", key);
                let mut entry = PoolEntry::new(key.clone(), self.group_for(&key));
                let slot = entry.record_in_use(instance);
                self.entries.insert(key.clone(), entry);
                slot
            }
        };

        Ok(PoolHandle::new(key, slot, self.epoch))
    }

    /// Returns the instance behind `handle` to its key's idle stack.
    ///
    /// Returns `Ok(false)` if the instance was not in use (already
    /// released), leaving the pool untouched.
    ///
    /// # Errors
    ///
    /// - [`PoolError::StaleHandle`] if the handle predates the last reset.
    /// - [`PoolError::UnknownKey`] if no pool exists for the handle's key.
    pub fn release(&mut self, handle: &PoolHandle<K>) -> PoolResult<bool> {
        self.check_epoch(handle)?;

        let Some(entry) = self.entries.get_mut(handle.key()) else {
            error!("Release for unregistered pool key {:?}", handle.key());
            return Err(PoolError::UnknownKey {
                key: format!("{:?}", handle.key()),
            });
        };

        Ok(entry.release(handle.slot()))
    }

    /// Drops every pool and every instance.
    ///
    /// Handles issued before the reset become stale. Calling this on an
    /// empty registry is harmless.
    pub fn reset_all(&mut self) {
        debug!(
            "Resetting pool registry ({} keys, epoch {})",
            self.entries.len(),
            self.epoch
        );
        self.entries.clear();
        self.root_group = None;
        self.epoch += 1;
    }

    //--- Instance Access --------------------------------------------------

    /// Instance behind `handle`, if the handle is current.
    pub fn get(&self, handle: &PoolHandle<K>) -> Option<&T> {
        if handle.epoch() != self.epoch {
            return None;
        }
        self.entries.get(handle.key())?.get(handle.slot())
    }

    /// Mutable access to the instance behind `handle`.
    pub fn get_mut(&mut self, handle: &PoolHandle<K>) -> Option<&mut T> {
        if handle.epoch() != self.epoch {
            return None;
        }
        self.entries.get_mut(handle.key())?.get_mut(handle.slot())
    }

    //--- Query API --------------------------------------------------------

    /// Idle instances for `key` (0 if unregistered).
    pub fn idle_count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, PoolEntry::idle_count)
    }

    /// In-use instances for `key` (0 if unregistered).
    pub fn in_use_count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, PoolEntry::in_use_count)
    }

    /// Instances ever created for `key` since the last reset.
    pub fn total_count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, PoolEntry::total_count)
    }

    /// Lifetime counters for `key`.
    pub fn stats(&self, key: &K) -> Option<PoolStats> {
        self.entries.get(key).map(PoolEntry::stats)
    }

    /// Read-only view of the entry for `key`.
    pub fn entry(&self, key: &K) -> Option<&PoolEntry<K, T>> {
        self.entries.get(key)
    }

    /// Whether a pool exists for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Root group, created lazily on first acquire when grouping is on.
    pub fn root_group(&self) -> Option<&PoolGroup> {
        self.root_group.as_ref()
    }

    /// Current epoch; bumped by every reset.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_active(factory: &mut dyn ResourceFactory<K, T>, key: &K) -> PoolResult<T> {
        let mut instance = factory.create(key).map_err(|e| {
            warn!("Resource factory failed for {:?}: {}", key, e);
            e
        })?;
        instance.set_active(true);
        Ok(instance)
    }

    fn group_for(&self, key: &K) -> Option<PoolGroup> {
        self.root_group
            .as_ref()
            .map(|root| PoolGroup::child_of(root, group_name(key)))
    }

    fn check_epoch(&self, handle: &PoolHandle<K>) -> PoolResult<()> {
        if handle.epoch() == self.epoch {
            return Ok(());
        }
        warn!(
            "Stale handle for {:?} (epoch {}, current {})",
            handle.key(),
            handle.epoch(),
            self.epoch
        );
        Err(PoolError::StaleHandle {
            key: format!("{:?}", handle.key()),
            epoch: handle.epoch(),
            current: self.epoch,
        })
    }
}

/// Group names drop the quotes `Debug` puts around string keys.
fn group_name<K: Debug>(key: &K) -> String {
    format!("{:?}", key).trim_matches('"').to_string()
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pool::FallibleFactory;

    #[derive(Debug)]
    struct Bullet {
        serial: u32,
        active: bool,
        group: Option<String>,
    }

    impl Poolable for Bullet {
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn attach_to_group(&mut self, group: &PoolGroup) {
            self.group = Some(group.path());
        }

        fn detach_from_group(&mut self) {
            self.group = None;
        }
    }

    fn counting_factory() -> impl FnMut(&&'static str) -> Bullet + Send {
        let mut next = 0;
        move |_key: &&'static str| {
            next += 1;
            Bullet {
                serial: next,
                active: false,
                group: None,
            }
        }
    }

    fn registry() -> PoolRegistry<&'static str, Bullet> {
        PoolRegistry::new(counting_factory())
    }

    fn serial(pools: &PoolRegistry<&'static str, Bullet>, handle: &PoolHandle<&'static str>) -> u32 {
        pools.get(handle).unwrap().serial
    }

    //--- acquire ----------------------------------------------------------

    #[test]
    fn first_acquire_registers_key_and_creates() {
        let mut pools = registry();
        let handle = pools.acquire("Bullet").unwrap();

        assert!(pools.contains_key(&"Bullet"));
        assert_eq!(pools.in_use_count(&"Bullet"), 1);
        assert_eq!(pools.idle_count(&"Bullet"), 0);
        assert_eq!(serial(&pools, &handle), 1);
        assert!(pools.get(&handle).unwrap().active, "New instances are handed out active");
    }

    #[test]
    fn grows_until_ceiling_without_releases() {
        let mut pools = registry();
        for expected in 1..=5 {
            let handle = pools.acquire_with_ceiling("Bullet", 5).unwrap();
            assert_eq!(serial(&pools, &handle), expected);
        }
        assert_eq!(pools.total_count(&"Bullet"), 5);
        assert_eq!(pools.stats(&"Bullet").unwrap().created, 5);
    }

    #[test]
    fn ceiling_reached_steals_first_acquired() {
        let mut pools = registry();
        let first = pools.acquire_with_ceiling("Bullet", 3).unwrap();
        pools.acquire_with_ceiling("Bullet", 3).unwrap();
        pools.acquire_with_ceiling("Bullet", 3).unwrap();

        let stolen = pools.acquire_with_ceiling("Bullet", 3).unwrap();
        assert_eq!(stolen, first, "Over-ceiling acquire should reclaim the oldest instance");
        assert_eq!(serial(&pools, &stolen), 1);
        assert_eq!(pools.total_count(&"Bullet"), 3);
        assert_eq!(pools.stats(&"Bullet").unwrap().stolen, 1);
    }

    #[test]
    fn idle_instance_reused_before_creating() {
        let mut pools = registry();
        let a = pools.acquire("Bullet").unwrap();
        pools.acquire("Bullet").unwrap();
        pools.release(&a).unwrap();

        let again = pools.acquire("Bullet").unwrap();
        assert_eq!(again, a);
        assert_eq!(serial(&pools, &again), 1);
        assert_eq!(pools.total_count(&"Bullet"), 2);
    }

    #[test]
    fn keys_are_pooled_independently() {
        let mut pools = registry();
        pools.acquire_with_ceiling("Bullet", 1).unwrap();
        pools.acquire_with_ceiling("Spark", 1).unwrap();

        assert_eq!(pools.len(), 2);
        assert_eq!(pools.in_use_count(&"Bullet"), 1);
        assert_eq!(pools.in_use_count(&"Spark"), 1);

        let mut keys: Vec<_> = pools.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["Bullet", "Spark"]);
    }

    #[test]
    fn zero_ceiling_behaves_like_one() {
        let mut pools = registry();
        let a = pools.acquire_with_ceiling("Bullet", 0).unwrap();
        let b = pools.acquire_with_ceiling("Bullet", 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(pools.total_count(&"Bullet"), 1);
    }

    #[test]
    fn default_ceiling_comes_from_config() {
        let mut pools =
            PoolRegistry::with_config(counting_factory(), PoolConfig::new().with_default_ceiling(2));
        let a = pools.acquire("Bullet").unwrap();
        pools.acquire("Bullet").unwrap();
        assert_eq!(pools.acquire("Bullet").unwrap(), a);
    }

    #[test]
    fn factory_failure_leaves_registry_unchanged() {
        let mut pools: PoolRegistry<&'static str, Bullet> =
            PoolRegistry::new(FallibleFactory(|key: &&'static str| -> PoolResult<Bullet> {
                Err(PoolError::Factory {
                    key: format!("{:?}", key),
                    reason: "asset not found".to_string(),
                })
            }));

        let result = pools.acquire("Missing");
        assert!(matches!(result, Err(PoolError::Factory { .. })));
        assert!(pools.is_empty());
    }

    //--- release ----------------------------------------------------------

    #[test]
    fn acquire_release_round_trip_restores_counts() {
        let mut pools = registry();
        let warm = pools.acquire("Bullet").unwrap();
        pools.acquire("Bullet").unwrap();
        pools.release(&warm).unwrap();

        let before = (pools.idle_count(&"Bullet"), pools.in_use_count(&"Bullet"));
        let handle = pools.acquire("Bullet").unwrap();
        pools.release(&handle).unwrap();
        let after = (pools.idle_count(&"Bullet"), pools.in_use_count(&"Bullet"));

        assert_eq!(before, after);
    }

    #[test]
    fn release_deactivates_instance() {
        let mut pools = registry();
        let handle = pools.acquire("Bullet").unwrap();
        assert_eq!(pools.release(&handle), Ok(true));
        assert!(!pools.get(&handle).unwrap().active);
    }

    #[test]
    fn double_release_is_tolerated() {
        let mut pools = registry();
        let handle = pools.acquire("Bullet").unwrap();
        assert_eq!(pools.release(&handle), Ok(true));
        assert_eq!(pools.release(&handle), Ok(false));
        assert_eq!(pools.idle_count(&"Bullet"), 1);
        assert_eq!(pools.in_use_count(&"Bullet"), 0);
    }

    #[test]
    fn release_unknown_key_fails_without_registering() {
        let mut other = registry();
        let foreign = other.acquire("Ghost").unwrap();

        let mut pools = registry();
        assert_eq!(
            pools.release(&foreign),
            Err(PoolError::UnknownKey {
                key: "\"Ghost\"".to_string()
            })
        );
        assert!(!pools.contains_key(&"Ghost"), "Failed release must not create a pool");
    }

    //--- reset ------------------------------------------------------------

    #[test]
    fn reset_forgets_every_key() {
        let mut pools = registry();
        pools.acquire("Bullet").unwrap();
        pools.acquire("Spark").unwrap();

        pools.reset_all();
        assert!(pools.is_empty());
        assert_eq!(pools.idle_count(&"Bullet"), 0);

        let fresh = pools.acquire("Bullet").unwrap();
        assert_eq!(serial(&pools, &fresh), 3, "Post-reset acquire should create a new instance");
        assert_eq!(pools.stats(&"Bullet").unwrap().created, 1);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut pools = registry();
        pools.reset_all();
        pools.reset_all();
        assert!(pools.is_empty());
        assert_eq!(pools.epoch(), 2);
    }

    #[test]
    fn handles_from_before_reset_are_stale() {
        let mut pools = registry();
        let old = pools.acquire("Bullet").unwrap();
        pools.reset_all();
        pools.acquire("Bullet").unwrap();

        assert!(pools.get(&old).is_none());
        assert_eq!(
            pools.release(&old),
            Err(PoolError::StaleHandle {
                key: "\"Bullet\"".to_string(),
                epoch: 0,
                current: 1,
            })
        );
        assert_eq!(pools.in_use_count(&"Bullet"), 1);
    }

    //--- invariants -------------------------------------------------------

    #[test]
    fn totals_never_decrease() {
        let mut pools = registry();
        let mut held = Vec::new();
        let mut last_total = 0;

        for step in 0..40 {
            if step % 3 == 2 {
                if let Some(handle) = held.pop() {
                    pools.release(&handle).unwrap();
                }
            } else {
                held.push(pools.acquire_with_ceiling("Bullet", 4).unwrap());
            }

            let total = pools.idle_count(&"Bullet") + pools.in_use_count(&"Bullet");
            assert!(total >= last_total, "Instance count shrank at step {}", step);
            assert!(pools.in_use_count(&"Bullet") <= 4);
            last_total = total;
        }
    }

    #[test]
    fn bullet_scenario_with_ceiling_two() {
        let mut pools = registry();

        let a = pools.acquire_with_ceiling("Bullet", 2).unwrap();
        let b = pools.acquire_with_ceiling("Bullet", 2).unwrap();
        let entry = pools.entry(&"Bullet").unwrap();
        assert_eq!(entry.in_use_slots().collect::<Vec<_>>(), vec![a.slot(), b.slot()]);

        let c = pools.acquire_with_ceiling("Bullet", 2).unwrap();
        assert_eq!(c, a, "Third acquire should steal A");
        let entry = pools.entry(&"Bullet").unwrap();
        assert_eq!(entry.in_use_slots().collect::<Vec<_>>(), vec![b.slot(), a.slot()]);

        pools.release(&b).unwrap();
        let entry = pools.entry(&"Bullet").unwrap();
        assert_eq!(entry.idle_slots().collect::<Vec<_>>(), vec![b.slot()]);
        assert_eq!(entry.in_use_slots().collect::<Vec<_>>(), vec![a.slot()]);

        let d = pools.acquire_with_ceiling("Bullet", 2).unwrap();
        assert_eq!(d, b, "Idle B should be reused before stealing");
        let entry = pools.entry(&"Bullet").unwrap();
        assert_eq!(entry.in_use_slots().collect::<Vec<_>>(), vec![a.slot(), b.slot()]);
        assert_eq!(entry.idle_count(), 0);
    }

    //--- grouping ---------------------------------------------------------

    #[test]
    fn grouping_places_idle_instances_under_key_group() {
        let mut pools =
            PoolRegistry::with_config(counting_factory(), PoolConfig::new().with_grouping(true));
        let handle = pools.acquire("Bullet").unwrap();

        assert_eq!(pools.root_group().map(PoolGroup::name), Some("Pool"));
        assert_eq!(
            pools.entry(&"Bullet").unwrap().group().map(PoolGroup::path),
            Some("Pool/Bullet".to_string())
        );

        pools.release(&handle).unwrap();
        assert_eq!(pools.get(&handle).unwrap().group.as_deref(), Some("Pool/Bullet"));

        pools.acquire("Bullet").unwrap();
        assert_eq!(pools.get(&handle).unwrap().group, None);
    }

    #[test]
    fn grouping_off_creates_no_groups() {
        let mut pools = registry();
        let handle = pools.acquire("Bullet").unwrap();
        pools.release(&handle).unwrap();

        assert!(pools.root_group().is_none());
        assert!(pools.entry(&"Bullet").unwrap().group().is_none());
        assert_eq!(pools.get(&handle).unwrap().group, None);
    }

    #[test]
    fn reset_drops_root_group() {
        let mut pools =
            PoolRegistry::with_config(counting_factory(), PoolConfig::new().with_grouping(true));
        pools.acquire("Bullet").unwrap();
        pools.reset_all();
        assert!(pools.root_group().is_none());
    }
}
