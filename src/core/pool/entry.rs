//=========================================================================
// Pool Entry
//=========================================================================
//
// Bookkeeping for a single pool key.
//
// Architecture:
//   instances: Vec<T>          slot storage, never shrinks
//   idle:      Vec<usize>      LIFO stack of slots
//   in_use:    VecDeque<usize> oldest acquisition at the front
//
// Every slot is in exactly one of `idle` or `in_use`, so
// idle.len() + in_use.len() == instances.len() at all times.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::error::{PoolError, PoolResult};
use super::group::PoolGroup;
use super::resource::{PoolKey, Poolable};

//=== SlotState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    InUse,
}

//=== PoolStats ===========================================================

/// Lifetime counters for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances produced by the factory.
    pub created: u64,
    /// Checkouts served from the idle stack.
    pub reused: u64,
    /// Checkouts served by reclaiming the oldest in-use instance.
    pub stolen: u64,
    /// Successful releases back to idle.
    pub released: u64,
}

//=== PoolEntry ===========================================================

/// Idle/in-use bookkeeping for one pool key.
///
/// Owns every instance ever created for the key. Instances are never
/// dropped individually; the whole entry goes away on registry reset.
pub struct PoolEntry<K: PoolKey, T: Poolable> {
    key: K,
    instances: Vec<T>,
    states: Vec<SlotState>,
    idle: Vec<usize>,
    in_use: VecDeque<usize>,
    group: Option<PoolGroup>,
    stats: PoolStats,
}

impl<K: PoolKey, T: Poolable> PoolEntry<K, T> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty entry.
    ///
    /// `group` is `Some` only when grouping placement is enabled; released
    /// instances are attached to it.
    pub fn new(key: K, group: Option<PoolGroup>) -> Self {
        Self {
            key,
            instances: Vec::new(),
            states: Vec::new(),
            idle: Vec::new(),
            in_use: VecDeque::new(),
            group,
            stats: PoolStats::default(),
        }
    }

    //--- Pool Operations --------------------------------------------------

    /// Takes ownership of a freshly created instance and tracks it as in use.
    ///
    /// Returns the slot assigned to the instance.
    pub fn record_in_use(&mut self, instance: T) -> usize {
        let slot = self.instances.len();
        self.instances.push(instance);
        self.states.push(SlotState::InUse);
        self.in_use.push_back(slot);
        self.stats.created += 1;
        slot
    }

    /// Hands out an instance that already exists.
    ///
    /// Prefers the most recently released idle instance. With nothing idle,
    /// reclaims the instance that has been in use the longest and moves it
    /// to the back of the in-use order. The previous holder of a reclaimed
    /// instance is not notified.
    ///
    /// # Errors
    ///
    /// [`PoolError::StealInvariant`] if nothing is idle and nothing is in
    /// use, which means the entry was never given an instance.
    pub fn checkout(&mut self) -> PoolResult<usize> {
        let slot = match self.idle.pop() {
            Some(slot) => {
                self.stats.reused += 1;
                slot
            }
            None => {
                let Some(slot) = self.in_use.pop_front() else {
                    error!("Checkout for {:?} reached steal with no in-use instances", self.key);
                    return Err(PoolError::StealInvariant {
                        key: format!("{:?}", self.key),
                    });
                };
                debug!("Stealing oldest in-use instance (slot {}) for {:?}", slot, self.key);
                self.stats.stolen += 1;
                slot
            }
        };

        self.in_use.push_back(slot);
        self.states[slot] = SlotState::InUse;

        let instance = &mut self.instances[slot];
        instance.set_active(true);
        if self.group.is_some() {
            instance.detach_from_group();
        }

        Ok(slot)
    }

    /// Returns an in-use instance to the idle stack.
    ///
    /// Returns `false` without touching anything if the slot is not
    /// currently in use, so repeated releases are harmless.
    pub fn release(&mut self, slot: usize) -> bool {
        match self.states.get(slot) {
            Some(SlotState::InUse) => {}
            Some(SlotState::Idle) => {
                debug!("Slot {} of {:?} is already idle, ignoring release", slot, self.key);
                return false;
            }
            None => {
                warn!("Release of unknown slot {} for {:?} ignored", slot, self.key);
                return false;
            }
        }

        let instance = &mut self.instances[slot];
        instance.set_active(false);
        if let Some(group) = &self.group {
            instance.attach_to_group(group);
        }

        if let Some(pos) = self.in_use.iter().position(|&s| s == slot) {
            self.in_use.remove(pos);
        }
        self.idle.push(slot);
        self.states[slot] = SlotState::Idle;
        self.stats.released += 1;

        true
    }

    //--- Query API --------------------------------------------------------

    /// Key this entry tracks.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Number of idle instances.
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Number of in-use instances.
    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    /// Total instances ever created for this key.
    pub fn total_count(&self) -> usize {
        self.instances.len()
    }

    /// Whether `slot` is currently checked out.
    pub fn is_in_use(&self, slot: usize) -> bool {
        self.states.get(slot) == Some(&SlotState::InUse)
    }

    /// In-use slots, oldest acquisition first.
    pub fn in_use_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.in_use.iter().copied()
    }

    /// Idle slots, next to be reused first.
    pub fn idle_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.idle.iter().rev().copied()
    }

    /// Instance stored in `slot`.
    pub fn get(&self, slot: usize) -> Option<&T> {
        self.instances.get(slot)
    }

    /// Mutable access to the instance stored in `slot`.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.instances.get_mut(slot)
    }

    /// Grouping placement for idle instances, when enabled.
    pub fn group(&self) -> Option<&PoolGroup> {
        self.group.as_ref()
    }

    /// Lifetime counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

//=========================================================================
// Tests
//=========================================================================
