//=========================================================================
// Pool Handle
//=========================================================================

//=== Internal Dependencies ===============================================

use super::resource::PoolKey;

//=== PoolHandle ==========================================================

/// Reference to a checked-out instance.
///
/// The handle carries its own key, so release never needs the key passed
/// separately. It stays valid until the instance is released, stolen, or
/// the registry is reset.
///
/// # Aliasing after a steal
///
/// When the ceiling forces a steal, the new holder receives a handle equal
/// to the one the previous holder still has. Both address the same
/// instance and nothing notifies the previous holder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolHandle<K: PoolKey> {
    key: K,
    slot: usize,
    epoch: u64,
}

impl<K: PoolKey> PoolHandle<K> {
    pub(crate) fn new(key: K, slot: usize, epoch: u64) -> Self {
        Self { key, slot, epoch }
    }

    /// Key of the pool this instance belongs to.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Slot index within the key's entry.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Registry epoch the handle was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
