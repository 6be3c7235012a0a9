//=========================================================================
// Object Pool
//=========================================================================
//
// Keyed recycling of expensive-to-create instances.
//
// Architecture:
//   PoolRegistry
//     ├─ entries: HashMap<K, PoolEntry<K, T>>
//     │     ├─ idle:   Vec<slot>       (LIFO)
//     │     └─ in_use: VecDeque<slot>  (oldest first)
//     └─ factory: Box<dyn ResourceFactory<K, T>>
//
// Flow:
//   acquire → create | reuse idle | steal oldest → PoolHandle
//   release(PoolHandle) → idle
//
//=========================================================================

//=== Module Declarations =================================================

mod entry;
mod error;
mod group;
mod handle;
mod registry;
mod resource;

//=== Public API ==========================================================

pub use entry::{PoolEntry, PoolStats};
pub use error::{PoolError, PoolResult};
pub use group::PoolGroup;
pub use handle::PoolHandle;
pub use registry::PoolRegistry;
pub use resource::{FallibleFactory, PoolKey, Poolable, ResourceFactory};
