//=========================================================================
// Recycler - Library Root
//
// Keyed object recycling for frame-driven applications.
//
// Responsibilities:
// - Expose the pool registry as the main entry point
// - Expose the supporting event, frame and singleton utilities
// - Keep the listener id plumbing internal
//
// Typical usage:
// ```no_run
// use recycler::prelude::*;
//
// struct Bullet { active: bool }
// impl Poolable for Bullet {
//     fn set_active(&mut self, active: bool) { self.active = active; }
// }
//
// let mut pools: PoolRegistry<&'static str, Bullet> =
//     PoolRegistry::new(|_: &&'static str| Bullet { active: false });
// let bullet = pools.acquire("Bullet").unwrap();
// pools.release(&bullet).unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains every subsystem. Most applications only need the
// prelude.
//
pub mod core;
pub mod prelude;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the pool registry so users can `use recycler::PoolRegistry;`
// without knowing the module layout.
//
pub use crate::core::pool::{PoolHandle, PoolRegistry};
