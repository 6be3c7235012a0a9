//=========================================================================
// Core Systems
//
// All runtime subsystems of the crate.
//
// Responsibilities:
// - Recycle expensive instances per key (`pool`)
// - Route named, typed events to listeners (`events`)
// - Run per-frame callbacks in fixed phase order (`frame`)
// - Provide lazily-created shared instances (`singleton`)
//
// Notes:
// `pool` stands alone. `events` and `frame` are callback registries with
// no knowledge of pooling; `singleton` is the glue that lets any of them
// be shared process-wide behind one lock.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
pub mod events;
pub mod frame;
pub mod pool;
pub mod singleton;

mod listener;

//=== Public API ==========================================================

pub use config::{ConfigError, PoolConfig};
pub use listener::ListenerId;
