//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use recycler::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Object pool
pub use crate::core::pool::{
    FallibleFactory, PoolError, PoolHandle, PoolKey, PoolRegistry, Poolable, ResourceFactory,
};

// Configuration
pub use crate::core::config::PoolConfig;

// Events
pub use crate::core::events::{EventCenter, EventError};

// Frame phases
pub use crate::core::frame::{FrameDispatcher, FrameDriverBuilder, FramePhase, FrameTick};

// Shared instances
pub use crate::core::singleton::Singleton;

// Listener identity
pub use crate::core::ListenerId;
