//=========================================================================
// Event System
//=========================================================================
//
// Named publish/subscribe with typed payloads.
//
// Pattern: add_listener → trigger (N listeners) → remove_listener
//
//=========================================================================

//=== Module Declarations =================================================

mod event_center;
mod listener_set;

//=== Public API ==========================================================

pub use event_center::{EventCenter, EventError, EventResult, Payload};
