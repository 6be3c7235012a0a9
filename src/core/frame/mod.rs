//=========================================================================
// Frame System
//=========================================================================
//
// Per-frame callback dispatch driven by a fixed-rate loop.
//
// Architecture:
//   FrameDriver (tick thread @ TPS)
//     └─► FrameDispatcher::run_frame()
//           ├─ FixedUpdate × N   (fixed-step accumulator)
//           ├─ Update
//           └─ LateUpdate
//
// The pool has no dependency on this module.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Module Declarations =================================================

mod dispatcher;
mod driver;

//=== Public API ==========================================================

pub use dispatcher::FrameDispatcher;
pub use driver::{DriverError, DriverHandle, DriverReport, FrameDriver, FrameDriverBuilder};

//=== FramePhase ==========================================================

/// One of the three ordered phases of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Runs zero or more times per frame at the fixed step rate.
    FixedUpdate,

    /// Runs once per frame.
    Update,

    /// Runs once per frame after every update listener.
    LateUpdate,
}

impl FramePhase {
    /// All phases in execution order.
    pub const ALL: [FramePhase; 3] = [Self::FixedUpdate, Self::Update, Self::LateUpdate];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::FixedUpdate => 0,
            Self::Update => 1,
            Self::LateUpdate => 2,
        }
    }
}

//=== FrameTick ===========================================================

/// Timing information passed to every frame listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frame counter, starting at 0.
    pub frame: u64,

    /// Wall time since the previous frame.
    pub delta: Duration,

    /// Length of one fixed step.
    pub fixed_delta: Duration,
}

impl FrameTick {
    /// Creates a tick for `frame`.
    pub fn new(frame: u64, delta: Duration, fixed_delta: Duration) -> Self {
        Self {
            frame,
            delta,
            fixed_delta,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_ordered() {
        let indices: Vec<usize> = FramePhase::ALL.iter().map(|phase| phase.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(FramePhase::ALL[0], FramePhase::FixedUpdate);
        assert_eq!(FramePhase::ALL[2], FramePhase::LateUpdate);
    }
}
