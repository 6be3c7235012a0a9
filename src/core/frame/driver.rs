//=========================================================================
// Frame Driver
//
// Fixed-rate loop that feeds a FrameDispatcher.
//
// Architecture:
// ```text
//     FrameDriverBuilder ──build()──> FrameDriver ──spawn()──> DriverHandle
//         │                              │                         │
//         ├─ with_tps()                  └─ step() (manual)        └─ stop()
//         ├─ with_fixed_tps()                                         joins thread,
//         └─ with_max_fixed_steps()                                   returns dispatcher
// ```
//
// Each frame:
//  1. Checks the stop channel
//  2. Accumulates elapsed time into fixed steps (capped)
//  3. Runs FixedUpdate × N, Update, LateUpdate
//  4. Waits out the rest of the frame on the stop channel
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender, TryRecvError};
use log::{error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{FrameDispatcher, FrameTick};

//=== FrameDriverBuilder ==================================================

/// Builder for configuring a [`FrameDriver`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (frames per second)
/// - **Fixed TPS**: 50.0 (fixed steps per second)
/// - **Max fixed steps**: 8 per frame
///
/// # Examples
///
/// ```no_run
/// use recycler::core::frame::{FrameDispatcher, FrameDriverBuilder, FrameTick};
///
/// let mut dispatcher = FrameDispatcher::new();
/// dispatcher.add_update_listener(|tick: &FrameTick| {
///     println!("frame {}", tick.frame);
/// });
///
/// let handle = FrameDriverBuilder::new()
///     .with_tps(120.0)
///     .build()
///     .spawn(dispatcher);
///
/// // ... later
/// let report = handle.stop().unwrap();
/// println!("ran {} frames", report.frames);
/// ```
#[derive(Debug, Clone)]
pub struct FrameDriverBuilder {
    tps: f64,
    fixed_tps: f64,
    max_fixed_steps: u32,
}

impl FrameDriverBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            fixed_tps: 50.0,
            max_fixed_steps: 8,
        }
    }

    /// Sets the target frames per second.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the fixed-update rate.
    ///
    /// Default: 50.0
    ///
    /// # Panics
    ///
    /// Panics if `fixed_tps <= 0.0`.
    pub fn with_fixed_tps(mut self, fixed_tps: f64) -> Self {
        assert!(fixed_tps > 0.0, "Fixed TPS must be positive, got {}", fixed_tps);
        self.fixed_tps = fixed_tps;
        self
    }

    /// Caps how many fixed steps a single frame may run to catch up.
    ///
    /// Default: 8
    ///
    /// # Panics
    ///
    /// Panics if `steps == 0`.
    pub fn with_max_fixed_steps(mut self, steps: u32) -> Self {
        assert!(steps > 0, "Max fixed steps must be positive");
        self.max_fixed_steps = steps;
        self
    }

    /// Builds the driver.
    pub fn build(self) -> FrameDriver {
        info!(
            "Building frame driver (TPS: {}, fixed TPS: {})",
            self.tps, self.fixed_tps
        );

        FrameDriver {
            frame_duration: Duration::from_secs_f64(1.0 / self.tps),
            fixed_delta: Duration::from_secs_f64(1.0 / self.fixed_tps),
            max_fixed_steps: self.max_fixed_steps,
            accumulator: Duration::ZERO,
            frame: 0,
        }
    }
}

impl Default for FrameDriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== FrameDriver =========================================================

/// Fixed-rate frame loop.
///
/// Use [`FrameDriver::step`] to drive frames manually (tests, external
/// loops) or [`FrameDriver::spawn`] to run on a background thread.
#[derive(Debug)]
pub struct FrameDriver {
    frame_duration: Duration,
    fixed_delta: Duration,
    max_fixed_steps: u32,
    accumulator: Duration,
    frame: u64,
}

impl FrameDriver {
    //--- Manual Stepping --------------------------------------------------

    /// Runs one frame on `dispatcher` after `elapsed` wall time.
    ///
    /// Elapsed time is banked into fixed steps. When more than the step cap
    /// is owed, the backlog is dropped rather than carried forward.
    pub fn step(&mut self, dispatcher: &mut FrameDispatcher, elapsed: Duration) -> FrameTick {
        self.accumulator += elapsed;

        let mut fixed_steps = 0;
        while self.accumulator >= self.fixed_delta && fixed_steps < self.max_fixed_steps {
            self.accumulator -= self.fixed_delta;
            fixed_steps += 1;
        }

        if self.accumulator >= self.fixed_delta {
            warn!(
                "Fixed update falling behind on frame {}: dropping {:?}",
                self.frame, self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        let tick = FrameTick::new(self.frame, elapsed, self.fixed_delta);
        dispatcher.run_frame(&tick, fixed_steps);
        self.frame += 1;

        tick
    }

    //--- Background Execution ---------------------------------------------

    /// Moves `dispatcher` onto a new thread and runs frames at the
    /// configured rate until [`DriverHandle::stop`] is called.
    pub fn spawn(mut self, mut dispatcher: FrameDispatcher) -> DriverHandle {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let frame_duration = self.frame_duration;

        let thread = thread::spawn(move || {
            let mut last_frame = Instant::now();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Check for shutdown ----------------------------
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                //--- Step 2: Run frame phases -------------------------------
                let elapsed = frame_start.duration_since(last_frame);
                last_frame = frame_start;
                self.step(&mut dispatcher, elapsed);

                //--- Step 3: Maintain pacing --------------------------------
                let spent = frame_start.elapsed();
                if spent < frame_duration {
                    match stop_rx.recv_timeout(frame_duration - spent) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }
                }
            }

            info!("Frame driver exiting after {} frames", self.frame);
            DriverReport {
                dispatcher,
                frames: self.frame,
            }
        });

        info!("Frame driver thread spawned");
        DriverHandle { stop: stop_tx, thread }
    }

    //--- Query API --------------------------------------------------------

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Target duration of one frame.
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Duration of one fixed step.
    pub fn fixed_delta(&self) -> Duration {
        self.fixed_delta
    }
}

//=== DriverHandle ========================================================

/// Errors raised when stopping a spawned driver.
#[derive(Error, Debug)]
pub enum DriverError {
    /// A frame listener panicked and took the driver thread down.
    #[error("frame driver thread panicked")]
    Panicked,
}

/// What a stopped driver hands back.
pub struct DriverReport {
    /// The dispatcher, with its listeners intact.
    pub dispatcher: FrameDispatcher,

    /// Number of frames run.
    pub frames: u64,
}

/// Control handle for a driver running on a background thread.
pub struct DriverHandle {
    stop: Sender<()>,
    thread: thread::JoinHandle<DriverReport>,
}

impl DriverHandle {
    /// Signals the driver to stop and waits for the thread to exit.
    ///
    /// # Errors
    ///
    /// [`DriverError::Panicked`] if a listener panicked on the driver thread.
    pub fn stop(self) -> Result<DriverReport, DriverError> {
        // Fails only if the thread already exited
        let _ = self.stop.send(());

        match self.thread.join() {
            Ok(report) => {
                info!("Frame driver terminated cleanly");
                Ok(report)
            }
            Err(e) => {
                error!("Frame driver thread panicked: {:?}", e);
                Err(DriverError::Panicked)
            }
        }
    }

    /// Returns true if the driver thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
