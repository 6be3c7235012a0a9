//=========================================================================
// Frame Dispatcher
//=========================================================================
//
// Holds per-phase listener lists and runs them in phase order.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{FramePhase, FrameTick};
use crate::core::listener::{ListenerId, ListenerIds};

//=== FrameDispatcher =====================================================

type FrameCallback = Box<dyn FnMut(&FrameTick) + Send>;

/// Per-phase frame callback registry.
///
/// Listeners within a phase run in registration order.
#[derive(Default)]
pub struct FrameDispatcher {
    phases: [Vec<(ListenerId, FrameCallback)>; 3],
    ids: ListenerIds,
}

impl FrameDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Registers `listener` for `phase`.
    pub fn add_listener<F>(&mut self, phase: FramePhase, listener: F) -> ListenerId
    where
        F: FnMut(&FrameTick) + Send + 'static,
    {
        let id = self.ids.next();
        let callback: FrameCallback = Box::new(listener);
        self.phases[phase.index()].push((id, callback));
        debug!("Listener {:?} added to {:?}", id, phase);
        id
    }

    /// Registers a fixed-update listener.
    pub fn add_fixed_update_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FrameTick) + Send + 'static,
    {
        self.add_listener(FramePhase::FixedUpdate, listener)
    }

    /// Registers an update listener.
    pub fn add_update_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FrameTick) + Send + 'static,
    {
        self.add_listener(FramePhase::Update, listener)
    }

    /// Registers a late-update listener.
    pub fn add_late_update_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FrameTick) + Send + 'static,
    {
        self.add_listener(FramePhase::LateUpdate, listener)
    }

    /// Unregisters listener `id` from `phase`. Returns whether it was found.
    pub fn remove_listener(&mut self, phase: FramePhase, id: ListenerId) -> bool {
        let listeners = &mut self.phases[phase.index()];
        match listeners.iter().position(|(existing, _)| *existing == id) {
            Some(pos) => {
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    //--- Dispatch ---------------------------------------------------------

    /// Runs every listener of `phase`. Returns how many ran.
    pub fn dispatch(&mut self, phase: FramePhase, tick: &FrameTick) -> usize {
        let listeners = &mut self.phases[phase.index()];
        for (_, callback) in listeners.iter_mut() {
            callback(tick);
        }
        listeners.len()
    }

    /// Runs one frame: `fixed_steps` fixed updates, then update, then
    /// late update.
    pub fn run_frame(&mut self, tick: &FrameTick, fixed_steps: u32) {
        for _ in 0..fixed_steps {
            self.dispatch(FramePhase::FixedUpdate, tick);
        }
        self.dispatch(FramePhase::Update, tick);
        self.dispatch(FramePhase::LateUpdate, tick);
    }

    //--- Query API --------------------------------------------------------

    /// Number of listeners registered for `phase`.
    pub fn listener_count(&self, phase: FramePhase) -> usize {
        self.phases[phase.index()].len()
    }

    /// Returns true if no phase has listeners.
    pub fn is_empty(&self) -> bool {
        self.phases.iter().all(Vec::is_empty)
    }

    /// Removes every listener from every phase.
    pub fn clear(&mut self) {
        for listeners in &mut self.phases {
            listeners.clear();
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
