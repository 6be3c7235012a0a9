//=========================================================================
// Listener Identity
//=========================================================================
//
// Closures cannot be compared, so every registration hands back an id
// that is later used to unregister it.
//
//=========================================================================

/// Identifies one registered callback.
///
/// Ids are unique within the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Monotonic id source owned by a registry.
#[derive(Debug, Default)]
pub(crate) struct ListenerIds {
    next: u64,
}

impl ListenerIds {
    pub(crate) fn next(&mut self) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        id
    }
}

//=========================================================================
// Tests
//=========================================================================
