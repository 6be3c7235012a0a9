//=========================================================================
// Pool Group
//=========================================================================
//
// Named grouping placement for idle instances.
//
// Purely cosmetic bookkeeping: when grouping is enabled, idle instances
// are attached to a group named after their key, itself parented under
// the registry's root group.
//
//=========================================================================

/// A named container idle instances are attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolGroup {
    name: String,
    parent: Option<String>,
}

impl PoolGroup {
    /// Creates a top-level group with no parent.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Creates a group parented under `parent`.
    pub fn child_of(parent: &PoolGroup, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.name.clone()),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parent group, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Slash-separated path from the root group.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent, self.name),
            None => self.name.clone(),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
