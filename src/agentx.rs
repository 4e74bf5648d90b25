//! AgentX subagent forwarding: a strategy interface chosen once at
//! bootstrap, per spec.md's Design Notes on making the master/subagent
//! split an explicit dependency rather than a runtime branch scattered
//! through the registry.
//!
//! Grounded on the reference agent's subagent-mode handling in
//! `agent_registry.c` (`register_mib_range`'s `ds_get_boolean(...,
//! DS_AGENT_ROLE)` check before forwarding index operations to the master),
//! generalized into a trait with local and remote implementations.

use crate::error::IndexError;
use crate::index::{AllocateFlags, IndexValue};
use crate::oid::Oid;
use crate::session::Session;

/// Whether this process is the SNMP master agent or a subagent connected to
/// one via AgentX.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentRole {
    Master,
    SubAgent,
}

/// Forwards index allocation requests to wherever they are actually
/// serviced. A master agent services them locally; a subagent forwards them
/// over its AgentX session to the master.
pub trait AgentXTransport {
    fn register_index(
        &mut self,
        oid: &Oid,
        value: IndexValue,
        flags: AllocateFlags,
        session: Session,
    ) -> Result<IndexValue, IndexError>;

    fn release_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError>;

    fn remove_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError>;

    /// The index-allocation portion of `dump_registry`. Transports with no
    /// local allocator (a subagent's remote transport) report nothing.
    fn dump(&self) -> String {
        String::new()
    }
}

/// Services index operations against a local [`crate::index::IndexAllocator`].
/// Used by master agents, and by a subagent's own bootstrap (`setup_tree`
/// installs the three root cover-only subtrees in-process even under the
/// subagent role).
pub struct LocalOnly {
    pub allocator: crate::index::IndexAllocator,
}

impl LocalOnly {
    pub fn new() -> Self {
        Self {
            allocator: crate::index::IndexAllocator::new(),
        }
    }
}

impl Default for LocalOnly {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentXTransport for LocalOnly {
    fn register_index(
        &mut self,
        oid: &Oid,
        value: IndexValue,
        flags: AllocateFlags,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        self.allocator.allocate(oid, value, flags, session)
    }

    fn release_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        self.allocator.release(oid, value, session)
    }

    fn remove_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        self.allocator.remove(oid, value, session)
    }

    fn dump(&self) -> String {
        self.allocator.dump()
    }
}
