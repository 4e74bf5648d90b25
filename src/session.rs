//! The caller-owned session handle the registry stores non-owning
//! references to (by value — `Session` is `Copy`, so there is no lifetime
//! to track).

/// Opaque identifier for an SNMP session, assigned by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// A session handle as seen by the registry: either a main session, or a
/// subsession tied to a main session.
///
/// Mirrors the reference agent's `snmp_session` with its `subsession`
/// pointer and `SNMP_FLAGS_SUBSESSION` flag, but as a value type instead of
/// a pointer the registry would otherwise have to trust stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Session {
    Main(SessionId),
    Sub { id: SessionId, main: SessionId },
}

impl Session {
    pub fn id(&self) -> SessionId {
        match self {
            Session::Main(id) => *id,
            Session::Sub { id, .. } => *id,
        }
    }

    /// True if registrations owned by `self` should be torn down when
    /// `unregister_by_session(target)` is called.
    ///
    /// Matches `unregister_mibs_by_session`'s two-branch test: an exact
    /// handle match always tears down; additionally, tearing down a main
    /// session tears down every subsession registered under it.
    pub fn matches_for_teardown(&self, target: Session) -> bool {
        if *self == target {
            return true;
        }
        if let Session::Main(target_id) = target {
            if let Session::Sub { main, .. } = self {
                return *main == target_id;
            }
        }
        false
    }
}
