//! OID-space subtree registry and index allocator for an SNMP agent.
//!
//! [`Registry`] is the top-level façade: it owns a [`registry::SubtreeRegistry`],
//! a [`callback::CallbackBus`], and an [`agentx::AgentXTransport`], and wires
//! them together the way the reference agent's `register_mib_range`,
//! `unregister_mib_range` and friends do in `agent_registry.c` — mutate the
//! subtree structure, then fire the matching callback.
//!
//! PDU decoding, the wire transport, MIB-module code generation and the
//! agent's event loop are all out of scope; this crate is the registry
//! those things call into.

pub mod acl;
pub mod agentx;
pub mod callback;
pub mod error;
pub mod index;
pub mod oid;
pub mod registry;
pub mod session;
pub mod value;

use acl::PduView;
use agentx::{AgentRole, AgentXTransport, LocalOnly};
use callback::{CallbackBus, EventKind, EventPayload};
use error::{IndexError, RegisterError, UnregisterError};
use index::{AllocateFlags, IndexValue};
use oid::Oid;
use registry::{RegistrationEvent, SubtreeRegistry, SubtreeView, VarRow};
use session::Session;
use value::ValueKind;

/// The priority used by the no-priority overloads (`register_mib`,
/// `unregister_mib`), matching the reference agent's `DEFAULT_MIB_PRIORITY`.
pub const DEFAULT_MIB_PRIORITY: i32 = 127;

/// Process-wide configuration decided once at bootstrap.
pub struct RegistryConfig {
    pub role: AgentRole,
    /// The transport used for index operations. Defaults to a local
    /// allocator when omitted, appropriate for a master agent or a subagent
    /// not yet connected to one.
    pub transport: Option<Box<dyn AgentXTransport>>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            role: AgentRole::Master,
            transport: None,
        }
    }
}

/// The OID-space registry: subtree registration, callbacks, index
/// allocation and the ACL bridge behind one façade.
///
/// `H` is the opaque handler-descriptor type registered under an OID; see
/// [`registry::SubtreeRegistry`].
pub struct Registry<H> {
    subtrees: SubtreeRegistry<H>,
    bus: CallbackBus,
    transport: Box<dyn AgentXTransport>,
    role: AgentRole,
}

impl<H: Clone> Registry<H> {
    pub fn new(config: RegistryConfig) -> Self {
        let transport = config
            .transport
            .unwrap_or_else(|| Box::new(LocalOnly::new()) as Box<dyn AgentXTransport>);
        let mut registry = Self {
            subtrees: SubtreeRegistry::new(),
            bus: CallbackBus::new(),
            transport,
            role: config.role,
        };
        registry.setup_tree();
        registry
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Installs the three cover-only root registrations at `{0}`, `{1}` and
    /// `{2}` (ccitt / iso / joint-iso-itu). These are always installed
    /// in-process, even under the subagent role — the reference agent's
    /// bootstrap "temporarily presents as master" for exactly this step,
    /// since subtree registration (unlike index allocation) is never
    /// forwarded over AgentX.
    pub fn setup_tree(&mut self) {
        for root in [0u32, 1, 2] {
            let oid = Oid::from_parts_unchecked(vec![root]);
            let _ = self
                .subtrees
                .register_range("", Vec::new(), oid, DEFAULT_MIB_PRIORITY, None, None);
        }
    }

    pub fn register_mib(
        &mut self,
        module: &str,
        variables: Vec<VarRow<H>>,
        oid: Oid,
    ) -> Result<(), RegisterError> {
        self.register_mib_priority(module, variables, oid, DEFAULT_MIB_PRIORITY)
    }

    pub fn register_mib_priority(
        &mut self,
        module: &str,
        variables: Vec<VarRow<H>>,
        oid: Oid,
        priority: i32,
    ) -> Result<(), RegisterError> {
        self.register_mib_range(module, variables, oid, priority, 0, 0, None)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn register_mib_range(
        &mut self,
        module: &str,
        variables: Vec<VarRow<H>>,
        oid: Oid,
        priority: i32,
        range_subid: usize,
        range_ubound: u32,
        session: Option<Session>,
    ) -> Result<(), RegisterError> {
        let range = if range_subid != 0 {
            Some((range_subid, range_ubound))
        } else {
            None
        };
        self.subtrees
            .register_range(module, variables, oid.clone(), priority, range, session)?;

        let event = RegistrationEvent {
            name: oid,
            priority,
            range_subid,
            range_ubound,
        };
        let mut payload = EventPayload::Registration(&event);
        self.bus.fire(EventKind::RegisterOid, &mut payload);
        Ok(())
    }

    pub fn unregister_mib(&mut self, oid: &Oid) -> Result<(), UnregisterError> {
        self.unregister_mib_priority(oid, DEFAULT_MIB_PRIORITY)
    }

    pub fn unregister_mib_priority(&mut self, oid: &Oid, priority: i32) -> Result<(), UnregisterError> {
        self.unregister_mib_range(oid, priority, 0, 0)
    }

    pub fn unregister_mib_range(
        &mut self,
        oid: &Oid,
        priority: i32,
        range_subid: usize,
        range_ubound: u32,
    ) -> Result<(), UnregisterError> {
        self.subtrees.unregister(oid, priority)?;

        let event = RegistrationEvent {
            name: oid.clone(),
            priority,
            range_subid,
            range_ubound,
        };
        let mut payload = EventPayload::Registration(&event);
        self.bus.fire(EventKind::UnregisterOid, &mut payload);
        Ok(())
    }

    pub fn unregister_mibs_by_session(&mut self, session: Session) {
        self.subtrees.unregister_by_session(session);
    }

    pub fn find_subtree(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.subtrees.find_subtree(oid)
    }

    pub fn find_subtree_next(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.subtrees.find_subtree_next(oid)
    }

    pub fn find_subtree_previous(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.subtrees.find_subtree_previous(oid)
    }

    pub fn get_session_for_oid(&self, oid: &Oid) -> Option<Session> {
        self.subtrees.session_for_oid(oid)
    }

    pub fn register_index(
        &mut self,
        oid: &Oid,
        value: IndexValue,
        flags: AllocateFlags,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        self.transport.register_index(oid, value, flags, session)
    }

    pub fn release_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        self.transport.release_index(oid, value, session)
    }

    pub fn remove_index(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        self.transport.remove_index(oid, value, session)
    }

    pub fn register_string_index(
        &mut self,
        oid: &Oid,
        value: impl Into<Vec<u8>>,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        self.register_index(
            oid,
            IndexValue::OctetString(value.into()),
            AllocateFlags::ThisIndex,
            session,
        )
    }

    pub fn register_int_index(
        &mut self,
        oid: &Oid,
        value: Option<i32>,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        match value {
            Some(v) => self.register_index(oid, IndexValue::Integer(v), AllocateFlags::ThisIndex, session),
            None => self.register_index(oid, IndexValue::Integer(0), AllocateFlags::AnyIndex, session),
        }
    }

    pub fn register_oid_index(
        &mut self,
        oid: &Oid,
        value: Option<Vec<u32>>,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        match value {
            Some(v) => self.register_index(oid, IndexValue::ObjectId(v), AllocateFlags::ThisIndex, session),
            None => self.register_index(oid, IndexValue::ObjectId(Vec::new()), AllocateFlags::AnyIndex, session),
        }
    }

    pub fn in_a_view(&mut self, oid: &Oid, pdu: &PduView, kind: ValueKind) -> bool {
        acl::in_a_view(&mut self.bus, oid, pdu, kind)
    }

    pub fn dump_registry(&self) -> String {
        format!("{}{}", self.subtrees.dump(), self.transport.dump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acl::SnmpVersion;
    use session::SessionId;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    #[test]
    fn bootstrap_and_lookup() {
        let registry: Registry<()> = Registry::new(RegistryConfig::default());
        let found = registry.find_subtree(&oid("1.3.6.1")).unwrap();
        assert!(found.is_cover_only());
        assert!(registry.find_subtree_next(&oid("1.3.6.1")).is_none());
        assert!(registry.get_session_for_oid(&oid("1.3")).is_none());
    }

    #[test]
    fn register_and_unregister_round_trip() {
        let mut registry: Registry<&str> = Registry::new(RegistryConfig::default());
        let before = registry.dump_registry();

        registry
            .register_mib(
                "A",
                vec![registry::VarRow { suffix: vec![], handler: "a" }],
                oid("1.3.6.1.2.1.1"),
            )
            .unwrap();
        registry.unregister_mib(&oid("1.3.6.1.2.1.1")).unwrap();

        assert_eq!(before, registry.dump_registry());
    }

    #[test]
    fn index_allocation_through_the_facade() {
        let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
        let session = Session::Main(SessionId(1));
        let target = oid("1.3.6.1.4.1.2021.1");

        let v1 = registry.register_int_index(&target, None, session).unwrap();
        assert_eq!(v1, IndexValue::Integer(1));
        let v2 = registry.register_int_index(&target, None, session).unwrap();
        assert_eq!(v2, IndexValue::Integer(2));

        registry.release_index(&target, &v1, session).unwrap();
        assert!(registry.dump_registry().contains("Integer"));
    }

    #[test]
    fn always_in_view_short_circuits() {
        let mut registry: Registry<()> = Registry::new(RegistryConfig::default());
        let pdu = PduView {
            always_in_view: true,
            version: SnmpVersion::V1,
        };
        assert!(registry.in_a_view(&oid("1.3.6.1"), &pdu, ValueKind::Integer));
    }
}
