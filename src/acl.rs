//! The view-based ACL bridge: `in_a_view` short-circuits the fixed cases the
//! registry itself knows about and otherwise delegates to the callback bus.
//!
//! Grounded on `in_a_view` in the reference agent's `agent_registry.c`,
//! which special-cases `ALWAYS_IN_VIEW` and the SNMPv1/Counter64
//! incompatibility before consulting the ACM callback.

use crate::callback::CallbackBus;
use crate::oid::Oid;
use crate::value::ValueKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

/// The subset of a PDU's context `in_a_view` needs: whether the check
/// should be bypassed outright, and the protocol version (for the
/// Counter64/v1 rule).
#[derive(Clone, Copy, Debug)]
pub struct PduView {
    pub always_in_view: bool,
    pub version: SnmpVersion,
}

/// Returns whether `oid` (carrying a value of `kind`) is visible under
/// `pdu`'s access view.
pub fn in_a_view(bus: &mut CallbackBus, oid: &Oid, pdu: &PduView, kind: ValueKind) -> bool {
    if pdu.always_in_view {
        return true;
    }
    if pdu.version == SnmpVersion::V1 && kind == ValueKind::Counter64 {
        return false;
    }
    bus.check_acm(oid, kind) == 0
}
