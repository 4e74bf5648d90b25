//! The callback bus: fires REGISTER_OID / UNREGISTER_OID on structural
//! changes and ACM_CHECK on lookup, delivered synchronously and in
//! subscription order.
//!
//! Grounded on the reference agent's `snmp_call_callbacks`/callback-registry
//! mechanism, generalized from its fixed C-level switch over callback major
//! numbers to an extensible `EventKind`.

use crate::oid::Oid;
use crate::registry::RegistrationEvent;
use crate::value::ValueKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    RegisterOid,
    UnregisterOid,
    AcmCheck,
    /// Escape hatch for agent-defined event kinds beyond the three the
    /// registry itself fires.
    Other(u32),
}

#[derive(Debug)]
pub struct AcmCheckPayload<'a> {
    pub oid: &'a Oid,
    pub value_kind: ValueKind,
    /// Listeners write back into this field to reject the lookup (matching
    /// the reference agent's `errorcode` write-back out-parameter).
    pub errorcode: i32,
}

#[derive(Debug)]
pub enum EventPayload<'a> {
    Registration(&'a RegistrationEvent),
    AcmCheck(&'a mut AcmCheckPayload<'a>),
}

type Listener = Box<dyn FnMut(&mut EventPayload<'_>)>;

#[derive(Default)]
pub struct CallbackBus {
    listeners: Vec<(EventKind, Listener)>,
}

impl CallbackBus {
    pub fn new() -> Self {
        Self { listeners: Vec::new() }
    }

    /// Subscribes `listener` to `kind`. Listeners fire in the order they
    /// were subscribed.
    pub fn subscribe(&mut self, kind: EventKind, listener: impl FnMut(&mut EventPayload<'_>) + 'static) {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn fire(&mut self, kind: EventKind, payload: &mut EventPayload<'_>) {
        for (listener_kind, listener) in self.listeners.iter_mut() {
            if *listener_kind == kind {
                listener(payload);
            }
        }
        log::trace!("fired {kind:?}");
    }

    /// Runs ACM_CHECK, returning the final `errorcode` (0 if no listener
    /// objected, or if none are subscribed).
    pub fn check_acm(&mut self, oid: &Oid, value_kind: ValueKind) -> i32 {
        let mut acm = AcmCheckPayload {
            oid,
            value_kind,
            errorcode: 0,
        };
        let mut payload = EventPayload::AcmCheck(&mut acm);
        self.fire(EventKind::AcmCheck, &mut payload);
        acm.errorcode
    }
}
