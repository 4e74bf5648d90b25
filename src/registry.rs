//! The subtree registry: a sorted, non-overlapping cover of the OID line
//! ("the spine"), each slot holding a priority-ordered chain of
//! registrations ("children").
//!
//! This is a direct, arena-based translation of `load_subtree`,
//! `split_subtree`, `unload_subtree`, `unregister_mib_range`,
//! `unregister_mibs_by_session`, `find_subtree*`, `get_session_for_oid` and
//! `dump_registry` from the reference agent's `agent_registry.c`. Nodes
//! live in a `Vec<Option<Node<H>>>` arena addressed by `NodeId`, rather than
//! the original's raw `prev`/`next`/`children` pointers, per the rewrite
//! guidance in spec.md's Design Notes.

use std::cmp::Ordering;

use crate::error::{RegisterError, UnregisterError};
use crate::oid::Oid;
use crate::session::Session;

pub type NodeId = usize;

/// One row of a subtree's variable table.
///
/// `suffix` is the part of the row's full OID beyond the owning
/// registration's `name` — mirroring the reference agent's convention that
/// `variable::name` stores only the suffix common to the whole
/// registration. Rows must be supplied in ascending `suffix` order; this is
/// the same precondition the reference agent places on MIB variable tables.
#[derive(Clone, Debug)]
pub struct VarRow<H> {
    pub suffix: Vec<u32>,
    pub handler: H,
}

#[derive(Clone)]
struct Node<H> {
    name: Oid,
    start: Oid,
    end: Oid,
    label: String,
    variables: Vec<VarRow<H>>,
    priority: i32,
    session: Option<Session>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    children: Option<NodeId>,
    /// The id of the node this one ultimately descends from via
    /// `split_subtree` (its own id if it has never been split). Two
    /// originally-distinct registrations can carry identical labels,
    /// priorities and empty variable tables — this is what lets
    /// `coalesce_spine` tell "two fragments of one split root" apart from
    /// "two unrelated roots that happen to look alike".
    origin: NodeId,
}

impl<H> Node<H> {
    fn is_cover_only(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A read-only view onto a registered subtree slot.
pub struct SubtreeView<'a, H> {
    pub name: &'a Oid,
    pub start: &'a Oid,
    pub end: &'a Oid,
    pub label: &'a str,
    pub variables: &'a [VarRow<H>],
    pub priority: i32,
    pub session: Option<Session>,
}

impl<H> SubtreeView<'_, H> {
    pub fn is_cover_only(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Parameters describing a single registration, passed to callback
/// listeners on REGISTER_OID/UNREGISTER_OID (see `crate::callback`).
#[derive(Clone, Debug)]
pub struct RegistrationEvent {
    pub name: Oid,
    pub priority: i32,
    pub range_subid: usize,
    pub range_ubound: u32,
}

/// The OID-space subtree registry.
///
/// `H` is the opaque handler-descriptor type a caller registers under an
/// OID; the registry only owns, splits and copies rows of it, it never
/// inspects or invokes them (GET/GETNEXT/SET dispatch is out of scope, per
/// spec.md §1).
pub struct SubtreeRegistry<H> {
    nodes: Vec<Option<Node<H>>>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
}

impl<H: Clone> Default for SubtreeRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> SubtreeRegistry<H> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
        }
    }

    fn alloc_node(&mut self, node: Node<H>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn free_node(&mut self, id: NodeId) {
        self.nodes[id].take().expect("double free of subtree node");
        self.free.push(id);
    }

    fn node(&self, id: NodeId) -> &Node<H> {
        self.nodes[id].as_ref().expect("dangling subtree node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        self.nodes[id].as_mut().expect("dangling subtree node id")
    }

    fn view(&self, id: NodeId) -> SubtreeView<'_, H> {
        let n = self.node(id);
        SubtreeView {
            name: &n.name,
            start: &n.start,
            end: &n.end,
            label: &n.label,
            variables: &n.variables,
            priority: n.priority,
            session: n.session,
        }
    }

    // ---- lookup (§4.2) --------------------------------------------------

    /// Last spine node whose `start <= oid`. Read-only; never rearranges
    /// the structure.
    fn find_previous_id(&self, oid: &Oid, hint: Option<NodeId>) -> Option<NodeId> {
        let mut previous = None;
        let mut cur = hint.or(self.head);
        while let Some(id) = cur {
            let node = self.node(id);
            if *oid < node.start {
                return previous;
            }
            previous = Some(id);
            cur = node.next;
        }
        previous
    }

    fn find_id(&self, oid: &Oid, hint: Option<NodeId>) -> Option<NodeId> {
        let prev = self.find_previous_id(oid, hint)?;
        if *oid < self.node(prev).end {
            Some(prev)
        } else {
            None
        }
    }

    /// Successor of `find_previous(oid)` on the spine, skipping cover-only
    /// nodes.
    ///
    /// Note: when `find_previous` returns none and `hint` is given, this
    /// replicates `find_subtree_next`'s fallback of returning `hint` itself
    /// if `oid < hint.start` — a quirk of the reference agent kept for
    /// fidelity (see `load_subtree`'s own use of this function to probe for
    /// an overlapping successor when registering into virgin territory).
    fn find_next_id(&self, oid: &Oid, hint: Option<NodeId>) -> Option<NodeId> {
        match self.find_previous_id(oid, hint) {
            Some(prev) => {
                let mut cur = self.node(prev).next;
                while let Some(id) = cur {
                    let n = self.node(id);
                    if !n.is_cover_only() {
                        return Some(id);
                    }
                    cur = n.next;
                }
                None
            }
            None => match hint {
                Some(h) if *oid < self.node(h).start => Some(h),
                _ => None,
            },
        }
    }

    pub fn find_subtree(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.find_id(oid, None).map(|id| self.view(id))
    }

    pub fn find_subtree_next(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.find_next_id(oid, None).map(|id| self.view(id))
    }

    pub fn find_subtree_previous(&self, oid: &Oid) -> Option<SubtreeView<'_, H>> {
        self.find_previous_id(oid, None).map(|id| self.view(id))
    }

    pub fn session_for_oid(&self, oid: &Oid) -> Option<Session> {
        let mut cur = self.find_previous_id(oid, None);
        while let Some(id) = cur {
            let n = self.node(id);
            if !n.is_cover_only() {
                return n.session;
            }
            cur = n.next;
        }
        None
    }

    // ---- split (§4.1) ----------------------------------------------------

    /// Splits `current` at `at`, returning the new tail (or `None` if `at`
    /// falls beyond `current`'s end). The variable table is partitioned by
    /// suffix, not shared: each half gets an owned, cloned sub-range rather
    /// than a non-owning window into a shared buffer, per spec.md §3's
    /// simplification of the reference agent's shared-buffer discipline.
    fn split_subtree(&mut self, current_id: NodeId, at: &Oid) -> Option<NodeId> {
        if *at > self.node(current_id).end {
            return None;
        }

        let namelen = self.node(current_id).name.len();
        let at_suffix = at.suffix_from(namelen).to_vec();

        let mut tail = self.node(current_id).clone();
        self.node_mut(current_id).end = at.clone();
        tail.start = at.clone();

        let split_at = self
            .node(current_id)
            .variables
            .iter()
            .position(|row| row.suffix.as_slice() >= at_suffix.as_slice())
            .unwrap_or_else(|| self.node(current_id).variables.len());
        tail.variables = self.node_mut(current_id).variables.split_off(split_at);

        let children_id = self.node(current_id).children;
        tail.children = match children_id {
            Some(cid) => self.split_subtree(cid, at),
            None => None,
        };
        tail.prev = None;
        tail.next = None;

        let new_id = self.alloc_node(tail);
        self.relink_after_split(current_id, new_id);
        log::trace!("split subtree at {at}");
        Some(new_id)
    }

    /// Propagates the three `prev`/`next` rewrites `split_subtree` performs
    /// "at every depth of the chain" (invariant I4).
    fn relink_after_split(&mut self, current_id: NodeId, new_id: NodeId) {
        let mut ptr = Some(current_id);
        while let Some(id) = ptr {
            let children = self.node(id).children;
            self.node_mut(id).next = Some(new_id);
            ptr = children;
        }
        let mut ptr = Some(new_id);
        while let Some(id) = ptr {
            let children = self.node(id).children;
            self.node_mut(id).prev = Some(current_id);
            ptr = children;
        }
        let mut ptr = self.node(new_id).next;
        while let Some(id) = ptr {
            let children = self.node(id).children;
            self.node_mut(id).prev = Some(new_id);
            ptr = children;
        }
    }

    // ---- load / registration (§4.1) --------------------------------------

    /// The recursive "load" protocol. Consumes an already-allocated,
    /// not-yet-linked node and splices it into the spine, splitting and
    /// recursing as needed.
    fn load_subtree(&mut self, new_id: NodeId) -> Result<(), RegisterError> {
        let new_start = self.node(new_id).start.clone();
        let new_end = self.node(new_id).end.clone();

        match self.find_id(&new_start, None) {
            None => self.load_virgin(new_id, &new_start, &new_end),
            Some(tree1) => self.load_overlapping(new_id, tree1, &new_start, &new_end),
        }
    }

    fn load_virgin(
        &mut self,
        new_id: NodeId,
        new_start: &Oid,
        new_end: &Oid,
    ) -> Result<(), RegisterError> {
        let tree2 = self.find_next_id(new_start, None);

        let mut tail = None;
        if let Some(t2) = tree2 {
            let t2_start = self.node(t2).start.clone();
            if *new_end > t2_start {
                tail = self.split_subtree(new_id, &t2_start);
            }
        }

        let prev_of_new = match tree2 {
            Some(t2) => {
                let p = self.node(t2).prev;
                self.node_mut(t2).prev = Some(new_id);
                p
            }
            None => self.find_previous_id(new_start, None),
        };
        self.node_mut(new_id).prev = prev_of_new;
        match prev_of_new {
            Some(p) => self.node_mut(p).next = Some(new_id),
            None => self.head = Some(new_id),
        }
        self.node_mut(new_id).next = tree2;

        match tail {
            Some(t) => self.load_subtree(t),
            None => Ok(()),
        }
    }

    fn load_overlapping(
        &mut self,
        new_id: NodeId,
        mut tree1: NodeId,
        new_start: &Oid,
        new_end: &Oid,
    ) -> Result<(), RegisterError> {
        let t1_start = self.node(tree1).start.clone();
        if new_start != &t1_start {
            tree1 = self.split_subtree(tree1, new_start).ok_or_else(|| {
                RegisterError::Failed {
                    name: self.node(new_id).name.clone(),
                }
            })?;
        }

        let t1_end = self.node(tree1).end.clone();
        match new_end.cmp(&t1_end) {
            Ordering::Less => {
                self.split_subtree(tree1, new_end);
                self.merge_into_chain(new_id, tree1)
            }
            Ordering::Equal => self.merge_into_chain(new_id, tree1),
            Ordering::Greater => {
                let tail = self.split_subtree(new_id, &t1_end);
                self.load_subtree(new_id)?;
                match tail {
                    Some(t) => self.load_subtree(t),
                    None => Ok(()),
                }
            }
        }
    }

    /// Splices `new_id` into the priority chain rooted at `tree1_id`, whose
    /// range already matches `new_id`'s exactly.
    fn merge_into_chain(&mut self, new_id: NodeId, tree1_id: NodeId) -> Result<(), RegisterError> {
        let new_namelen = self.node(new_id).name.len();
        let new_priority = self.node(new_id).priority;

        let mut prev: Option<NodeId> = None;
        let mut next: Option<NodeId> = Some(tree1_id);
        while let Some(id) = next {
            let n = self.node(id);
            if n.name.len() > new_namelen {
                prev = Some(id);
                next = n.children;
            } else {
                break;
            }
        }
        while let Some(id) = next {
            let n = self.node(id);
            if n.name.len() == new_namelen && n.priority < new_priority {
                prev = Some(id);
                next = n.children;
            } else {
                break;
            }
        }
        if let Some(id) = next {
            let n = self.node(id);
            if n.name.len() == new_namelen && n.priority == new_priority {
                return Err(RegisterError::DuplicateRegistration {
                    name: self.node(new_id).name.clone(),
                    priority: new_priority,
                });
            }
        }

        match prev {
            Some(p) => {
                self.node_mut(new_id).children = next;
                self.node_mut(p).children = Some(new_id);
                let p_prev = self.node(p).prev;
                let p_next = self.node(p).next;
                self.node_mut(new_id).prev = p_prev;
                self.node_mut(new_id).next = p_next;
            }
            None => {
                let head = next.expect("chain head must exist when prev is none");
                let head_prev = self.node(head).prev;
                let head_next = self.node(head).next;
                self.node_mut(new_id).children = Some(head);
                self.node_mut(new_id).prev = head_prev;
                self.node_mut(new_id).next = head_next;

                let mut ptr = self.node(new_id).next;
                while let Some(id) = ptr {
                    let children = self.node(id).children;
                    self.node_mut(id).prev = Some(new_id);
                    ptr = children;
                }
                let mut ptr = self.node(new_id).prev;
                while let Some(id) = ptr {
                    let children = self.node(id).children;
                    self.node_mut(id).next = Some(new_id);
                    ptr = children;
                }
            }
        }
        Ok(())
    }

    // ---- public registration API (§4.1, §6) ------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn register_range(
        &mut self,
        label: &str,
        variables: Vec<VarRow<H>>,
        oid: Oid,
        priority: i32,
        range: Option<(usize, u32)>,
        session: Option<Session>,
    ) -> Result<(), RegisterError> {
        let node = self.build_node(label, variables.clone(), oid.clone(), priority, session);
        let id = self.alloc_node(node);
        self.node_mut(id).origin = id;
        self.load_subtree(id)?;
        log::debug!("registered \"{label}\" at {oid} priority {priority}");

        if let Some((range_subid, range_ubound)) = range {
            if range_subid != 0 {
                let base = oid.parts()[range_subid - 1];
                for i in (base + 1)..range_ubound {
                    let mut clone_node =
                        self.build_node(label, variables.clone(), oid.clone(), priority, session);
                    clone_node.start = with_subid(&clone_node.start, range_subid - 1, i);
                    clone_node.end = with_subid(&clone_node.end, range_subid - 1, i);
                    let cid = self.alloc_node(clone_node);
                    self.node_mut(cid).origin = cid;
                    if let Err(e) = self.load_subtree(cid) {
                        self.free_node(cid);
                        let _ = self.unregister(&oid, priority);
                        return Err(e);
                    }
                }
            }
        }
        Ok(())
    }

    fn build_node(
        &self,
        label: &str,
        variables: Vec<VarRow<H>>,
        oid: Oid,
        priority: i32,
        session: Option<Session>,
    ) -> Node<H> {
        let end = oid.successor_subid();
        Node {
            name: oid.clone(),
            start: oid,
            end,
            label: label.to_string(),
            variables,
            priority,
            session,
            prev: None,
            next: None,
            children: None,
            // Patched to the node's own allocated id right after `alloc_node`
            // returns it; every freshly-built node starts as its own origin.
            origin: 0,
        }
    }

    // ---- unregistration (§4.3) -------------------------------------------

    fn find_in_chain(
        &self,
        slot: NodeId,
        name: &Oid,
        priority: i32,
    ) -> Option<(NodeId, Option<NodeId>)> {
        let mut parent = None;
        let mut cur = Some(slot);
        while let Some(id) = cur {
            let n = self.node(id);
            if &n.name == name && n.priority == priority {
                return Some((id, parent));
            }
            parent = Some(id);
            cur = n.children;
        }
        None
    }

    fn unload(&mut self, node_id: NodeId, parent: Option<NodeId>) {
        if let Some(p) = parent {
            let children = self.node(node_id).children;
            self.node_mut(p).children = children;
            return;
        }

        let children = self.node(node_id).children;
        let prev = self.node(node_id).prev;
        let next = self.node(node_id).next;
        let promoted = children;

        let mut ptr = prev;
        while let Some(id) = ptr {
            let c = self.node(id).children;
            self.node_mut(id).next = promoted.or(next);
            ptr = c;
        }
        let mut ptr = next;
        while let Some(id) = ptr {
            let c = self.node(id).children;
            self.node_mut(id).prev = promoted.or(prev);
            ptr = c;
        }
        if prev.is_none() {
            // The reference agent leaves the global `subtrees` head stale in
            // this situation (it never removes its own root). We keep the
            // arena internally consistent instead, since a dangling head
            // would be a safety hazard rather than a silent correctness
            // wrinkle in a Rust arena.
            self.head = promoted.or(next);
        }
    }

    pub fn unregister(&mut self, name: &Oid, priority: i32) -> Result<(), UnregisterError> {
        let no_such = || UnregisterError::NoSuchRegistration {
            name: name.clone(),
            priority,
        };

        let slot = self.find_id(name, None).ok_or_else(no_such)?;
        let (entry, parent) = self.find_in_chain(slot, name, priority).ok_or_else(no_such)?;

        self.unload(entry, parent);
        let mut list = self.node(entry).next;
        self.free_node(entry);
        log::debug!("unregistered {name} priority {priority}");

        while let Some(slot_id) = list {
            let next_list = self.node(slot_id).next;
            match self.find_in_chain(slot_id, name, priority) {
                Some((child, child_parent)) => {
                    self.unload(child, child_parent);
                    self.free_node(child);
                    list = next_list;
                }
                None => break,
            }
        }
        self.coalesce_spine();
        Ok(())
    }

    /// Re-merges adjacent spine slots left behind by a `split_subtree` whose
    /// inserted registration has since been unregistered — e.g. splitting a
    /// bare root to register under it carves off two cover-only fragments
    /// that, once the registration is gone, are indistinguishable from the
    /// node they were split out of. Without this, `register`/`unregister` of
    /// a single OID leaves the spine more fragmented than it started,
    /// breaking the round-trip no-op property.
    ///
    /// Two slots are merged when their ranges are contiguous and their whole
    /// priority chains match depth-for-depth (same label, priority, session
    /// and variable suffixes) — i.e. they are copies of the same chain that
    /// a split produced, not independently registered content that happens
    /// to look alike.
    fn coalesce_spine(&mut self) {
        let mut cur = self.head;
        while let Some(id) = cur {
            let next = self.node(id).next;
            if let Some(next_id) = next {
                let contiguous = self.node(id).end == self.node(next_id).start;
                if contiguous && self.chain_signature_eq(id, next_id) {
                    self.merge_spine_pair(id, next_id);
                    continue;
                }
            }
            cur = next;
        }
    }

    /// Whether `a` and `b` are fragments of one split node's chain — the
    /// same `origin` lineage, and structurally identical at every depth
    /// (ignoring `start`/`end`, which differ only because one side was
    /// carved off by a split). The `origin` check is load-bearing: two
    /// independently registered cover-only roots (e.g. bootstrap's `{0}`
    /// and `{1}`) can have identical labels, priorities and empty variable
    /// tables and sit at contiguous ranges without ever having been split
    /// from each other.
    fn chain_signature_eq(&self, a: NodeId, b: NodeId) -> bool {
        let na = self.node(a);
        let nb = self.node(b);
        if na.origin != nb.origin {
            return false;
        }
        if na.label != nb.label || na.priority != nb.priority || na.session != nb.session {
            return false;
        }
        if na.variables.len() != nb.variables.len() {
            return false;
        }
        if !na
            .variables
            .iter()
            .zip(nb.variables.iter())
            .all(|(ra, rb)| ra.suffix == rb.suffix)
        {
            return false;
        }
        match (na.children, nb.children) {
            (None, None) => true,
            (Some(ca), Some(cb)) => self.chain_signature_eq(ca, cb),
            _ => false,
        }
    }

    /// Folds `b`'s range into `a` and discards `b`'s whole chain, fixing up
    /// `next`/`prev` at every depth of both `a`'s and `b`'s former
    /// next-neighbor's chains, per invariant I4.
    fn merge_spine_pair(&mut self, a: NodeId, b: NodeId) {
        let b_end = self.node(b).end.clone();
        let b_next = self.node(b).next;

        let mut ptr = Some(a);
        while let Some(id) = ptr {
            let children = self.node(id).children;
            self.node_mut(id).end = b_end.clone();
            self.node_mut(id).next = b_next;
            ptr = children;
        }
        let mut ptr = b_next;
        while let Some(id) = ptr {
            let children = self.node(id).children;
            self.node_mut(id).prev = Some(a);
            ptr = children;
        }

        self.free_chain(b);
    }

    fn free_chain(&mut self, id: NodeId) {
        let children = self.node(id).children;
        self.free_node(id);
        if let Some(c) = children {
            self.free_chain(c);
        }
    }

    /// Evicts every registration owned by `target` (or, if `target` is a
    /// main session, owned by any of its subsessions). Tolerates the spine
    /// and chains changing shape as entries are evicted.
    pub fn unregister_by_session(&mut self, target: Session) {
        let mut slot = self.head;
        while let Some(slot_id) = slot {
            let slot_next = self.node(slot_id).next;
            let mut parent: Option<NodeId> = None;
            let mut cur = Some(slot_id);
            while let Some(id) = cur {
                let next_child = self.node(id).children;
                let evict = self
                    .node(id)
                    .session
                    .map(|s| s.matches_for_teardown(target))
                    .unwrap_or(false);
                if evict {
                    self.unload(id, parent);
                    self.free_node(id);
                } else {
                    parent = Some(id);
                }
                cur = next_child;
            }
            slot = slot_next;
        }
        self.coalesce_spine();
        log::debug!("unregistered all subtrees for session {target:?}");
    }

    // ---- diagnostics (§6) -------------------------------------------------

    pub fn dump(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let mut cur = self.head;
        while let Some(id) = cur {
            let n = self.node(id);
            let (open, close) = if n.is_cover_only() { ("(", ")") } else { (" ", " ") };
            let _ = writeln!(out, "{open}{} - {}{close}", n.start, n.end);

            let mut c = Some(id);
            while let Some(cid) = c {
                let cn = self.node(cid);
                if !cn.label.is_empty() {
                    let _ = writeln!(out, "\t{}", cn.label);
                }
                c = cn.children;
            }
            cur = n.next;
        }
        out
    }
}

fn with_subid(oid: &Oid, idx: usize, value: u32) -> Oid {
    let mut parts = oid.parts().to_vec();
    parts[idx] = value;
    Oid::from_parts_unchecked(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    fn bootstrap(reg: &mut SubtreeRegistry<()>) {
        for root in ["0", "1", "2"] {
            reg.register_range("", vec![], oid(root), 1, None, None)
                .unwrap();
        }
    }

    #[test]
    fn bootstrap_covers_three_roots() {
        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        let found = reg.find_subtree(&oid("1.3.6.1")).unwrap();
        assert_eq!(found.start.to_string(), "1");
        assert!(found.is_cover_only());
    }

    #[test]
    fn register_then_find() {
        let mut reg: SubtreeRegistry<&str> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        reg.register_range(
            "A",
            vec![VarRow { suffix: vec![], handler: "a" }],
            oid("1.3.6.1.2.1.1"),
            10,
            None,
            None,
        )
        .unwrap();

        let found = reg.find_subtree(&oid("1.3.6.1.2.1.1.5")).unwrap();
        assert_eq!(found.label, "A");
        assert!(!found.is_cover_only());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        reg.register_range("X", vec![], oid("1.3.6.1.99"), 5, None, None)
            .unwrap();
        let err = reg
            .register_range("X", vec![], oid("1.3.6.1.99"), 5, None, None)
            .unwrap_err();
        assert!(matches!(err, RegisterError::DuplicateRegistration { .. }));

        // the first registration is unaffected
        assert!(reg.find_subtree(&oid("1.3.6.1.99.0")).is_some());
    }

    #[test]
    fn split_creates_priority_layering() {
        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        reg.register_range("A", vec![], oid("1.3.6.1.2.1.1"), 10, None, None)
            .unwrap();
        reg.register_range("B", vec![], oid("1.3.6.1.2.1.1.3"), 10, None, None)
            .unwrap();

        let slot = reg.find_subtree(&oid("1.3.6.1.2.1.1.3.0")).unwrap();
        assert_eq!(slot.label, "B");
        assert_eq!(slot.start.to_string(), "1.3.6.1.2.1.1.3");
    }

    #[test]
    fn register_unregister_round_trip_is_a_no_op() {
        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        let before = reg.dump();
        reg.register_range("TMP", vec![], oid("1.3.6.1.4.1.9999"), 1, None, None)
            .unwrap();
        reg.unregister(&oid("1.3.6.1.4.1.9999"), 1).unwrap();
        let after = reg.dump();
        assert_eq!(before, after);
    }

    #[test]
    fn unregister_by_session_evicts_subsessions() {
        use crate::session::SessionId;

        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        let main = Session::Main(SessionId(1));
        let sub = Session::Sub {
            id: SessionId(2),
            main: SessionId(1),
        };

        reg.register_range("A", vec![], oid("1.3.6.1.4.1.1"), 1, None, Some(main))
            .unwrap();
        reg.register_range("B", vec![], oid("1.3.6.1.4.1.2"), 1, None, Some(sub))
            .unwrap();

        reg.unregister_by_session(main);

        // The registrations are gone, but the OID range itself is still
        // covered by the (now cover-only again) `{1}` root — §4.2 allows
        // `find` to return a cover-only node.
        assert!(reg.find_subtree(&oid("1.3.6.1.4.1.1")).unwrap().is_cover_only());
        assert!(reg.find_subtree(&oid("1.3.6.1.4.1.2")).unwrap().is_cover_only());
        assert!(reg.session_for_oid(&oid("1.3.6.1.4.1.1")).is_none());
        assert!(reg.session_for_oid(&oid("1.3.6.1.4.1.2")).is_none());
    }

    #[test]
    fn find_next_skips_cover_only_nodes() {
        let mut reg: SubtreeRegistry<()> = SubtreeRegistry::new();
        bootstrap(&mut reg);

        // Nothing registered below the roots yet.
        assert!(reg.find_subtree_next(&oid("1.3.6.1")).is_none());
    }
}
