//! The index allocator: issues unique INTEGER / OCTET-STRING / OBJECT-ID
//! values beneath a named OID.
//!
//! Grounded on `register_index`/`register_string_index`/`register_int_index`/
//! `register_oid_index`/`release_index`/`remove_index` in the reference
//! agent's `agent_registry.c`. The reference agent links the outer
//! (per-OID) and inner (per-value) lists as two levels of raw pointers; here
//! both levels are flattened into one `Vec<OidBucket>` sorted by OID, each
//! holding a `Vec<IndexEntry>` sorted by value and searched by binary
//! search, in the style of a sorted-vector lookup table.

use crate::error::IndexError;
use crate::oid::Oid;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Integer,
    OctetString,
    ObjectId,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexValue {
    Integer(i32),
    OctetString(Vec<u8>),
    ObjectId(Vec<u32>),
}

impl IndexValue {
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexValue::Integer(_) => IndexKind::Integer,
            IndexValue::OctetString(_) => IndexKind::OctetString,
            IndexValue::ObjectId(_) => IndexKind::ObjectId,
        }
    }
}

/// How a value should be chosen for a new index entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocateFlags {
    /// Use the supplied value exactly; fail if it is already allocated.
    ThisIndex,
    /// Generate the next value per the type's successor rule, reclaiming a
    /// released-but-remembered entry if the generated value happens to
    /// match one.
    AnyIndex,
    /// Like `AnyIndex`, but never reclaims a released-but-remembered value.
    NewIndex,
}

#[derive(Clone, Debug)]
struct IndexEntry {
    value: IndexValue,
    /// `None` means released-but-remembered: the slot is still linked (so
    /// `NewIndex` will not reissue it) but unowned.
    session: Option<Session>,
}

struct OidBucket {
    oid: Oid,
    kind: IndexKind,
    entries: Vec<IndexEntry>,
}

#[derive(Default)]
pub struct IndexAllocator {
    buckets: Vec<OidBucket>,
}

impl IndexAllocator {
    pub fn new() -> Self {
        Self { buckets: Vec::new() }
    }

    fn bucket_slot(&mut self, oid: &Oid, kind: IndexKind) -> Result<usize, IndexError> {
        match self.buckets.binary_search_by(|b| b.oid.cmp(oid)) {
            Ok(i) => {
                if self.buckets[i].kind != kind {
                    return Err(IndexError::WrongType { name: oid.clone() });
                }
                Ok(i)
            }
            Err(i) => {
                self.buckets.insert(
                    i,
                    OidBucket {
                        oid: oid.clone(),
                        kind,
                        entries: Vec::new(),
                    },
                );
                Ok(i)
            }
        }
    }

    pub fn allocate(
        &mut self,
        oid: &Oid,
        value: IndexValue,
        flags: AllocateFlags,
        session: Session,
    ) -> Result<IndexValue, IndexError> {
        let kind = value.kind();
        let slot = self.bucket_slot(oid, kind)?;

        let chosen = match flags {
            AllocateFlags::ThisIndex => value,
            AllocateFlags::AnyIndex | AllocateFlags::NewIndex => {
                let predecessor = self.buckets[slot].entries.last().map(|e| &e.value);
                successor(kind, predecessor, oid)
            }
        };

        let bucket = &mut self.buckets[slot];
        match bucket.entries.binary_search_by(|e| e.value.cmp(&chosen)) {
            Ok(pos) => {
                let reclaimable =
                    bucket.entries[pos].session.is_none() && flags != AllocateFlags::NewIndex;
                if reclaimable {
                    bucket.entries[pos].session = Some(session);
                    log::debug!("reclaimed index entry for {oid}");
                    Ok(bucket.entries[pos].value.clone())
                } else {
                    Err(IndexError::Duplicate { name: oid.clone() })
                }
            }
            Err(pos) => {
                bucket.entries.insert(
                    pos,
                    IndexEntry {
                        value: chosen.clone(),
                        session: Some(session),
                    },
                );
                log::debug!("allocated index entry for {oid}");
                Ok(chosen)
            }
        }
    }

    /// `release(varbind)`: clear the owning session but keep the entry
    /// linked, so `NewIndex` never reissues it.
    pub fn release(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        let entry = self.find_owned_entry_mut(oid, value, session)?;
        entry.session = None;
        Ok(())
    }

    /// `remove(varbind, session)`: physically unlink the entry.
    pub fn remove(&mut self, oid: &Oid, value: &IndexValue, session: Session) -> Result<(), IndexError> {
        let slot = self
            .buckets
            .binary_search_by(|b| b.oid.cmp(oid))
            .map_err(|_| IndexError::NotAllocated { name: oid.clone() })?;
        let bucket = &mut self.buckets[slot];
        let pos = bucket
            .entries
            .binary_search_by(|e| e.value.cmp(value))
            .map_err(|_| IndexError::NotAllocated { name: oid.clone() })?;
        if bucket.entries[pos].session != Some(session) {
            return Err(IndexError::WrongSession { name: oid.clone() });
        }
        bucket.entries.remove(pos);
        if bucket.entries.is_empty() {
            self.buckets.remove(slot);
        }
        Ok(())
    }

    fn find_owned_entry_mut(
        &mut self,
        oid: &Oid,
        value: &IndexValue,
        session: Session,
    ) -> Result<&mut IndexEntry, IndexError> {
        let slot = self
            .buckets
            .binary_search_by(|b| b.oid.cmp(oid))
            .map_err(|_| IndexError::NotAllocated { name: oid.clone() })?;
        let bucket = &mut self.buckets[slot];
        let pos = bucket
            .entries
            .binary_search_by(|e| e.value.cmp(value))
            .map_err(|_| IndexError::NotAllocated { name: oid.clone() })?;
        if bucket.entries[pos].session != Some(session) {
            return Err(IndexError::WrongSession { name: oid.clone() });
        }
        Ok(&mut bucket.entries[pos])
    }

    /// `dump_registry`'s per-OID index section: released-but-remembered
    /// entries are parenthesized.
    pub fn dump(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for bucket in &self.buckets {
            let _ = writeln!(out, "{}", bucket.oid);
            for entry in &bucket.entries {
                let (open, close) = if entry.session.is_none() { ("(", ")") } else { ("", "") };
                let _ = writeln!(out, "\t{open}{:?}{close}", entry.value);
            }
        }
        out
    }
}

/// Table-driven successor rules (spec.md §4.4/§8 S4–S6), cross-checked
/// against the reference agent's per-type next-index helpers.
fn successor(kind: IndexKind, predecessor: Option<&IndexValue>, oid: &Oid) -> IndexValue {
    match kind {
        IndexKind::Integer => {
            let prev = match predecessor {
                Some(IndexValue::Integer(v)) => Some(*v),
                _ => None,
            };
            IndexValue::Integer(integer_successor(prev))
        }
        IndexKind::OctetString => {
            let prev = match predecessor {
                Some(IndexValue::OctetString(v)) => Some(v.as_slice()),
                _ => None,
            };
            IndexValue::OctetString(octet_string_successor(prev))
        }
        IndexKind::ObjectId => {
            let prev = match predecessor {
                Some(IndexValue::ObjectId(v)) => Some(v.as_slice()),
                _ => None,
            };
            IndexValue::ObjectId(object_id_successor(prev, oid))
        }
    }
}

fn integer_successor(predecessor: Option<i32>) -> i32 {
    predecessor.map(|v| v + 1).unwrap_or(1)
}

fn octet_string_successor(predecessor: Option<&[u8]>) -> Vec<u8> {
    let mut v = match predecessor {
        Some(p) => p.to_vec(),
        None => vec![b'a'; 4],
    };
    let mut i = v.len();
    loop {
        if i == 0 {
            v.insert(0, b'a');
            break;
        }
        i -= 1;
        if v[i] == b'z' {
            v[i] = b'a';
        } else {
            v[i] += 1;
            break;
        }
    }
    v
}

/// `wordsize` and the 40-byte ceiling are the reference agent's constants
/// for the largest OBJECT-ID index value it will synthesize from scratch.
const WORDSIZE: usize = 4;
const MAX_BYTES: usize = 40;

fn object_id_successor(predecessor: Option<&[u32]>, oid: &Oid) -> Vec<u32> {
    match predecessor {
        Some(prev) => {
            let mut v = prev.to_vec();
            let last = v.len() - 1;
            let mut i = last;
            loop {
                if i == 0 {
                    if v[0] == 2 {
                        v[0] = 1;
                        v.push(0);
                    } else if v[0] >= 255 {
                        v[0] = 1;
                    } else {
                        v[0] += 1;
                    }
                    break;
                }
                if v[i] >= 255 {
                    v[i] = 1;
                    i -= 1;
                } else {
                    v[i] += 1;
                    break;
                }
            }
            v
        }
        None => {
            let name_len = oid.len();
            if (name_len + 1) * WORDSIZE <= MAX_BYTES {
                let mut v = oid.parts().to_vec();
                v.push(1);
                v
            } else {
                let max_subids = MAX_BYTES / WORDSIZE;
                let mut v = vec![1u32, 1, 1, 1];
                v.truncate(max_subids.min(v.len()));
                v
            }
        }
    }
}
