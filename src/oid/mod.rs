//! OID primitives: comparison, prefix tests, parsing and printing.
//!
//! An OID is a finite sequence of unsigned integers, totally ordered
//! lexicographically (shorter is less than longer on an equal common
//! prefix). This matches `snmp_oid_compare`/`compare_tree` in the reference
//! agent.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    parts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OidError {
    #[error("OID cannot be empty")]
    Empty,
    #[error("invalid OID format: {0}")]
    InvalidFormat(String),
    #[error("invalid OID part: {0}")]
    InvalidPart(String),
}

impl Oid {
    pub fn new(parts: Vec<u32>) -> Result<Self, OidError> {
        if parts.is_empty() {
            return Err(OidError::Empty);
        }
        Ok(Self { parts })
    }

    /// Builds an `Oid` without checking for emptiness. Used internally where
    /// the caller has already established non-emptiness (e.g. appending a
    /// subidentifier to an existing `Oid`).
    pub(crate) fn from_parts_unchecked(parts: Vec<u32>) -> Self {
        debug_assert!(!parts.is_empty());
        Self { parts }
    }

    pub fn from_slice(parts: &[u32]) -> Result<Self, OidError> {
        Self::new(parts.to_vec())
    }

    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.parts.starts_with(&prefix.parts)
    }

    pub fn is_parent_of(&self, other: &Oid) -> bool {
        other.parts.len() > self.parts.len() && other.parts.starts_with(&self.parts)
    }

    pub fn parent(&self) -> Option<Oid> {
        if self.parts.len() <= 1 {
            return None;
        }
        Some(Oid {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    pub fn child(&self, sub_id: u32) -> Oid {
        let mut parts = self.parts.clone();
        parts.push(sub_id);
        Oid { parts }
    }

    pub fn common_prefix_len(&self, other: &Oid) -> usize {
        self.parts
            .iter()
            .zip(other.parts.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// The suffix of `self` beyond `self`'s first `prefix_len` subidentifiers.
    ///
    /// Used when partitioning a variable table's rows, whose `name` field
    /// stores only the part beyond the owning node's `namelen` (see
    /// `split_subtree` in the reference agent).
    pub fn suffix_from(&self, prefix_len: usize) -> &[u32] {
        &self.parts[prefix_len.min(self.parts.len())..]
    }

    /// Returns a copy of `self` with the last subidentifier incremented by
    /// one — the exclusive upper bound a fresh registration covers.
    pub fn successor_subid(&self) -> Oid {
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            *last = last.wrapping_add(1);
        }
        Oid { parts }
    }
}

impl FromStr for Oid {
    type Err = OidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('.').unwrap_or(s);

        if s.is_empty() {
            return Err(OidError::Empty);
        }

        let parts: Result<Vec<u32>, _> = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| OidError::InvalidPart(part.to_string()))
            })
            .collect();

        Self::new(parts?)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", s.join("."))
    }
}
