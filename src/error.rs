//! Typed failures surfaced by the registry and index allocator.

use thiserror::Error;

use crate::oid::Oid;

#[derive(Debug, Clone, Error)]
pub enum RegisterError {
    #[error("{name} is already registered at priority {priority}")]
    DuplicateRegistration { name: Oid, priority: i32 },
    #[error("registration of {name} failed")]
    Failed { name: Oid },
}

#[derive(Debug, Clone, Error)]
pub enum UnregisterError {
    #[error("no registration for {name} at priority {priority}")]
    NoSuchRegistration { name: Oid, priority: i32 },
}

#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("no index allocated for {name} with the given value")]
    NotAllocated { name: Oid },
    #[error("index value for {name} has the wrong type")]
    WrongType { name: Oid },
    #[error("index entry for {name} is owned by a different session")]
    WrongSession { name: Oid },
    #[error("index value for {name} is already allocated")]
    Duplicate { name: Oid },
}
