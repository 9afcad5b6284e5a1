/*!
Hard input-contract violations.

A `ResolveError` always means the caller handed the resolver something it can never
resolve (a malformed datapath id, an empty key component, a reference of the wrong kind).
Ordinary resolution misses, e.g. a topology that has not converged yet, are `None` instead.
*/

use thiserror::Error;

use crate::topology::path::PathTarget;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Malformed datapath id: {0}")]
    MalformedDatapathId(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Wrong reference type: expected {expected}, found {found}")]
    WrongReferenceType {
        expected: PathTarget,
        found: PathTarget,
    },
    #[error("Missing bridge identity: {0}")]
    MissingBridgeIdentity(String),
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),
}

pub type ResolveResult<T> = Result<T, ResolveError>;
