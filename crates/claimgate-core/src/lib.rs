//! # Claimgate Core
//!
//! Hierarchical claims authorization engine.
//!
//! A claim is a small textual grant of the form `verb:resource.path`:
//! the right to perform a verb on a node of a dot-separated resource
//! tree. A claim over a path covers the whole subtree below it, and
//! `verb:*` covers every resource under that verb. The engine composes
//! permitted claims with prohibited ones (denials override grants) and
//! answers three kinds of questions:
//!
//! - point queries: [`Ability::can`]
//! - enumeration: [`ClaimSet::direct_children`],
//!   [`ClaimSet::direct_descendants`]
//! - key-set views over a namespace: [`Ability::access_to_resources`],
//!   projected onto the [`KeySet`] lattice
//!
//! ```
//! use claimgate_core::{Ability, ClaimSet, Query};
//!
//! let permitted = ClaimSet::from_strings(["read:clients", "admin:*"]).unwrap();
//! let prohibited = ClaimSet::from_strings(["read:clients.acmeinc"]).unwrap();
//! let ability = Ability::new(permitted, prohibited);
//!
//! let clients = Query::new("read", Some("clients")).unwrap();
//! let acmeinc = Query::new("read", Some("clients.acmeinc")).unwrap();
//! assert!(ability.can(&clients));
//! assert!(ability.cannot(&acmeinc));
//! ```
//!
//! Everything here is pure and value-oriented: construction allocates,
//! queries are read-only, and constructed values can be shared across
//! threads freely.

use thiserror::Error;

mod parser;

mod claim;
pub use claim::{Claim, Resource};

mod query;
pub use query::Query;

mod claim_set;
pub use claim_set::ClaimSet;

mod ability;
pub use ability::Ability;

pub mod checker;

pub use claimgate_types::KeySet;

/// Errors surfaced by the engine. Two kinds only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// The string does not conform to the claim grammar.
    #[error("invalid claim: {claim:?}")]
    InvalidClaim { claim: String },

    /// A query was built from a malformed argument.
    #[error("invalid query argument: {message}")]
    InvalidArgument { message: String },
}

impl ClaimError {
    pub(crate) fn invalid_claim(claim: impl Into<String>) -> Self {
        ClaimError::InvalidClaim { claim: claim.into() }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ClaimError::InvalidArgument { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, ClaimError>;
