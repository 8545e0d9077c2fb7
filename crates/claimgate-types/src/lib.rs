//! # Claimgate Types
//!
//! Shared value types consumed by the claimgate authorization engine.
//!
//! The main export is [`KeySet`], the accessibility lattice the engine
//! projects namespace views onto. It is deliberately narrow: four
//! variants, normalizing constructors, and a single [`KeySet::remove`]
//! combinator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A set of keys under a namespace, expressed over the
/// all / none / some / all-except-some lattice.
///
/// Keys are held in a `BTreeSet` so enumeration is deterministic.
/// Values are canonical: an empty `Some` is [`KeySet::None`] and an
/// empty `AllExceptSome` is [`KeySet::All`]. Construct through
/// [`KeySet::some`] and [`KeySet::all_except_some`] to preserve that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySet {
    /// Every key is in the set.
    All,
    /// No key is in the set.
    None,
    /// Exactly these keys are in the set.
    Some(BTreeSet<String>),
    /// Every key except these is in the set.
    AllExceptSome(BTreeSet<String>),
}

impl KeySet {
    /// The full set.
    pub fn all() -> Self {
        KeySet::All
    }

    /// The empty set.
    pub fn none() -> Self {
        KeySet::None
    }

    /// A finite set of keys. An empty iterator yields [`KeySet::None`].
    pub fn some<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            KeySet::None
        } else {
            KeySet::Some(keys)
        }
    }

    /// The complement of a finite set of keys. An empty iterator yields
    /// [`KeySet::All`].
    pub fn all_except_some<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            KeySet::All
        } else {
            KeySet::AllExceptSome(keys)
        }
    }

    /// Set difference lifted to the lattice: the keys in `self` that
    /// are not in `other`.
    pub fn remove(&self, other: &KeySet) -> KeySet {
        match (self, other) {
            (KeySet::None, _) | (_, KeySet::All) => KeySet::None,
            (keep, KeySet::None) => keep.clone(),
            (KeySet::All, KeySet::Some(removed)) => {
                Self::all_except_some(removed.iter().cloned())
            }
            (KeySet::All, KeySet::AllExceptSome(kept)) => Self::some(kept.iter().cloned()),
            (KeySet::Some(keys), KeySet::Some(removed)) => {
                Self::some(keys.difference(removed).cloned())
            }
            (KeySet::Some(keys), KeySet::AllExceptSome(kept)) => {
                Self::some(keys.intersection(kept).cloned())
            }
            (KeySet::AllExceptSome(missing), KeySet::Some(removed)) => {
                Self::all_except_some(missing.union(removed).cloned())
            }
            (KeySet::AllExceptSome(missing), KeySet::AllExceptSome(kept)) => {
                Self::some(kept.difference(missing).cloned())
            }
        }
    }
}
