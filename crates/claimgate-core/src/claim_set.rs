//! Ordered, deduplicated claim collections and their set-level queries.

use std::collections::BTreeSet;
use std::slice;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claim::Claim;
use crate::query::Query;
use crate::Result;

/// An ordered set of claims: sorted ascending by canonical string and
/// deduplicated by claim equality, so `read:a.b` and `read:a.b.*`
/// collapse to one member.
///
/// Sets are built once and queried; [`ClaimSet::add`] exists for
/// construction. Every query is a fold across the members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a set from claim strings. The first invalid string aborts
    /// construction.
    pub fn from_strings<I, S>(strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let claims = strings
            .into_iter()
            .map(|raw| Claim::parse(raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_claims(claims))
    }

    /// Parse a set from claim strings, silently skipping invalid
    /// entries. This is the one place an invalid claim is discarded
    /// instead of surfaced.
    pub fn from_strings_lossy<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skipped = 0usize;
        let claims: Vec<Claim> = strings
            .into_iter()
            .filter_map(|raw| match Claim::parse(raw.as_ref()) {
                Ok(claim) => Some(claim),
                Err(_) => {
                    skipped += 1;
                    None
                }
            })
            .collect();
        if skipped > 0 {
            debug!(skipped, kept = claims.len(), "skipped invalid claim strings");
        }
        Self::from_claims(claims)
    }

    /// Build a set from already-parsed claims.
    pub fn from_claims<I>(claims: I) -> Self
    where
        I: IntoIterator<Item = Claim>,
    {
        let mut claims: Vec<Claim> = claims.into_iter().collect();
        claims.sort();
        claims.dedup();
        Self { claims }
    }

    /// Insert a claim, keeping order and uniqueness.
    pub fn add(&mut self, claim: Claim) {
        if let Err(position) = self.claims.binary_search(&claim) {
            self.claims.insert(position, claim);
        }
    }

    /// True when any member authorizes the query.
    pub fn matches(&self, query: &Query) -> bool {
        self.claims.iter().any(|claim| claim.matches(query))
    }

    /// True when any member names the query scope exactly.
    pub fn matches_exactly(&self, query: &Query) -> bool {
        self.claims.iter().any(|claim| claim.matches_exactly(query))
    }

    /// True when any member authorizes the scope the given claim
    /// denotes. This is the coverage relation grants are reduced with
    /// against denials.
    pub fn query_claim(&self, claim: &Claim) -> bool {
        self.matches(&Query::from_claim(claim))
    }

    /// Sorted unique keys the members name exactly one level below the
    /// queried resource.
    pub fn direct_children(&self, query: &Query) -> BTreeSet<String> {
        self.claims
            .iter()
            .filter_map(|claim| claim.direct_child(query))
            .map(str::to_string)
            .collect()
    }

    /// Sorted unique keys immediately below the queried resource along
    /// any member's path.
    pub fn direct_descendants(&self, query: &Query) -> BTreeSet<String> {
        self.claims
            .iter()
            .filter_map(|claim| claim.direct_descendant(query))
            .map(str::to_string)
            .collect()
    }

    /// The members satisfying the predicate, as a new set.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Claim) -> bool,
    {
        Self {
            claims: self
                .claims
                .iter()
                .filter(|claim| predicate(claim))
                .cloned()
                .collect(),
        }
    }

    /// The members failing the predicate, as a new set.
    pub fn reject<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Claim) -> bool,
    {
        self.filter(|claim| !predicate(claim))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    /// Canonical strings of the members, ascending.
    pub fn canonical_strings(&self) -> Vec<String> {
        self.claims
            .iter()
            .map(|claim| claim.canonical().to_string())
            .collect()
    }

    /// The members as a sorted JSON array of canonical strings.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.canonical_strings())
    }

    /// The JSON encoding of [`ClaimSet::as_json`].
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("JSON serialization failed")
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

impl Serialize for ClaimSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.claims.len()))?;
        for claim in &self.claims {
            seq.serialize_element(claim.canonical())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        ClaimSet::from_strings(strings).map_err(serde::de::Error::custom)
    }
}
