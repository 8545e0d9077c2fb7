//! Claim value type and its containment relations.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::parser;
use crate::query::Query;
use crate::{ClaimError, Result};

/// A dotted resource path with its cached segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    path: String,
    parts: Vec<String>,
}

impl Resource {
    /// `path` must be a valid dotted path; callers go through the
    /// grammar first.
    pub(crate) fn new(path: String) -> Self {
        let parts = path.split('.').map(str::to_string).collect();
        Self { path, parts }
    }

    /// The dotted path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path split on `.`.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub(crate) fn is_ancestor_or_equal_of(&self, other: &Resource) -> bool {
        other.parts.len() >= self.parts.len()
            && self.parts[..] == other.parts[..self.parts.len()]
    }
}

/// A single textual grant: a verb over an optional dotted resource path.
///
/// `read:a.b.*` normalizes to `read:a.b` at parse time; the two are the
/// same claim. A claim without a resource (`read:*`) is *global* and
/// covers every resource under its verb.
///
/// Equality and hashing are on `(verb, resource)`; ordering is on the
/// canonical string.
#[derive(Debug, Clone)]
pub struct Claim {
    verb: String,
    resource: Option<Resource>,
    canonical: String,
}

impl Claim {
    /// Parse a claim string.
    pub fn parse(input: &str) -> Result<Self> {
        let (verb, resource) = parser::parse_claim(input)?;
        Ok(Self::from_parts(verb, resource))
    }

    /// `verb` and `resource` must already satisfy the grammar.
    pub(crate) fn from_parts(verb: String, resource: Option<String>) -> Self {
        let resource = resource.map(Resource::new);
        let canonical = match &resource {
            None => format!("{verb}:*"),
            Some(resource) => format!("{verb}:{}", resource.path()),
        };
        Self { verb, resource, canonical }
    }

    /// The action token.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The resource path, absent on global claims.
    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// True when the claim grants its verb over every resource.
    pub fn is_global(&self) -> bool {
        self.resource.is_none()
    }

    /// The canonical textual form: `verb:*` when global, `verb:path`
    /// otherwise. This is the identity of the claim.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// True when this claim authorizes the query: verbs are equal and
    /// the claim is global or an ancestor of (or equal to) the queried
    /// resource. A resource-less query is matched by global claims only.
    pub fn matches(&self, query: &Query) -> bool {
        if self.verb != query.verb() {
            return false;
        }
        match &self.resource {
            None => true,
            Some(resource) => query
                .resource()
                .is_some_and(|queried| resource.is_ancestor_or_equal_of(queried)),
        }
    }

    /// True when the claim and the query name the same scope exactly:
    /// both global, or the same resource path.
    pub fn matches_exactly(&self, query: &Query) -> bool {
        if self.verb != query.verb() {
            return false;
        }
        match (&self.resource, query.resource()) {
            (None, None) => true,
            (Some(resource), Some(queried)) => resource == queried,
            _ => false,
        }
    }

    /// The key this claim names exactly one level below the queried
    /// resource. For a resource-less query that is the claim's single
    /// segment, if it has exactly one.
    pub fn direct_child(&self, query: &Query) -> Option<&str> {
        let resource = self.resource.as_ref()?;
        if self.verb != query.verb() {
            return None;
        }
        match query.resource() {
            None => match resource.parts() {
                [only] => Some(only.as_str()),
                _ => None,
            },
            Some(queried) => {
                if resource.parts().len() == queried.parts().len() + 1
                    && queried.is_ancestor_or_equal_of(resource)
                {
                    resource.parts().last().map(String::as_str)
                } else {
                    None
                }
            }
        }
    }

    /// The key immediately below the queried resource along this
    /// claim's path, which may run deeper. For a resource-less query
    /// that is the claim's first segment.
    pub fn direct_descendant(&self, query: &Query) -> Option<&str> {
        let resource = self.resource.as_ref()?;
        if self.verb != query.verb() {
            return None;
        }
        match query.resource() {
            None => resource.parts().first().map(String::as_str),
            Some(queried) => {
                if resource.parts().len() > queried.parts().len()
                    && queried.is_ancestor_or_equal_of(resource)
                {
                    Some(resource.parts()[queried.parts().len()].as_str())
                } else {
                    None
                }
            }
        }
    }

    /// Boolean projection of [`Claim::direct_child`].
    pub fn is_direct_child_for(&self, query: &Query) -> bool {
        self.direct_child(query).is_some()
    }

    /// Boolean projection of [`Claim::direct_descendant`].
    pub fn is_direct_descendant_for(&self, query: &Query) -> bool {
        self.direct_descendant(query).is_some()
    }

    /// The canonical string as a JSON value.
    pub fn as_json(&self) -> serde_json::Value {
        serde_json::Value::String(self.canonical.clone())
    }

    /// The JSON encoding of the canonical string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("JSON serialization failed")
    }
}

impl PartialEq for Claim {
    fn eq(&self, other: &Self) -> bool {
        self.verb == other.verb && self.resource == other.resource
    }
}

impl Eq for Claim {}

impl Hash for Claim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The canonical string carries exactly (verb, resource).
        self.canonical.hash(state);
    }
}

impl PartialOrd for Claim {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Claim {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Claim {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Claim {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for Claim {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Claim::parse(&raw).map_err(serde::de::Error::custom)
    }
}
