//! Permitted/prohibited claim composition and key-set views.

use claimgate_types::KeySet;
use serde_json::Value;
use tracing::debug;

use crate::claim_set::ClaimSet;
use crate::parser;
use crate::query::Query;
use crate::{ClaimError, Result};

/// Namespace views enumerate with the application's read verb.
const READ_VERB: &str = "read";

/// The effective authorization surface: a permitted claim set masked by
/// a prohibited one. Denials override grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    permitted: ClaimSet,
    prohibited: ClaimSet,
}

impl Ability {
    /// Compose the two sets. Permitted claims already covered by the
    /// prohibited set are dropped eagerly. The reduction is asymmetric:
    /// the prohibited set is kept verbatim, so a denial outlives the
    /// grants it currently masks.
    pub fn new(permitted: ClaimSet, prohibited: ClaimSet) -> Self {
        let reduced = permitted.reject(|claim| prohibited.query_claim(claim));
        let dropped = permitted.len() - reduced.len();
        if dropped > 0 {
            debug!(
                dropped,
                kept = reduced.len(),
                "reduced permitted claims against prohibitions"
            );
        }
        Self {
            permitted: reduced,
            prohibited,
        }
    }

    /// The permitted set after reduction.
    pub fn permitted(&self) -> &ClaimSet {
        &self.permitted
    }

    /// The prohibited set, verbatim.
    pub fn prohibited(&self) -> &ClaimSet {
        &self.prohibited
    }

    /// True when a grant covers the query and no denial does.
    pub fn can(&self, query: &Query) -> bool {
        self.permitted.matches(query) && !self.prohibited.matches(query)
    }

    /// Negation of [`Ability::can`].
    pub fn cannot(&self, query: &Query) -> bool {
        !self.can(query)
    }

    /// True when a denial covers the query, regardless of grants.
    pub fn explicitly_prohibited(&self, query: &Query) -> bool {
        self.prohibited.matches(query)
    }

    /// [`Ability::can`] over a raw single-entry JSON query object. A
    /// malformed object surfaces as [`ClaimError::InvalidClaim`] at
    /// this boundary.
    pub fn can_value(&self, value: &Value) -> Result<bool> {
        Ok(self.can(&Self::query_from_value(value)?))
    }

    /// [`Ability::cannot`] over a raw single-entry JSON query object.
    pub fn cannot_value(&self, value: &Value) -> Result<bool> {
        self.can_value(value).map(|can| !can)
    }

    /// [`Ability::explicitly_prohibited`] over a raw single-entry JSON
    /// query object.
    pub fn explicitly_prohibited_value(&self, value: &Value) -> Result<bool> {
        Ok(self.explicitly_prohibited(&Self::query_from_value(value)?))
    }

    fn query_from_value(value: &Value) -> Result<Query> {
        Query::from_value(value).map_err(|_| ClaimError::invalid_claim(value.to_string()))
    }

    /// The accessible keys directly under the queried namespace.
    ///
    /// A grant anywhere under `namespace.X` makes `X` reachable, so the
    /// allowed side collects direct descendants. A denial subtracts a
    /// key only when it sits exactly one level down: denying
    /// `namespace.X.y` does not take away `X` itself, denying
    /// `namespace.X` does. Hence direct children on the forbidden side.
    pub fn access_to_resources(&self, query: &Query) -> KeySet {
        let allowed = if self.permitted.matches(query) {
            KeySet::all()
        } else {
            KeySet::some(self.permitted.direct_descendants(query))
        };
        let forbidden = if self.prohibited.matches(query) {
            KeySet::all()
        } else {
            KeySet::some(self.prohibited.direct_children(query))
        };
        allowed.remove(&forbidden)
    }

    /// Accessible client keys under `clients`.
    pub fn access_to_client_keys(&self) -> KeySet {
        self.namespace_view("clients".to_string())
    }

    /// Accessible business group keys under `business-groups`.
    pub fn access_to_business_group_keys(&self) -> KeySet {
        self.namespace_view("business-groups".to_string())
    }

    /// Accessible project keys for a client.
    pub fn access_to_project_keys(&self, client: &str) -> Result<KeySet> {
        self.client_namespace_view(client, "projects.project")
    }

    /// Accessible team keys for a client.
    pub fn access_to_team_keys(&self, client: &str) -> Result<KeySet> {
        self.client_namespace_view(client, "teams.team")
    }

    /// Accessible people ids for a client.
    pub fn access_to_people_ids(&self, client: &str) -> Result<KeySet> {
        self.client_namespace_view(client, "people.id")
    }

    /// Accessible programme keys for a client.
    pub fn access_to_programme_keys(&self, client: &str) -> Result<KeySet> {
        self.client_namespace_view(client, "programmes.programme")
    }

    fn namespace_view(&self, path: String) -> KeySet {
        self.access_to_resources(&Query::scoped(READ_VERB, path))
    }

    fn client_namespace_view(&self, client: &str, suffix: &str) -> Result<KeySet> {
        parser::ensure_segment(client)?;
        Ok(self.namespace_view(format!("clients.{client}.{suffix}")))
    }
}
