//! Point-query argument and its edge adapters.

use serde_json::Value;

use crate::claim::{Claim, Resource};
use crate::parser;
use crate::{ClaimError, Result};

/// A normalized point query: a verb over an optional resource path.
///
/// This is the typed form of the caller-facing single-entry
/// `{verb: resource}` mapping. The resource forms absent, `""` and
/// `"*"` all normalize to a resource-less query; a trailing `.*` on a
/// path is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    verb: String,
    resource: Option<Resource>,
}

impl Query {
    /// Build a query, validating the verb and resource forms. Failures
    /// are [`ClaimError::InvalidArgument`].
    pub fn new(verb: impl Into<String>, resource: Option<&str>) -> Result<Self> {
        let verb = verb.into();
        parser::ensure_verb(&verb)?;
        let resource = match resource {
            None => None,
            Some(raw) => parser::parse_query_resource(raw)?.map(Resource::new),
        };
        Ok(Self { verb, resource })
    }

    /// Adapt a single-entry JSON object `{verb: resource}`, where the
    /// resource value is a string or null.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ClaimError::invalid_argument("query must be a JSON object"))?;

        let mut entries = object.iter();
        let (verb, resource) = entries
            .next()
            .ok_or_else(|| ClaimError::invalid_argument("query must have exactly one entry"))?;
        if entries.next().is_some() {
            return Err(ClaimError::invalid_argument(
                "query must have exactly one entry",
            ));
        }

        let resource = match resource {
            Value::Null => None,
            Value::String(raw) => Some(raw.as_str()),
            other => {
                return Err(ClaimError::invalid_argument(format!(
                    "query resource must be a string or null, got {other}"
                )))
            }
        };

        Self::new(verb.as_str(), resource)
    }

    /// The query a claim itself denotes; a global claim maps to a
    /// resource-less query. Total, since claims are valid by
    /// construction.
    pub fn from_claim(claim: &Claim) -> Self {
        Self {
            verb: claim.verb().to_string(),
            resource: claim.resource().cloned(),
        }
    }

    /// Internal constructor for statically known-valid paths.
    pub(crate) fn scoped(verb: &str, path: String) -> Self {
        Self {
            verb: verb.to_string(),
            resource: Some(Resource::new(path)),
        }
    }

    /// The action token.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The queried resource, if any.
    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_forms_normalize() {
        let absent = Query::new("read", None).unwrap();
        let empty = Query::new("read", Some("")).unwrap();
        let star = Query::new("read", Some("*")).unwrap();
        assert_eq!(absent, empty);
        assert_eq!(absent, star);
        assert_eq!(absent.resource(), None);
    }

    #[test]
    fn test_trailing_wildcard_normalizes() {
        let plain = Query::new("read", Some("a.b")).unwrap();
        let starred = Query::new("read", Some("a.b.*")).unwrap();
        assert_eq!(plain, starred);
        assert_eq!(plain.resource().unwrap().path(), "a.b");
        assert_eq!(plain.resource().unwrap().parts(), ["a", "b"]);
    }

    #[test]
    fn test_rejects_bad_tokens() {
        assert!(Query::new("", Some("a")).is_err());
        assert!(Query::new("re ad", Some("a")).is_err());
        assert!(Query::new("read", Some("a..b")).is_err());
        assert!(Query::new("read", Some("a.")).is_err());
        assert!(Query::new("read", Some("*.a")).is_err());
    }

    #[test]
    fn test_from_value() {
        let q = Query::from_value(&json!({"read": "a.b"})).unwrap();
        assert_eq!(q, Query::new("read", Some("a.b")).unwrap());

        let global = Query::from_value(&json!({"read": null})).unwrap();
        assert_eq!(global, Query::new("read", None).unwrap());

        let star = Query::from_value(&json!({"read": "*"})).unwrap();
        assert_eq!(star, Query::new("read", None).unwrap());
    }

    #[test]
    fn test_from_value_rejects_bad_shapes() {
        for value in [
            json!("read"),
            json!(null),
            json!({}),
            json!({"read": "a", "write": "b"}),
            json!({"read": 1}),
            json!({"read": ["a"]}),
            json!({"": "a"}),
        ] {
            assert!(Query::from_value(&value).is_err(), "accepted {value}");
        }
    }

    #[test]
    fn test_from_value_errors_are_invalid_argument() {
        let err = Query::from_value(&json!({})).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidArgument { .. }));
    }

    #[test]
    fn test_from_claim() {
        let scoped = Claim::parse("read:a.b").unwrap();
        assert_eq!(Query::from_claim(&scoped), Query::new("read", Some("a.b")).unwrap());

        let global = Claim::parse("read:*").unwrap();
        assert_eq!(Query::from_claim(&global), Query::new("read", None).unwrap());
    }
}
