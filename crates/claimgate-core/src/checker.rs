//! Raw-string shortcut API over claim strings.
//!
//! Some callers hold claim strings and nothing else, and cannot afford
//! parsing them into [`Claim`](crate::Claim) values. This module
//! answers the same questions directly on the strings. It splits
//! uniformly on `.` *and* `:`, treating the verb as the outermost path
//! segment; on well-formed claims its answers agree with the typed
//! engine.
//!
//! All functions are total: a malformed string simply never matches.

/// The claims found under a query prefix: either everything (the query
/// itself is already covered) or the matching claim strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubClaims {
    /// The query or one of its ancestors is claimed outright.
    All,
    /// The claims extending the query, verbatim.
    Matching(Vec<String>),
}

/// The keys found directly under a query prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubClaimKeys {
    /// The query itself is already covered; every key is accessible.
    All,
    /// Sorted unique keys one level below the query.
    Keys(Vec<String>),
}

/// True when some claim rule covers the query: the rule's segments are
/// a prefix of the query's. A rule ending in `*` sheds the wildcard
/// first, so `read:a.*` and `read:*` cover their whole subtrees.
pub fn query_claims<S: AsRef<str>>(query: &str, claims: &[S]) -> bool {
    let query = segments(query);
    claims
        .iter()
        .any(|claim| rule_covers(&segments(claim.as_ref()), &query))
}

/// True when the exact query, or any segment-prefix of it, appears in
/// `claims`, either verbatim or with a `:*`/`.*` suffix.
pub fn exact_or_ancestor<S: AsRef<str>>(query: &str, claims: &[S]) -> bool {
    let query = segments(query);
    claims.iter().any(|claim| {
        let claim = segments(claim.as_ref());
        let base = match claim.split_last() {
            Some((&"*", head)) => head,
            _ => &claim[..],
        };
        !base.is_empty() && base.len() <= query.len() && *base == query[..base.len()]
    })
}

/// The claims under the query: [`SubClaims::All`] when
/// [`exact_or_ancestor`] already holds, otherwise every claim whose
/// string extends the query by a `.` or `:` separator.
pub fn sub_claims<S: AsRef<str>>(query: &str, claims: &[S]) -> SubClaims {
    if exact_or_ancestor(query, claims) {
        return SubClaims::All;
    }
    let matching = claims
        .iter()
        .map(|claim| claim.as_ref())
        .filter(|claim| extends_query(claim, query))
        .map(str::to_string)
        .collect();
    SubClaims::Matching(matching)
}

/// Sorted unique first segments of the claims under the query. With
/// `only_direct`, only claims whose remainder is a single segment (or a
/// single segment plus `.*`) are counted.
pub fn sub_claims_direct_children<S: AsRef<str>>(
    query: &str,
    claims: &[S],
    only_direct: bool,
) -> SubClaimKeys {
    let matching = match sub_claims(query, claims) {
        SubClaims::All => return SubClaimKeys::All,
        SubClaims::Matching(matching) => matching,
    };

    let mut keys: Vec<String> = matching
        .iter()
        .filter_map(|claim| claim.get(query.len() + 1..))
        .filter(|rest| !only_direct || is_single_level(rest))
        .filter_map(|rest| rest.split(['.', ':']).next())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect();
    keys.sort();
    keys.dedup();
    SubClaimKeys::Keys(keys)
}

fn segments(claim: &str) -> Vec<&str> {
    claim.split(['.', ':']).collect()
}

fn rule_covers(rule: &[&str], query: &[&str]) -> bool {
    let rule = match rule.split_last() {
        Some((&"*", head)) => head,
        _ => rule,
    };
    !rule.is_empty() && rule.len() <= query.len() && rule == &query[..rule.len()]
}

fn extends_query(claim: &str, query: &str) -> bool {
    claim.len() > query.len()
        && claim.starts_with(query)
        && matches!(claim.as_bytes()[query.len()], b'.' | b':')
}

fn is_single_level(rest: &str) -> bool {
    let rest = rest.strip_suffix(".*").unwrap_or(rest);
    !rest.is_empty() && !rest.contains(['.', ':'])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAIMS: &[&str] = &[
        "read:clients.this-guy.stuff",
        "read:clients.this-guy.wooa",
        "read:clients.this-guy.wooa.and.another",
        "read:clients.this-guy.wat.is.this",
    ];

    #[test]
    fn test_query_claims_ancestor_rules_match() {
        let claims = ["read:clients.this-guy"];
        assert!(query_claims("read:clients.this-guy", &claims));
        assert!(query_claims("read:clients.this-guy.stuff", &claims));
        assert!(!query_claims("read:clients.other-guy", &claims));
        assert!(!query_claims("write:clients.this-guy", &claims));
    }

    #[test]
    fn test_query_claims_wildcard_rules_match_descendants() {
        assert!(query_claims("read:anything.at.all", &["read:*"]));
        assert!(query_claims("read:a.b.c", &["read:a.*"]));
        assert!(!query_claims("read:b.c", &["read:a.*"]));
    }

    #[test]
    fn test_query_claims_descendant_rules_do_not_match() {
        assert!(!query_claims("read:clients", CLAIMS));
    }

    #[test]
    fn test_exact_or_ancestor() {
        let claims = ["read:clients.this-guy", "write:*"];
        assert!(exact_or_ancestor("read:clients.this-guy", &claims));
        assert!(exact_or_ancestor("read:clients.this-guy.deeper", &claims));
        assert!(exact_or_ancestor("write:anything", &claims));
        assert!(!exact_or_ancestor("read:clients", &claims));
        assert!(!exact_or_ancestor("read:other", &claims));
    }

    #[test]
    fn test_exact_or_ancestor_with_wildcard_suffix() {
        assert!(exact_or_ancestor("read:a.b", &["read:a.*"]));
        assert!(exact_or_ancestor("read:a.b", &["read:a.b.*"]));
        assert!(!exact_or_ancestor("read:a", &["read:a.b.*"]));
    }

    #[test]
    fn test_sub_claims_collects_extensions() {
        let found = sub_claims("read:clients.this-guy", CLAIMS);
        assert_eq!(
            found,
            SubClaims::Matching(CLAIMS.iter().map(|c| c.to_string()).collect())
        );

        // A prefix at the string level but not the segment level.
        let found = sub_claims("read:clients.this", CLAIMS);
        assert_eq!(found, SubClaims::Matching(vec![]));
    }

    #[test]
    fn test_sub_claims_all_when_query_covered() {
        assert_eq!(
            sub_claims("read:clients.this-guy.stuff.deeper", CLAIMS),
            SubClaims::All
        );
        assert_eq!(sub_claims("read:a.b", &["read:*"]), SubClaims::All);
    }

    #[test]
    fn test_sub_claims_direct_children_only_direct() {
        assert_eq!(
            sub_claims_direct_children("read:clients.this-guy", CLAIMS, true),
            SubClaimKeys::Keys(vec!["stuff".to_string(), "wooa".to_string()])
        );
    }

    #[test]
    fn test_sub_claims_direct_children_all_descendants() {
        assert_eq!(
            sub_claims_direct_children("read:clients.this-guy", CLAIMS, false),
            SubClaimKeys::Keys(vec![
                "stuff".to_string(),
                "wat".to_string(),
                "wooa".to_string(),
            ])
        );
    }

    #[test]
    fn test_sub_claims_direct_children_counts_wildcard_remainders() {
        let claims = ["read:clients.a.*", "read:clients.b.c.*"];
        assert_eq!(
            sub_claims_direct_children("read:clients", &claims, true),
            SubClaimKeys::Keys(vec!["a".to_string()])
        );
        assert_eq!(
            sub_claims_direct_children("read:clients", &claims, false),
            SubClaimKeys::Keys(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_verb_segment_children() {
        // The verb is just the outermost segment here.
        let claims = ["read:clients", "write:clients"];
        assert_eq!(
            sub_claims_direct_children("read", &claims, true),
            SubClaimKeys::Keys(vec!["clients".to_string()])
        );
    }

    #[test]
    fn test_agrees_with_typed_engine_on_well_formed_input() {
        use crate::{ClaimSet, Query};

        let strings = ["read:some.stuff", "do:*"];
        let set = ClaimSet::from_strings(strings).unwrap();

        let query = Query::new("read", Some("some.stuff.nested")).unwrap();
        assert_eq!(
            set.matches(&query),
            query_claims("read:some.stuff.nested", &strings)
        );

        let query = Query::new("read", Some("other")).unwrap();
        assert_eq!(set.matches(&query), query_claims("read:other", &strings));

        let query = Query::new("do", Some("anything")).unwrap();
        assert_eq!(set.matches(&query), query_claims("do:anything", &strings));
    }
}
