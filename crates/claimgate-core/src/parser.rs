//! Pest-backed parsing of claim strings and query resources.

use pest::Parser;
use pest_derive::Parser;

use crate::{ClaimError, Result};

#[derive(Parser)]
#[grammar = "claim.pest"]
struct ClaimParser;

/// Parse a full claim string into its verb and optional resource path.
///
/// The trailing `.*` sugar is consumed and discarded here, so
/// `read:a.b.*` and `read:a.b` come out identical. An absent resource
/// means the claim is global (`verb:*`).
pub(crate) fn parse_claim(input: &str) -> Result<(String, Option<String>)> {
    let mut pairs = ClaimParser::parse(Rule::claim, input)
        .map_err(|_| ClaimError::invalid_claim(input))?;

    let claim = pairs.next().ok_or_else(|| ClaimError::invalid_claim(input))?;

    let mut verb = None;
    let mut resource = None;

    for pair in claim.into_inner() {
        match pair.as_rule() {
            Rule::verb => verb = Some(pair.as_str().to_string()),
            Rule::global => {}
            Rule::resource => resource = resource_path(pair),
            Rule::EOI => {}
            _ => {}
        }
    }

    let verb = verb.ok_or_else(|| ClaimError::invalid_claim(input))?;
    Ok((verb, resource))
}

/// Parse a query resource string. The empty string and `"*"` normalize
/// to `None`; a dotted path (with optional trailing `.*`) to the path.
pub(crate) fn parse_query_resource(input: &str) -> Result<Option<String>> {
    let mut pairs = ClaimParser::parse(Rule::query_resource, input)
        .map_err(|_| invalid_resource(input))?;

    let parsed = pairs.next().ok_or_else(|| invalid_resource(input))?;

    let mut resource = None;
    for pair in parsed.into_inner() {
        if pair.as_rule() == Rule::resource {
            resource = resource_path(pair);
        }
    }
    Ok(resource)
}

/// Validate a verb token in isolation.
pub(crate) fn ensure_verb(input: &str) -> Result<()> {
    ClaimParser::parse(Rule::verb_only, input)
        .map(|_| ())
        .map_err(|_| ClaimError::invalid_argument(format!("invalid verb: {input:?}")))
}

/// Validate a single path segment in isolation.
pub(crate) fn ensure_segment(input: &str) -> Result<()> {
    ClaimParser::parse(Rule::segment_only, input)
        .map(|_| ())
        .map_err(|_| ClaimError::invalid_argument(format!("invalid path segment: {input:?}")))
}

fn resource_path(pair: pest::iterators::Pair<Rule>) -> Option<String> {
    pair.into_inner()
        .find(|inner| inner.as_rule() == Rule::path)
        .map(|inner| inner.as_str().to_string())
}

fn invalid_resource(input: &str) -> ClaimError {
    ClaimError::invalid_argument(format!("invalid query resource: {input:?}"))
}
