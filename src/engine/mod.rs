//! Matcher/coercer engine.
//!
//! # Data Flow
//! ```text
//! query string
//!     → RuleTable::resolve (scan rules in order)
//!     → first matching rule: extract captures
//!     → coerce.rs (captured text → ArgValue per declared type)
//!     → Return: FunctionCall, or NoMatch / TypeMismatch
//! ```
//!
//! # Design Decisions
//! - Pure: same query and table always give the same result
//! - First match wins; a coercion failure does not fall through to later rules
//! - No locking: the table is read-only once built

pub mod coerce;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::rules::RuleTable;

pub use coerce::{coerce, ArgValue, CoerceError};

/// Ordered argument mapping. Serializes as a JSON object in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments(Vec<(String, ArgValue)>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A resolved function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Arguments,
}

/// Why a query did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no rule matches the query")]
    NoMatch,

    #[error("rule `{function}` matched but argument `{argument}` could not be coerced")]
    TypeMismatch { function: String, argument: String },
}

impl RuleTable {
    /// Resolve `query` against the rules in order.
    pub fn resolve(&self, query: &str) -> Result<FunctionCall, ResolveError> {
        for rule in self.rules() {
            let Some(caps) = rule.pattern().captures(query) else {
                continue;
            };

            let mut arguments = Vec::with_capacity(rule.arguments().len());
            for (i, spec) in rule.arguments().iter().enumerate() {
                let mismatch = || ResolveError::TypeMismatch {
                    function: rule.function().to_string(),
                    argument: spec.name.clone(),
                };

                // Unmatched optional groups have no text to coerce.
                let raw = caps.get(i + 1).ok_or_else(mismatch)?;
                let value = coerce(spec.ty, raw.as_str()).map_err(|_| mismatch())?;
                arguments.push((spec.name.clone(), value));
            }

            return Ok(FunctionCall {
                name: rule.function().to_string(),
                arguments: Arguments(arguments),
            });
        }

        Err(ResolveError::NoMatch)
    }
}
