//! Rule compilation and validation.
//!
//! # Responsibilities
//! - Compile each rule pattern, anchored at the start of the query
//! - Verify capture groups line up with declared arguments
//! - Hold the ordered rules for the engine
//!
//! # Design Decisions
//! - Fail fast: a malformed rule can never succeed at request time,
//!   so it is rejected before the listener binds
//! - Argument names and types travel together in one `ArgumentSpec`

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of a captured argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// Base-10 signed integer.
    Integer,
    /// Captured text as-is.
    String,
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Integer => f.write_str("integer"),
            ArgType::String => f.write_str("string"),
        }
    }
}

/// How much of the query a pattern has to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Anchored at the start only; trailing text is ignored.
    #[default]
    Prefix,
    /// Anchored at both ends.
    Full,
}

impl MatchMode {
    fn anchor(self, pattern: &str) -> String {
        match self {
            MatchMode::Prefix => format!("^(?:{pattern})"),
            MatchMode::Full => format!("^(?:{pattern})$"),
        }
    }
}

/// A named, typed argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArgumentSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ArgType,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, ty: ArgType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Uncompiled rule, as written in code or in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleDefinition {
    /// Regular expression with one capture group per argument.
    pub pattern: String,

    /// Function name returned on match.
    pub function: String,

    /// Arguments in capture-group order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

impl RuleDefinition {
    pub fn new(
        pattern: impl Into<String>,
        function: impl Into<String>,
        arguments: Vec<ArgumentSpec>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            function: function.into(),
            arguments,
        }
    }
}

/// Errors raised while building a rule table.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule #{index} ({function}): invalid pattern: {source}")]
    InvalidPattern {
        index: usize,
        function: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule #{index}: function name is empty")]
    EmptyFunctionName { index: usize },

    #[error("rule #{index} ({function}): pattern has {captures} capture groups but {arguments} arguments are declared")]
    CaptureCountMismatch {
        index: usize,
        function: String,
        captures: usize,
        arguments: usize,
    },

    #[error("rule #{index} ({function}): argument name is empty")]
    EmptyArgumentName { index: usize, function: String },

    #[error("rule #{index} ({function}): argument `{name}` declared more than once")]
    DuplicateArgument {
        index: usize,
        function: String,
        name: String,
    },
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    function: String,
    arguments: Vec<ArgumentSpec>,
}

impl Rule {
    /// Compile `def` as the rule at position `index` of a table.
    pub fn compile(index: usize, def: &RuleDefinition, mode: MatchMode) -> Result<Self, RuleError> {
        if def.function.is_empty() {
            return Err(RuleError::EmptyFunctionName { index });
        }

        let invalid = |source: regex::Error| RuleError::InvalidPattern {
            index,
            function: def.function.clone(),
            source,
        };

        // The bare pattern must parse on its own, otherwise a stray `)` could
        // close the anchoring group early.
        Regex::new(&def.pattern).map_err(invalid)?;
        let pattern = Regex::new(&mode.anchor(&def.pattern)).map_err(invalid)?;

        // Group 0 is the whole match.
        let captures = pattern.captures_len() - 1;
        if captures != def.arguments.len() {
            return Err(RuleError::CaptureCountMismatch {
                index,
                function: def.function.clone(),
                captures,
                arguments: def.arguments.len(),
            });
        }

        let mut seen = HashSet::new();
        for arg in &def.arguments {
            if arg.name.is_empty() {
                return Err(RuleError::EmptyArgumentName {
                    index,
                    function: def.function.clone(),
                });
            }
            if !seen.insert(arg.name.as_str()) {
                return Err(RuleError::DuplicateArgument {
                    index,
                    function: def.function.clone(),
                    name: arg.name.clone(),
                });
            }
        }

        Ok(Self {
            pattern,
            function: def.function.clone(),
            arguments: def.arguments.clone(),
        })
    }

    /// The anchored, compiled pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }
}

/// Ordered, immutable collection of compiled rules.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    mode: MatchMode,
}

impl RuleTable {
    /// Compile `definitions` in order. Stops at the first invalid rule.
    pub fn new(definitions: &[RuleDefinition], mode: MatchMode) -> Result<Self, RuleError> {
        let rules = definitions
            .iter()
            .enumerate()
            .map(|(index, def)| Rule::compile(index, def, mode))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules, mode })
    }

    /// The built-in rule set.
    pub fn defaults(mode: MatchMode) -> Result<Self, RuleError> {
        Self::new(&super::defaults::definitions(), mode)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(name: &str) -> ArgumentSpec {
        ArgumentSpec::new(name, ArgType::Integer)
    }

    #[test]
    fn test_defaults_compile() {
        let table = RuleTable::defaults(MatchMode::Prefix).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.rules()[0].function(), "get_ticket_status");
        assert_eq!(table.rules()[4].function(), "report_office_issue");
        assert_eq!(table.mode(), MatchMode::Prefix);
    }

    #[test]
    fn test_capture_count_mismatch_rejected() {
        let defs = vec![RuleDefinition::new(
            r"ticket ([0-9]+) for ([0-9]+)",
            "get_ticket_status",
            vec![int("ticket_id")],
        )];

        match RuleTable::new(&defs, MatchMode::Prefix) {
            Err(RuleError::CaptureCountMismatch {
                index,
                captures,
                arguments,
                ..
            }) => {
                assert_eq!(index, 0);
                assert_eq!(captures, 2);
                assert_eq!(arguments, 1);
            }
            other => panic!("expected capture count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let defs = vec![
            RuleDefinition::new(r"ok ([0-9]+)", "first", vec![int("a")]),
            RuleDefinition::new(r"broken ([0-9]+", "second", vec![int("a")]),
        ];

        let err = RuleTable::new(&defs, MatchMode::Prefix).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { index: 1, .. }));
        assert!(err.to_string().contains("second"));
    }

    #[test]
    fn test_unbalanced_group_cannot_escape_anchor() {
        // `^(?:x)|(?:y)` would compile and match "y" anywhere.
        let defs = vec![RuleDefinition::new(r"x)|(?:y", "escape", vec![])];

        for mode in [MatchMode::Prefix, MatchMode::Full] {
            let err = RuleTable::new(&defs, mode).unwrap_err();
            assert!(matches!(err, RuleError::InvalidPattern { index: 0, .. }), "{mode:?}");
        }
    }

    #[test]
    fn test_duplicate_argument_rejected() {
        let defs = vec![RuleDefinition::new(
            r"([0-9]+)-([0-9]+)",
            "range",
            vec![int("n"), int("n")],
        )];

        let err = RuleTable::new(&defs, MatchMode::Prefix).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateArgument { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_empty_names_rejected() {
        let defs = vec![RuleDefinition::new(r"x", "", vec![])];
        assert!(matches!(
            RuleTable::new(&defs, MatchMode::Prefix),
            Err(RuleError::EmptyFunctionName { index: 0 })
        ));

        let defs = vec![RuleDefinition::new(r"([0-9]+)", "f", vec![int("")])];
        assert!(matches!(
            RuleTable::new(&defs, MatchMode::Prefix),
            Err(RuleError::EmptyArgumentName { index: 0, .. })
        ));
    }

    #[test]
    fn test_anchoring() {
        let defs = vec![RuleDefinition::new(r"ticket ([0-9]+)", "t", vec![int("id")])];

        let prefix = RuleTable::new(&defs, MatchMode::Prefix).unwrap();
        let pattern = prefix.rules()[0].pattern();
        assert!(pattern.is_match("ticket 1 please"));
        assert!(!pattern.is_match("my ticket 1"));

        let full = RuleTable::new(&defs, MatchMode::Full).unwrap();
        let pattern = full.rules()[0].pattern();
        assert!(pattern.is_match("ticket 1"));
        assert!(!pattern.is_match("ticket 1 please"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let defs = vec![RuleDefinition::new(r"a([0-9])|b([0-9])", "ab", vec![int("x"), int("y")])];
        let table = RuleTable::new(&defs, MatchMode::Prefix).unwrap();
        assert!(!table.rules()[0].pattern().is_match("zb1"));
    }

    #[test]
    fn test_definition_from_toml() {
        let def: RuleDefinition = toml::from_str(
            r#"
            pattern = 'Close ticket ([0-9]+)\.'
            function = "close_ticket"
            arguments = [{ name = "ticket_id", type = "integer" }]
            "#,
        )
        .unwrap();

        assert_eq!(def.function, "close_ticket");
        assert_eq!(def.arguments, vec![int("ticket_id")]);
    }
}
