//! Built-in rule set.
//!
//! `\d` matches any Unicode decimal digit; integer coercion normalizes them.

use super::table::{ArgType, ArgumentSpec, RuleDefinition};

/// The default rules, in priority order.
pub fn definitions() -> Vec<RuleDefinition> {
    vec![
        // "What is the status of ticket 83742?"
        RuleDefinition::new(
            r"What is the status of ticket (\d+)\?",
            "get_ticket_status",
            vec![ArgumentSpec::new("ticket_id", ArgType::Integer)],
        ),
        // "Schedule a meeting on 2025-02-15 at 14:00 in Room A."
        RuleDefinition::new(
            r"Schedule a meeting on ([\d\-]+) at ([\d:]+) in (.*)\.",
            "schedule_meeting",
            vec![
                ArgumentSpec::new("date", ArgType::String),
                ArgumentSpec::new("time", ArgType::String),
                ArgumentSpec::new("meeting_room", ArgType::String),
            ],
        ),
        // "Show my expense balance for employee 10056."
        RuleDefinition::new(
            r"Show my expense balance for employee (\d+)\.",
            "get_expense_balance",
            vec![ArgumentSpec::new("employee_id", ArgType::Integer)],
        ),
        // "Calculate performance bonus for employee 10056 for 2025."
        RuleDefinition::new(
            r"Calculate performance bonus for employee (\d+) for (\d{4})\.",
            "calculate_performance_bonus",
            vec![
                ArgumentSpec::new("employee_id", ArgType::Integer),
                ArgumentSpec::new("current_year", ArgType::Integer),
            ],
        ),
        // "Report office issue 45321 for the Facilities department."
        RuleDefinition::new(
            r"Report office issue (\d+) for the (.*) department\.",
            "report_office_issue",
            vec![
                ArgumentSpec::new("issue_code", ArgType::Integer),
                ArgumentSpec::new("department", ArgType::String),
            ],
        ),
    ]
}
