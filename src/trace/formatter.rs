use crate::condition::expression::range_text;
use crate::condition::{AnswerValue, ConditionTrace};
use itertools::Itertools;

/// Formats condition traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a condition trace into a human-readable explanation.
    pub fn format_trace(trace: &ConditionTrace) -> String {
        // Start the recursive formatting with the lowest possible parent precedence.
        Self::format_recursive(trace, 0)
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    fn format_recursive(trace: &ConditionTrace, parent_precedence: u8) -> String {
        let current_precedence = trace.precedence();
        let needs_parens = current_precedence < parent_precedence;

        let body = match trace {
            ConditionTrace::Compound {
                op_symbol,
                children,
                outcome,
            } => {
                // Short-circuited children are left out; only the decisive part is shown.
                let evaluated = children
                    .iter()
                    .filter(|c| !matches!(c, ConditionTrace::NotEvaluated))
                    .map(|c| Self::format_recursive(c, current_precedence))
                    .join(&format!(" {} ", op_symbol));
                if evaluated.is_empty() {
                    (if *outcome { "TRUE" } else { "FALSE" }).to_string()
                } else {
                    evaluated
                }
            }
            ConditionTrace::Negation { child, .. } => {
                format!("NOT {}", Self::format_recursive(child, current_precedence + 1))
            }
            ConditionTrace::Leaf {
                source,
                expected,
                found,
                ..
            } => format!(
                "{} ({}) == {}",
                source,
                Self::format_found(found.as_ref()),
                expected
            ),
            ConditionTrace::Absence { source, found, .. } => format!(
                "{} ({}) is unanswered",
                source,
                Self::format_found(found.as_ref())
            ),
            ConditionTrace::Range {
                source,
                min,
                max,
                found,
                ..
            } => format!(
                "{} ({}) {}",
                source,
                Self::format_found(found.as_ref()),
                range_text(min.as_ref(), max.as_ref())
            ),
            ConditionTrace::NotEvaluated => String::new(),
        };

        if needs_parens {
            format!("({})", body)
        } else {
            body
        }
    }

    fn format_found(found: Option<&AnswerValue>) -> String {
        match found {
            Some(value) => format!("was {}", value),
            None => "unanswered".to_string(),
        }
    }
}
