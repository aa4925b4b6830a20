use super::AnswerValue;

/// A record of how a condition was evaluated against an answer set.
#[derive(Debug, Clone)]
pub enum ConditionTrace {
    /// An n-ary AND/OR. Children after the deciding one are `NotEvaluated`.
    Compound {
        op_symbol: &'static str,
        children: Vec<ConditionTrace>,
        outcome: bool,
    },
    Negation {
        child: Box<ConditionTrace>,
        outcome: bool,
    },
    /// An equality test against the answer at `source` (`$step` or `$step.item`).
    Leaf {
        source: String,
        expected: AnswerValue,
        found: Option<AnswerValue>,
        outcome: bool,
    },
    /// A check that nothing is recorded at `source`.
    Absence {
        source: String,
        found: Option<AnswerValue>,
        outcome: bool,
    },
    /// A range test of the answer at `source`.
    Range {
        source: String,
        min: Option<AnswerValue>,
        max: Option<AnswerValue>,
        found: Option<AnswerValue>,
        outcome: bool,
    },
    /// Branch not evaluated due to short-circuiting
    NotEvaluated,
}

impl ConditionTrace {
    pub fn outcome(&self) -> bool {
        match self {
            ConditionTrace::Compound { outcome, .. }
            | ConditionTrace::Negation { outcome, .. }
            | ConditionTrace::Leaf { outcome, .. }
            | ConditionTrace::Absence { outcome, .. }
            | ConditionTrace::Range { outcome, .. } => *outcome,
            ConditionTrace::NotEvaluated => false,
        }
    }

    /// Mirrors `Condition::precedence`.
    pub fn precedence(&self) -> u8 {
        match self {
            ConditionTrace::Compound { op_symbol, .. } => match *op_symbol {
                "OR" => 1,
                "AND" => 2,
                _ => 0,
            },
            ConditionTrace::Negation { .. } => 3,
            ConditionTrace::Leaf { .. }
            | ConditionTrace::Absence { .. }
            | ConditionTrace::Range { .. }
            | ConditionTrace::NotEvaluated => 4,
        }
    }
}
