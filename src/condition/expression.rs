use super::AnswerValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Not;

/// A predicate over the answers collected so far in a flow traversal.
///
/// Conditions form a small typed expression tree. Compound nodes are n-ary: an empty `And`
/// holds, an empty `Or` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The answer recorded at `(step, item)` equals `value`.
    Equals {
        step: String,
        #[serde(default)]
        item: Option<String>,
        value: AnswerValue,
    },
    /// No answer is recorded at `(step, item)`.
    Unanswered {
        step: String,
        #[serde(default)]
        item: Option<String>,
    },
    /// The number or date answer at `(step, item)` lies within the inclusive bounds.
    /// A missing bound is open.
    InRange {
        step: String,
        #[serde(default)]
        item: Option<String>,
        #[serde(default)]
        min: Option<AnswerValue>,
        #[serde(default)]
        max: Option<AnswerValue>,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Matches the answer of a question step.
    pub fn equals(step: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Condition::Equals {
            step: step.into(),
            item: None,
            value: value.into(),
        }
    }

    /// Matches the answer of one item of a form step.
    pub fn item_equals(
        step: impl Into<String>,
        item: impl Into<String>,
        value: impl Into<AnswerValue>,
    ) -> Self {
        Condition::Equals {
            step: step.into(),
            item: Some(item.into()),
            value: value.into(),
        }
    }

    /// Matches a single-choice question whose selected value is `choice`.
    pub fn choice(step: impl Into<String>, choice: impl Into<String>) -> Self {
        Self::equals(step, AnswerValue::Choice(choice.into()))
    }

    /// Matches a choice item of a form step.
    pub fn item_choice(
        step: impl Into<String>,
        item: impl Into<String>,
        choice: impl Into<String>,
    ) -> Self {
        Self::item_equals(step, item, AnswerValue::Choice(choice.into()))
    }

    /// Holds while the question step `step` has no recorded answer.
    pub fn unanswered(step: impl Into<String>) -> Self {
        Condition::Unanswered {
            step: step.into(),
            item: None,
        }
    }

    pub fn item_unanswered(step: impl Into<String>, item: impl Into<String>) -> Self {
        Condition::Unanswered {
            step: step.into(),
            item: Some(item.into()),
        }
    }

    /// Matches a number or date answer between `min` and `max`, both inclusive.
    pub fn in_range(
        step: impl Into<String>,
        min: Option<AnswerValue>,
        max: Option<AnswerValue>,
    ) -> Self {
        Condition::InRange {
            step: step.into(),
            item: None,
            min,
            max,
        }
    }

    pub fn item_in_range(
        step: impl Into<String>,
        item: impl Into<String>,
        min: Option<AnswerValue>,
        max: Option<AnswerValue>,
    ) -> Self {
        Condition::InRange {
            step: step.into(),
            item: Some(item.into()),
            min,
            max,
        }
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    /// Collects every `(step, item)` pair the condition reads from.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<(&'a str, Option<&'a str>)>) {
        match self {
            Condition::Equals { step, item, .. }
            | Condition::Unanswered { step, item }
            | Condition::InRange { step, item, .. } => out.push((step, item.as_deref())),
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_references(out);
                }
            }
            Condition::Not(child) => child.collect_references(out),
        }
    }

    /// Gets the precedence level for a condition node. Higher numbers bind more tightly.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Condition::Or(_) => 1,
            Condition::And(_) => 2,
            Condition::Not(_) => 3,
            Condition::Equals { .. }
            | Condition::Unanswered { .. }
            | Condition::InRange { .. } => 4,
        }
    }

    /// Describes the first range condition whose bounds cannot match anything.
    pub(crate) fn malformed_range(&self) -> Option<String> {
        match self {
            Condition::InRange { step, min, max, .. } => {
                let bounds: Vec<&AnswerValue> = min.iter().chain(max.iter()).collect();
                if bounds.is_empty() {
                    return Some(format!("range on '{}' has no bounds", step));
                }
                if let Some(bound) = bounds.iter().find(|b| !b.is_ordered()) {
                    return Some(format!(
                        "range on '{}' is bounded by a {}, expected a number or a date",
                        step,
                        bound.kind_name()
                    ));
                }
                if let (Some(min), Some(max)) = (min, max) {
                    if min.kind_name() != max.kind_name() {
                        return Some(format!(
                            "range on '{}' mixes a {} and a {}",
                            step,
                            min.kind_name(),
                            max.kind_name()
                        ));
                    }
                    if !min.within(None, Some(max)) {
                        return Some(format!(
                            "range on '{}' has min {} above max {}",
                            step, min, max
                        ));
                    }
                }
                None
            }
            Condition::And(children) | Condition::Or(children) => {
                children.iter().find_map(Condition::malformed_range)
            }
            Condition::Not(child) => child.malformed_range(),
            Condition::Equals { .. } | Condition::Unanswered { .. } => None,
        }
    }

    fn fmt_with_precedence(
        &self,
        f: &mut fmt::Formatter<'_>,
        parent_precedence: u8,
    ) -> fmt::Result {
        let current_precedence = self.precedence();
        let needs_parens = current_precedence < parent_precedence;

        if needs_parens {
            write!(f, "(")?;
        }

        match self {
            Condition::Equals { step, item, value } => {
                write!(f, "{} == {}", answer_source(step, item.as_deref()), value)?
            }
            Condition::Unanswered { step, item } => {
                write!(f, "{} is unanswered", answer_source(step, item.as_deref()))?
            }
            Condition::InRange {
                step,
                item,
                min,
                max,
            } => write!(
                f,
                "{} {}",
                answer_source(step, item.as_deref()),
                range_text(min.as_ref(), max.as_ref())
            )?,
            Condition::And(children) => self.fmt_joined(f, children, "AND", "TRUE")?,
            Condition::Or(children) => self.fmt_joined(f, children, "OR", "FALSE")?,
            Condition::Not(child) => {
                write!(f, "NOT ")?;
                child.fmt_with_precedence(f, current_precedence + 1)?;
            }
        }

        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }

    fn fmt_joined(
        &self,
        f: &mut fmt::Formatter<'_>,
        children: &[Condition],
        op: &str,
        empty: &str,
    ) -> fmt::Result {
        if children.is_empty() {
            return write!(f, "{}", empty);
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", op)?;
            }
            child.fmt_with_precedence(f, self.precedence())?;
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_precedence(f, 0)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Self::Output {
        Condition::Not(Box::new(self))
    }
}

/// Renders the `$step` / `$step.item` notation used in displays and traces.
pub(crate) fn answer_source(step: &str, item: Option<&str>) -> String {
    match item {
        Some(item) => format!("${}.{}", step, item),
        None => format!("${}", step),
    }
}

/// Renders the bounds of a range condition: `in [1, 3]`, `>= 1` or `<= 3`.
pub(crate) fn range_text(min: Option<&AnswerValue>, max: Option<&AnswerValue>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("in [{}, {}]", min, max),
        (Some(min), None) => format!(">= {}", min),
        (None, Some(max)) => format!("<= {}", max),
        (None, None) => "in any range".to_string(),
    }
}
