use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A recorded answer, or a literal that a condition compares answers against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    /// The value of the selected choice of a single-choice question.
    Choice(String),
    Bool(bool),
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

// Manual implementation to handle f64
impl Eq for AnswerValue {}

// Manual implementation to handle f64 by hashing its bits
impl Hash for AnswerValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            AnswerValue::Choice(s) | AnswerValue::Text(s) => s.hash(state),
            AnswerValue::Bool(b) => b.hash(state),
            AnswerValue::Number(n) => n.to_bits().hash(state),
            AnswerValue::Date(d) => d.hash(state),
        }
    }
}

impl AnswerValue {
    /// Returns the string contents of choice and free-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Choice(s) | AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Type-aware equality used by condition evaluation.
    ///
    /// Choice and free-text values are both strings and compare by contents. Values of
    /// different kinds never match.
    pub fn matches(&self, literal: &AnswerValue) -> bool {
        if let (Some(a), Some(b)) = (self.as_str(), literal.as_str()) {
            return a == b;
        }
        match (self, literal) {
            (AnswerValue::Bool(a), AnswerValue::Bool(b)) => a == b,
            (AnswerValue::Number(a), AnswerValue::Number(b)) => a == b,
            (AnswerValue::Date(a), AnswerValue::Date(b)) => a == b,
            _ => false,
        }
    }

    /// Short name of the value kind, used in diagnostics.
    /// Whether a number or date answer lies within the inclusive bounds.
    ///
    /// Every present bound must be of the same kind as the answer; other kinds never match.
    pub fn within(&self, min: Option<&AnswerValue>, max: Option<&AnswerValue>) -> bool {
        let above_min = min.is_none_or(|min| {
            self.compare(min)
                .is_some_and(|ordering| ordering != Ordering::Less)
        });
        let below_max = max.is_none_or(|max| {
            self.compare(max)
                .is_some_and(|ordering| ordering != Ordering::Greater)
        });
        self.is_ordered() && above_min && below_max
    }

    /// Orders two numbers or two dates. `None` for any other pairing.
    fn compare(&self, other: &AnswerValue) -> Option<Ordering> {
        match (self, other) {
            (AnswerValue::Number(a), AnswerValue::Number(b)) => a.partial_cmp(b),
            (AnswerValue::Date(a), AnswerValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Whether values of this kind can bound a range condition.
    pub fn is_ordered(&self) -> bool {
        matches!(self, AnswerValue::Number(_) | AnswerValue::Date(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AnswerValue::Choice(_) => "choice",
            AnswerValue::Bool(_) => "bool",
            AnswerValue::Text(_) => "text",
            AnswerValue::Number(_) => "number",
            AnswerValue::Date(_) => "date",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(s) => write!(f, "{}", s),
            AnswerValue::Text(s) => write!(f, "\"{}\"", s),
            AnswerValue::Bool(b) => write!(f, "{}", b),
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<NaiveDate> for AnswerValue {
    fn from(value: NaiveDate) -> Self {
        AnswerValue::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_and_text_compare_by_contents() {
        let choice = AnswerValue::Choice("headache".to_string());
        let text = AnswerValue::Text("headache".to_string());
        assert!(choice.matches(&text));
        assert!(text.matches(&choice));
        assert!(!choice.matches(&AnswerValue::Choice("nausea".to_string())));
    }

    #[test]
    fn mismatched_kinds_never_match() {
        assert!(!AnswerValue::Bool(true).matches(&AnswerValue::Number(1.0)));
        assert!(!AnswerValue::Text("true".to_string()).matches(&AnswerValue::Bool(true)));
    }

    #[test]
    fn display_trims_integral_numbers() {
        assert_eq!(AnswerValue::Number(42.0).to_string(), "42");
        assert_eq!(AnswerValue::Number(2.5).to_string(), "2.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(AnswerValue::Date(date).to_string(), "2024-03-09");
    }

    #[test]
    fn display_keeps_integral_numbers_beyond_i64() {
        assert_eq!(AnswerValue::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(AnswerValue::Number(-3.0).to_string(), "-3");
    }

    #[test]
    fn within_uses_inclusive_bounds() {
        let low = AnswerValue::Number(1.0);
        let high = AnswerValue::Number(3.0);
        assert!(AnswerValue::Number(1.0).within(Some(&low), Some(&high)));
        assert!(AnswerValue::Number(3.0).within(Some(&low), Some(&high)));
        assert!(!AnswerValue::Number(3.5).within(Some(&low), Some(&high)));
        assert!(AnswerValue::Number(-10.0).within(None, Some(&high)));
        assert!(AnswerValue::Number(f64::MAX).within(Some(&low), None));
    }

    #[test]
    fn within_compares_dates() {
        let day = |d| AnswerValue::Date(NaiveDate::from_ymd_opt(2024, 5, d).unwrap());
        assert!(day(10).within(Some(&day(1)), Some(&day(31))));
        assert!(!day(10).within(Some(&day(11)), None));
    }

    #[test]
    fn within_rejects_other_kinds() {
        let bound = AnswerValue::Number(1.0);
        assert!(!AnswerValue::Choice("2".to_string()).within(Some(&bound), None));
        assert!(!AnswerValue::Number(2.0).within(Some(&AnswerValue::Bool(true)), None));
        assert!(!AnswerValue::Number(f64::NAN).within(Some(&bound), None));
        assert!(!AnswerValue::Bool(true).within(None, None));
    }
}
