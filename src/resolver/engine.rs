use crate::answers::AnswerSet;
use crate::condition::expression::answer_source;
use crate::condition::{Condition, ConditionTrace};

/// The core recursive engine for evaluating a condition against one answer set.
///
/// Evaluation is total: an unanswered `(step, item)` makes its equality test false rather
/// than failing.
pub(crate) struct ConditionEngine<'a> {
    answers: &'a AnswerSet,
}

impl<'a> ConditionEngine<'a> {
    pub(crate) fn new(answers: &'a AnswerSet) -> Self {
        Self { answers }
    }

    /// Evaluates the condition and returns a trace of the execution.
    pub(crate) fn evaluate(&self, condition: &Condition) -> ConditionTrace {
        match condition {
            Condition::Equals { step, item, value } => {
                let found = self.answers.get(step, item.as_deref()).cloned();
                let outcome = found.as_ref().is_some_and(|answer| answer.matches(value));
                ConditionTrace::Leaf {
                    source: answer_source(step, item.as_deref()),
                    expected: value.clone(),
                    found,
                    outcome,
                }
            }
            Condition::Unanswered { step, item } => {
                let found = self.answers.get(step, item.as_deref()).cloned();
                ConditionTrace::Absence {
                    source: answer_source(step, item.as_deref()),
                    outcome: found.is_none(),
                    found,
                }
            }
            Condition::InRange {
                step,
                item,
                min,
                max,
            } => {
                let found = self.answers.get(step, item.as_deref()).cloned();
                let outcome = found
                    .as_ref()
                    .is_some_and(|answer| answer.within(min.as_ref(), max.as_ref()));
                ConditionTrace::Range {
                    source: answer_source(step, item.as_deref()),
                    min: min.clone(),
                    max: max.clone(),
                    found,
                    outcome,
                }
            }
            Condition::And(children) => self.evaluate_compound("AND", children, false),
            Condition::Or(children) => self.evaluate_compound("OR", children, true),
            Condition::Not(child) => {
                let child_trace = self.evaluate(child);
                let outcome = !child_trace.outcome();
                ConditionTrace::Negation {
                    child: Box::new(child_trace),
                    outcome,
                }
            }
        }
    }

    /// Evaluates children in order and stops at the first one whose outcome equals
    /// `deciding`. The remaining children are recorded as `NotEvaluated`.
    fn evaluate_compound(
        &self,
        op_symbol: &'static str,
        children: &[Condition],
        deciding: bool,
    ) -> ConditionTrace {
        let mut traces = Vec::with_capacity(children.len());
        let mut outcome = !deciding;
        for child in children {
            if outcome == deciding {
                traces.push(ConditionTrace::NotEvaluated);
                continue;
            }
            let trace = self.evaluate(child);
            if trace.outcome() == deciding {
                outcome = deciding;
            }
            traces.push(trace);
        }
        ConditionTrace::Compound {
            op_symbol,
            children: traces,
            outcome,
        }
    }
}

impl Condition {
    /// Whether the condition holds for `answers`.
    pub fn is_satisfied_by(&self, answers: &AnswerSet) -> bool {
        ConditionEngine::new(answers).evaluate(self).outcome()
    }

    /// Evaluates the condition and keeps the full evaluation trace.
    pub fn trace(&self, answers: &AnswerSet) -> ConditionTrace {
        ConditionEngine::new(answers).evaluate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::AnswerValue;

    #[test]
    fn and_short_circuits_after_first_false() {
        let mut answers = AnswerSet::new();
        answers.record("severity", false);
        let cond = Condition::all([
            Condition::equals("severity", true),
            Condition::choice("symptom", "headache"),
        ]);
        let trace = cond.trace(&answers);
        assert!(!trace.outcome());
        match trace {
            ConditionTrace::Compound { children, .. } => {
                assert!(matches!(children[1], ConditionTrace::NotEvaluated));
            }
            other => panic!("unexpected trace {:?}", other),
        }
    }

    #[test]
    fn empty_compounds_follow_identity_elements() {
        let answers = AnswerSet::new();
        assert!(Condition::And(Vec::new()).is_satisfied_by(&answers));
        assert!(!Condition::Or(Vec::new()).is_satisfied_by(&answers));
    }

    #[test]
    fn unanswered_equality_is_false_and_its_negation_true() {
        let answers = AnswerSet::new();
        let cond = Condition::choice("symptom", "headache");
        assert!(!cond.is_satisfied_by(&answers));
        assert!((!cond).is_satisfied_by(&answers));
    }

    #[test]
    fn numeric_and_text_answers_compare_by_type() {
        let mut answers = AnswerSet::new();
        answers
            .record("age", 42.0)
            .record("note", AnswerValue::Text("fine".to_string()));
        assert!(Condition::equals("age", 42.0).is_satisfied_by(&answers));
        let as_text = Condition::equals("age", AnswerValue::Text("42".into()));
        assert!(!as_text.is_satisfied_by(&answers));
        assert!(Condition::choice("note", "fine").is_satisfied_by(&answers));
    }

    #[test]
    fn unanswered_holds_only_without_a_recorded_answer() {
        let mut answers = AnswerSet::new();
        let cond = Condition::item_unanswered("vitals", "pulse");
        assert!(cond.is_satisfied_by(&answers));

        answers.record_item("vitals", "pulse", 72.0);
        let trace = cond.trace(&answers);
        assert!(!trace.outcome());
        assert!(matches!(
            trace,
            ConditionTrace::Absence { found: Some(AnswerValue::Number(n)), .. } if n == 72.0
        ));
    }

    #[test]
    fn range_matches_numbers_and_dates_only() {
        let mut answers = AnswerSet::new();
        let adult = Condition::in_range("age", Some(AnswerValue::Number(18.0)), None);
        assert!(!adult.is_satisfied_by(&answers));

        answers.record("age", 18.0);
        assert!(adult.is_satisfied_by(&answers));
        answers.record("age", 17.5);
        assert!(!adult.is_satisfied_by(&answers));
        answers.record_choice("age", "18");
        assert!(!adult.is_satisfied_by(&answers));

        let date = |d| AnswerValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 6, d).unwrap());
        answers.record("visit", date(15));
        let june = Condition::in_range("visit", Some(date(1)), Some(date(30)));
        assert!(june.is_satisfied_by(&answers));
    }
}
