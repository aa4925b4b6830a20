//! Unit tests for the public data types
//!
//! Display formats, destination parsing and error messages.
use branchflow::prelude::*;

#[cfg(test)]
mod destinations {
    use super::*;

    #[test]
    fn end_sentinel_parses_to_end() {
        assert_eq!(Destination::from(END_OF_FLOW), Destination::End);
        assert_eq!(Destination::from("$end".to_string()), Destination::End);
        assert_eq!(
            Destination::from("symptom"),
            Destination::Step("symptom".to_string())
        );
    }

    #[test]
    fn destination_displays_its_identifier() {
        assert_eq!(Destination::End.to_string(), "$end");
        assert_eq!(Destination::from("severity").to_string(), "severity");
        assert_eq!(Destination::from("severity").step_id(), Some("severity"));
        assert!(Destination::End.is_end());
    }
}

#[cfg(test)]
mod displays {
    use super::*;

    #[test]
    fn condition_display_uses_answer_sources() {
        let cond = Condition::all([
            Condition::item_choice("introForm", "formFeeling", "good"),
            Condition::item_choice("introForm", "formMood", "good"),
        ]);
        assert_eq!(
            cond.to_string(),
            "$introForm.formFeeling == good AND $introForm.formMood == good"
        );
    }

    #[test]
    fn negated_compound_is_parenthesized() {
        let cond = !Condition::any([
            Condition::choice("symptom", "headache"),
            Condition::equals("severity", false),
        ]);
        assert_eq!(
            cond.to_string(),
            "NOT ($symptom == headache OR $severity == false)"
        );
    }

    #[test]
    fn open_ended_ranges_display_their_bound() {
        let adult = Condition::in_range("age", Some(AnswerValue::Number(18.0)), None);
        assert_eq!(adult.to_string(), "$age >= 18");

        let cond = Condition::any([Condition::unanswered("age"), !adult]);
        assert_eq!(cond.to_string(), "$age is unanswered OR NOT $age >= 18");
    }

    #[test]
    fn answer_values_display_by_kind() {
        assert_eq!(AnswerValue::Choice("nausea".into()).to_string(), "nausea");
        assert_eq!(AnswerValue::Text("hello".into()).to_string(), "\"hello\"");
        assert_eq!(AnswerValue::Number(3.0).to_string(), "3");
        assert_eq!(AnswerValue::Number(2.5).to_string(), "2.5");
        assert_eq!(AnswerValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn trace_explains_a_failed_condition() {
        let mut answers = AnswerSet::new();
        answers.record_choice("symptom", "nausea");
        let cond = Condition::all([
            Condition::choice("symptom", "headache"),
            Condition::equals("severity", true),
        ]);

        let trace = cond.trace(&answers);
        assert!(!trace.outcome());
        assert_eq!(
            TraceFormatter::format_trace(&trace),
            "$symptom (was nausea) == headache"
        );
    }
}

#[cfg(test)]
mod answers {
    use super::*;

    #[test]
    fn answer_records_are_sorted_by_key() {
        let mut answers = AnswerSet::new();
        answers
            .record("severity", true)
            .record_choice("symptom", "headache")
            .record_item("introForm", "formMood", AnswerValue::Choice("bad".into()));

        let steps: Vec<_> = answers.to_records().into_iter().map(|r| r.step).collect();
        assert_eq!(steps, ["introForm", "severity", "symptom"]);
    }

    #[test]
    fn values_of_different_kinds_never_match() {
        let mut answers = AnswerSet::new();
        answers.record("count", 1.0);
        assert!(!Condition::choice("count", "1").is_satisfied_by(&answers));
        assert!(Condition::equals("count", 1.0).is_satisfied_by(&answers));
    }
}

#[cfg(test)]
mod errors {
    use super::*;

    #[test]
    fn session_errors_wrap_resolve_errors_transparently() {
        let err = SessionError::from(ResolveError::SkipCycle("b".to_string()));
        assert_eq!(err.to_string(), "Skip rules form a cycle through step 'b'");
    }

    #[test]
    fn flow_errors_name_the_step() {
        assert_eq!(
            FlowError::SelfDestination("q".to_string()).to_string(),
            "Navigation rule triggered by 'q' points back to the same step"
        );
        assert_eq!(
            FlowError::UnknownStep {
                step_id: "ghost".to_string(),
                context: "navigation rule".to_string(),
            }
            .to_string(),
            "Step 'ghost' referenced by navigation rule does not exist"
        );
    }
}

#[cfg(test)]
mod form_items {
    use super::*;

    #[test]
    fn free_items_accept_anything() {
        let item = FormItem::from("notes");
        assert!(item.accepts("anything at all"));
        assert!(item.accepts(""));
    }

    #[test]
    fn items_with_choices_accept_only_listed_values() {
        let item = FormItem::choice("formMood", ["good", "bad"]);
        assert!(item.accepts("good"));
        assert!(!item.accepts("Good"));
        assert!(!item.accepts("fine"));
    }

    #[test]
    fn form_steps_expose_their_items() {
        let step = Step::form(
            "vitals",
            [FormItem::from("pulse"), FormItem::choice("arm", ["l", "r"])],
        );
        let items = step.kind.form_items().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].choices.is_empty());
        assert_eq!(items[1].choices, ["l", "r"]);
        assert!(Step::boolean("b").kind.form_items().is_none());
    }
}
