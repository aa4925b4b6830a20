//! Ready-made flows used by the CLI demo mode and the test suite.

use crate::condition::Condition;
use crate::error::FlowError;
use crate::flow::{END_OF_FLOW, FlowBuilder, FlowDefinition, FormItem, Step};

/// A short symptom survey exercising every kind of navigation rule.
///
/// * `introForm` asks for feeling and mood; when both are `good` the survey is skipped.
/// * `symptom` jumps to `other_symptom` unless the answer is `headache`.
/// * `severity` branches to `severe_headache` or `light_headache`.
/// * Every outcome step jumps to `end`, which ends the flow. `blank` and `blankB` are never
///   reached.
pub fn navigable_survey() -> Result<FlowDefinition, FlowError> {
    let headache = Condition::choice("symptom", "headache");

    FlowBuilder::new("navigable_survey")
        .step(
            Step::form(
                "introForm",
                [
                    FormItem::choice("formFeeling", ["good", "bad"]),
                    FormItem::choice("formMood", ["good", "bad"]),
                ],
            )
            .with_title("How do you feel, and how is your mood?"),
        )
        .step(
            Step::single_choice("symptom", ["headache", "dizziness", "nausea"])
                .with_title("Which is your most severe symptom?"),
        )
        .step(
            Step::boolean("severity")
                .with_title("Does your symptom interfere with your daily life?"),
        )
        .step(Step::instruction("blank").with_title("This step is intentionally left blank"))
        .step(Step::instruction("severe_headache").with_title("You have a severe headache"))
        .step(Step::instruction("light_headache").with_title("You have a light headache"))
        .step(Step::instruction("other_symptom").with_title("Your symptom is not a headache"))
        .step(
            Step::instruction("survey_skipped")
                .with_title("Please come back when you don't feel good or your mood is low"),
        )
        .step(Step::completion("end").with_title("You have finished the task"))
        .step(Step::instruction("blankB").with_title("This step is intentionally left blank"))
        .predicate_rule(
            "introForm",
            [(
                Condition::all(
                    ["formFeeling", "formMood"]
                        .map(|item| Condition::item_choice("introForm", item, "good")),
                ),
                "survey_skipped",
            )],
        )
        .predicate_rule("symptom", [(!headache.clone(), "other_symptom")])
        .predicate_rule(
            "severity",
            [
                (
                    Condition::all([headache.clone(), Condition::equals("severity", true)]),
                    "severe_headache",
                ),
                (
                    Condition::all([headache, Condition::equals("severity", false)]),
                    "light_headache",
                ),
            ],
        )
        .direct_rule("severe_headache", "end")
        .direct_rule("light_headache", "end")
        .direct_rule("other_symptom", "end")
        .direct_rule("survey_skipped", "end")
        .direct_rule("end", END_OF_FLOW)
        .build()
}
