//! Common test utilities for building flows and answer sets.
use branchflow::prelude::*;

/// Path of the JSON document equivalent to `samples::navigable_survey`.
#[allow(dead_code)]
pub const SURVEY_DOCUMENT_PATH: &str = "data/navigable_survey.json";

/// The bundled symptom survey.
#[allow(dead_code)]
pub fn survey() -> FlowDefinition {
    branchflow::samples::navigable_survey().expect("sample survey must build")
}

/// Three instruction steps and no rules: `a` -> `b` -> `c` -> end.
#[allow(dead_code)]
pub fn linear_flow() -> FlowDefinition {
    FlowBuilder::new("linear")
        .steps(["a", "b", "c"].map(Step::instruction))
        .build()
        .expect("linear flow must build")
}

/// Answers for the intro form of the survey.
#[allow(dead_code)]
pub fn intro_answers(feeling: &str, mood: &str) -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers
        .record_item("introForm", "formFeeling", AnswerValue::Choice(feeling.to_string()))
        .record_item("introForm", "formMood", AnswerValue::Choice(mood.to_string()));
    answers
}

/// Answers of someone who is not feeling good and reports `symptom`.
#[allow(dead_code)]
pub fn symptom_answers(symptom: &str) -> AnswerSet {
    let mut answers = intro_answers("bad", "bad");
    answers.record_choice("symptom", symptom);
    answers
}

#[allow(dead_code)]
pub fn step(id: &str) -> Destination {
    Destination::Step(id.to_string())
}
