//! Integration tests for branchflow
//!
//! End-to-end tests covering JSON flow documents, answer files and compiled artifacts.
//!
mod common;
use branchflow::flow::ARTIFACT_FORMAT_VERSION;
use branchflow::prelude::*;
use common::*;
use std::fs;

#[cfg(test)]
mod documents {
    use super::*;

    #[test]
    fn survey_document_matches_the_builder_version() {
        let from_json = FlowDocument::from_file(SURVEY_DOCUMENT_PATH)
            .expect("Failed to read survey document")
            .into_flow()
            .expect("Survey document should be valid");
        assert_eq!(from_json, survey());
    }

    #[test]
    fn document_round_trips_through_json() {
        let flow = survey();
        let json = FlowDocument::from(&flow).to_json_pretty().unwrap();
        let reloaded = FlowDocument::from_json(&json).unwrap().into_flow().unwrap();
        assert_eq!(reloaded, flow);
    }

    #[test]
    fn invalid_document_never_builds() {
        let json = r#"{
            "identifier": "broken",
            "steps": [
                { "id": "a", "kind": "boolean" },
                { "id": "b", "kind": "instruction" }
            ],
            "rules": [
                { "type": "direct", "trigger": "a", "destination": "c" }
            ]
        }"#;
        let err = FlowDocument::from_json(json).unwrap().into_flow().unwrap_err();
        assert_eq!(
            err,
            FlowError::UnresolvedDestination {
                trigger: "a".to_string(),
                destination: "c".to_string(),
            }
        );
    }

    #[test]
    fn document_rule_policy_is_honoured() {
        let json = r#"{
            "identifier": "strict",
            "rule_policy": "reject",
            "steps": [
                { "id": "a", "kind": "boolean" },
                { "id": "b", "kind": "instruction" }
            ],
            "rules": [
                { "type": "direct", "trigger": "a", "destination": "b" },
                { "type": "direct", "trigger": "a", "destination": "$end" }
            ]
        }"#;
        let err = FlowDocument::from_json(json).unwrap().into_flow().unwrap_err();
        assert_eq!(err, FlowError::DuplicateRule("a".to_string()));
    }

    #[test]
    fn document_supports_defaults_and_skip_rules() {
        let json = r#"{
            "identifier": "extended",
            "steps": [
                { "id": "age", "kind": { "single_choice": { "choices": ["minor", "adult"] } } },
                { "id": "guardian", "kind": "instruction" },
                { "id": "consent", "kind": "boolean", "optional": true },
                { "id": "done", "kind": "completion" }
            ],
            "rules": [
                {
                    "type": "predicate",
                    "trigger": "consent",
                    "branches": [
                        {
                            "when": { "equals": { "step": "consent", "value": { "bool": false } } },
                            "destination": "$end"
                        }
                    ],
                    "default": "done"
                }
            ],
            "skip_rules": [
                {
                    "step": "guardian",
                    "when": { "equals": { "step": "age", "value": { "choice": "adult" } } }
                }
            ]
        }"#;
        let flow = FlowDocument::from_json(json).unwrap().into_flow().unwrap();
        let resolver = Resolver::new(&flow);

        let mut answers = AnswerSet::new();
        answers.record_choice("age", "adult");
        assert_eq!(resolver.resolve_next("age", &answers).unwrap(), step("consent"));

        assert_eq!(
            resolver.resolve_next("consent", &answers).unwrap(),
            step("done")
        );
        answers.record("consent", false);
        assert_eq!(
            resolver.resolve_next("consent", &answers).unwrap(),
            Destination::End
        );
    }

    #[test]
    fn load_flow_reports_invalid_flows() {
        let path = std::env::temp_dir().join("branchflow_invalid_document.json");
        let path = path.to_str().unwrap();
        fs::write(
            path,
            r#"{ "identifier": "self", "steps": [ { "id": "a", "kind": "boolean" } ],
                 "rules": [ { "type": "direct", "trigger": "a", "destination": "a" } ] }"#,
        )
        .unwrap();

        let err = FlowDocument::load_flow(path).unwrap_err();
        fs::remove_file(path).ok();
        assert!(matches!(err, DocumentError::Flow(FlowError::SelfDestination(ref s)) if s == "a"));
    }

    #[test]
    fn load_flow_reads_the_survey() {
        let flow = FlowDocument::load_flow(SURVEY_DOCUMENT_PATH).unwrap();
        let items = flow.step("introForm").unwrap().kind.form_items().unwrap();
        assert_eq!(items[0], FormItem::choice("formFeeling", ["good", "bad"]));
        assert!(items[1].accepts("bad"));
        assert!(!items[1].accepts("meh"));
    }

    #[test]
    fn document_supports_unanswered_and_range_conditions() {
        let json = r#"{
            "identifier": "vitals",
            "steps": [
                { "id": "visit", "kind": "date", "optional": true },
                { "id": "temperature", "kind": "numeric" },
                { "id": "fever", "kind": "instruction" },
                { "id": "done", "kind": "completion" }
            ],
            "rules": [
                {
                    "type": "predicate",
                    "trigger": "visit",
                    "branches": [
                        { "when": { "unanswered": { "step": "visit" } }, "destination": "done" }
                    ]
                },
                {
                    "type": "predicate",
                    "trigger": "temperature",
                    "branches": [
                        {
                            "when": {
                                "in_range": { "step": "temperature", "min": { "number": 38.0 } }
                            },
                            "destination": "fever"
                        }
                    ],
                    "default": "done"
                }
            ]
        }"#;
        let flow = FlowDocument::from_json(json).unwrap().into_flow().unwrap();
        let resolver = Resolver::new(&flow);

        let mut answers = AnswerSet::new();
        assert_eq!(resolver.resolve_next("visit", &answers).unwrap(), step("done"));
        answers.record("visit", chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(
            resolver.resolve_next("visit", &answers).unwrap(),
            step("temperature")
        );

        answers.record("temperature", 39.2);
        assert_eq!(
            resolver.resolve_next("temperature", &answers).unwrap(),
            step("fever")
        );

        let bytes = FlowArtifact::from_definition(&flow).to_bytes().unwrap();
        let restored = FlowArtifact::from_bytes(&bytes)
            .unwrap()
            .into_definition()
            .unwrap();
        assert_eq!(restored, flow);
    }

    #[test]
    fn missing_document_reports_path() {
        let err = FlowDocument::from_file("data/does_not_exist.json").unwrap_err();
        assert!(
            matches!(err, DocumentError::Io { ref path, .. } if path == "data/does_not_exist.json")
        );
    }
}

#[cfg(test)]
mod answer_files {
    use super::*;

    #[test]
    fn bundled_answer_files_resolve_as_expected() {
        let flow = survey();
        let resolver = Resolver::new(&flow);

        let good = AnswerSet::from_file("data/answers_feeling_good.json").unwrap();
        assert_eq!(
            resolver.resolve_next("introForm", &good).unwrap(),
            step("survey_skipped")
        );

        let dizzy = AnswerSet::from_file("data/answers_dizziness.json").unwrap();
        assert_eq!(
            resolver.resolve_next("symptom", &dizzy).unwrap(),
            step("other_symptom")
        );
    }

    #[test]
    fn malformed_answer_file_is_a_json_error() {
        let err = AnswerSet::from_json(r#"[{"step": "a"}]"#).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }
}

#[cfg(test)]
mod artifacts {
    use super::*;

    #[test]
    fn artifact_round_trips_through_bytes() {
        let flow = survey();
        let bytes = FlowArtifact::from_definition(&flow).to_bytes().unwrap();
        let restored = FlowArtifact::from_bytes(&bytes)
            .unwrap()
            .into_definition()
            .unwrap();
        assert_eq!(restored, flow);
    }

    #[test]
    fn artifact_round_trips_through_a_file() {
        let flow = FlowBuilder::new("dated")
            .steps([Step::instruction("visit"), Step::instruction("follow_up")])
            .skip_rule(
                "follow_up",
                Condition::equals(
                    "visit",
                    chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                ),
            )
            .build()
            .unwrap();

        let path = std::env::temp_dir().join("branchflow_artifact_round_trip.bin");
        let path = path.to_str().unwrap();
        FlowArtifact::from_definition(&flow).save(path).unwrap();
        let restored = FlowArtifact::from_file(path).unwrap().into_definition().unwrap();
        fs::remove_file(path).ok();

        assert_eq!(restored, flow);
    }

    #[test]
    fn artifact_with_other_version_is_rejected() {
        let mut artifact = FlowArtifact::from_definition(&survey());
        artifact.version = ARTIFACT_FORMAT_VERSION + 1;
        let bytes = artifact.to_bytes().unwrap();

        let err = FlowArtifact::from_bytes(&bytes)
            .unwrap()
            .into_definition()
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::UnsupportedVersion { found, expected }
                if found == ARTIFACT_FORMAT_VERSION + 1 && expected == ARTIFACT_FORMAT_VERSION
        ));
    }

    #[test]
    fn tampered_artifact_is_revalidated() {
        let mut artifact = FlowArtifact::from_definition(&survey());
        artifact.steps.retain(|s| s.id != "end");

        let err = artifact.into_definition().unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(FlowError::UnknownStep { .. })));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = FlowArtifact::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode(_)));
    }
}
