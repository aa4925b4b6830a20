use super::{
    Destination, FlowBuilder, FlowDefinition, NavigationRule, PredicateBranch, RulePolicy, Step,
};
use crate::condition::Condition;
use crate::error::{DocumentError, FlowError};
use serde::{Deserialize, Serialize};
use std::fs;

/// A trait for custom flow formats that can be converted into a `FlowDefinition`.
///
/// This is the extension point for loading flows from anything other than the bundled JSON
/// document format. Implementations usually map their own structures onto a `FlowBuilder`
/// and return the result of `build`, so every flow goes through the same validation.
///
/// # Example
///
/// ```rust,no_run
/// use branchflow::prelude::*;
///
/// struct Questionnaire {
///     questions: Vec<String>,
/// }
///
/// impl IntoFlow for Questionnaire {
///     fn into_flow(self) -> std::result::Result<FlowDefinition, FlowError> {
///         FlowBuilder::new("questionnaire")
///             .steps(self.questions.into_iter().map(Step::boolean))
///             .build()
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a validated flow.
    fn into_flow(self) -> Result<FlowDefinition, FlowError>;
}

/// The JSON representation of a flow.
///
/// Destinations are plain step identifiers; `"$end"` ends the flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDocument {
    pub identifier: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub rules: Vec<RuleDocument>,
    #[serde(default)]
    pub skip_rules: Vec<SkipRuleDocument>,
    #[serde(default)]
    pub rule_policy: RulePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleDocument {
    Direct {
        trigger: String,
        destination: String,
    },
    Predicate {
        trigger: String,
        branches: Vec<BranchDocument>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchDocument {
    pub when: Condition,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipRuleDocument {
    pub step: String,
    pub when: Condition,
}

impl FlowDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Reads a JSON flow document and validates it into a definition.
    pub fn load_flow(path: &str) -> Result<FlowDefinition, DocumentError> {
        Ok(Self::from_file(path)?.into_flow()?)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl IntoFlow for FlowDocument {
    fn into_flow(self) -> Result<FlowDefinition, FlowError> {
        let mut builder = FlowBuilder::new(self.identifier)
            .with_rule_policy(self.rule_policy)
            .steps(self.steps);

        for rule in self.rules {
            builder = match rule {
                RuleDocument::Direct {
                    trigger,
                    destination,
                } => builder.direct_rule(trigger, destination),
                RuleDocument::Predicate {
                    trigger,
                    branches,
                    default,
                } => {
                    let rule = NavigationRule::Predicate {
                        branches: branches
                            .into_iter()
                            .map(|b| PredicateBranch {
                                condition: b.when,
                                destination: Destination::from(b.destination),
                            })
                            .collect(),
                        default: default.map(Destination::from),
                    };
                    builder.navigation_rule(trigger, rule)
                }
            };
        }

        for skip in self.skip_rules {
            builder = builder.skip_rule(skip.step, skip.when);
        }

        builder.build()
    }
}

impl From<&FlowDefinition> for FlowDocument {
    fn from(flow: &FlowDefinition) -> Self {
        let rules = flow
            .rules()
            .into_iter()
            .map(|(trigger, rule)| match rule {
                NavigationRule::Direct { destination } => RuleDocument::Direct {
                    trigger: trigger.to_string(),
                    destination: destination.as_id().to_string(),
                },
                NavigationRule::Predicate { branches, default } => RuleDocument::Predicate {
                    trigger: trigger.to_string(),
                    branches: branches
                        .iter()
                        .map(|b| BranchDocument {
                            when: b.condition.clone(),
                            destination: b.destination.as_id().to_string(),
                        })
                        .collect(),
                    default: default.as_ref().map(|d| d.as_id().to_string()),
                },
            })
            .collect();

        let skip_rules = flow
            .skip_rules()
            .into_iter()
            .map(|(step, condition)| SkipRuleDocument {
                step: step.to_string(),
                when: condition.clone(),
            })
            .collect();

        Self {
            identifier: flow.identifier().to_string(),
            steps: flow.steps().to_vec(),
            rules,
            skip_rules,
            // A built definition holds at most one rule per trigger.
            rule_policy: RulePolicy::Reject,
        }
    }
}
