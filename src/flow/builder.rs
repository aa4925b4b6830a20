use super::{Destination, END_OF_FLOW, FlowDefinition, NavigationRule, Step, StepKind};
use crate::condition::Condition;
use crate::error::FlowError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// What to do when a second rule is registered for the same trigger step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulePolicy {
    /// The later registration replaces the earlier one; a warning is logged.
    #[default]
    LastWriteWins,
    /// Redefinition fails the build with `FlowError::DuplicateRule`.
    Reject,
}

/// Collects steps and rules, then validates them into a `FlowDefinition`.
///
/// Registration is unchecked; every check happens in `build`, so the order of calls does
/// not matter apart from the step order and the rule redefinition policy.
#[derive(Debug, Clone)]
pub struct FlowBuilder {
    identifier: String,
    steps: Vec<Step>,
    rules: Vec<(String, NavigationRule)>,
    skip_rules: Vec<(String, Condition)>,
    policy: RulePolicy,
}

impl FlowBuilder {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            steps: Vec::new(),
            rules: Vec::new(),
            skip_rules: Vec::new(),
            policy: RulePolicy::default(),
        }
    }

    /// Appends a step to the default order.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn navigation_rule(mut self, trigger: impl Into<String>, rule: NavigationRule) -> Self {
        self.rules.push((trigger.into(), rule));
        self
    }

    pub fn direct_rule(
        self,
        trigger: impl Into<String>,
        destination: impl Into<Destination>,
    ) -> Self {
        self.navigation_rule(trigger, NavigationRule::direct(destination))
    }

    pub fn predicate_rule<I, D>(self, trigger: impl Into<String>, branches: I) -> Self
    where
        I: IntoIterator<Item = (Condition, D)>,
        D: Into<Destination>,
    {
        self.navigation_rule(trigger, NavigationRule::predicate(branches))
    }

    /// Bypasses `step` whenever `condition` holds at the moment a traversal would land on it.
    pub fn skip_rule(mut self, step: impl Into<String>, condition: Condition) -> Self {
        self.skip_rules.push((step.into(), condition));
        self
    }

    pub fn with_rule_policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates everything registered so far and freezes it.
    pub fn build(self) -> Result<FlowDefinition, FlowError> {
        if self.steps.is_empty() {
            return Err(FlowError::EmptyFlow(self.identifier));
        }

        let mut positions = AHashMap::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            if step.id == END_OF_FLOW {
                return Err(FlowError::ReservedIdentifier(step.id.clone()));
            }
            if positions.insert(step.id.clone(), index).is_some() {
                return Err(FlowError::DuplicateStep(step.id.clone()));
            }
        }

        let validator = Validator {
            steps: &self.steps,
            positions: &positions,
        };

        let rules = collect_unique(
            self.rules,
            self.policy,
            "navigation rule",
            &validator,
            FlowError::DuplicateRule,
        )?;
        for (trigger, rule) in validator.in_step_order(&rules) {
            validator.check_rule(trigger, rule)?;
        }

        let skip_rules = collect_unique(
            self.skip_rules,
            self.policy,
            "skip rule",
            &validator,
            FlowError::DuplicateSkipRule,
        )?;
        for (step, condition) in validator.in_step_order(&skip_rules) {
            validator.check_condition(step, condition)?;
        }

        tracing::debug!(
            flow = %self.identifier,
            steps = self.steps.len(),
            rules = rules.len(),
            skip_rules = skip_rules.len(),
            "flow definition built"
        );

        Ok(FlowDefinition::from_parts(
            self.identifier,
            self.steps,
            positions,
            rules,
            skip_rules,
        ))
    }
}

/// Folds registrations into a map keyed by step, applying the redefinition policy.
fn collect_unique<T>(
    entries: Vec<(String, T)>,
    policy: RulePolicy,
    context: &str,
    validator: &Validator<'_>,
    duplicate: impl Fn(String) -> FlowError,
) -> Result<AHashMap<String, T>, FlowError> {
    let mut map = AHashMap::with_capacity(entries.len());
    for (step_id, entry) in entries {
        validator.require_step(&step_id, context)?;
        if map.contains_key(&step_id) {
            match policy {
                RulePolicy::Reject => return Err(duplicate(step_id)),
                RulePolicy::LastWriteWins => {
                    tracing::warn!(
                        step = %step_id,
                        "{} redefined; the earlier one is discarded",
                        context
                    );
                }
            }
        }
        map.insert(step_id, entry);
    }
    Ok(map)
}

struct Validator<'a> {
    steps: &'a [Step],
    positions: &'a AHashMap<String, usize>,
}

impl Validator<'_> {
    fn step(&self, id: &str) -> Option<&Step> {
        self.positions.get(id).map(|&i| &self.steps[i])
    }

    /// Orders map entries by step position so the first reported error is deterministic.
    fn in_step_order<'m, T>(&self, map: &'m AHashMap<String, T>) -> Vec<(&'m str, &'m T)> {
        let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(id, _)| self.positions.get(*id).copied());
        entries
    }

    fn require_step(&self, id: &str, context: &str) -> Result<&Step, FlowError> {
        self.step(id).ok_or_else(|| FlowError::UnknownStep {
            step_id: id.to_string(),
            context: context.to_string(),
        })
    }

    fn check_rule(&self, trigger: &str, rule: &NavigationRule) -> Result<(), FlowError> {
        if let NavigationRule::Predicate { branches, .. } = rule {
            if branches.is_empty() {
                return Err(FlowError::EmptyPredicateRule(trigger.to_string()));
            }
        }

        for destination in rule.destinations() {
            let Destination::Step(id) = destination else {
                continue;
            };
            if id == trigger {
                return Err(FlowError::SelfDestination(trigger.to_string()));
            }
            if self.step(id).is_none() {
                return Err(FlowError::UnresolvedDestination {
                    trigger: trigger.to_string(),
                    destination: id.clone(),
                });
            }
        }

        for condition in rule.conditions() {
            self.check_condition(trigger, condition)?;
        }
        Ok(())
    }

    fn check_condition(&self, trigger: &str, condition: &Condition) -> Result<(), FlowError> {
        let malformed = |message: String| FlowError::MalformedCondition {
            trigger: trigger.to_string(),
            message,
        };

        if let Some(message) = condition.malformed_range() {
            return Err(malformed(message));
        }

        let mut references = Vec::new();
        condition.collect_references(&mut references);

        for (step_id, item) in references {
            if step_id.is_empty() {
                return Err(malformed("empty step identifier".to_string()));
            }
            if item == Some("") {
                return Err(malformed(format!(
                    "empty sub-question identifier for step '{}'",
                    step_id
                )));
            }

            let step = self.require_step(step_id, &format!("a condition of '{}'", trigger))?;
            match (&step.kind, item) {
                (StepKind::Form { items }, Some(item)) => {
                    if !items.iter().any(|i| i.id == item) {
                        return Err(malformed(format!(
                            "form step '{}' has no item '{}'",
                            step_id, item
                        )));
                    }
                }
                (StepKind::Form { .. }, None) => {
                    return Err(malformed(format!(
                        "form step '{}' must be addressed through one of its items",
                        step_id
                    )));
                }
                (_, Some(item)) => {
                    return Err(malformed(format!(
                        "step '{}' has no sub-questions, but item '{}' was referenced",
                        step_id, item
                    )));
                }
                (_, None) => {}
            }
        }
        Ok(())
    }
}
