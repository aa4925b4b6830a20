use super::{Destination, NavigationRule, Step};
use crate::condition::Condition;
use ahash::AHashMap;

/// A validated, immutable flow: steps in default order plus their navigation and skip rules.
///
/// Instances are only produced by `FlowBuilder::build`, so every rule destination and every
/// condition reference is known to be valid.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDefinition {
    identifier: String,
    steps: Vec<Step>,
    positions: AHashMap<String, usize>,
    rules: AHashMap<String, NavigationRule>,
    skip_rules: AHashMap<String, Condition>,
}

impl FlowDefinition {
    pub(crate) fn from_parts(
        identifier: String,
        steps: Vec<Step>,
        positions: AHashMap<String, usize>,
        rules: AHashMap<String, NavigationRule>,
        skip_rules: AHashMap<String, Condition>,
    ) -> Self {
        Self {
            identifier,
            steps,
            positions,
            rules,
            skip_rules,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The step at position `index` of the default order.
    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.position(id).map(|i| &self.steps[i])
    }

    /// Position of a step in the default order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn first_step(&self) -> &Step {
        // The builder rejects empty flows.
        &self.steps[0]
    }

    pub fn rule_for(&self, trigger: &str) -> Option<&NavigationRule> {
        self.rules.get(trigger)
    }

    pub fn skip_rule_for(&self, step: &str) -> Option<&Condition> {
        self.skip_rules.get(step)
    }

    /// Navigation rules ordered by the position of their trigger step.
    pub fn rules(&self) -> Vec<(&str, &NavigationRule)> {
        self.ordered(&self.rules)
    }

    /// Skip rules ordered by the position of their step.
    pub fn skip_rules(&self) -> Vec<(&str, &Condition)> {
        self.ordered(&self.skip_rules)
    }

    /// The step that follows `id` in default order, or `End` after the last step.
    /// `None` when `id` is not part of the flow.
    pub fn default_next(&self, id: &str) -> Option<Destination> {
        let position = self.position(id)?;
        Some(match self.steps.get(position + 1) {
            Some(next) => Destination::Step(next.id.clone()),
            None => Destination::End,
        })
    }

    fn ordered<'a, T>(&'a self, map: &'a AHashMap<String, T>) -> Vec<(&'a str, &'a T)> {
        let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(id, _)| self.position(id));
        entries
    }
}
