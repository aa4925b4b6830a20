use crate::answers::AnswerSet;
use crate::condition::ConditionTrace;
use crate::error::ResolveError;
use crate::flow::{Destination, FlowDefinition, NavigationRule};
use crate::trace::TraceFormatter;

mod engine;

/// The outcome of resolving one step transition, with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Where the traversal goes next.
    pub destination: Destination,
    /// Index of the predicate branch that decided the first hop, if one did.
    pub matched_branch: Option<usize>,
    /// Steps bypassed by skip rules on the way to `destination`, in order.
    pub skipped: Vec<String>,
    /// A human-readable explanation of the decision.
    pub reason: String,
}

/// How a single hop out of a completed step was decided.
enum Hop {
    DefaultOrder,
    Direct,
    Branch { index: usize, trace: ConditionTrace },
    RuleDefault,
    NoMatch,
}

/// Resolves the next step of a traversal from a completed step and the answers so far.
///
/// A `Resolver` holds nothing but a borrowed definition: every call is a pure function of
/// its arguments, so it can be shared freely and called repeatedly with the same result.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    flow: &'a FlowDefinition,
}

impl<'a> Resolver<'a> {
    pub fn new(flow: &'a FlowDefinition) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> &'a FlowDefinition {
        self.flow
    }

    /// Returns the destination that follows the completed step `step_id`.
    ///
    /// # Errors
    ///
    /// * `ResolveError::UnknownStep` if `step_id` is not part of the flow.
    /// * `ResolveError::SkipCycle` if skip rules keep bypassing the same step.
    pub fn resolve_next(
        &self,
        step_id: &str,
        answers: &AnswerSet,
    ) -> Result<Destination, ResolveError> {
        self.explain_next(step_id, answers).map(|r| r.destination)
    }

    /// Like `resolve_next`, but also reports which branch matched, what was skipped, and why.
    pub fn explain_next(
        &self,
        step_id: &str,
        answers: &AnswerSet,
    ) -> Result<Resolution, ResolveError> {
        let (destination, hop) = self.hop(step_id, answers)?;
        let matched_branch = match &hop {
            Hop::Branch { index, .. } => Some(*index),
            _ => None,
        };
        let mut reason = self.describe_hop(step_id, &hop, &destination);

        let (destination, skipped) = self.apply_skip_rules(destination, answers, &mut reason)?;

        tracing::debug!(
            flow = %self.flow.identifier(),
            from = %step_id,
            to = %destination,
            skipped = skipped.len(),
            "resolved next step"
        );

        Ok(Resolution {
            destination,
            matched_branch,
            skipped,
            reason,
        })
    }

    /// Returns where a traversal starts: the first step, unless skip rules bypass it.
    pub fn resolve_first(&self, answers: &AnswerSet) -> Result<Resolution, ResolveError> {
        let first = Destination::Step(self.flow.first_step().id.clone());
        let mut reason = format!("'{}' is the first step", first);
        let (destination, skipped) = self.apply_skip_rules(first, answers, &mut reason)?;
        Ok(Resolution {
            destination,
            matched_branch: None,
            skipped,
            reason,
        })
    }

    /// Decides a single hop out of `step_id`, ignoring skip rules.
    fn hop(&self, step_id: &str, answers: &AnswerSet) -> Result<(Destination, Hop), ResolveError> {
        let default_next = self
            .flow
            .default_next(step_id)
            .ok_or_else(|| ResolveError::UnknownStep(step_id.to_string()))?;

        let Some(rule) = self.flow.rule_for(step_id) else {
            return Ok((default_next, Hop::DefaultOrder));
        };

        match rule {
            NavigationRule::Direct { destination } => Ok((destination.clone(), Hop::Direct)),
            NavigationRule::Predicate { branches, default } => {
                for (index, branch) in branches.iter().enumerate() {
                    let trace = branch.condition.trace(answers);
                    if trace.outcome() {
                        return Ok((branch.destination.clone(), Hop::Branch { index, trace }));
                    }
                }
                Ok(match default {
                    Some(destination) => (destination.clone(), Hop::RuleDefault),
                    None => (default_next, Hop::NoMatch),
                })
            }
        }
    }

    /// Follows skip rules from `destination` until it lands on a step that is not bypassed.
    fn apply_skip_rules(
        &self,
        mut destination: Destination,
        answers: &AnswerSet,
        reason: &mut String,
    ) -> Result<(Destination, Vec<String>), ResolveError> {
        let mut skipped: Vec<String> = Vec::new();

        while let Destination::Step(candidate) = &destination {
            let Some(condition) = self.flow.skip_rule_for(candidate) else {
                break;
            };
            let trace = condition.trace(answers);
            if !trace.outcome() {
                break;
            }
            if skipped.contains(candidate) {
                return Err(ResolveError::SkipCycle(candidate.clone()));
            }

            let candidate = candidate.clone();
            let (next, _) = self.hop(&candidate, answers)?;
            reason.push_str(&format!(
                "; skipped '{}' because {}",
                candidate,
                TraceFormatter::format_trace(&trace)
            ));
            skipped.push(candidate);
            destination = next;
        }

        Ok((destination, skipped))
    }

    fn describe_hop(&self, step_id: &str, hop: &Hop, destination: &Destination) -> String {
        match hop {
            Hop::DefaultOrder => format!(
                "no navigation rule for '{}'; '{}' follows in default order",
                step_id, destination
            ),
            Hop::Direct => format!("direct rule of '{}' leads to '{}'", step_id, destination),
            Hop::Branch { index, trace } => format!(
                "branch {} of '{}' matched: {}",
                index,
                step_id,
                TraceFormatter::format_trace(trace)
            ),
            Hop::RuleDefault => format!(
                "no branch of '{}' matched; rule default '{}' applies",
                step_id, destination
            ),
            Hop::NoMatch => format!(
                "no branch of '{}' matched; '{}' follows in default order",
                step_id, destination
            ),
        }
    }
}
