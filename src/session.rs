use crate::answers::AnswerSet;
use crate::error::{ResolveError, SessionError};
use crate::flow::{Destination, FlowDefinition, Step};
use crate::resolver::{Resolution, Resolver};

/// Drives one traversal of a flow: tracks the current step, the steps presented before it,
/// and the answers collected so far.
///
/// The session owns all mutable traversal state; the definition and the resolver stay
/// immutable.
#[derive(Debug, Clone)]
pub struct FlowSession<'a> {
    resolver: Resolver<'a>,
    current: Option<String>,
    history: Vec<String>,
    answers: AnswerSet,
}

impl<'a> FlowSession<'a> {
    /// Starts a traversal at the first step that is not bypassed by a skip rule.
    pub fn new(flow: &'a FlowDefinition) -> Result<Self, ResolveError> {
        let resolver = Resolver::new(flow);
        let answers = AnswerSet::new();
        let start = resolver.resolve_first(&answers)?;
        tracing::info!(flow = %flow.identifier(), start = %start.destination, "session started");
        Ok(Self {
            resolver,
            current: start.destination.step_id().map(str::to_string),
            history: Vec::new(),
            answers,
        })
    }

    pub fn flow(&self) -> &'a FlowDefinition {
        self.resolver.flow()
    }

    pub fn current_step_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The step to present now, or `None` once the flow has finished.
    pub fn current_step(&self) -> Option<&'a Step> {
        self.current.as_deref().and_then(|id| self.flow().step(id))
    }

    /// Steps completed so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Completes the current step with `submitted` and moves on.
    ///
    /// Answers previously recorded for the current step are replaced; entries of
    /// `submitted` that address other steps are ignored.
    pub fn submit(&mut self, submitted: AnswerSet) -> Result<Resolution, SessionError> {
        let current = self.current.clone().ok_or(SessionError::Finished)?;
        self.answers.replace_step(&current, submitted);
        self.advance(current)
    }

    /// Leaves the current optional step without an answer.
    pub fn skip(&mut self) -> Result<Resolution, SessionError> {
        let current = self.current.clone().ok_or(SessionError::Finished)?;
        let optional = self.flow().step(&current).is_some_and(|s| s.optional);
        if !optional {
            return Err(SessionError::RequiredStep(current));
        }
        self.answers.clear_step(&current);
        self.advance(current)
    }

    /// Returns to the previously presented step.
    ///
    /// Answers of the step being left are discarded; those of the step returned to are kept
    /// until it is submitted again.
    pub fn back(&mut self) -> Result<&'a Step, SessionError> {
        let current = self.current.clone().ok_or(SessionError::Finished)?;
        let previous = self
            .history
            .pop()
            .ok_or_else(|| SessionError::NoPreviousStep(current.clone()))?;
        self.answers.clear_step(&current);
        tracing::info!(from = %current, to = %previous, "session moved back");

        let step = self
            .flow()
            .step(&previous)
            .ok_or_else(|| ResolveError::UnknownStep(previous.clone()))?;
        self.current = Some(previous);
        Ok(step)
    }

    fn advance(&mut self, completed: String) -> Result<Resolution, SessionError> {
        let resolution = self.resolver.explain_next(&completed, &self.answers)?;
        tracing::info!(
            from = %completed,
            to = %resolution.destination,
            "session advanced"
        );
        self.current = match &resolution.destination {
            Destination::Step(id) => Some(id.clone()),
            Destination::End => None,
        };
        self.history.push(completed);
        Ok(resolution)
    }
}
