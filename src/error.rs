use thiserror::Error;

/// Errors detected while building or validating a flow definition.
///
/// A flow that fails any of these checks is never allowed to start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Flow '{0}' declares no steps")]
    EmptyFlow(String),

    #[error("Step '{0}' is declared more than once")]
    DuplicateStep(String),

    #[error("Step identifier '{0}' is reserved for the end of the flow")]
    ReservedIdentifier(String),

    #[error("Step '{step_id}' referenced by {context} does not exist")]
    UnknownStep { step_id: String, context: String },

    #[error(
        "Navigation rule triggered by '{trigger}' points to '{destination}', \
        which is neither a step nor the end of the flow"
    )]
    UnresolvedDestination {
        trigger: String,
        destination: String,
    },

    #[error("Navigation rule triggered by '{0}' points back to the same step")]
    SelfDestination(String),

    #[error("Malformed condition in rule for '{trigger}': {message}")]
    MalformedCondition { trigger: String, message: String },

    #[error("A navigation rule is already registered for trigger step '{0}'")]
    DuplicateRule(String),

    #[error("A skip rule is already registered for step '{0}'")]
    DuplicateSkipRule(String),

    #[error("Predicate rule for '{0}' has no branches")]
    EmptyPredicateRule(String),
}

/// Errors that can occur while resolving the next step of a traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Step '{0}' is not part of the flow")]
    UnknownStep(String),

    #[error("Skip rules form a cycle through step '{0}'")]
    SkipCycle(String),
}

/// Errors raised by a `FlowSession` driving a traversal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("The flow has already finished")]
    Finished,

    #[error("Step '{0}' is not optional and cannot be skipped")]
    RequiredStep(String),

    #[error("There is no step before '{0}'")]
    NoPreviousStep(String),
}

/// Errors that can occur when reading flow documents or answer files.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Errors that can occur when saving or loading a compiled flow artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Could not access artifact file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Encode(String),

    #[error("Deserialization failed: {0}")]
    Decode(String),

    #[error("Unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Artifact contains an invalid flow: {0}")]
    Invalid(#[from] FlowError),
}
