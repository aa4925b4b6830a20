//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the branchflow
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use branchflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let flow = FlowDocument::load_flow("data/navigable_survey.json")?;
//! let answers = AnswerSet::from_file("data/answers_severe_headache.json")?;
//!
//! let next = Resolver::new(&flow).explain_next("severity", &answers)?;
//! println!("Next: {} ({})", next.destination, next.reason);
//! # Ok(())
//! # }
//! ```

// Flow definition
pub use crate::flow::{
    Destination, END_OF_FLOW, FlowArtifact, FlowBuilder, FlowDefinition, FlowDocument, FormItem,
    IntoFlow, NavigationRule, PredicateBranch, RulePolicy, Step, StepKind,
};

// Conditions and answers
pub use crate::answers::{AnswerKey, AnswerSet, RecordedAnswer};
pub use crate::condition::{AnswerValue, Condition, ConditionTrace};

// Resolution
pub use crate::resolver::{Resolution, Resolver};
pub use crate::session::FlowSession;

// Error types
pub use crate::error::{ArtifactError, DocumentError, FlowError, ResolveError, SessionError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
