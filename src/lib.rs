//! # branchflow - Branching Survey Flow Engine
//!
//! **branchflow** models a survey or task as an ordered sequence of steps plus declarative
//! jump rules evaluated against the answers collected so far. Given a completed step and
//! the accumulated answers, it resolves which step to present next.
//!
//! ## Core Workflow
//!
//! 1.  **Define the flow**: Declare steps in their default order with a `FlowBuilder`, load a
//!     `FlowDocument` from JSON, or implement `IntoFlow` for your own format.
//! 2.  **Attach rules**: A trigger step gets at most one navigation rule, either a direct
//!     redirect or an ordered list of `(Condition, destination)` branches. Steps may also get a
//!     skip rule that bypasses them.
//! 3.  **Build**: `build()` validates every destination and condition and freezes the flow.
//!     A malformed flow never starts.
//! 4.  **Resolve**: Use a `Resolver` directly, or let a `FlowSession` drive a whole traversal.
//!
//! ## Quick Start
//!
//! ```rust
//! use branchflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let flow = FlowBuilder::new("checkup")
//!         .step(Step::single_choice("symptom", ["headache", "dizziness"]))
//!         .step(Step::boolean("severity"))
//!         .step(Step::instruction("other_symptom"))
//!         .predicate_rule(
//!             "symptom",
//!             [(!Condition::choice("symptom", "headache"), "other_symptom")],
//!         )
//!         .build()?;
//!
//!     let resolver = Resolver::new(&flow);
//!     let mut answers = AnswerSet::new();
//!
//!     answers.record_choice("symptom", "dizziness");
//!     let next = resolver.resolve_next("symptom", &answers)?;
//!     assert_eq!(next, Destination::Step("other_symptom".to_string()));
//!
//!     answers.record_choice("symptom", "headache");
//!     let resolution = resolver.explain_next("symptom", &answers)?;
//!     assert_eq!(resolution.destination, Destination::Step("severity".to_string()));
//!     println!("-> {}", resolution.reason);
//!
//!     Ok(())
//! }
//! ```

pub mod answers;
pub mod condition;
pub mod error;
pub mod flow;
pub mod prelude;
pub mod resolver;
pub mod samples;
pub mod session;
pub mod trace;
