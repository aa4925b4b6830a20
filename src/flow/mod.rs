pub mod artifact;
pub mod builder;
pub mod definition;
pub mod document;
pub mod rule;
pub mod step;

pub use artifact::*;
pub use builder::*;
pub use definition::*;
pub use document::*;
pub use rule::*;
pub use step::*;
