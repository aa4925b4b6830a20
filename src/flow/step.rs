use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved identifier that denotes the end of the flow wherever a destination is written
/// as a plain string (JSON documents, CLI output).
pub const END_OF_FLOW: &str = "$end";

/// What a step presents, and therefore what kind of answers it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Informational text, no answer.
    Instruction,
    /// A question with one selectable value out of `choices`.
    SingleChoice { choices: Vec<String> },
    /// A yes/no question.
    Boolean,
    /// A question answered with a number.
    Numeric,
    /// A question answered with a calendar date.
    Date,
    /// Several sub-questions answered together, addressed by item identifier.
    Form { items: Vec<FormItem> },
    /// Marks completion of the flow, no answer.
    Completion,
}

impl StepKind {
    /// Whether presenting this step normally collects an answer.
    pub fn expects_answer(&self) -> bool {
        matches!(
            self,
            StepKind::SingleChoice { .. }
                | StepKind::Boolean
                | StepKind::Numeric
                | StepKind::Date
                | StepKind::Form { .. }
        )
    }

    pub fn form_items(&self) -> Option<&[FormItem]> {
        match self {
            StepKind::Form { items } => Some(items),
            _ => None,
        }
    }
}

/// A sub-question of a form step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormItem {
    pub id: String,
    /// Accepted values; empty for free-form items.
    #[serde(default)]
    pub choices: Vec<String>,
}

impl FormItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            choices: Vec::new(),
        }
    }

    /// An item answered by picking one of `choices`.
    pub fn choice<I, S>(id: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `value` is acceptable for this item.
    pub fn accepts(&self, value: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|c| c == value)
    }
}

impl From<&str> for FormItem {
    fn from(id: &str) -> Self {
        FormItem::new(id)
    }
}

/// One presented unit of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub kind: StepKind,
    /// Optional steps may be left without an answer.
    #[serde(default)]
    pub optional: bool,
}

impl Step {
    pub fn new(id: impl Into<String>, kind: StepKind) -> Self {
        Self {
            id: id.into(),
            title: None,
            kind,
            optional: false,
        }
    }

    pub fn instruction(id: impl Into<String>) -> Self {
        Self::new(id, StepKind::Instruction)
    }

    pub fn single_choice<I, S>(id: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            StepKind::SingleChoice {
                choices: choices.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn boolean(id: impl Into<String>) -> Self {
        Self::new(id, StepKind::Boolean)
    }

    pub fn numeric(id: impl Into<String>) -> Self {
        Self::new(id, StepKind::Numeric)
    }

    pub fn date(id: impl Into<String>) -> Self {
        Self::new(id, StepKind::Date)
    }

    pub fn form<I, F>(id: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FormItem>,
    {
        Self::new(
            id,
            StepKind::Form {
                items: items.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn completion(id: impl Into<String>) -> Self {
        Self::new(id, StepKind::Completion)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Where a traversal goes next: a step, or the end of the flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Step(String),
    End,
}

impl Destination {
    /// Parses the string form, mapping `END_OF_FLOW` to `Destination::End`.
    pub fn from_id(id: &str) -> Self {
        if id == END_OF_FLOW {
            Destination::End
        } else {
            Destination::Step(id.to_string())
        }
    }

    pub fn step_id(&self) -> Option<&str> {
        match self {
            Destination::Step(id) => Some(id),
            Destination::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Destination::End)
    }

    /// The string form, the inverse of `from_id`.
    pub fn as_id(&self) -> &str {
        match self {
            Destination::Step(id) => id,
            Destination::End => END_OF_FLOW,
        }
    }
}

impl From<&str> for Destination {
    fn from(id: &str) -> Self {
        Destination::from_id(id)
    }
}

impl From<String> for Destination {
    fn from(id: String) -> Self {
        if id == END_OF_FLOW {
            Destination::End
        } else {
            Destination::Step(id)
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_id())
    }
}
