use super::Destination;
use crate::condition::Condition;
use serde::{Deserialize, Serialize};

/// One `(condition, destination)` pair of a predicate rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateBranch {
    pub condition: Condition,
    pub destination: Destination,
}

/// Decides where a traversal goes after its trigger step has been completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationRule {
    /// Always jumps to `destination`, whatever the answers are.
    Direct { destination: Destination },
    /// Jumps to the destination of the first branch whose condition holds.
    ///
    /// When nothing matches, `default` is used if set; otherwise the traversal continues
    /// in default order.
    Predicate {
        branches: Vec<PredicateBranch>,
        default: Option<Destination>,
    },
}

impl NavigationRule {
    pub fn direct(destination: impl Into<Destination>) -> Self {
        NavigationRule::Direct {
            destination: destination.into(),
        }
    }

    /// Builds a predicate rule from `(condition, destination)` pairs, in evaluation order.
    pub fn predicate<I, D>(branches: I) -> Self
    where
        I: IntoIterator<Item = (Condition, D)>,
        D: Into<Destination>,
    {
        NavigationRule::Predicate {
            branches: branches
                .into_iter()
                .map(|(condition, destination)| PredicateBranch {
                    condition,
                    destination: destination.into(),
                })
                .collect(),
            default: None,
        }
    }

    /// Sets the fallback of a predicate rule. Has no effect on direct rules.
    pub fn with_default(self, destination: impl Into<Destination>) -> Self {
        match self {
            NavigationRule::Predicate { branches, .. } => NavigationRule::Predicate {
                branches,
                default: Some(destination.into()),
            },
            direct => direct,
        }
    }

    /// Every destination this rule can produce.
    pub fn destinations(&self) -> Vec<&Destination> {
        match self {
            NavigationRule::Direct { destination } => vec![destination],
            NavigationRule::Predicate { branches, default } => branches
                .iter()
                .map(|b| &b.destination)
                .chain(default.iter())
                .collect(),
        }
    }

    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        let branches: &[PredicateBranch] = match self {
            NavigationRule::Predicate { branches, .. } => branches,
            NavigationRule::Direct { .. } => &[],
        };
        branches.iter().map(|b| &b.condition)
    }
}
