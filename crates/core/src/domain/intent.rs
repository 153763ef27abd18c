use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of labels a query can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Retrieve,
    Analyze,
    Visualize,
    Generate,
    Help,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("`{0}` is not an allowed intent")]
pub struct UnknownIntent(pub String);

impl Intent {
    /// Allowed intents in prompt order.
    pub const ALL: [Intent; 5] =
        [Intent::Retrieve, Intent::Analyze, Intent::Visualize, Intent::Generate, Intent::Help];

    /// Substituted whenever the model's answer cannot be trusted.
    pub const FALLBACK: Intent = Intent::Help;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Analyze => "analyze",
            Self::Visualize => "visualize",
            Self::Generate => "generate",
            Self::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Retrieve => "fetch records or documents for a target",
            Self::Analyze => "compute insights or trends over a target",
            Self::Visualize => "produce a chart or dashboard for a target",
            Self::Generate => "write a report, summary, or other artifact",
            Self::Help => "explain what the agent can do",
        }
    }

    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Intent::as_str).collect()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive membership. `"Analyze"` is not `analyze`.
impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value)
            .ok_or_else(|| UnknownIntent(value.to_string()))
    }
}
