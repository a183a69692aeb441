//! Priority class - routine/urgent/emergency message categorization
//!
//! Drives alert thresholds and unread counter partitioning.

use serde::{Deserialize, Serialize};

/// Message priority class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Normal conversation traffic
    Routine,
    /// Needs attention soon
    Urgent,
    /// Needs immediate attention
    Emergency,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Routine
    }
}

impl Priority {
    /// All priority classes, in escalation order
    pub const ALL: [Priority; 3] = [Priority::Routine, Priority::Urgent, Priority::Emergency];

    /// Database column suffix / wire name for this class
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "routine" => Ok(Self::Routine),
            "urgent" => Ok(Self::Urgent),
            "emergency" => Ok(Self::Emergency),
            _ => Err(format!("Invalid priority class: {s}")),
        }
    }
}
