use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two agents of the escape game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    Prisoner,
    Guard,
}

impl AgentId {
    /// Every agent, in the order they are reported
    pub const ALL: [AgentId; 2] = [AgentId::Prisoner, AgentId::Guard];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Prisoner => "prisoner",
            AgentId::Guard => "guard",
        }
    }

    /// The agent on the other side
    pub fn opponent(&self) -> AgentId {
        match self {
            AgentId::Prisoner => AgentId::Guard,
            AgentId::Guard => AgentId::Prisoner,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prisoner" => Ok(AgentId::Prisoner),
            "guard" => Ok(AgentId::Guard),
            other => Err(format!("unknown agent '{other}'")),
        }
    }
}
