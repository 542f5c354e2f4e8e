//! Team roster types as published by the backend's team monitor.

use serde::{Deserialize, Serialize};

/// Personality sliders attached to a team member, each on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    /// Sociability. The backend spells the key `socialibility`.
    #[serde(rename = "socialibility")]
    pub sociability: u8,
    /// Cautiousness.
    pub cautiousness: u8,
    /// Humor.
    pub humor: u8,
    /// Curiosity.
    pub curiosity: u8,
    /// Friendliness.
    pub friendliness: u8,
}

/// One agent in a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Agent identifier, unique within the team.
    pub agent_id: String,
    /// Display name.
    pub name: String,
    /// Agent type (e.g. `"general-purpose"`).
    #[serde(default)]
    pub agent_type: String,
    /// Model the agent runs on.
    #[serde(default)]
    pub model: String,
    /// Join time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub joined_at: i64,
    /// Working directory of the agent process.
    #[serde(default)]
    pub cwd: String,
    /// Optional personality profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
}

/// A team and its members. Teams are keyed by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    /// Team name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
    /// Agent id of the team lead.
    #[serde(default)]
    pub lead_agent_id: String,
    /// Session id of the team lead.
    #[serde(default)]
    pub lead_session_id: String,
    /// Team roster.
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl TeamInfo {
    /// Looks up a member by agent name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_team_payload() {
        let json = r#"{
            "name": "alpha",
            "description": "research",
            "createdAt": 1700000000000,
            "leadAgentId": "lead@alpha",
            "leadSessionId": "s-1",
            "members": [
                {"agentId": "a1@alpha", "name": "a1", "agentType": "general-purpose",
                 "model": "opus", "joinedAt": 1700000000100, "cwd": "/work",
                 "tmuxPaneId": "%3"}
            ]
        }"#;
        let Ok(team) = serde_json::from_str::<TeamInfo>(json) else {
            panic!("team payload must decode");
        };
        assert_eq!(team.name, "alpha");
        assert_eq!(team.members.len(), 1);
        let Some(member) = team.member("a1") else {
            panic!("member a1 expected");
        };
        assert_eq!(member.agent_id, "a1@alpha");
        assert!(member.personality.is_none());
    }

    #[test]
    fn personality_uses_backend_spelling() {
        let p = Personality {
            sociability: 70,
            cautiousness: 40,
            humor: 55,
            curiosity: 90,
            friendliness: 80,
        };
        let json = serde_json::to_string(&p).unwrap_or_default();
        assert!(json.contains("\"socialibility\":70"));
    }
}
