// Roster entity model: skaters, goalies, and the roles they play.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Functional category of a roster entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Forward,
    Defense,
    Goalie,
}

impl Role {
    /// Parse a role string into a Role enum.
    ///
    /// Matching is case-insensitive after trimming. Anything outside the
    /// known set returns None.
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Some(Role::Forward),
            "defense" => Some(Role::Defense),
            "goalie" => Some(Role::Goalie),
            _ => None,
        }
    }

    /// Return the display string for this role.
    pub fn display_str(&self) -> &'static str {
        match self {
            Role::Forward => "Forward",
            Role::Defense => "Defense",
            Role::Goalie => "Goalie",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Season stat line for a skater.
///
/// `team` is either a bare short code ("BOS") or free text carrying a
/// parenthetical code ("Boston Bruins (BOS)"); resolution to a code lives in
/// the filter module. `position` is Forward or Defense only — goalie rows
/// belong in [`Goalie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skater {
    pub name: String,
    pub team: String,
    pub position: Role,
    pub goals: u32,
    pub assists: u32,
    pub penalty_minutes: u32,
    /// Hits are an optional input column; None when the source omits them.
    pub hits: Option<u32>,
}

/// Season stat line for a goalie. The role is fixed by the variant; no
/// skater fields are forced onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goalie {
    pub name: String,
    pub team: String,
    pub saves: u32,
    pub shots_against: u32,
}

/// A roster entity: one skater or one goalie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RosterEntity {
    Skater(Skater),
    Goalie(Goalie),
}

impl RosterEntity {
    pub fn name(&self) -> &str {
        match self {
            RosterEntity::Skater(s) => &s.name,
            RosterEntity::Goalie(g) => &g.name,
        }
    }

    pub fn team(&self) -> &str {
        match self {
            RosterEntity::Skater(s) => &s.team,
            RosterEntity::Goalie(g) => &g.team,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            RosterEntity::Skater(s) => s.position,
            RosterEntity::Goalie(_) => Role::Goalie,
        }
    }

    pub fn as_skater(&self) -> Option<&Skater> {
        match self {
            RosterEntity::Skater(s) => Some(s),
            RosterEntity::Goalie(_) => None,
        }
    }

    pub fn as_goalie(&self) -> Option<&Goalie> {
        match self {
            RosterEntity::Skater(_) => None,
            RosterEntity::Goalie(g) => Some(g),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
