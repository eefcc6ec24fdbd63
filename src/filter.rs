// Role and team filtering, including team-code extraction from free text.

use std::sync::OnceLock;

use regex::Regex;

use crate::roster::{Role, RosterEntity};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("unknown role `{requested}` (expected Forward, Defense, or Goalie)")]
    InvalidRole { requested: String },
}

// ---------------------------------------------------------------------------
// Team-code extraction
// ---------------------------------------------------------------------------

/// First parenthesized run of uppercase ASCII letters, e.g. "(BOS)".
fn team_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Z]+)\)").expect("team code pattern is valid"))
}

/// Extract a team code from free text, e.g. `"John Smith (BOS)"` → `"BOS"`.
///
/// Only the first parenthetical match counts; later groups (jersey numbers,
/// nicknames) are ignored. Returns None when no code is present — a missing
/// annotation is expected input, not an error.
pub fn extract_team_code(free_text: &str) -> Option<&str> {
    team_code_re()
        .captures(free_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Resolve an entity's team field to a short code.
///
/// A bare 2–4 letter uppercase field stands for itself; otherwise the first
/// parenthetical code in the free text is used. None when neither applies.
pub fn resolve_team_code(entity: &RosterEntity) -> Option<String> {
    let team = entity.team().trim();
    if (2..=4).contains(&team.len()) && team.bytes().all(|b| b.is_ascii_uppercase()) {
        return Some(team.to_string());
    }
    extract_team_code(team).map(|code| code.to_string())
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Select entities with the given role. The role arrives as caller text; a
/// name outside the known set is a caller error, never coerced to a default.
/// The subset preserves input order and the input is untouched.
pub fn by_role(entities: &[RosterEntity], role: &str) -> Result<Vec<RosterEntity>, FilterError> {
    let wanted = Role::from_str_role(role).ok_or_else(|| FilterError::InvalidRole {
        requested: role.to_string(),
    })?;
    Ok(entities
        .iter()
        .filter(|e| e.role() == wanted)
        .cloned()
        .collect())
}

/// Select entities whose resolved team code matches, case-insensitively.
/// No match is an empty result, not an error; entities without a resolvable
/// code never match.
pub fn by_team(entities: &[RosterEntity], team_code: &str) -> Vec<RosterEntity> {
    entities
        .iter()
        .filter(|e| {
            resolve_team_code(e).is_some_and(|code| code.eq_ignore_ascii_case(team_code))
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
