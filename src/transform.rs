// Derived statistics: the numeric policy for points and save percentage.
//
// Derived values are computed from their source fields on every read, so
// they can never disagree with the stored stats.

use crate::roster::{Goalie, Role, RosterEntity, Skater};

impl Skater {
    /// Total points: goals plus assists. Integer arithmetic, no rounding.
    pub fn points(&self) -> u32 {
        self.goals + self.assists
    }
}

impl Goalie {
    /// Save percentage, or None when no shots were faced.
    ///
    /// The absent value is a distinct, checkable state: it is never 0.0,
    /// never 1.0, never NaN or infinity, and never an error.
    pub fn save_percentage(&self) -> Option<f64> {
        if self.shots_against == 0 {
            return None;
        }
        Some(f64::from(self.saves) / f64::from(self.shots_against))
    }
}

/// One entity's derived line for report rendering: identity fields plus the
/// derived values that apply to its role.
#[derive(Debug, Clone)]
pub struct DerivedLine {
    pub name: String,
    pub team: String,
    pub role: Role,
    pub points: Option<u32>,
    pub save_percentage: Option<f64>,
}

/// Materialize derived values for a batch of entities. Order is preserved
/// and no entity is dropped; fields not involved in derivation stay on the
/// input entities untouched.
pub fn derive(entities: &[RosterEntity]) -> Vec<DerivedLine> {
    entities
        .iter()
        .map(|entity| match entity {
            RosterEntity::Skater(s) => DerivedLine {
                name: s.name.clone(),
                team: s.team.clone(),
                role: s.position,
                points: Some(s.points()),
                save_percentage: None,
            },
            RosterEntity::Goalie(g) => DerivedLine {
                name: g.name.clone(),
                team: g.team.clone(),
                role: Role::Goalie,
                points: None,
                save_percentage: g.save_percentage(),
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn skater(goals: u32, assists: u32) -> Skater {
        Skater {
            name: "Test Skater".to_string(),
            team: "BOS".to_string(),
            position: Role::Forward,
            goals,
            assists,
            penalty_minutes: 0,
            hits: None,
        }
    }

    fn goalie(saves: u32, shots_against: u32) -> Goalie {
        Goalie {
            name: "Test Goalie".to_string(),
            team: "BOS".to_string(),
            saves,
            shots_against,
        }
    }

    // -- Points --

    #[test]
    fn points_is_goals_plus_assists() {
        assert_eq!(skater(5, 3).points(), 8);
        assert_eq!(skater(0, 0).points(), 0);
        assert_eq!(skater(42, 0).points(), 42);
    }

    // -- Save percentage --

    #[test]
    fn save_percentage_divides_saves_by_shots() {
        let pct = goalie(27, 30).save_percentage().unwrap();
        assert!((pct - 0.9).abs() < 1e-12);
    }

    #[test]
    fn zero_shots_against_yields_sentinel() {
        let pct = goalie(0, 0).save_percentage();
        assert_eq!(pct, None);
        // The sentinel is distinct from any real percentage.
        assert_ne!(pct, Some(0.0));
        assert_ne!(pct, Some(1.0));
    }

    #[test]
    fn perfect_goalie_is_one_not_sentinel() {
        assert_eq!(goalie(12, 12).save_percentage(), Some(1.0));
    }

    // -- Batch derive --

    #[test]
    fn derive_preserves_order_and_length() {
        let entities = vec![
            RosterEntity::Skater(skater(5, 3)),
            RosterEntity::Goalie(goalie(27, 30)),
            RosterEntity::Goalie(goalie(0, 0)),
        ];
        let lines = derive(&entities);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].points, Some(8));
        assert_eq!(lines[0].save_percentage, None);
        assert!(lines[1].save_percentage.is_some());
        assert_eq!(lines[2].save_percentage, None);
        assert_eq!(lines[2].role, Role::Goalie);
    }
}
