// Metric ranking: top-N by a named numeric attribute.

use std::cmp::Ordering;

use crate::roster::{Role, RosterEntity};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RankError {
    #[error("unknown metric `{metric}`")]
    UnknownMetric { metric: String },

    #[error("metric `{metric}` is not defined for {role} entities")]
    MetricNotApplicable { metric: String, role: Role },
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A rankable numeric attribute. Skater metrics and goalie metrics are
/// disjoint sets; asking a collection for a metric its variant lacks is a
/// caller error, detected before any ordering work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Goals,
    Assists,
    Points,
    PenaltyMinutes,
    Hits,
    Saves,
    ShotsAgainst,
    SavePercentage,
}

impl Metric {
    /// Parse a metric name. Accepts the scoresheet abbreviations alongside
    /// the full names.
    pub fn from_str_metric(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "goals" => Some(Metric::Goals),
            "assists" => Some(Metric::Assists),
            "points" => Some(Metric::Points),
            "penalty_minutes" | "pim" => Some(Metric::PenaltyMinutes),
            "hits" => Some(Metric::Hits),
            "saves" => Some(Metric::Saves),
            "shots_against" => Some(Metric::ShotsAgainst),
            "save_percentage" | "save_pct" => Some(Metric::SavePercentage),
            _ => None,
        }
    }

    fn applies_to(self, role: Role) -> bool {
        match self {
            Metric::Goals
            | Metric::Assists
            | Metric::Points
            | Metric::PenaltyMinutes
            | Metric::Hits => role != Role::Goalie,
            Metric::Saves | Metric::ShotsAgainst | Metric::SavePercentage => role == Role::Goalie,
        }
    }
}

/// The metric's value for one entity, or None for the undefined sentinel
/// (save percentage with no shots faced, hits the source never provided).
/// Callers must have checked applicability first.
fn metric_value(entity: &RosterEntity, metric: Metric) -> Option<f64> {
    match entity {
        RosterEntity::Skater(s) => match metric {
            Metric::Goals => Some(f64::from(s.goals)),
            Metric::Assists => Some(f64::from(s.assists)),
            Metric::Points => Some(f64::from(s.points())),
            Metric::PenaltyMinutes => Some(f64::from(s.penalty_minutes)),
            Metric::Hits => s.hits.map(f64::from),
            _ => None,
        },
        RosterEntity::Goalie(g) => match metric {
            Metric::Saves => Some(f64::from(g.saves)),
            Metric::ShotsAgainst => Some(f64::from(g.shots_against)),
            Metric::SavePercentage => g.save_percentage(),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Rank entities descending by the named metric and keep the first `n`.
///
/// Entities whose metric is undefined sort below every defined value —
/// deprioritized, never dropped. Ties break by ascending name in byte order,
/// so the output is a total order reproducible across runs. The input
/// collection is never mutated; `n = 0` yields an empty result and `n` past
/// the end yields the whole ranked collection.
pub fn top_n(
    entities: &[RosterEntity],
    metric: &str,
    n: usize,
) -> Result<Vec<RosterEntity>, RankError> {
    let parsed = Metric::from_str_metric(metric).ok_or_else(|| RankError::UnknownMetric {
        metric: metric.to_string(),
    })?;

    // Validate the whole collection before sorting anything.
    for entity in entities {
        if !parsed.applies_to(entity.role()) {
            return Err(RankError::MetricNotApplicable {
                metric: metric.to_string(),
                role: entity.role(),
            });
        }
    }

    let mut ranked: Vec<&RosterEntity> = entities.iter().collect();
    ranked.sort_by(|a, b| compare_by_metric(a, b, parsed));
    ranked.truncate(n);
    Ok(ranked.into_iter().cloned().collect())
}

fn compare_by_metric(a: &RosterEntity, b: &RosterEntity, metric: Metric) -> Ordering {
    let tie_break = a.name().cmp(b.name());
    match (metric_value(a, metric), metric_value(b, metric)) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(tie_break),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => tie_break,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
