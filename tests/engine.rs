// End-to-end tests for the statistics engine: CSV in, ranked report out,
// snapshot round-trips through a real database file.

use puckboard::filter;
use puckboard::ingest::{load_goalies_from_reader, load_skaters_from_reader};
use puckboard::rank;
use puckboard::roster::{Role, RosterEntity};
use puckboard::store::{PlayerRow, SnapshotStore};

const SKATERS_CSV: &str = "\
name,team,role,goals,assists,penalty_minutes,hits
A,BOS,Forward,5,3,10,40
B,WSH,Forward,5,3,2,12
Charlie McAvoy,Boston Bruins (BOS),Defense,7,23,50,111
Tom Wilson,WSH,Forward,18,19,95,200";

const GOALIES_CSV: &str = "\
name,team,saves,shots_against
Jeremy Swayman,BOS,27,30
Cold Backup,WSH,0,0";

fn skaters() -> Vec<RosterEntity> {
    let report = load_skaters_from_reader(SKATERS_CSV.as_bytes()).unwrap();
    assert!(report.row_errors.is_empty());
    report.entities
}

fn goalies() -> Vec<RosterEntity> {
    let report = load_goalies_from_reader(GOALIES_CSV.as_bytes()).unwrap();
    assert!(report.row_errors.is_empty());
    report.entities
}

// ---------------------------------------------------------------------------
// Ingest → rank
// ---------------------------------------------------------------------------

/// Equal points (5+3 = 8) resolve by ascending name: "A" before "B".
#[test]
fn points_tie_breaks_by_name() {
    let skaters = skaters();
    let forwards = filter::by_role(&skaters, "Forward").unwrap();
    let top = rank::top_n(&forwards, "points", 2).unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name(), "Tom Wilson"); // 37 points
    assert_eq!(top[1].name(), "A"); // ties with B at 8, wins on name
}

#[test]
fn tie_break_pair_orders_a_before_b() {
    let skaters = skaters();
    let pair: Vec<RosterEntity> = skaters
        .iter()
        .filter(|e| e.name() == "A" || e.name() == "B")
        .cloned()
        .collect();
    let top = rank::top_n(&pair, "points", 2).unwrap();
    let names: Vec<&str> = top.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn goalie_sentinel_ranks_last() {
    let goalies = goalies();

    let busy = goalies[0].as_goalie().unwrap();
    let pct = busy.save_percentage().unwrap();
    assert!((pct - 0.9).abs() < 1e-12);

    let idle = goalies[1].as_goalie().unwrap();
    assert_eq!(idle.save_percentage(), None);

    let ranked = rank::top_n(&goalies, "save_percentage", 2).unwrap();
    assert_eq!(ranked[0].name(), "Jeremy Swayman");
    assert_eq!(ranked[1].name(), "Cold Backup");
}

#[test]
fn ranking_a_ranked_subset_is_stable() {
    let skaters = skaters();
    let once = rank::top_n(&skaters, "penalty_minutes", 3).unwrap();
    let twice = rank::top_n(&once, "penalty_minutes", 3).unwrap();
    assert_eq!(once, twice);
}

// ---------------------------------------------------------------------------
// Filtering across the mixed roster
// ---------------------------------------------------------------------------

#[test]
fn team_filter_spans_bare_codes_and_free_text() {
    let mut roster = skaters();
    roster.extend(goalies());

    let boston = filter::by_team(&roster, "bos");
    let names: Vec<&str> = boston.iter().map(|e| e.name()).collect();
    // "Charlie McAvoy" matches through the parenthetical code in the
    // free-text team field.
    assert_eq!(names, vec!["A", "Charlie McAvoy", "Jeremy Swayman"]);

    let again = filter::by_team(&boston, "BOS");
    assert_eq!(boston, again);
}

#[test]
fn role_filter_rejects_unknown_roles() {
    let roster = skaters();
    assert!(filter::by_role(&roster, "Enforcer").is_err());
    assert_eq!(filter::by_role(&roster, "Defense").unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Snapshot round-trip
// ---------------------------------------------------------------------------

#[test]
fn snapshot_round_trips_through_a_fresh_database() {
    let tmp = std::env::temp_dir().join(format!("engine_roundtrip_{}.db", std::process::id()));
    let path = tmp.to_str().unwrap();
    let _ = std::fs::remove_file(&tmp);

    let mut roster = skaters();
    roster.extend(goalies());

    {
        let mut store = SnapshotStore::open(path).unwrap();
        let written = store.save(&roster).unwrap();
        assert_eq!(written, roster.len());
    }

    // Reopen read-side, as a separate consumer would.
    let store = SnapshotStore::open(path).unwrap();
    let mut rows = store.load_all().unwrap();
    let mut expected: Vec<PlayerRow> = roster.iter().map(PlayerRow::from).collect();

    // Content equality ignoring row order.
    let key = |r: &PlayerRow| (r.name.clone(), r.team.clone(), r.position.clone());
    rows.sort_by_key(key);
    expected.sort_by_key(key);
    assert_eq!(rows, expected);

    let goalie_row = rows.iter().find(|r| r.position == "Goalie").unwrap();
    assert_eq!(goalie_row.goals, 0);
    assert_eq!(goalie_row.penalty_minutes, 0);

    let _ = std::fs::remove_file(&tmp);
    let _ = std::fs::remove_file(format!("{path}-wal"));
    let _ = std::fs::remove_file(format!("{path}-shm"));
}

// ---------------------------------------------------------------------------
// Ingestion error surfacing
// ---------------------------------------------------------------------------

#[test]
fn malformed_rows_surface_together_with_valid_entities() {
    let csv_data = "\
name,team,role,goals,assists,penalty_minutes
Good,BOS,Forward,1,1,0
Bad,BOS,Forward,one,1,0
,WSH,Defense,0,0,0";

    let report = load_skaters_from_reader(csv_data.as_bytes()).unwrap();
    assert_eq!(report.entities.len(), 1);
    assert_eq!(report.row_errors.len(), 2);
    assert_eq!(report.row_errors[0].row, 2);
    assert_eq!(report.row_errors[1].row, 3);
}

#[test]
fn derive_covers_the_whole_roster() {
    let mut roster = skaters();
    roster.extend(goalies());

    let lines = puckboard::transform::derive(&roster);
    assert_eq!(lines.len(), roster.len());

    let a = lines.iter().find(|l| l.name == "A").unwrap();
    assert_eq!(a.points, Some(8));
    assert_eq!(a.save_percentage, None);

    let idle = lines.iter().find(|l| l.name == "Cold Backup").unwrap();
    assert_eq!(idle.role, Role::Goalie);
    assert_eq!(idle.points, None);
    assert_eq!(idle.save_percentage, None);
}

#[test]
fn entities_keep_their_roles_through_the_pipeline() {
    let mut roster = skaters();
    roster.extend(goalies());

    for entity in &roster {
        match entity {
            RosterEntity::Skater(s) => assert_ne!(s.position, Role::Goalie),
            RosterEntity::Goalie(_) => assert_eq!(entity.role(), Role::Goalie),
        }
    }
}
