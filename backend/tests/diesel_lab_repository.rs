//! `DieselLabRepository` against embedded PostgreSQL: seeding under the
//! table lock and the ordered catalogue listing.

use std::num::NonZeroU32;

use labrank::domain::NewLab;
use labrank::domain::ports::{LabRepository, SeedOutcome};
use labrank::outbound::persistence::DieselLabRepository;
use rstest::{fixture, rstest};

mod support;

use support::{Database, cluster_or_skip};

const TEST_DB: &str = "labrank_lab_repo_test";

fn catalogue() -> Vec<NewLab> {
    vec![
        NewLab {
            name: "Moth Lab".to_owned(),
            staff: Some("R. Osei".to_owned()),
            capacity: NonZeroU32::new(6),
        },
        NewLab {
            name: "Ant Lab".to_owned(),
            staff: None,
            capacity: None,
        },
        NewLab {
            name: "Bee Lab".to_owned(),
            staff: Some("M. Sato".to_owned()),
            capacity: NonZeroU32::new(12),
        },
    ]
}

#[fixture]
fn database() -> Option<Database> {
    cluster_or_skip(TEST_DB)
}

#[rstest]
fn second_seed_reports_already_populated(database: Option<Database>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: second_seed_reports_already_populated skipped");
        return;
    };
    let repo = DieselLabRepository::new(database.pool.clone());
    let labs = catalogue();

    let first = database
        .runtime
        .block_on(repo.seed_if_empty(&labs))
        .expect("first seed");
    let second = database
        .runtime
        .block_on(repo.seed_if_empty(&labs[..1]))
        .expect("second seed");

    assert_eq!(first, SeedOutcome::Seeded { inserted: 3 });
    assert_eq!(second, SeedOutcome::AlreadyPopulated { existing: 3 });
    let stored = database
        .runtime
        .block_on(repo.list_labs())
        .expect("list labs");
    assert_eq!(stored.len(), 3);
}

#[rstest]
fn concurrent_seeders_insert_the_catalogue_once(database: Option<Database>) {
    let Some(database) = database else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_seeders_insert_the_catalogue_once skipped");
        return;
    };
    let left = DieselLabRepository::new(database.pool.clone());
    let right = DieselLabRepository::new(database.pool.clone());
    let labs = catalogue();

    let (a, b) = database
        .runtime
        .block_on(async { tokio::join!(left.seed_if_empty(&labs), right.seed_if_empty(&labs)) });
    let mut outcomes = [a.expect("left seed"), b.expect("right seed")];
    outcomes.sort_by_key(|outcome| matches!(outcome, SeedOutcome::AlreadyPopulated { .. }));

    assert_eq!(
        outcomes,
        [
            SeedOutcome::Seeded { inserted: 3 },
            SeedOutcome::AlreadyPopulated { existing: 3 },
        ]
    );
    let stored = database
        .runtime
        .block_on(left.list_labs())
        .expect("list labs");
    assert_eq!(stored.len(), 3);
}

#[rstest]
fn listing_is_ordered_by_name_and_keeps_optional_fields(database: Option<Database>) {
    let Some(database) = database else {
        eprintln!(
            "SKIP-TEST-CLUSTER: listing_is_ordered_by_name_and_keeps_optional_fields skipped"
        );
        return;
    };
    let repo = DieselLabRepository::new(database.pool.clone());
    database
        .runtime
        .block_on(repo.seed_if_empty(&catalogue()))
        .expect("seed");

    let stored = database
        .runtime
        .block_on(repo.list_labs())
        .expect("list labs");

    let names: Vec<&str> = stored.iter().map(|lab| lab.name()).collect();
    assert_eq!(names, ["Ant Lab", "Bee Lab", "Moth Lab"]);
    assert_eq!(stored[0].staff(), None);
    assert_eq!(stored[0].capacity(), None);
    assert_eq!(stored[1].staff(), Some("M. Sato"));
    assert_eq!(stored[1].capacity(), NonZeroU32::new(12));
}
