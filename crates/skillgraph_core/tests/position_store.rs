use rand::rngs::StdRng;
use rand::SeedableRng;
use skillgraph_core::db::migrations::latest_version;
use skillgraph_core::db::{open_db, open_db_in_memory, DbError, StoreLocation};
use skillgraph_core::{
    build_graph, GraphRecords, LayoutConfig, ManualClock, NodeId, NodeKind, PositionRepository,
    PositionWriteQueue, Position, QueueConfig, RepoError, Skill, SqlitePositionRepository, Stage,
};
use std::collections::BTreeSet;
use uuid::Uuid;

#[test]
fn open_applies_migrations() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let tables: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'node_positions';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
}

#[test]
fn reopening_a_file_keeps_positions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.sqlite3");
    let node = NodeId::from_raw("skill:kept");

    {
        let conn = open_db(&path).unwrap();
        SqlitePositionRepository::new(&conn)
            .upsert_position(&node, NodeKind::Skill, Position::new(4.0, 2.0))
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let stored = SqlitePositionRepository::new(&conn)
        .get_position(&node)
        .unwrap()
        .unwrap();
    assert_eq!(stored.position, Position::new(4.0, 2.0));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::UnsupportedSchemaVersion {
            store,
            db_version,
            latest_supported,
        } => {
            assert_eq!(*store, StoreLocation::File(path.clone()));
            assert_eq!(*db_version, latest_version() + 1);
            assert_eq!(*latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("newer than supported"));
    assert!(message.contains("future.sqlite3"));
}

#[test]
fn unopenable_store_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("positions.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        &err,
        DbError::Open { store: StoreLocation::File(failed), .. } if *failed == path
    ));
    assert!(err.to_string().contains("positions.sqlite3"));
}

#[test]
fn upsert_replaces_existing_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::new(&conn);
    let node = NodeId::from_raw("ticket:t");

    repo.upsert_position(&node, NodeKind::Ticket, Position::new(1.0, 1.0))
        .unwrap();
    repo.upsert_position(&node, NodeKind::Ticket, Position::new(-3.5, 8.25))
        .unwrap();

    let all = repo.list_positions(None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].position, Position::new(-3.5, 8.25));
    assert_eq!(all[0].kind, NodeKind::Ticket);
    assert!(all[0].updated_at > 0);
}

#[test]
fn list_filters_by_kind_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::new(&conn);
    for (raw, kind) in [
        ("stage:b", NodeKind::Stage),
        ("skill:a", NodeKind::Skill),
        ("stage:a", NodeKind::Stage),
    ] {
        repo.upsert_position(&NodeId::from_raw(raw), kind, Position::default())
            .unwrap();
    }

    let stages: Vec<String> = repo
        .list_positions(Some(NodeKind::Stage))
        .unwrap()
        .into_iter()
        .map(|stored| stored.node_id.as_str().to_string())
        .collect();
    assert_eq!(stages, vec!["stage:a", "stage:b"]);
    assert_eq!(repo.load_positions().unwrap().len(), 3);
}

#[test]
fn non_finite_positions_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::new(&conn);
    let node = NodeId::from_raw("objective:o");

    let err = repo
        .upsert_position(&node, NodeKind::Objective, Position::new(f64::NAN, 0.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidPosition(id) if id == node));
    assert!(repo.get_position(&node).unwrap().is_none());
}

#[test]
fn delete_missing_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::new(&conn);

    let err = repo
        .delete_position(&NodeId::from_raw("skill:ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn retain_prunes_rows_for_removed_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::new(&conn);
    let live = NodeId::from_raw("skill:live");
    let stale = NodeId::from_raw("skill:stale");
    repo.upsert_position(&live, NodeKind::Skill, Position::default())
        .unwrap();
    repo.upsert_position(&stale, NodeKind::Skill, Position::default())
        .unwrap();

    let removed = repo.retain_positions(&BTreeSet::from([live.clone()])).unwrap();
    assert_eq!(removed, 1);
    assert!(repo.get_position(&stale).unwrap().is_none());
    assert!(repo.get_position(&live).unwrap().is_some());
}

#[test]
fn queue_flushes_into_store_and_graph_reads_it_back() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePositionRepository::new(&conn);
    let clock = ManualClock::new();
    let mut queue = PositionWriteQueue::new(QueueConfig::default(), &clock);

    let skill = Skill::new(Uuid::new_v4(), "Climbing", Stage::Foundation);
    let node = NodeId::for_record(NodeKind::Skill, skill.skill_id);
    let records = GraphRecords {
        skills: vec![skill],
        ..GraphRecords::default()
    };

    for step in 0..10 {
        queue.queue_update(node.clone(), NodeKind::Skill, Position::new(f64::from(step), 7.0));
    }
    let report = queue.flush_now(&mut repo).unwrap();
    assert_eq!(report.persisted, vec![node.clone()]);

    let stored = repo.load_positions().unwrap();
    let graph = build_graph(
        &records,
        &stored,
        &LayoutConfig::default(),
        &mut StdRng::seed_from_u64(0),
    );
    assert_eq!(graph.node(&node).unwrap().position, Position::new(9.0, 7.0));
}

#[test]
fn store_errors_surface_as_queue_retries() {
    let conn = open_db_in_memory().unwrap();
    let mut repo = SqlitePositionRepository::new(&conn);
    let clock = ManualClock::new();
    let mut queue = PositionWriteQueue::new(QueueConfig::default(), &clock);
    let node = NodeId::from_raw("ticket:nan");

    queue.queue_update(node.clone(), NodeKind::Ticket, Position::new(f64::INFINITY, 0.0));
    let report = queue.flush_now(&mut repo).unwrap();

    assert_eq!(report.retrying, vec![node.clone()]);
    let pending = queue.pending(&node).unwrap();
    assert!(pending
        .last_error
        .as_ref()
        .unwrap()
        .message()
        .contains("ticket:nan"));
}
