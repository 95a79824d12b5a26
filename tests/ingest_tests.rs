use chrono::TimeDelta;
use semafor::core::calculator::mix::MixPolicy;
use semafor::core::ingest::{Ingestor, ingest_worked_time, load_events, worked_time};
use semafor::core::locks::{WorkerLocks, acquire};
use semafor::core::notify::{
    ForecastRefresh, Notifier, SubscriberRegistry, SubscriptionGroup, ViewSink,
};
use semafor::core::resolver::{Resolution, resolve_categories};
use semafor::core::source::{EventSource, MemoryEvents};
use semafor::db::assessments;
use semafor::db::checks_file::ChecksFile;
use semafor::db::projects::{
    clear_resolved_missing_aliases, list_missing_aliases, upsert_alias,
};
use semafor::errors::AppError;
use semafor::models::{CheckEvent, MonthKey, MonthRange};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

mod common;
use common::{
    add_project, add_worker, close, memory_db, open, temp_checks_file, ts, write_checks_file,
};

fn month(s: &str) -> MonthKey {
    s.parse().expect("valid month")
}

fn range(s: &str) -> MonthRange {
    MonthRange::parse(s).expect("valid range")
}

fn names(entries: &[(i64, &str)]) -> HashMap<i64, String> {
    entries
        .iter()
        .map(|(id, name)| (*id, name.to_string()))
        .collect()
}

// ---------------------------
// Loading and reconstruction
// ---------------------------

#[test]
fn test_last_interval_of_range_is_closed_by_next_month() {
    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2024-01-31 22:00", 1),
            close("2024-02-01 02:00"),
            open("2024-02-05 09:00", 1),
            close("2024-02-05 10:00"),
        ],
    );

    let monthly = worked_time(&source, range("2024-01"), &MixPolicy::default()).expect("worked");
    assert_eq!(monthly.len(), 1);
    assert_eq!(
        monthly[&month("2024-01")].get("Alpha"),
        Some(&TimeDelta::hours(4))
    );
}

#[test]
fn test_dangling_checks_dropped_only_at_end_of_source() {
    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2024-01-10 09:00", 1),
            close("2024-01-10 10:00"),
            open("2024-01-11 09:00", 1),
        ],
    );

    let events = load_events(&source, range("2024-01")).expect("load");
    assert_eq!(events.len(), 2);

    let longer = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2024-01-11 09:00", 1),
            open("2024-02-11 09:00", 1),
            close("2024-03-11 09:00"),
        ],
    );
    let events = load_events(&longer, range("2024-01")).expect("load");
    assert_eq!(events.len(), 2, "source continues after the loaded window");
}

#[test]
fn test_crossing_interval_closed_after_an_empty_month() {
    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2024-01-31 22:00", 1),
            close("2024-03-01 02:00"),
            open("2024-03-05 09:00", 1),
            close("2024-03-05 10:00"),
        ],
    );
    let policy = MixPolicy::default();

    let alone = worked_time(&source, range("2024-01"), &policy).expect("worked");
    let wide = worked_time(&source, range("2024-01:2024-03"), &policy).expect("worked");

    let january = month("2024-01");
    assert_eq!(alone[&january].get("Alpha"), Some(&TimeDelta::hours(700)));
    assert_eq!(alone[&january], wide[&january]);
    assert!(!alone.contains_key(&month("2024-03")));
}

#[test]
fn test_checks_file_finds_next_check_across_gap_months() {
    let path = temp_checks_file("next_after_gap");
    write_checks_file(
        &path,
        &[(1, "Alpha")],
        &[
            ("2024-01-31T22:00:00", Some(1), None),
            ("2024-04-01T02:00:00", None, None),
        ],
        true,
    );

    let file = ChecksFile::open(Path::new(&path)).expect("open");
    let next = file
        .first_event_after(month("2024-01"))
        .expect("query")
        .expect("a later check");
    assert_eq!(next.timestamp, ts("2024-04-01 02:00"));
    assert_eq!(file.first_event_after(month("2024-04")).expect("query"), None);

    let monthly = worked_time(&file, range("2024-01"), &MixPolicy::default()).expect("worked");
    assert_eq!(
        monthly[&month("2024-01")].get("Alpha"),
        Some(&TimeDelta::hours(2 + 24 * 29 + 24 * 31 + 2))
    );
}

#[test]
fn test_mixed_time_is_redistributed_before_resolution() {
    let source = MemoryEvents::new(
        names(&[(1, "Alpha"), (2, "Popurri")]),
        vec![
            open("2024-03-04 09:00", 1),
            open("2024-03-04 10:00", 2),
            close("2024-03-04 10:20"),
        ],
    );

    let monthly = worked_time(&source, range("2024-03"), &MixPolicy::default()).expect("worked");
    let march = &monthly[&month("2024-03")];
    assert_eq!(march.len(), 1);
    assert_eq!(march.get("Alpha"), Some(&TimeDelta::minutes(80)));
}

// ---------------------------
// Resolution
// ---------------------------

#[test]
fn test_resolution_prefers_project_name_then_alias() {
    let pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    upsert_alias(&pool.conn, worker.id, "alpha-dev", alpha.id).expect("alias");

    let res = resolve_categories(&pool.conn, &worker, ["Alpha", "alpha-dev"]).expect("resolve");
    match res {
        Resolution::Resolved(map) => {
            assert_eq!(map["Alpha"].id, alpha.id);
            assert_eq!(map["alpha-dev"].id, alpha.id);
        }
        other => panic!("expected resolved, got {other:?}"),
    }
}

#[test]
fn test_alias_belongs_to_one_worker_only() {
    let pool = memory_db();
    let anna = add_worker(&pool, "anna");
    let bert = add_worker(&pool, "bert");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    upsert_alias(&pool.conn, anna.id, "alpha-dev", alpha.id).expect("alias");

    let res = resolve_categories(&pool.conn, &bert, ["alpha-dev"]).expect("resolve");
    assert_eq!(
        res,
        Resolution::Unresolved(BTreeSet::from(["alpha-dev".to_string()]))
    );
}

#[test]
fn test_unresolved_names_become_pending_aliases_once() {
    let pool = memory_db();
    let worker = add_worker(&pool, "anna");
    add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);

    for _ in 0..2 {
        let res = resolve_categories(&pool.conn, &worker, ["Alpha", "Ghost"]).expect("resolve");
        assert!(matches!(res, Resolution::Unresolved(_)));
    }

    let pending = list_missing_aliases(&pool.conn, Some(worker.id)).expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].alias, "Ghost");
}

#[test]
fn test_pending_alias_cleared_once_mapped() {
    let pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    resolve_categories(&pool.conn, &worker, ["Ghost"]).expect("resolve");

    upsert_alias(&pool.conn, worker.id, "Ghost", alpha.id).expect("alias");
    let cleared = clear_resolved_missing_aliases(&pool.conn).expect("clear");

    assert_eq!(cleared, 1);
    assert!(list_missing_aliases(&pool.conn, None).expect("pending").is_empty());
}

// ---------------------------
// Ingestion
// ---------------------------

#[test]
fn test_ingest_writes_assessments_per_project_and_month() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);

    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2024-03-04 09:00", 1),
            close("2024-03-04 12:00"),
            open("2024-04-02 09:00", 1),
            close("2024-04-02 10:00"),
        ],
    );

    let outcome = ingest_worked_time(
        &mut pool.conn,
        &source,
        &worker,
        range("2024-03:2024-04"),
        &MixPolicy::default(),
    )
    .expect("ingest");

    assert!(outcome.committed());
    assert_eq!(outcome.written, 2);
    assert_eq!(outcome.projects, BTreeSet::from([alpha.id]));

    let rows = assessments::for_worker(&pool.conn, worker.id).expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].month, month("2024-03"));
    assert_eq!(rows[0].duration_secs, 3 * 3600);
    assert_eq!(rows[1].duration_secs, 3600);
}

#[test]
fn test_unresolved_category_leaves_existing_assessments_untouched() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    assessments::accumulate(&pool.conn, worker.id, alpha.id, month("2024-02"), 999)
        .expect("seed");

    let source = MemoryEvents::new(
        names(&[(1, "Alpha"), (2, "Unknown")]),
        vec![
            open("2024-03-04 09:00", 1),
            open("2024-03-04 10:00", 2),
            close("2024-03-04 11:00"),
        ],
    );

    let outcome = ingest_worked_time(
        &mut pool.conn,
        &source,
        &worker,
        range("2024-03"),
        &MixPolicy::default(),
    )
    .expect("ingest");

    assert!(!outcome.committed());
    assert_eq!(outcome.missing, BTreeSet::from(["Unknown".to_string()]));
    assert_eq!(outcome.written, 0);

    let rows = assessments::for_worker(&pool.conn, worker.id).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_secs, 999);
}

#[test]
fn test_out_of_window_records_are_skipped_and_reported() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    add_project(&pool, "Alpha", "2024-01-01", "2024-02-29", true);

    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![
            open("2023-12-04 09:00", 1),
            close("2023-12-04 10:00"),
            open("2024-01-04 09:00", 1),
            close("2024-01-04 10:00"),
            open("2024-03-04 09:00", 1),
            close("2024-03-04 10:00"),
        ],
    );

    let outcome = ingest_worked_time(
        &mut pool.conn,
        &source,
        &worker,
        range("2023-12:2024-03"),
        &MixPolicy::default(),
    )
    .expect("ingest");

    assert!(outcome.committed());
    assert_eq!(outcome.written, 1);
    assert_eq!(outcome.bound_errors.len(), 2);
    assert!(outcome.bound_errors[0].contains("2023-12"));
    assert!(outcome.bound_errors[1].contains("2024-03"));

    let rows = assessments::for_worker(&pool.conn, worker.id).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].month, month("2024-01"));
}

#[test]
fn test_reingest_replaces_instead_of_adding() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);

    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![open("2024-03-04 09:00", 1), close("2024-03-04 11:00")],
    );

    for _ in 0..3 {
        ingest_worked_time(
            &mut pool.conn,
            &source,
            &worker,
            range("2024-03"),
            &MixPolicy::default(),
        )
        .expect("ingest");
    }

    let rows = assessments::for_worker(&pool.conn, worker.id).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_secs, 2 * 3600);
}

#[test]
fn test_categories_sharing_a_project_accumulate() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    upsert_alias(&pool.conn, worker.id, "alpha-support", alpha.id).expect("alias");

    let source = MemoryEvents::new(
        names(&[(1, "Alpha"), (2, "alpha-support")]),
        vec![
            open("2024-03-04 09:00", 1),
            open("2024-03-04 10:00", 2),
            close("2024-03-04 10:30"),
        ],
    );

    let outcome = ingest_worked_time(
        &mut pool.conn,
        &source,
        &worker,
        range("2024-03"),
        &MixPolicy::default(),
    )
    .expect("ingest");
    assert_eq!(outcome.written, 2);

    let rows = assessments::for_worker(&pool.conn, worker.id).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_secs, 90 * 60);
}

#[test]
fn test_other_workers_assessments_survive() {
    let mut pool = memory_db();
    let anna = add_worker(&pool, "anna");
    let bert = add_worker(&pool, "bert");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);
    assessments::accumulate(&pool.conn, bert.id, alpha.id, month("2024-03"), 60).expect("seed");

    let source = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![open("2024-03-04 09:00", 1), close("2024-03-04 10:00")],
    );
    ingest_worked_time(
        &mut pool.conn,
        &source,
        &anna,
        range("2024-03"),
        &MixPolicy::default(),
    )
    .expect("ingest");

    let berts = assessments::for_worker(&pool.conn, bert.id).expect("rows");
    assert_eq!(berts.len(), 1);
    assert_eq!(berts[0].duration_secs, 60);
}

// ---------------------------
// Checks file reader
// ---------------------------

#[test]
fn test_checks_file_with_multiplier_column() {
    let path = temp_checks_file("with_multiplier");
    write_checks_file(
        &path,
        &[(1, "Alpha")],
        &[
            ("2024-03-04T09:00:00.000", Some(1), Some(50)),
            ("2024-03-04T11:00:00.000", None, Some(100)),
            ("2024-04-01T08:00:00", Some(1), None),
            ("2024-04-01T09:00:00", None, None),
        ],
        true,
    );

    let file = ChecksFile::open(Path::new(&path)).expect("open");
    assert!(file.has_multiplier());
    assert_eq!(
        file.month_span().expect("span"),
        Some(range("2024-03:2024-04"))
    );

    let march = file.events_for_month(month("2024-03")).expect("march");
    assert_eq!(march.len(), 2);
    assert_eq!(march[0].multiplier, 50);
    assert_eq!(march[0].timestamp, ts("2024-03-04 09:00"));

    let april = file.events_for_month(month("2024-04")).expect("april");
    assert_eq!(april[0].multiplier, 100, "NULL multiplier counts fully");
}

#[test]
fn test_checks_file_without_multiplier_column() {
    let path = temp_checks_file("without_multiplier");
    write_checks_file(
        &path,
        &[(7, "Beta ")],
        &[
            ("2024-05-02T09:00:00", Some(7), None),
            ("2024-05-02T09:30:00", None, None),
        ],
        false,
    );

    let file = ChecksFile::open(Path::new(&path)).expect("open");
    assert!(!file.has_multiplier());
    assert_eq!(file.category_names().expect("names")[&7], "Beta ");

    let events = file.events_for_month(month("2024-05")).expect("may");
    assert!(events.iter().all(|e| e.multiplier == 100));
}

#[test]
fn test_checks_file_rejects_bad_multiplier() {
    let path = temp_checks_file("bad_multiplier");
    write_checks_file(
        &path,
        &[(1, "Alpha")],
        &[("2024-03-04T09:00:00", Some(1), Some(150))],
        true,
    );

    let file = ChecksFile::open(Path::new(&path)).expect("open");
    let err = file.events_for_month(month("2024-03")).unwrap_err();
    assert!(matches!(err, AppError::InvalidMultiplier(150)));
}

#[test]
fn test_empty_checks_file_has_no_span() {
    let path = temp_checks_file("empty_checks");
    write_checks_file(&path, &[], &[], true);

    let file = ChecksFile::open(Path::new(&path)).expect("open");
    assert_eq!(file.month_span().expect("span"), None);
}

// ---------------------------
// Locks and notifications
// ---------------------------

#[test]
fn test_worker_locks_are_shared_per_worker() {
    let locks = WorkerLocks::new();
    let a1 = locks.lock_for(1);
    let a2 = locks.lock_for(1);
    let b = locks.lock_for(2);

    assert!(Arc::ptr_eq(&a1, &a2));
    assert!(!Arc::ptr_eq(&a1, &b));
    assert_eq!(locks.len(), 2);

    let _guard = acquire(&a1);
    assert!(a2.try_lock().is_none(), "same worker must wait");
    assert!(b.try_lock().is_some(), "other worker must not wait");
}

struct ChannelSink {
    tx: Mutex<mpsc::Sender<(String, String)>>,
}

impl ViewSink for ChannelSink {
    fn push(&self, group: &str, payload: &str) -> Result<(), String> {
        self.tx
            .lock()
            .map_err(|e| e.to_string())?
            .send((group.to_string(), payload.to_string()))
            .map_err(|e| e.to_string())
    }
}

fn channel_sink() -> (ChannelSink, mpsc::Receiver<(String, String)>) {
    let (tx, rx) = mpsc::channel();
    (ChannelSink { tx: Mutex::new(tx) }, rx)
}

#[test]
fn test_refresh_reaches_only_subscribed_groups() {
    let registry = Arc::new(SubscriberRegistry::new());
    registry.subscribe(SubscriptionGroup::Worker(3));
    registry.subscribe(SubscriptionGroup::All);

    let (sink, rx) = channel_sink();
    let notifier = Notifier::spawn(sink, Arc::clone(&registry), 8);

    let queued = notifier.publish(&ForecastRefresh {
        worker_id: 3,
        project_ids: BTreeSet::from([10, 11]),
    });
    assert_eq!(queued, 2);
    notifier.shutdown();

    let groups: Vec<String> = rx.try_iter().map(|(g, _)| g).collect();
    assert_eq!(groups, vec!["forecast_worker_3", "forecast_all"]);
}

#[test]
fn test_no_subscribers_means_no_messages() {
    let (sink, rx) = channel_sink();
    let notifier = Notifier::spawn(sink, Arc::new(SubscriberRegistry::new()), 8);

    let queued = notifier.publish(&ForecastRefresh {
        worker_id: 1,
        project_ids: BTreeSet::from([1]),
    });
    notifier.shutdown();

    assert_eq!(queued, 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let registry = SubscriberRegistry::new();
    registry.subscribe(SubscriptionGroup::Project(5));
    registry.subscribe(SubscriptionGroup::Project(5));
    registry.unsubscribe(&SubscriptionGroup::Project(5));
    assert_eq!(registry.count(&SubscriptionGroup::Project(5)), 1);
    registry.unsubscribe(&SubscriptionGroup::Project(5));
    assert_eq!(registry.count(&SubscriptionGroup::Project(5)), 0);
}

#[test]
fn test_ingestor_publishes_after_commit_only() {
    let mut pool = memory_db();
    let worker = add_worker(&pool, "anna");
    let alpha = add_project(&pool, "Alpha", "2024-01-01", "2024-12-31", true);

    let registry = Arc::new(SubscriberRegistry::new());
    registry.subscribe(SubscriptionGroup::Project(alpha.id));
    let (sink, rx) = channel_sink();
    let ingestor = Ingestor::new(Arc::new(WorkerLocks::new()), MixPolicy::default())
        .with_notifier(Notifier::spawn(sink, registry, 8));

    let blocked = MemoryEvents::new(
        names(&[(1, "Nobody")]),
        vec![open("2024-03-04 09:00", 1), close("2024-03-04 10:00")],
    );
    let outcome = ingestor
        .run(&mut pool.conn, &blocked, &worker, range("2024-03"))
        .expect("run");
    assert!(!outcome.committed());

    let good = MemoryEvents::new(
        names(&[(1, "Alpha")]),
        vec![open("2024-03-04 09:00", 1), close("2024-03-04 10:00")],
    );
    let outcome = ingestor
        .run(&mut pool.conn, &good, &worker, range("2024-03"))
        .expect("run");
    assert!(outcome.committed());

    ingestor.shutdown();

    let (group, payload) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("one refresh");
    assert_eq!(group, format!("forecast_project_{}", alpha.id));
    assert!(payload.contains("\"worker_id\":1"));
    assert!(rx.try_recv().is_err(), "blocked run must not notify");
}

#[test]
fn test_event_constructor_defaults() {
    let e = CheckEvent::close(ts("2024-03-04 10:00"));
    assert!(!e.is_open());
    assert_eq!(e.multiplier, 100);
    assert_eq!(e.month(), month("2024-03"));
}
