use super::{JobStore, JobTable, Recorded};
use crate::types::{FIRST_JOB_ID, JobEntry, JobId, Stats};
use std::collections::HashSet;

fn entry(id: JobId, digest: &str, duration_micros: u64) -> JobEntry {
    JobEntry {
        id,
        digest: digest.to_string(),
        duration_micros,
    }
}

/// Replays the running-average recurrence the same way the table should.
fn replay_average(durations: &[u64]) -> u64 {
    let mut average = 0_u64;
    for (i, d) in durations.iter().enumerate() {
        let total = i as u64 + 1;
        average = (average * (total - 1) + d) / total;
    }
    average
}

#[test]
fn table_allocates_gapless_increasing_ids() {
    let mut table = JobTable::new(FIRST_JOB_ID);
    let ids: Vec<_> = (0..100).map(|_| table.allocate().unwrap()).collect();
    let expected: Vec<_> = (FIRST_JOB_ID..FIRST_JOB_ID + 100).collect();
    assert_eq!(ids, expected);
}

#[test]
fn table_honours_custom_base() {
    let mut table = JobTable::new(1000);
    assert_eq!(table.allocate().unwrap(), 1000);
    assert_eq!(table.allocate().unwrap(), 1001);
}

#[test]
fn table_lookup_is_absent_until_recorded() {
    let mut table = JobTable::new(FIRST_JOB_ID);
    let id = table.allocate().unwrap();
    assert_eq!(table.lookup(id), None);
    assert_eq!(table.lookup(999), None);

    assert_eq!(table.record(entry(id, "abc", 10)), Recorded::Inserted);
    assert_eq!(table.lookup(id), Some("abc"));
    assert_eq!(table.lookup(id), Some("abc"));
}

#[test]
fn table_stats_follow_truncating_recurrence() {
    let durations = [7_u64, 2, 9, 4, 4, 1, 15, 3];
    let mut table = JobTable::new(FIRST_JOB_ID);
    assert_eq!(table.stats(), Stats::default());

    for (i, d) in durations.iter().enumerate() {
        let id = table.allocate().unwrap();
        table.record(entry(id, "x", *d));
        let stats = table.stats();
        assert_eq!(stats.total, i as u64 + 1);
        assert_eq!(stats.average, replay_average(&durations[..=i]));
        assert_eq!(stats.total as usize, table.len());
    }
}

#[test]
fn truncation_order_differs_from_plain_mean() {
    // 1 -> 1, (1*1 + 2) / 2 -> 1, (1*2 + 3) / 3 -> 1, while 6 / 3 = 2.
    let mut stats = Stats::default();
    for d in [1, 2, 3] {
        stats.record(d);
    }
    assert_eq!(stats.total, 3);
    assert_eq!(stats.average, 1);
    assert_eq!(stats.average, replay_average(&[1, 2, 3]));
    assert_ne!(stats.average, (1 + 2 + 3) / 3);
}

#[test]
fn table_ignores_duplicate_completion() {
    let mut table = JobTable::new(FIRST_JOB_ID);
    let a = table.allocate().unwrap();
    let b = table.allocate().unwrap();
    table.record(entry(a, "first", 10));
    table.record(entry(b, "other", 20));

    assert_eq!(table.record(entry(a, "second", 1_000)), Recorded::Duplicate);
    assert_eq!(table.lookup(a), Some("first"));
    assert_eq!(table.lookup(b), Some("other"));
    assert_eq!(table.stats(), Stats { total: 2, average: 15 });
}

#[tokio::test]
async fn store_round_trips_operations() {
    let store = JobStore::spawn(FIRST_JOB_ID, 8);

    let id = store.allocate().await.unwrap();
    assert_eq!(id, FIRST_JOB_ID);
    assert_eq!(store.lookup(id).await.unwrap(), None);
    assert_eq!(store.stats().await.unwrap(), Stats::default());

    store.record(entry(id, "deadbeef", 42)).await.unwrap();
    assert_eq!(store.lookup(id).await.unwrap().as_deref(), Some("deadbeef"));
    assert_eq!(store.stats().await.unwrap(), Stats { total: 1, average: 42 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_are_unique_and_gapless() {
    const TASKS: usize = 16;
    const PER_TASK: usize = 64;

    let store = JobStore::spawn(FIRST_JOB_ID, 4);
    let mut handles = Vec::with_capacity(TASKS);

    for _ in 0..TASKS {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::with_capacity(PER_TASK);
            for _ in 0..PER_TASK {
                ids.push(store.allocate().await.unwrap());
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for handle in futures::future::join_all(handles).await {
        let ids = handle.unwrap();
        // Each caller observes its own IDs in increasing order.
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }

    let total = (TASKS * PER_TASK) as JobId;
    assert_eq!(seen.len() as JobId, total);
    assert!((FIRST_JOB_ID..FIRST_JOB_ID + total).all(|id| seen.contains(&id)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_keep_total_consistent() {
    let store = JobStore::spawn(FIRST_JOB_ID, 16);
    let mut handles = Vec::new();

    for d in 0..50_u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let id = store.allocate().await.unwrap();
            store.record(entry(id, &format!("{id:x}"), d)).await.unwrap();
            let stats = store.stats().await.unwrap();
            assert!(stats.total >= 1 && stats.total <= 50);
            id
        }));
    }

    for handle in futures::future::join_all(handles).await {
        let id = handle.unwrap();
        let expected = format!("{id:x}");
        assert_eq!(store.lookup(id).await.unwrap().as_deref(), Some(expected.as_str()));
    }

    assert_eq!(store.stats().await.unwrap().total, 50);
}

#[test]
fn handle_reports_closed_store() {
    let build = || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    };

    let rt = build();
    let store = rt.block_on(async { JobStore::spawn(FIRST_JOB_ID, 1) });
    // Dropping the runtime drops the store task and its receiver.
    drop(rt);

    let err = build().block_on(store.allocate()).unwrap_err();
    assert!(matches!(err, crate::Error::ChannelError { .. }));
}

#[test]
fn table_stops_allocating_at_max_id() {
    let mut table = JobTable::new(JobId::MAX - 1);
    assert_eq!(table.allocate(), Some(JobId::MAX - 1));
    assert_eq!(table.allocate(), Some(JobId::MAX));
    assert_eq!(table.allocate(), None);
    assert_eq!(table.allocate(), None);
}

#[tokio::test]
async fn exhausted_ids_leave_store_serving() {
    let store = JobStore::spawn(JobId::MAX, 4);

    let id = store.allocate().await.unwrap();
    assert_eq!(id, JobId::MAX);
    assert_eq!(store.allocate().await, Err(crate::Error::IdsExhausted));

    store.record(entry(id, "ff", 3)).await.unwrap();
    assert_eq!(store.lookup(id).await.unwrap().as_deref(), Some("ff"));
    assert_eq!(store.stats().await.unwrap(), Stats { total: 1, average: 3 });
    assert_eq!(store.allocate().await, Err(crate::Error::IdsExhausted));
}
