//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use chrono::Utc;
use techflow_core::{
  catalog,
  store::TicketStore,
  ticket::{Priority, Status, TicketDraft, TicketPatch},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn draft(subject: &str, priority: Option<Priority>) -> TicketDraft {
  TicketDraft {
    subject:        subject.into(),
    description:    format!("details about {subject}"),
    customer_name:  "Sarah Johnson".into(),
    customer_email: "sarah.j@techcorp.com".into(),
    category:       "Technical".into(),
    priority,
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_ticket_on_empty_store_is_1001() {
  let s = store().await;

  let t = s
    .create(draft("API returning 500 errors", Some(Priority::Urgent)).validate().unwrap())
    .await
    .unwrap();

  assert_eq!(t.number, 1001);
  assert_eq!(t.status, Status::New);
  assert_eq!(t.priority, Priority::Urgent);
  assert!(t.resolved_at.is_none());
  assert_eq!(t.created_at, t.updated_at);
}

#[tokio::test]
async fn create_and_get_roundtrip() {
  let s = store().await;
  let created = s.create(draft("Export", None).validate().unwrap()).await.unwrap();

  let fetched = s.get(created.id).await.unwrap().expect("stored ticket");
  assert_eq!(fetched, created);
  assert_eq!(fetched.priority, Priority::Medium);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn sequential_numbers_strictly_increase() {
  let s = store().await;
  let mut last = 0;
  for i in 0..5 {
    let t = s
      .create(draft(&format!("ticket {i}"), None).validate().unwrap())
      .await
      .unwrap();
    assert!(t.number > last);
    last = t.number;
  }
  assert_eq!(last, 1005);
}

#[tokio::test]
async fn concurrent_creations_get_distinct_numbers() {
  let s = store().await;

  let handles: Vec<_> = (0..25)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.create(draft(&format!("concurrent {i}"), None).validate().unwrap())
          .await
          .unwrap()
          .number
      })
    })
    .collect();

  let mut numbers = BTreeSet::new();
  for h in handles {
    assert!(numbers.insert(h.await.unwrap()), "duplicate number assigned");
  }
  assert_eq!(numbers, (1001..=1025).collect::<BTreeSet<_>>());
}

#[tokio::test]
async fn concurrent_creations_after_sample_queue() {
  let s = store().await;
  for t in catalog::sample_queue(Utc::now()) {
    s.import(t).await.unwrap();
  }

  let (a, b) = tokio::join!(
    s.create(draft("first", None).validate().unwrap()),
    s.create(draft("second", None).validate().unwrap()),
  );
  let mut numbers = vec![a.unwrap().number, b.unwrap().number];
  numbers.sort_unstable();
  assert_eq!(numbers, vec![1257, 1258]);
}

#[tokio::test]
async fn separate_connections_to_one_file_do_not_collide() {
  let path = std::env::temp_dir().join(format!("techflow-{}.db", Uuid::new_v4()));
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let mut handles = Vec::new();
  for i in 0..10 {
    for s in [a.clone(), b.clone()] {
      handles.push(tokio::spawn(async move {
        s.create(draft(&format!("shared {i}"), None).validate().unwrap())
          .await
          .unwrap()
          .number
      }));
    }
  }

  let mut numbers = BTreeSet::new();
  for h in handles {
    assert!(numbers.insert(h.await.unwrap()), "duplicate number assigned");
  }
  assert_eq!(numbers.len(), 20);
  assert_eq!(numbers.last().copied(), Some(1020));

  drop((a, b));
  let _ = std::fs::remove_file(&path);
}

// ─── Import ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn import_rejects_taken_number() {
  let s = store().await;
  let queue = catalog::sample_queue(Utc::now());
  s.import(queue[0].clone()).await.unwrap();

  let mut clash = queue[1].clone();
  clash.number = queue[0].number;
  let err = s.import(clash).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateNumber(1247)), "{err}");

  let err = s.import(queue[0].clone()).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateId(id) if id == queue[0].id), "{err}");

  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn import_rejects_numbers_creation_cannot_follow() {
  let s = store().await;
  let mut t = catalog::sample_queue(Utc::now()).remove(0);

  t.number = u32::MAX;
  let err = s.import(t.clone()).await.unwrap_err();
  assert!(matches!(err, Error::NumberOutOfRange(u32::MAX)), "{err}");

  t.number = 0;
  let err = s.import(t).await.unwrap_err();
  assert!(matches!(err, Error::NumberOutOfRange(0)), "{err}");

  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn exhausted_numbering_fails_without_breaking_the_store() {
  let path = std::env::temp_dir().join(format!("techflow-{}.db", Uuid::new_v4()));
  let s = SqliteStore::open(&path).await.unwrap();
  let seeded = s
    .create(draft("Last one", None).validate().unwrap())
    .await
    .unwrap();

  // Another writer pushes the highest number to the top of the range.
  let raw = rusqlite::Connection::open(&path).unwrap();
  raw
    .execute(
      "UPDATE support_tickets SET number = ?1 WHERE number = ?2",
      rusqlite::params![u32::MAX, seeded.number],
    )
    .unwrap();
  drop(raw);

  let err = s
    .create(draft("One too many", None).validate().unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NumbersExhausted(u32::MAX)), "{err}");

  // The connection is still usable.
  let all = s.list().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].number, u32::MAX);
  assert!(s.get(seeded.id).await.unwrap().is_some());

  drop(s);
  let _ = std::fs::remove_file(&path);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_in_queue_order() {
  let s = store().await;
  for t in catalog::sample_queue(Utc::now()) {
    s.import(t).await.unwrap();
  }

  let numbers: Vec<u32> = s.list().await.unwrap().iter().map(|t| t.number).collect();
  // urgent: 1256 (3m), 1248 (5m); high: 1252; medium: 1254 (8m), 1250 (10m),
  // 1247 (15m); low: 1249 (30m), 1253 (35m), 1251 (45m), 1255 (50m)
  assert_eq!(
    numbers,
    vec![1256, 1248, 1252, 1254, 1250, 1247, 1249, 1253, 1251, 1255]
  );
}

#[tokio::test]
async fn list_orders_new_tickets_newest_first_within_tier() {
  let s = store().await;
  let older = s.create(draft("older", Some(Priority::High)).validate().unwrap()).await.unwrap();
  let newer = s.create(draft("newer", Some(Priority::High)).validate().unwrap()).await.unwrap();
  let low = s.create(draft("low", Some(Priority::Low)).validate().unwrap()).await.unwrap();

  let ids: Vec<Uuid> = s.list().await.unwrap().iter().map(|t| t.id).collect();
  assert_eq!(ids, vec![newer.id, older.id, low.id]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_unknown_id_returns_none() {
  let s = store().await;
  let result = s.update(Uuid::new_v4(), TicketPatch::default()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn empty_patch_refreshes_updated_at_only() {
  let s = store().await;
  let t = s.create(draft("idle", None).validate().unwrap()).await.unwrap();

  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let u = s.update(t.id, TicketPatch::default()).await.unwrap().unwrap();

  assert!(u.updated_at > t.updated_at);
  let mut same = u.clone();
  same.updated_at = t.updated_at;
  assert_eq!(same, t);
  assert_eq!(s.get(t.id).await.unwrap().unwrap(), u);
}

#[tokio::test]
async fn resolving_sets_resolved_at_once() {
  let s = store().await;
  let t = s.create(draft("resolve me", None).validate().unwrap()).await.unwrap();

  let open = s
    .update(t.id, TicketPatch { status: Some(Status::Open), ..Default::default() })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(open.status, Status::Open);
  assert!(open.resolved_at.is_none());

  let resolve = TicketPatch { status: Some(Status::Resolved), ..Default::default() };
  let first = s.update(t.id, resolve.clone()).await.unwrap().unwrap();
  assert_eq!(first.status, Status::Resolved);
  let stamped = first.resolved_at.expect("resolved_at set");

  let second = s.update(t.id, resolve).await.unwrap().unwrap();
  assert_eq!(second.resolved_at, Some(stamped));
  assert!(second.updated_at >= first.updated_at);
}

#[tokio::test]
async fn reopening_clears_resolved_at() {
  let s = store().await;
  let t = s.create(draft("flaky", None).validate().unwrap()).await.unwrap();
  s.update(t.id, TicketPatch { status: Some(Status::Resolved), ..Default::default() })
    .await
    .unwrap();

  let reopened = s
    .update(t.id, TicketPatch { status: Some(Status::Pending), ..Default::default() })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reopened.status, Status::Pending);
  assert!(reopened.resolved_at.is_none());
}

#[tokio::test]
async fn assignment_can_be_set_and_cleared() {
  let s = store().await;
  let t = s.create(draft("assign", None).validate().unwrap()).await.unwrap();

  let set = TicketPatch {
    assigned_team: Some(Some("technical".into())),
    assigned_to: Some(Some("agent-42".into())),
    priority: Some(Priority::High),
    ..Default::default()
  };
  let u = s.update(t.id, set).await.unwrap().unwrap();
  assert_eq!(u.assigned_team.as_deref(), Some("technical"));
  assert_eq!(u.assigned_to.as_deref(), Some("agent-42"));
  assert_eq!(u.priority, Priority::High);

  let clear = TicketPatch { assigned_to: Some(None), ..Default::default() };
  let u = s.update(t.id, clear).await.unwrap().unwrap();
  assert_eq!(u.assigned_team.as_deref(), Some("technical"));
  assert!(u.assigned_to.is_none());
}
