//! The SQLite implementation of [`TicketStore`].

use std::{path::Path, time::Duration};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use techflow_core::{
  ranking::sort_queue,
  store::TicketStore,
  ticket::{NewTicket, Ticket, TicketPatch, next_number},
};

use crate::{
  Error, Result,
  encode::{RawTicket, encode_uuid},
  schema::{COLUMNS, SCHEMA},
};

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ticket store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All
/// statements issued through one `SqliteStore` run on one connection thread,
/// and every read-modify-write runs inside a `BEGIN IMMEDIATE` transaction,
/// so number assignment is serialised even across processes sharing a file.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored tickets.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM support_tickets", [], |r| r.get(0))?)
      })
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }
}

fn insert(tx: &rusqlite::Transaction<'_>, raw: &RawTicket) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO support_tickets (
       id, number, subject, description, customer_name, customer_email,
       category, priority, status, assigned_team, assigned_to,
       created_at, updated_at, resolved_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    rusqlite::params![
      raw.id,
      raw.number,
      raw.subject,
      raw.description,
      raw.customer_name,
      raw.customer_email,
      raw.category,
      raw.priority,
      raw.status,
      raw.assigned_team,
      raw.assigned_to,
      raw.created_at,
      raw.updated_at,
      raw.resolved_at,
    ],
  )?;
  Ok(())
}

/// Outcome of an import attempt, decided inside the transaction.
enum Import {
  Inserted,
  NumberTaken,
  IdTaken,
}

// ─── TicketStore impl ────────────────────────────────────────────────────────

impl TicketStore for SqliteStore {
  type Error = Error;

  async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
    let created: Result<Ticket> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current_max: Option<u32> =
          tx.query_row("SELECT MAX(number) FROM support_tickets", [], |r| r.get(0))?;
        let Some(number) = next_number(current_max) else {
          return Ok(Err(Error::NumbersExhausted(current_max.unwrap_or_default())));
        };
        let ticket = ticket.into_ticket(number, now());

        insert(&tx, &RawTicket::encode(&ticket))?;
        tx.commit()?;
        Ok(Ok(ticket))
      })
      .await?;
    let ticket = created?;

    tracing::debug!(number = ticket.number, id = %ticket.id, "ticket created");
    Ok(ticket)
  }

  async fn import(&self, mut ticket: Ticket) -> Result<Ticket> {
    if ticket.number == 0 || ticket.number == u32::MAX {
      return Err(Error::NumberOutOfRange(ticket.number));
    }
    ticket.created_at = ticket.created_at.trunc_subsecs(6);
    ticket.updated_at = ticket.updated_at.trunc_subsecs(6);
    ticket.resolved_at = ticket.resolved_at.map(|at| at.trunc_subsecs(6));
    let raw = RawTicket::encode(&ticket);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id_taken = tx
          .query_row(
            "SELECT 1 FROM support_tickets WHERE id = ?1",
            rusqlite::params![raw.id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if id_taken {
          return Ok(Import::IdTaken);
        }

        let number_taken = tx
          .query_row(
            "SELECT 1 FROM support_tickets WHERE number = ?1",
            rusqlite::params![raw.number],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if number_taken {
          return Ok(Import::NumberTaken);
        }

        insert(&tx, &raw)?;
        tx.commit()?;
        Ok(Import::Inserted)
      })
      .await?;

    match outcome {
      Import::Inserted => Ok(ticket),
      Import::NumberTaken => Err(Error::DuplicateNumber(ticket.number)),
      Import::IdTaken => Err(Error::DuplicateId(ticket.id)),
    }
  }

  async fn list(&self) -> Result<Vec<Ticket>> {
    let raws: Vec<RawTicket> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM support_tickets ORDER BY number"))?;
        let rows = stmt
          .query_map([], RawTicket::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut tickets = raws
      .into_iter()
      .map(RawTicket::into_ticket)
      .collect::<Result<Vec<_>>>()?;
    sort_queue(&mut tickets);
    Ok(tickets)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Ticket>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTicket> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM support_tickets WHERE id = ?1"),
              rusqlite::params![id_str],
              RawTicket::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTicket::into_ticket).transpose()
  }

  async fn update(&self, id: Uuid, patch: TicketPatch) -> Result<Option<Ticket>> {
    let id_str = encode_uuid(id);

    // The read, the patch and the write share one transaction so concurrent
    // updates to the same ticket cannot lose each other's fields.
    let updated: Result<Option<Ticket>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
          .query_row(
            &format!("SELECT {COLUMNS} FROM support_tickets WHERE id = ?1"),
            rusqlite::params![id_str],
            RawTicket::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(Ok(None));
        };
        let mut ticket = match raw.into_ticket() {
          Ok(t) => t,
          Err(e) => return Ok(Err(e)),
        };

        patch.apply(&mut ticket, now());
        let raw = RawTicket::encode(&ticket);

        tx.execute(
          "UPDATE support_tickets
           SET status = ?1, assigned_team = ?2, assigned_to = ?3, priority = ?4,
               updated_at = ?5, resolved_at = ?6
           WHERE id = ?7",
          rusqlite::params![
            raw.status,
            raw.assigned_team,
            raw.assigned_to,
            raw.priority,
            raw.updated_at,
            raw.resolved_at,
            raw.id,
          ],
        )?;
        tx.commit()?;
        Ok(Ok(Some(ticket)))
      })
      .await?;

    updated
  }
}
