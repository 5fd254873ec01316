//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision, so they also sort correctly as text. Enums are stored as their
//! lowercase names. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use techflow_core::ticket::{Priority, Status, Ticket};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Priority / Status ────────────────────────────────────────────────────────

pub fn decode_priority(s: &str) -> Result<Priority> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "priority",
    value:  s.to_owned(),
  })
}

pub fn decode_status(s: &str) -> Result<Status> {
  s.parse().map_err(|_| Error::UnknownValue {
    column: "status",
    value:  s.to_owned(),
  })
}

// ─── Row types ────────────────────────────────────────────────────────────────

/// A `support_tickets` row as raw column values.
pub struct RawTicket {
  pub id:             String,
  pub number:         u32,
  pub subject:        String,
  pub description:    String,
  pub customer_name:  String,
  pub customer_email: String,
  pub category:       String,
  pub priority:       String,
  pub status:         String,
  pub assigned_team:  Option<String>,
  pub assigned_to:    Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
  pub resolved_at:    Option<String>,
}

impl RawTicket {
  /// Read a row selected with [`crate::schema::COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      number:         row.get(1)?,
      subject:        row.get(2)?,
      description:    row.get(3)?,
      customer_name:  row.get(4)?,
      customer_email: row.get(5)?,
      category:       row.get(6)?,
      priority:       row.get(7)?,
      status:         row.get(8)?,
      assigned_team:  row.get(9)?,
      assigned_to:    row.get(10)?,
      created_at:     row.get(11)?,
      updated_at:     row.get(12)?,
      resolved_at:    row.get(13)?,
    })
  }

  pub fn encode(t: &Ticket) -> Self {
    Self {
      id:             encode_uuid(t.id),
      number:         t.number,
      subject:        t.subject.clone(),
      description:    t.description.clone(),
      customer_name:  t.customer_name.clone(),
      customer_email: t.customer_email.clone(),
      category:       t.category.clone(),
      priority:       t.priority.as_ref().to_owned(),
      status:         t.status.as_ref().to_owned(),
      assigned_team:  t.assigned_team.clone(),
      assigned_to:    t.assigned_to.clone(),
      created_at:     encode_dt(t.created_at),
      updated_at:     encode_dt(t.updated_at),
      resolved_at:    t.resolved_at.map(encode_dt),
    }
  }

  pub fn into_ticket(self) -> Result<Ticket> {
    Ok(Ticket {
      id:             decode_uuid(&self.id)?,
      number:         self.number,
      subject:        self.subject,
      description:    self.description,
      customer_name:  self.customer_name,
      customer_email: self.customer_email,
      category:       self.category,
      priority:       decode_priority(&self.priority)?,
      status:         decode_status(&self.status)?,
      assigned_team:  self.assigned_team,
      assigned_to:    self.assigned_to,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
      resolved_at:    self.resolved_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
