//! Tickets: the records tracked through the support queue.
//!
//! A ticket moves through a fixed status lifecycle
//! (`new → open → pending → resolved`) and carries a human-facing `number`
//! that is assigned once at intake and never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Tickets are numbered from `NUMBER_BASE + 1` upwards on an empty store.
pub const NUMBER_BASE: u32 = 1000;

/// The number the next created ticket receives, given the highest number
/// currently held by any ticket. `None` once the number space is used up.
pub fn next_number(current_max: Option<u32>) -> Option<u32> {
  current_max.unwrap_or(NUMBER_BASE).checked_add(1)
}

// ─── Classification ──────────────────────────────────────────────────────────

/// Urgency classification, used only for queue ordering.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Medium,
  High,
  Urgent,
}

/// Where a ticket sits in its lifecycle.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
  #[default]
  New,
  Open,
  Pending,
  Resolved,
}

// ─── Ticket ──────────────────────────────────────────────────────────────────

/// A customer-reported issue as persisted by a [`TicketStore`](crate::store::TicketStore).
///
/// `resolved_at` is set iff `status == Resolved`, and `updated_at` is never
/// earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
  pub id:             Uuid,
  pub number:         u32,
  pub subject:        String,
  pub description:    String,
  pub customer_name:  String,
  pub customer_email: String,
  pub category:       String,
  pub priority:       Priority,
  pub status:         Status,
  pub assigned_team:  Option<String>,
  pub assigned_to:    Option<String>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
  pub resolved_at:    Option<DateTime<Utc>>,
}

// ─── Intake ──────────────────────────────────────────────────────────────────

/// Unvalidated intake fields, as submitted by a customer or agent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketDraft {
  #[serde(default)]
  pub subject:        String,
  #[serde(default)]
  pub description:    String,
  #[serde(default)]
  pub customer_name:  String,
  #[serde(default)]
  pub customer_email: String,
  #[serde(default)]
  pub category:       String,
  /// Defaults to [`Priority::Medium`] when absent.
  pub priority:       Option<Priority>,
}

impl TicketDraft {
  /// Check required fields and produce a [`NewTicket`] a store can persist.
  ///
  /// `subject`, `customer_name` and `customer_email` must be non-blank.
  pub fn validate(self) -> Result<NewTicket> {
    let subject = self.subject.trim().to_owned();
    let customer_name = self.customer_name.trim().to_owned();
    let customer_email = self.customer_email.trim().to_owned();

    let missing: Vec<&str> = [
      ("subject", subject.is_empty()),
      ("customer_name", customer_name.is_empty()),
      ("customer_email", customer_email.is_empty()),
    ]
    .into_iter()
    .filter_map(|(field, empty)| empty.then_some(field))
    .collect();

    if !missing.is_empty() {
      return Err(Error::Validation(format!(
        "missing required field(s): {}",
        missing.join(", ")
      )));
    }

    Ok(NewTicket {
      subject,
      description: self.description,
      customer_name,
      customer_email,
      category: self.category,
      priority: self.priority.unwrap_or_default(),
    })
  }
}

/// Validated intake fields. Only obtainable through [`TicketDraft::validate`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct NewTicket {
  pub subject:        String,
  pub description:    String,
  pub customer_name:  String,
  pub customer_email: String,
  pub category:       String,
  pub priority:       Priority,
}

impl NewTicket {
  /// Build the persisted record: a fresh id, the given `number`, status `new`.
  pub fn into_ticket(self, number: u32, now: DateTime<Utc>) -> Ticket {
    Ticket {
      id: Uuid::new_v4(),
      number,
      subject: self.subject,
      description: self.description,
      customer_name: self.customer_name,
      customer_email: self.customer_email,
      category: self.category,
      priority: self.priority,
      status: Status::New,
      assigned_team: None,
      assigned_to: None,
      created_at: now,
      updated_at: now,
      resolved_at: None,
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update. Absent fields are left untouched.
///
/// `assigned_team` and `assigned_to` distinguish "absent" (`None`) from
/// "explicitly cleared" (`Some(None)`, i.e. JSON `null`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TicketPatch {
  pub status:        Option<Status>,
  #[serde(default, deserialize_with = "present")]
  pub assigned_team: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub assigned_to:   Option<Option<String>>,
  pub priority:      Option<Priority>,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

impl TicketPatch {
  /// Apply the patch to `ticket` as of `now`.
  ///
  /// `updated_at` is always refreshed. Moving to `resolved` stamps
  /// `resolved_at` once; re-resolving keeps the first stamp. Moving to any
  /// other status clears it.
  pub fn apply(&self, ticket: &mut Ticket, now: DateTime<Utc>) {
    if let Some(status) = self.status {
      ticket.status = status;
      match status {
        Status::Resolved => {
          ticket.resolved_at.get_or_insert(now);
        }
        _ => ticket.resolved_at = None,
      }
    }
    if let Some(team) = &self.assigned_team {
      ticket.assigned_team = team.clone();
    }
    if let Some(agent) = &self.assigned_to {
      ticket.assigned_to = agent.clone();
    }
    if let Some(priority) = self.priority {
      ticket.priority = priority;
    }
    ticket.updated_at = now.max(ticket.created_at);
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn draft() -> TicketDraft {
    TicketDraft {
      subject:        "API returning 500 errors".into(),
      description:    "Production integration is failing.".into(),
      customer_name:  "Sarah Johnson".into(),
      customer_email: "sarah.j@techcorp.com".into(),
      category:       "Technical".into(),
      priority:       Some(Priority::Urgent),
    }
  }

  #[test]
  fn numbering_starts_after_base() {
    assert_eq!(next_number(None), Some(1001));
    assert_eq!(next_number(Some(1256)), Some(1257));
  }

  #[test]
  fn numbering_stops_at_the_top_of_the_range() {
    assert_eq!(next_number(Some(u32::MAX - 1)), Some(u32::MAX));
    assert_eq!(next_number(Some(u32::MAX)), None);
  }

  #[test]
  fn validate_accepts_complete_draft() {
    let new = draft().validate().unwrap();
    assert_eq!(new.subject, "API returning 500 errors");
    assert_eq!(new.priority, Priority::Urgent);
  }

  #[test]
  fn validate_defaults_priority_to_medium() {
    let mut d = draft();
    d.priority = None;
    assert_eq!(d.validate().unwrap().priority, Priority::Medium);
  }

  #[test]
  fn validate_names_every_missing_field() {
    let d = TicketDraft {
      subject: "   ".into(),
      customer_name: "Sarah".into(),
      ..TicketDraft::default()
    };
    let err = d.validate().unwrap_err().to_string();
    assert!(err.contains("subject"), "{err}");
    assert!(err.contains("customer_email"), "{err}");
    assert!(!err.contains("customer_name"), "{err}");
  }

  #[test]
  fn new_ticket_starts_unresolved() {
    let now = Utc::now();
    let t = draft().validate().unwrap().into_ticket(1001, now);
    assert_eq!(t.number, 1001);
    assert_eq!(t.status, Status::New);
    assert!(t.resolved_at.is_none());
    assert_eq!(t.created_at, t.updated_at);
  }

  #[test]
  fn resolving_stamps_resolved_at_once() {
    let now = Utc::now();
    let mut t = draft().validate().unwrap().into_ticket(1001, now);
    let resolve = TicketPatch {
      status: Some(Status::Resolved),
      ..TicketPatch::default()
    };

    let first = now + Duration::seconds(5);
    resolve.apply(&mut t, first);
    assert_eq!(t.resolved_at, Some(first));

    let second = now + Duration::seconds(10);
    resolve.apply(&mut t, second);
    assert_eq!(t.resolved_at, Some(first));
    assert_eq!(t.updated_at, second);
  }

  #[test]
  fn reopening_clears_resolved_at() {
    let now = Utc::now();
    let mut t = draft().validate().unwrap().into_ticket(1001, now);
    TicketPatch { status: Some(Status::Resolved), ..Default::default() }.apply(&mut t, now);
    TicketPatch { status: Some(Status::Open), ..Default::default() }.apply(&mut t, now);
    assert_eq!(t.status, Status::Open);
    assert!(t.resolved_at.is_none());
  }

  #[test]
  fn empty_patch_only_touches_updated_at() {
    let now = Utc::now();
    let original = draft().validate().unwrap().into_ticket(1001, now);
    let mut t = original.clone();
    let later = now + Duration::minutes(1);
    TicketPatch::default().apply(&mut t, later);
    assert_eq!(t.updated_at, later);
    t.updated_at = original.updated_at;
    assert_eq!(t, original);
  }

  #[test]
  fn updated_at_never_precedes_created_at() {
    let now = Utc::now();
    let mut t = draft().validate().unwrap().into_ticket(1001, now);
    TicketPatch::default().apply(&mut t, now - Duration::seconds(30));
    assert_eq!(t.updated_at, t.created_at);
  }

  #[test]
  fn patch_distinguishes_null_from_absent() {
    let cleared: TicketPatch =
      serde_json::from_str(r#"{"assigned_team": null}"#).unwrap();
    assert_eq!(cleared.assigned_team, Some(None));
    assert_eq!(cleared.assigned_to, None);

    let set: TicketPatch =
      serde_json::from_str(r#"{"assigned_to": "agent-7", "priority": "high"}"#).unwrap();
    assert_eq!(set.assigned_to, Some(Some("agent-7".into())));
    assert_eq!(set.priority, Some(Priority::High));
  }

  #[test]
  fn patch_rejects_unknown_status() {
    let parsed: Result<TicketPatch, _> = serde_json::from_str(r#"{"status": "closed"}"#);
    assert!(parsed.is_err());
  }
}
