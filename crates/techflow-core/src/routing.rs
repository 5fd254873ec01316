//! Routing advisor: assigns a ticket to a support team.
//!
//! No routing decision is made here. The caller picks the team; the advisor
//! checks it exists and records the assignment through the store.

use uuid::Uuid;

use crate::{
  Error, Result,
  store::TicketStore,
  team::TeamDirectory,
  ticket::{Ticket, TicketPatch},
};

/// Assign `ticket_id` to `team_id`.
///
/// Fails with [`Error::TeamNotFound`] for an unknown team and
/// [`Error::TicketNotFound`] for an unknown ticket.
pub async fn route<S>(
  store: &S,
  teams: &TeamDirectory,
  ticket_id: Uuid,
  team_id: &str,
) -> Result<Ticket>
where
  S: TicketStore,
{
  let team = teams
    .find(team_id)
    .ok_or_else(|| Error::TeamNotFound(team_id.to_owned()))?;

  let patch = TicketPatch {
    assigned_team: Some(Some(team.id.clone())),
    ..TicketPatch::default()
  };

  store
    .update(ticket_id, patch)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::TicketNotFound(ticket_id))
}
