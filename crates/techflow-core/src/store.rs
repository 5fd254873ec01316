//! The `TicketStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `techflow-store-sqlite`).
//! Higher layers (`techflow-api`, the routing advisor) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::ticket::{NewTicket, Ticket, TicketPatch};

/// Abstraction over a ticket store backend.
///
/// Every mutation is visible to the next `list` or `get`; there is no
/// caching layer. Tickets are never deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TicketStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a validated ticket, assigning the next number and status `new`.
  ///
  /// Number assignment and insertion are atomic with respect to other
  /// creations on the same store.
  fn create(
    &self,
    ticket: NewTicket,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  /// Persist a fully-formed ticket as-is, keeping its number.
  ///
  /// Used to load sample or migrated queues. Returns an error if the id or
  /// number is already taken.
  fn import(
    &self,
    ticket: Ticket,
  ) -> impl Future<Output = Result<Ticket, Self::Error>> + Send + '_;

  /// All tickets in queue order (see [`crate::ranking::queue_order`]).
  fn list(&self) -> impl Future<Output = Result<Vec<Ticket>, Self::Error>> + Send + '_;

  /// Retrieve a ticket by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Ticket>, Self::Error>> + Send + '_;

  /// Apply `patch` (see [`TicketPatch::apply`]) and return the updated
  /// ticket. Returns `None` if not found.
  fn update(
    &self,
    id: Uuid,
    patch: TicketPatch,
  ) -> impl Future<Output = Result<Option<Ticket>, Self::Error>> + Send + '_;
}
