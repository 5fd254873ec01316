//! Core types and trait definitions for the TechFlow support desk.
//!
//! No HTTP or database dependencies. Storage backends implement
//! [`store::TicketStore`]; the API and gateways build on these types.

pub mod answer;
pub mod catalog;
pub mod error;
pub mod flag;
pub mod knowledge;
pub mod ranking;
pub mod routing;
pub mod store;
pub mod team;
pub mod ticket;

pub use error::{Error, Result};
