//! Outbound gateways to the AI services.
//!
//! - [`SupportResponder`] forwards support questions to the AI responder and
//!   falls back to a canned answer whenever the responder is disabled or
//!   unavailable. It never fails the caller for downstream reasons.
//! - [`KnowledgeGateway`] answers knowledge questions either locally by
//!   keyword matching or through the semantic-retrieval service. Its AI path
//!   surfaces [`Error::ServiceUnavailable`] instead of degrading.

pub mod error;
pub mod knowledge;
pub mod ledger;
pub mod responder;

pub use error::{Error, Result, Unavailable};
pub use knowledge::{KnowledgeConfig, KnowledgeGateway, KnowledgeStats};
pub use ledger::{AnswerLedger, MetricsSummary};
pub use responder::{ResponderConfig, SupportResponder};
