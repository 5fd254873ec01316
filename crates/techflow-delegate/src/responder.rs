//! Response delegation: forward a support question to the AI responder, or
//! answer it with a canned reply.
//!
//! [`SupportResponder::answer`] is an explicit attempt-then-fallback: the
//! attempt ([`SupportResponder::delegate`]) and the fallback
//! ([`fallback_answer`]) are separate functions, and a failed attempt is
//! logged before the fallback is used.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use techflow_core::answer::{AnswerMetrics, AnswerMode, SupportAnswer};
use uuid::Uuid;

use crate::{
  Error, Result, Unavailable,
  error::require_question,
  ledger::AnswerLedger,
};

/// Used when the caller does not supply an email address.
pub const DEFAULT_USER_EMAIL: &str = "user@example.com";

pub const FALLBACK_ANSWER: &str = "This is a mock response. Start the support-bot service to see \
                                   real AI-powered responses.";

const AI_METRICS: AnswerMetrics = AnswerMetrics {
  response_time_seconds: 1.2,
  accuracy_score:        0.92,
};

const MANUAL_METRICS: AnswerMetrics = AnswerMetrics {
  response_time_seconds: 5.5,
  accuracy_score:        0.65,
};

/// Connection settings for the AI responder.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
  /// Resolved once at startup; fixed for the responder's lifetime.
  pub enabled:  bool,
  /// e.g. `http://support-bot:8001`; requests go to `{base_url}/ticket`.
  pub base_url: String,
  pub timeout:  Duration,
}

#[derive(Debug, Serialize)]
struct ResponderRequest<'a> {
  question:   &'a str,
  user_email: &'a str,
}

/// What the responder sends back. Only `answer` is mandatory; older
/// responders report a bare `response_time` instead of `metrics`.
#[derive(Debug, Deserialize)]
struct ResponderReply {
  ticket_id:     Option<String>,
  question:      Option<String>,
  answer:        String,
  metrics:       Option<AnswerMetrics>,
  response_time: Option<f64>,
}

/// A `TICKET-XXXXXXXX` identifier with eight uppercase hex digits.
pub fn mock_ticket_id() -> String {
  let hex = Uuid::new_v4().simple().to_string();
  format!("TICKET-{}", hex[..8].to_uppercase())
}

/// The deterministic reply used when the responder is disabled or failed.
///
/// `ai_attempted` selects the mode tag and canned metrics.
pub fn fallback_answer(question: &str, ai_attempted: bool) -> SupportAnswer {
  let (mode, metrics) = if ai_attempted {
    (AnswerMode::Ai, AI_METRICS)
  } else {
    (AnswerMode::Manual, MANUAL_METRICS)
  };
  SupportAnswer {
    ticket_id: mock_ticket_id(),
    question: question.to_owned(),
    answer: FALLBACK_ANSWER.to_owned(),
    mode,
    metrics,
  }
}

/// Gateway to the AI support responder.
///
/// Cheap to share behind an `Arc`; the inner [`reqwest::Client`] is pooled.
#[derive(Debug)]
pub struct SupportResponder {
  client: Client,
  config: ResponderConfig,
  ledger: AnswerLedger,
}

impl SupportResponder {
  pub fn new(config: ResponderConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config, ledger: AnswerLedger::default() })
  }

  pub fn ai_enabled(&self) -> bool { self.config.enabled }

  /// Tallies of every answer this responder has produced.
  pub fn ledger(&self) -> &AnswerLedger { &self.ledger }

  fn url(&self) -> String {
    format!("{}/ticket", self.config.base_url.trim_end_matches('/'))
  }

  /// Answer `question`.
  ///
  /// Fails only for a blank question. Downstream failures are logged and
  /// replaced by [`fallback_answer`].
  pub async fn answer(
    &self,
    question: &str,
    customer_email: Option<&str>,
  ) -> Result<SupportAnswer> {
    require_question(question)?;

    let answer = if self.config.enabled {
      match self.delegate(question, customer_email).await {
        Ok(answer) => answer,
        Err(e) => {
          tracing::warn!(error = %e, url = %self.url(), "support responder unavailable; using fallback answer");
          fallback_answer(question, true)
        }
      }
    } else {
      fallback_answer(question, false)
    };

    self.ledger.record(&answer);
    Ok(answer)
  }

  /// Ask the responder directly, without falling back.
  pub async fn delegate(
    &self,
    question: &str,
    customer_email: Option<&str>,
  ) -> Result<SupportAnswer, Unavailable> {
    let started = Instant::now();
    let resp = self
      .client
      .post(self.url())
      .json(&ResponderRequest {
        question,
        user_email: customer_email.unwrap_or(DEFAULT_USER_EMAIL),
      })
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Unavailable::Status(resp.status()));
    }

    let body = resp.bytes().await?;
    let reply: ResponderReply =
      serde_json::from_slice(&body).map_err(|e| Unavailable::Malformed(e.to_string()))?;

    let metrics = match (reply.metrics, reply.response_time) {
      (Some(m), _) => m,
      (None, Some(t)) => AnswerMetrics { response_time_seconds: t, ..AI_METRICS },
      (None, None) => AnswerMetrics {
        response_time_seconds: started.elapsed().as_secs_f64(),
        ..AI_METRICS
      },
    };
    if !metrics.is_well_formed() {
      return Err(Unavailable::Malformed(format!("metrics out of range: {metrics:?}")));
    }

    Ok(SupportAnswer {
      ticket_id: reply.ticket_id.unwrap_or_else(mock_ticket_id),
      question: reply.question.unwrap_or_else(|| question.to_owned()),
      answer: reply.answer,
      mode: AnswerMode::Ai,
      metrics,
    })
  }
}
