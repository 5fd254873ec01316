//! Answers produced by the delegation gateways.
//!
//! Answers are transient: they are produced per request and never stored.
//! A [`KnowledgeAnswer`] carries one of two retrieval shapes, tagged on the
//! wire by `mode`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Which answer path produced an answer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnswerMode {
  Ai,
  Manual,
}

// ─── Support answers ─────────────────────────────────────────────────────────

/// Timing and quality figures attached to a support answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetrics {
  /// Seconds, `>= 0`.
  pub response_time_seconds: f64,
  /// In `[0, 1]`.
  pub accuracy_score:        f64,
}

impl AnswerMetrics {
  pub fn is_well_formed(&self) -> bool {
    self.response_time_seconds.is_finite()
      && self.response_time_seconds >= 0.0
      && (0.0..=1.0).contains(&self.accuracy_score)
  }
}

/// The reply to a support question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportAnswer {
  pub ticket_id: String,
  pub question:  String,
  pub answer:    String,
  pub mode:      AnswerMode,
  pub metrics:   AnswerMetrics,
}

// ─── Knowledge answers ───────────────────────────────────────────────────────

/// How strongly a manual lookup matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
  High,
  Medium,
  Low,
  #[serde(rename = "none")]
  #[strum(serialize = "none")]
  Unmatched,
}

impl Confidence {
  /// Map a keyword score onto a confidence band.
  pub fn from_match_count(count: usize) -> Self {
    match count {
      0 => Self::Unmatched,
      1 => Self::Low,
      2 => Self::Medium,
      _ => Self::High,
    }
  }
}

/// A document cited by semantic retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
  pub title:      String,
  pub filename:   String,
  /// In `[0, 1]`.
  pub similarity: f64,
}

/// Mode-specific retrieval metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Retrieval {
  Manual {
    #[serde(rename = "matched_faq")]
    matched_article_id: String,
    match_count:        usize,
    confidence:         Confidence,
    response_time:      f64,
  },
  Ai {
    sources:         Vec<Source>,
    search_time:     f64,
    generation_time: f64,
    total_time:      f64,
  },
}

/// The reply to a knowledge question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeAnswer {
  pub question:  String,
  pub answer:    String,
  #[serde(flatten)]
  pub retrieval: Retrieval,
}

impl KnowledgeAnswer {
  pub fn mode(&self) -> AnswerMode {
    match self.retrieval {
      Retrieval::Manual { .. } => AnswerMode::Manual,
      Retrieval::Ai { .. } => AnswerMode::Ai,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn manual_answer_wire_shape() {
    let a = KnowledgeAnswer {
      question:  "reset password".into(),
      answer:    "Go to login page".into(),
      retrieval: Retrieval::Manual {
        matched_article_id: "kb1".into(),
        match_count:        2,
        confidence:         Confidence::Medium,
        response_time:      0.001,
      },
    };
    let v = serde_json::to_value(&a).unwrap();
    assert_eq!(v["mode"], "manual");
    assert_eq!(v["matched_faq"], "kb1");
    assert_eq!(v["confidence"], "medium");
    assert!(v.get("sources").is_none());
    assert_eq!(a.mode(), AnswerMode::Manual);
  }

  #[test]
  fn ai_answer_wire_shape() {
    let v = json!({
      "question": "q",
      "answer": "a",
      "mode": "ai",
      "sources": [{"title": "Pricing", "filename": "pricing.md", "similarity": 0.81}],
      "search_time": 0.2,
      "generation_time": 1.1,
      "total_time": 1.3
    });
    let a: KnowledgeAnswer = serde_json::from_value(v).unwrap();
    assert_eq!(a.mode(), AnswerMode::Ai);
    match a.retrieval {
      Retrieval::Ai { sources, .. } => assert_eq!(sources[0].filename, "pricing.md"),
      other => panic!("unexpected retrieval {other:?}"),
    }
  }

  #[test]
  fn unmatched_confidence_serialises_as_none() {
    assert_eq!(serde_json::to_value(Confidence::Unmatched).unwrap(), "none");
    assert_eq!(Confidence::from_match_count(0), Confidence::Unmatched);
    assert_eq!(Confidence::from_match_count(7), Confidence::High);
  }

  #[test]
  fn metrics_bounds() {
    let ok = AnswerMetrics { response_time_seconds: 1.2, accuracy_score: 0.92 };
    assert!(ok.is_well_formed());
    let bad = AnswerMetrics { response_time_seconds: -1.0, accuracy_score: 0.5 };
    assert!(!bad.is_well_formed());
    let bad = AnswerMetrics { response_time_seconds: 1.0, accuracy_score: 1.5 };
    assert!(!bad.is_well_formed());
  }
}
