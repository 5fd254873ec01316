//! Running tallies of support answers, for the `/metrics` summary.
//!
//! Only aggregates are kept; individual answers are not stored.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use techflow_core::answer::{AnswerMode, SupportAnswer};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
  count:          u64,
  total_time:     f64,
  min_time:       f64,
  max_time:       f64,
  total_accuracy: f64,
}

impl Tally {
  fn record(&mut self, time: f64, accuracy: f64) {
    if self.count == 0 {
      self.min_time = time;
      self.max_time = time;
    } else {
      self.min_time = self.min_time.min(time);
      self.max_time = self.max_time.max(time);
    }
    self.count += 1;
    self.total_time += time;
    self.total_accuracy += accuracy;
  }

  fn avg_time(&self) -> f64 { self.total_time / self.count as f64 }

  fn avg_accuracy(&self) -> f64 { self.total_accuracy / self.count as f64 }

  fn stats(&self) -> Option<ModeStats> {
    (self.count > 0).then(|| ModeStats {
      tickets_processed: self.count,
      avg_response_time: round(self.avg_time(), 2),
      min_response_time: round(self.min_time, 2),
      max_response_time: round(self.max_time, 2),
      avg_accuracy:      round(self.avg_accuracy() * 100.0, 1),
      total_time_spent:  round(self.total_time, 2),
    })
  }
}

fn round(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

#[derive(Debug, Default)]
struct Tallies {
  manual: Tally,
  ai:     Tally,
}

/// Thread-safe per-mode tallies of answered support questions.
#[derive(Debug, Default)]
pub struct AnswerLedger {
  tallies: Mutex<Tallies>,
}

impl AnswerLedger {
  pub fn record(&self, answer: &SupportAnswer) {
    let mut tallies = self.tallies.lock().unwrap_or_else(PoisonError::into_inner);
    let tally = match answer.mode {
      AnswerMode::Manual => &mut tallies.manual,
      AnswerMode::Ai => &mut tallies.ai,
    };
    tally.record(answer.metrics.response_time_seconds, answer.metrics.accuracy_score);
  }

  pub fn summary(&self) -> MetricsSummary {
    let tallies = self.tallies.lock().unwrap_or_else(PoisonError::into_inner);
    let (manual, ai) = (tallies.manual, tallies.ai);
    drop(tallies);

    let improvement = (manual.count > 0 && ai.count > 0).then(|| {
      let (m_time, a_time) = (manual.avg_time(), ai.avg_time());
      let (m_acc, a_acc) = (manual.avg_accuracy(), ai.avg_accuracy());
      Improvement {
        speed_percentage:      round(percent_change(m_time, m_time - a_time), 1),
        time_saved_per_ticket: round(m_time - a_time, 2),
        accuracy_percentage:   round(percent_change(m_acc, a_acc - m_acc), 1),
        accuracy_gain:         round((a_acc - m_acc) * 100.0, 1),
      }
    });

    MetricsSummary {
      total_tickets: manual.count + ai.count,
      by_mode: ByMode { manual: manual.count, ai: ai.count },
      manual_mode: manual.stats(),
      ai_mode: ai.stats(),
      improvement,
    }
  }
}

/// `delta` as a percentage of `base`; zero when `base` is zero.
fn percent_change(base: f64, delta: f64) -> f64 {
  if base == 0.0 { 0.0 } else { delta / base * 100.0 }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByMode {
  pub manual: u64,
  pub ai:     u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeStats {
  pub tickets_processed: u64,
  pub avg_response_time: f64,
  pub min_response_time: f64,
  pub max_response_time: f64,
  /// Percent.
  pub avg_accuracy:      f64,
  pub total_time_spent:  f64,
}

/// How the AI path compares with the manual one. Only present when both
/// modes have answered at least once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
  pub speed_percentage:      f64,
  pub time_saved_per_ticket: f64,
  pub accuracy_percentage:   f64,
  /// Percentage points.
  pub accuracy_gain:         f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
  pub total_tickets: u64,
  pub by_mode:       ByMode,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manual_mode:   Option<ModeStats>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ai_mode:       Option<ModeStats>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub improvement:   Option<Improvement>,
}
