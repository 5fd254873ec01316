//! Knowledge lookup: answer a free-text question from the local articles
//! (manual mode) or through the semantic-retrieval service (AI mode).
//!
//! The caller resolves the mode once per request and passes it in. Unlike
//! [`crate::SupportResponder`], a failed AI lookup is reported as
//! [`Error::ServiceUnavailable`] so the caller can offer manual mode instead.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use techflow_core::{
  answer::{AnswerMode, KnowledgeAnswer, Retrieval, Source},
  knowledge::KnowledgeBase,
};

use crate::{Error, Result, Unavailable, error::require_question};

pub const NO_MATCH_ANSWER: &str = "I'm sorry, I couldn't find an answer to your question in our \
                                   knowledge base. Please contact our support team for \
                                   assistance, or try rephrasing your question.";

/// Connection settings for the semantic-retrieval service.
#[derive(Debug, Clone)]
pub struct KnowledgeConfig {
  /// e.g. `http://faq-expert:8002`; requests go to `{base_url}/ask`.
  pub base_url: String,
  pub timeout:  Duration,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
  question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskReply {
  answer:          String,
  #[serde(default)]
  sources:         Vec<Source>,
  search_time:     f64,
  generation_time: f64,
  total_time:      Option<f64>,
}

/// Gateway answering knowledge questions in either mode.
#[derive(Debug)]
pub struct KnowledgeGateway {
  client:    Client,
  config:    KnowledgeConfig,
  knowledge: KnowledgeBase,
}

impl KnowledgeGateway {
  pub fn new(config: KnowledgeConfig, knowledge: KnowledgeBase) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config, knowledge })
  }

  fn url(&self) -> String {
    format!("{}/ask", self.config.base_url.trim_end_matches('/'))
  }

  /// Answer `question` in `mode`.
  pub async fn ask(&self, question: &str, mode: AnswerMode) -> Result<KnowledgeAnswer> {
    require_question(question)?;
    match mode {
      AnswerMode::Manual => Ok(self.ask_manual(question)),
      AnswerMode::Ai => Ok(self.ask_ai(question).await?),
    }
  }

  /// Keyword lookup over the local articles. No I/O.
  pub fn ask_manual(&self, question: &str) -> KnowledgeAnswer {
    let started = Instant::now();
    let found = self.knowledge.lookup(question);

    let answer = match found.article {
      Some(article) => format!("{}\n\n{}", article.title, article.content),
      None => NO_MATCH_ANSWER.to_owned(),
    };
    tracing::debug!(matched = found.article_id(), count = found.match_count, "manual lookup");

    KnowledgeAnswer {
      question: question.to_owned(),
      answer,
      retrieval: Retrieval::Manual {
        matched_article_id: found.article_id().to_owned(),
        match_count:        found.match_count,
        confidence:         found.confidence,
        response_time:      started.elapsed().as_secs_f64(),
      },
    }
  }

  /// Ask the semantic-retrieval service.
  pub async fn ask_ai(&self, question: &str) -> Result<KnowledgeAnswer, Unavailable> {
    let resp = self
      .client
      .post(self.url())
      .json(&AskRequest { question })
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Unavailable::Status(resp.status()));
    }

    let body = resp.bytes().await?;
    let reply: AskReply =
      serde_json::from_slice(&body).map_err(|e| Unavailable::Malformed(e.to_string()))?;

    if let Some(s) = reply
      .sources
      .iter()
      .find(|s| !(0.0..=1.0).contains(&s.similarity))
    {
      return Err(Unavailable::Malformed(format!(
        "similarity {} for {:?} is outside [0, 1]",
        s.similarity, s.filename
      )));
    }
    let total_time = reply
      .total_time
      .unwrap_or(reply.search_time + reply.generation_time);
    let timings = [reply.search_time, reply.generation_time, total_time];
    if timings.iter().any(|t| !t.is_finite() || *t < 0.0) {
      return Err(Unavailable::Malformed(format!("negative timing in {timings:?}")));
    }

    Ok(KnowledgeAnswer {
      question: question.to_owned(),
      answer: reply.answer,
      retrieval: Retrieval::Ai {
        sources: reply.sources,
        search_time: reply.search_time,
        generation_time: reply.generation_time,
        total_time,
      },
    })
  }

  /// Display summary of what `mode` offers.
  pub fn stats(&self, mode: AnswerMode) -> KnowledgeStats {
    match mode {
      AnswerMode::Ai => KnowledgeStats {
        mode,
        description:     "Semantic search over the document index with generated answers",
        features:        vec![
          "Vector similarity search",
          "Semantic understanding of questions",
          "Context-aware answer generation",
          "Source citations with similarity scores",
        ],
        typical_metrics: TypicalMetrics {
          accuracy:      "90%+".into(),
          response_time: "1-3 seconds".into(),
          coverage:      "Entire document index".into(),
          can_handle:    "Natural language questions, synonyms, complex queries".into(),
        },
      },
      AnswerMode::Manual => KnowledgeStats {
        mode,
        description:     "Keyword matching over the local help articles",
        features:        vec![
          "Keyword matching in predefined articles",
          "Fast but limited understanding",
          "Fixed responses",
          "No context awareness",
        ],
        typical_metrics: TypicalMetrics {
          accuracy:      "40-50%".into(),
          response_time: "under 0.1 seconds".into(),
          coverage:      format!("{} predefined articles", self.knowledge.len()),
          can_handle:    "Only keyword matches".into(),
        },
      },
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypicalMetrics {
  pub accuracy:      String,
  pub response_time: String,
  pub coverage:      String,
  pub can_handle:    String,
}

/// Summary shown alongside the question box.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeStats {
  pub mode:            AnswerMode,
  pub description:     &'static str,
  pub features:        Vec<&'static str>,
  pub typical_metrics: TypicalMetrics,
}
