//! The local knowledge base and its keyword matcher.
//!
//! Manual-mode lookup is deterministic and needs no external service: the
//! same question against the same articles always selects the same article.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::answer::Confidence;

/// Returned as `matched_faq` when no article matches.
pub const NO_MATCH_ID: &str = "none";

/// Terms shorter than this are ignored by keyword matching.
const MIN_TERM_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
  "about", "and", "are", "can", "does", "for", "from", "have", "how", "not",
  "the", "this", "that", "what", "when", "where", "which", "who", "why",
  "with", "you", "your",
];

/// A read-only help article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeArticle {
  pub id:       String,
  pub title:    String,
  pub category: String,
  pub content:  String,
}

/// The outcome of a manual lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualMatch<'a> {
  pub article:     Option<&'a KnowledgeArticle>,
  pub match_count: usize,
  pub confidence:  Confidence,
}

impl ManualMatch<'_> {
  pub fn article_id(&self) -> &str {
    self.article.map_or(NO_MATCH_ID, |a| a.id.as_str())
  }
}

/// A fixed, ordered set of articles. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
  articles: Vec<KnowledgeArticle>,
}

impl KnowledgeBase {
  pub fn new(articles: Vec<KnowledgeArticle>) -> Self { Self { articles } }

  pub fn len(&self) -> usize { self.articles.len() }

  pub fn is_empty(&self) -> bool { self.articles.is_empty() }

  /// Find the article that best matches `question`.
  ///
  /// The whole question is first tried as a case-insensitive substring of
  /// each title and body. Otherwise each article scores the number of
  /// distinct question terms found in its title or body; the highest score
  /// wins and ties go to the earlier article.
  pub fn lookup(&self, question: &str) -> ManualMatch<'_> {
    let needle = question.trim().to_lowercase();
    if needle.is_empty() {
      return ManualMatch {
        article:     None,
        match_count: 0,
        confidence:  Confidence::Unmatched,
      };
    }

    if let Some(article) = self
      .articles
      .iter()
      .find(|a| haystack(a).contains(&needle))
    {
      return ManualMatch {
        article:     Some(article),
        match_count: terms(&needle).len().max(1),
        confidence:  Confidence::High,
      };
    }

    let terms = terms(&needle);
    let mut best: Option<(&KnowledgeArticle, usize)> = None;
    for article in &self.articles {
      let text = haystack(article);
      let score = terms.iter().filter(|t| text.contains(t.as_str())).count();
      if score > 0 && best.is_none_or(|(_, s)| score > s) {
        best = Some((article, score));
      }
    }

    match best {
      Some((article, score)) => ManualMatch {
        article:     Some(article),
        match_count: score,
        confidence:  Confidence::from_match_count(score),
      },
      None => ManualMatch {
        article:     None,
        match_count: 0,
        confidence:  Confidence::Unmatched,
      },
    }
  }
}

fn haystack(article: &KnowledgeArticle) -> String {
  format!("{}\n{}", article.title, article.content).to_lowercase()
}

/// Distinct significant lowercase terms of `text`, in sorted order.
fn terms(text: &str) -> BTreeSet<String> {
  text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| t.chars().count() >= MIN_TERM_LEN && !STOP_WORDS.contains(t))
    .map(str::to_lowercase)
    .collect()
}
