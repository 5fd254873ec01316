//! Built-in reference data: support teams, help articles and a sample queue.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
  knowledge::{KnowledgeArticle, KnowledgeBase},
  team::{Team, TeamDirectory},
  ticket::{Priority, Status, Ticket},
};

/// The six support teams tickets can be routed to.
pub fn teams() -> TeamDirectory {
  TeamDirectory::new(vec![
    Team::new("tier1", "Tier 1 Support"),
    Team::new("tier2", "Tier 2 Support"),
    Team::new("technical", "Technical Team"),
    Team::new("billing", "Billing Team"),
    Team::new("sales", "Sales Team"),
    Team::new("engineering", "Engineering Team"),
  ])
}

fn article(id: &str, title: &str, category: &str, content: &str) -> KnowledgeArticle {
  KnowledgeArticle {
    id:       id.into(),
    title:    title.into(),
    category: category.into(),
    content:  content.into(),
  }
}

/// The five-article help centre used by manual lookup.
pub fn knowledge_base() -> KnowledgeBase {
  KnowledgeBase::new(vec![
    article(
      "kb1",
      "How to reset your password",
      "Account",
      "1. Go to login page\n2. Click \"Forgot Password\"\n3. Enter your email\n\
       4. Check email for reset link\n5. Link expires in 1 hour",
    ),
    article(
      "kb2",
      "Webhook Integration Guide",
      "Technical",
      "Webhooks can be configured in Settings > Integrations. Supported events: \
       order.created, order.updated, payment.processed",
    ),
    article(
      "kb3",
      "Data Export Process",
      "Account",
      "Go to Settings > Data Export. Available formats: CSV, JSON, XML. Export \
       will be emailed within 24 hours.",
    ),
    article(
      "kb4",
      "Refund Policy",
      "Sales",
      "30-day money-back guarantee on annual plans. Pro-rated refunds for \
       cancellations within first 90 days.",
    ),
    article(
      "kb5",
      "Adding Team Members",
      "Account",
      "Settings > Team > Add Member. Enter email addresses. They will receive \
       invite links valid for 7 days.",
    ),
  ])
}

/// (number, subject, customer, email, category, priority, description, minutes ago)
type SampleRow = (u32, &'static str, &'static str, &'static str, &'static str, Priority, &'static str, i64);

const SAMPLE_QUEUE: &[SampleRow] = &[
  (1247, "How do I reset my password?", "John Smith", "john.smith@example.com", "Account", Priority::Medium,
   "I forgot my password and the reset link is not working. Can you help?", 15),
  (1248, "API returning 500 errors", "Sarah Johnson", "sarah.j@techcorp.com", "Technical", Priority::Urgent,
   "Our production API integration is returning 500 errors since this morning. This is blocking our customers.", 5),
  (1249, "How to integrate webhooks?", "Mike Chen", "mike.chen@startup.io", "Technical", Priority::Low,
   "I want to set up webhooks for order notifications. Where can I find the documentation?", 30),
  (1250, "Billing question about invoice #4521", "Emily Davis", "emily.d@company.com", "Billing", Priority::Medium,
   "I received invoice #4521 but the amount seems incorrect. Can you review?", 10),
  (1251, "How do I export my data?", "Robert Wilson", "r.wilson@business.com", "Account", Priority::Low,
   "I need to export all my data for compliance reasons. What format is available?", 45),
  (1252, "Connection timeout errors", "Lisa Anderson", "lisa.a@enterprise.com", "Technical", Priority::High,
   "Getting intermittent connection timeout errors when uploading large files (>100MB).", 20),
  (1253, "What is your refund policy?", "David Brown", "david.brown@email.com", "Sales", Priority::Low,
   "I purchased the annual plan but need to cancel. What is your refund policy?", 35),
  (1254, "How to add team members?", "Jennifer Lee", "jlee@company.org", "Account", Priority::Medium,
   "I need to add 5 new team members to our account. How do I do this?", 8),
  (1255, "Feature request: Dark mode", "Tom Harris", "tharris@dev.com", "Feature Request", Priority::Low,
   "Would love to see a dark mode option in the dashboard. Any plans for this?", 50),
  (1256, "Cannot access dashboard - urgent!", "Amanda White", "awhite@critical.com", "Technical", Priority::Urgent,
   "Dashboard is showing a blank page after login. This is urgent as we have a client demo in 30 minutes!", 3),
];

/// The ten-ticket morning queue (numbers 1247–1256), timestamped relative to
/// `now`.
pub fn sample_queue(now: DateTime<Utc>) -> Vec<Ticket> {
  SAMPLE_QUEUE
    .iter()
    .map(|&(number, subject, customer, email, category, priority, description, ago)| {
      let created_at = now - Duration::minutes(ago);
      Ticket {
        id: Uuid::new_v4(),
        number,
        subject: subject.into(),
        description: description.into(),
        customer_name: customer.into(),
        customer_email: email.into(),
        category: category.into(),
        priority,
        status: Status::New,
        assigned_team: None,
        assigned_to: None,
        created_at,
        updated_at: created_at,
        resolved_at: None,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_queue_is_numbered_contiguously() {
    let q = sample_queue(Utc::now());
    let numbers: Vec<u32> = q.iter().map(|t| t.number).collect();
    assert_eq!(numbers, (1247..=1256).collect::<Vec<_>>());
    assert!(q.iter().all(|t| t.status == Status::New && t.resolved_at.is_none()));
  }

  #[test]
  fn catalog_sizes() {
    assert_eq!(teams().teams().len(), 6);
    assert_eq!(knowledge_base().len(), 5);
    assert!(teams().find("engineering").is_some());
  }
}
