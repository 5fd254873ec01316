//! Priority ranking and queue ordering.
//!
//! The queue shows the most urgent tickets first; within a priority tier the
//! newest ticket comes first. Ranking has no effect on processing order.

use std::cmp::Ordering;

use crate::ticket::{Priority, Ticket};

impl Priority {
  /// Position in the queue, `1` being the most urgent.
  pub const fn rank(self) -> u8 {
    match self {
      Priority::Urgent => 1,
      Priority::High => 2,
      Priority::Medium => 3,
      Priority::Low => 4,
    }
  }
}

impl PartialOrd for Priority {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// Orders by [`Priority::rank`]: `Urgent < High < Medium < Low`.
impl Ord for Priority {
  fn cmp(&self, other: &Self) -> Ordering { self.rank().cmp(&other.rank()) }
}

/// Queue comparator: rank ascending, then `created_at` descending.
///
/// Tickets created within the same instant fall back to `number` descending,
/// which matches creation order.
pub fn queue_order(a: &Ticket, b: &Ticket) -> Ordering {
  a.priority
    .cmp(&b.priority)
    .then_with(|| b.created_at.cmp(&a.created_at))
    .then_with(|| b.number.cmp(&a.number))
}

/// Sort `tickets` in place into queue order.
pub fn sort_queue(tickets: &mut [Ticket]) { tickets.sort_by(queue_order); }

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::ticket::TicketDraft;

  fn ticket(number: u32, priority: Priority, minutes_ago: i64) -> Ticket {
    TicketDraft {
      subject: format!("ticket {number}"),
      customer_name: "Customer".into(),
      customer_email: "customer@example.com".into(),
      priority: Some(priority),
      ..TicketDraft::default()
    }
    .validate()
    .unwrap()
    .into_ticket(number, Utc::now() - Duration::minutes(minutes_ago))
  }

  #[test]
  fn ranks_are_ordered_by_urgency() {
    assert!(Priority::Urgent < Priority::High);
    assert!(Priority::High < Priority::Medium);
    assert!(Priority::Medium < Priority::Low);
    assert_eq!(Priority::Urgent.rank(), 1);
    assert_eq!(Priority::Low.rank(), 4);
  }

  #[test]
  fn queue_is_urgent_first_then_newest_first() {
    let mut q = vec![
      ticket(1, Priority::Low, 5),
      ticket(2, Priority::Medium, 30),
      ticket(3, Priority::Urgent, 20),
      ticket(4, Priority::Medium, 10),
      ticket(5, Priority::Urgent, 3),
      ticket(6, Priority::High, 40),
    ];
    sort_queue(&mut q);
    let numbers: Vec<u32> = q.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![5, 3, 6, 4, 2, 1]);
  }

  #[test]
  fn identical_timestamps_fall_back_to_number() {
    let a = ticket(10, Priority::High, 0);
    let mut b = ticket(11, Priority::High, 0);
    b.created_at = a.created_at;
    let mut q = vec![a, b];
    sort_queue(&mut q);
    assert_eq!(q[0].number, 11);
  }
}
