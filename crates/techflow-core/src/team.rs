//! Support teams that tickets can be routed to.

use serde::{Deserialize, Serialize};

/// A static support team reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub id:   String,
  pub name: String,
}

impl Team {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Self { id: id.into(), name: name.into() }
  }
}

/// The fixed list of known teams.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
  teams: Vec<Team>,
}

impl TeamDirectory {
  pub fn new(teams: Vec<Team>) -> Self { Self { teams } }

  /// Look up a team by its identifier.
  pub fn find(&self, id: &str) -> Option<&Team> {
    self.teams.iter().find(|t| t.id == id)
  }

  pub fn teams(&self) -> &[Team] { &self.teams }
}
