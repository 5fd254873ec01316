//! SQL schema for the TechFlow SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never deleted, so a number is never handed out twice.
CREATE TABLE IF NOT EXISTS support_tickets (
    id             TEXT PRIMARY KEY,
    number         INTEGER NOT NULL UNIQUE,
    subject        TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    customer_name  TEXT NOT NULL,
    customer_email TEXT NOT NULL,
    category       TEXT NOT NULL DEFAULT '',
    priority       TEXT NOT NULL,   -- 'low' | 'medium' | 'high' | 'urgent'
    status         TEXT NOT NULL,   -- 'new' | 'open' | 'pending' | 'resolved'
    assigned_team  TEXT,
    assigned_to    TEXT,
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC, microsecond precision
    updated_at     TEXT NOT NULL,
    resolved_at    TEXT,            -- non-NULL iff status = 'resolved'
    CHECK ((status = 'resolved') = (resolved_at IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS tickets_priority_idx ON support_tickets(priority);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`, in [`crate::encode::RawTicket`]
/// field order.
pub const COLUMNS: &str = "id, number, subject, description, customer_name, customer_email, \
  category, priority, status, assigned_team, assigned_to, created_at, updated_at, resolved_at";
