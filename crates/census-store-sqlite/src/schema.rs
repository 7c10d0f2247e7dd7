//! SQL schema for the census SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version; there is no migration logic beyond that.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id          TEXT PRIMARY KEY,   -- hyphenated lowercase UUID
    name        TEXT NOT NULL,
    surname     TEXT NOT NULL,
    patronymic  TEXT,
    age         INTEGER NOT NULL,
    gender      TEXT NOT NULL,
    nationality TEXT,               -- NULL when the provider had no match
    created_at  TEXT NOT NULL       -- RFC 3339 UTC, fixed nanosecond width
);

-- Serves the keyset listing: ORDER BY created_at DESC, id DESC.
CREATE INDEX IF NOT EXISTS persons_created_id_idx ON persons(created_at, id);

PRAGMA user_version = 1;
";
