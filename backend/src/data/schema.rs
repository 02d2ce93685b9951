//! Tables read by the SQLite provider and written by the SQLite audit sink.
//!
//! Timestamps are stored as text in the format produced by rusqlite's chrono
//! support; booleans as `0`/`1` integers.

use rusqlite::Connection;

pub const PLATFORM: &str = "
CREATE TABLE IF NOT EXISTS users (
    id                  TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    email               TEXT NOT NULL,
    role                TEXT NOT NULL,
    is_active           INTEGER NOT NULL DEFAULT 1,
    is_verified         INTEGER NOT NULL DEFAULT 0,
    skill_level         TEXT,
    total_learning_time INTEGER NOT NULL DEFAULT 0,
    department          TEXT,
    instructor_rating   REAL,
    created_at          TEXT NOT NULL,
    last_login          TEXT
);
CREATE TABLE IF NOT EXISTS courses (
    id            TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    instructor_id TEXT,
    category      TEXT,
    level         TEXT NOT NULL DEFAULT 'BEGINNER',
    status        TEXT NOT NULL DEFAULT 'DRAFT',
    price         REAL NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    published_at  TEXT
);
CREATE TABLE IF NOT EXISTS enrollments (
    id           TEXT PRIMARY KEY,
    user_id      TEXT,
    course_id    TEXT,
    progress     REAL NOT NULL DEFAULT 0,
    status       TEXT NOT NULL DEFAULT 'ACTIVE',
    enrolled_at  TEXT NOT NULL,
    completed_at TEXT
);
CREATE TABLE IF NOT EXISTS payments (
    id             TEXT PRIMARY KEY,
    user_id        TEXT,
    course_id      TEXT,
    amount         REAL NOT NULL,
    currency       TEXT NOT NULL DEFAULT 'USD',
    status         TEXT NOT NULL,
    method         TEXT,
    transaction_id TEXT,
    created_at     TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS reviews (
    id         TEXT PRIMARY KEY,
    course_id  TEXT NOT NULL,
    user_id    TEXT,
    rating     REAL NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS system_logs (
    id               TEXT PRIMARY KEY,
    level            TEXT NOT NULL,
    action           TEXT NOT NULL,
    actor_id         TEXT,
    message          TEXT NOT NULL,
    response_time_ms REAL,
    created_at       TEXT NOT NULL
);
";

pub const AUDIT_LOGS: &str = "
CREATE TABLE IF NOT EXISTS audit_logs (
    id         TEXT PRIMARY KEY,
    request_id TEXT NOT NULL,
    actor      TEXT NOT NULL,
    action     TEXT NOT NULL,
    details    TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// Creates any missing table. Existing data is left untouched.
pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(PLATFORM)?;
    conn.execute_batch(AUDIT_LOGS)
}
