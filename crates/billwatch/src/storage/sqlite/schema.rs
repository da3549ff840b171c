//! SQLite schema definitions and SQL query constants.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- One row per bill; record holds the JSON-encoded BillRecord
CREATE TABLE IF NOT EXISTS bills (
    id TEXT PRIMARY KEY,
    source_hash TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    record TEXT NOT NULL
);

-- At most one summary per bill, tagged with the content hash it was generated from
CREATE TABLE IF NOT EXISTS summaries (
    bill_id TEXT PRIMARY KEY,
    source_hash TEXT NOT NULL,
    generated_at TEXT NOT NULL,
    record TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bills_fetched_at ON bills(fetched_at);
"#;

// Bill queries
pub const UPSERT_BILL: &str = r#"
INSERT INTO bills (id, source_hash, fetched_at, record)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(id) DO UPDATE SET
    source_hash = excluded.source_hash,
    fetched_at = excluded.fetched_at,
    record = excluded.record
"#;

pub const SELECT_BILL_BY_ID: &str = r#"
SELECT record
FROM bills
WHERE id = ?1
"#;

pub const SELECT_BILL_STAMPS: &str = r#"
SELECT id, fetched_at
FROM bills
"#;

pub const DELETE_BILL: &str = r#"
DELETE FROM bills
WHERE id = ?1
"#;

// Summary queries
pub const UPSERT_SUMMARY: &str = r#"
INSERT INTO summaries (bill_id, source_hash, generated_at, record)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(bill_id) DO UPDATE SET
    source_hash = excluded.source_hash,
    generated_at = excluded.generated_at,
    record = excluded.record
"#;

pub const SELECT_SUMMARY_BY_HASH: &str = r#"
SELECT record
FROM summaries
WHERE bill_id = ?1 AND source_hash = ?2
"#;

pub const SELECT_SUMMARY_STAMPS: &str = r#"
SELECT bill_id, generated_at
FROM summaries
"#;

pub const DELETE_SUMMARY: &str = r#"
DELETE FROM summaries
WHERE bill_id = ?1
"#;

pub const COUNT_SUMMARIES: &str = r#"
SELECT COUNT(*)
FROM summaries
"#;
