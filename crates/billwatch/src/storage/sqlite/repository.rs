//! SQLite implementation of [`BillStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use billwatch_core::bill::{BillId, BillRecord, SourceHash, SummaryRecord};
use billwatch_core::cache::{
    deserialize_bill, deserialize_summary, serialize_bill, serialize_summary, BillStore,
    CacheError, InvalidationReport, InvalidationRequest, InvalidationScope, Result, StoreSnapshot,
};

use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn parse_timestamp(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Raw ids from a `(id, timestamp)` query whose rows fall in `scope`.
///
/// Rows whose id no longer parses are skipped.
fn matching_ids(
    conn: &rusqlite::Connection,
    sql: &str,
    scope: &InvalidationScope,
    now: DateTime<Utc>,
) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        let id: String = row.get(0)?;
        let stamp: String = row.get(1)?;
        Ok((id, parse_timestamp(1, &stamp)?))
    })?;

    let mut ids = Vec::new();
    for row in rows {
        let (raw, stamped_at) = row?;
        let Ok(id) = BillId::parse(&raw) else {
            continue;
        };
        if scope.matches(&id, stamped_at, now) {
            ids.push(raw);
        }
    }
    Ok(ids)
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a store backed by an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)
    }

    async fn select_record(&self, sql: &'static str, params: Vec<String>) -> Result<Option<String>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row(rusqlite::params_from_iter(params.iter()), |row| row.get(0)) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl BillStore for SqliteStore {
    async fn get_bill(&self, id: &BillId) -> Result<Option<BillRecord>> {
        let record = self
            .select_record(schema::SELECT_BILL_BY_ID, vec![id.to_string()])
            .await?;
        record.as_deref().map(deserialize_bill).transpose()
    }

    async fn put_bill(&self, bill: &BillRecord) -> Result<()> {
        let id = bill.id.to_string();
        let source_hash = bill.source_hash.to_string();
        let fetched_at = format_timestamp(&bill.fetched_at);
        let record = serialize_bill(bill)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_BILL,
                    rusqlite::params![id, source_hash, fetched_at, record],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn get_summary(&self, id: &BillId, hash: &SourceHash) -> Result<Option<SummaryRecord>> {
        let record = self
            .select_record(
                schema::SELECT_SUMMARY_BY_HASH,
                vec![id.to_string(), hash.to_string()],
            )
            .await?;
        record.as_deref().map(deserialize_summary).transpose()
    }

    async fn put_summary(&self, summary: &SummaryRecord) -> Result<()> {
        let bill_id = summary.bill_id.to_string();
        let source_hash = summary.source_hash.to_string();
        let generated_at = format_timestamp(&summary.generated_at);
        let record = serialize_summary(summary)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_SUMMARY,
                    rusqlite::params![bill_id, source_hash, generated_at, record],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn sweep(
        &self,
        request: &InvalidationRequest,
        now: DateTime<Utc>,
    ) -> Result<InvalidationReport> {
        let request = request.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let bill_ids = matching_ids(&tx, schema::SELECT_BILL_STAMPS, &request.scope, now)
                    .map_err(wrap_err)?;
                for id in &bill_ids {
                    tx.execute(schema::DELETE_BILL, [id]).map_err(wrap_err)?;
                }

                let mut summaries_removed = 0;
                if request.include_summaries {
                    let mut summary_ids =
                        matching_ids(&tx, schema::SELECT_SUMMARY_STAMPS, &request.scope, now)
                            .map_err(wrap_err)?;
                    for id in &bill_ids {
                        if !summary_ids.contains(id) {
                            summary_ids.push(id.clone());
                        }
                    }
                    for id in &summary_ids {
                        summaries_removed +=
                            tx.execute(schema::DELETE_SUMMARY, [id]).map_err(wrap_err)?;
                    }
                }

                tx.commit().map_err(wrap_err)?;

                Ok(InvalidationReport {
                    bills_removed: bill_ids.len(),
                    summaries_removed,
                    not_found_cleared: 0,
                })
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn snapshot(&self) -> Result<StoreSnapshot> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_BILL_STAMPS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| {
                        let stamp: String = row.get(1)?;
                        parse_timestamp(1, &stamp)
                    })
                    .map_err(wrap_err)?;

                let mut bill_fetched_at = Vec::new();
                for row_result in rows {
                    bill_fetched_at.push(row_result.map_err(wrap_err)?);
                }

                let summaries: i64 = conn
                    .query_row(schema::COUNT_SUMMARIES, [], |row| row.get(0))
                    .map_err(wrap_err)?;

                Ok(StoreSnapshot {
                    bill_fetched_at,
                    summary_entries: usize::try_from(summaries).unwrap_or(0),
                })
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billwatch_core::bill::{sample_bill, GeneratedSummary};
    use chrono::Duration;

    fn id(raw: &str) -> BillId {
        BillId::parse(raw).unwrap()
    }

    fn summary_for(bill: &BillRecord) -> SummaryRecord {
        let generated = GeneratedSummary {
            text: "Requires cities to plan for housing.".to_string(),
            key_provisions: vec!["Planning".to_string()],
            impact: "Cities".to_string(),
            model: "gpt-4o".to_string(),
        };
        SummaryRecord::for_bill(bill, generated, bill.fetched_at)
    }

    #[tokio::test]
    async fn test_bill_roundtrip_through_sqlite() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let bill = sample_bill("ocd-bill/abc", "h1");

        store.put_bill(&bill).await.unwrap();

        assert_eq!(store.get_bill(&bill.id).await.unwrap(), Some(bill));
        assert_eq!(store.get_bill(&id("AB-404")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_bill_upserts() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        store.put_bill(&sample_bill("AB-1", "h1")).await.unwrap();
        store.put_bill(&sample_bill("AB-1", "h2")).await.unwrap();

        let bill = store.get_bill(&id("AB-1")).await.unwrap().unwrap();
        assert_eq!(bill.source_hash.as_str(), "h2");
        assert_eq!(store.snapshot().await.unwrap().bill_fetched_at.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_replaced_by_new_hash() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let v1 = sample_bill("AB-1", "h1");
        let v2 = sample_bill("AB-1", "h2");

        store.put_summary(&summary_for(&v1)).await.unwrap();
        store.put_summary(&summary_for(&v2)).await.unwrap();

        assert!(store
            .get_summary(&v1.id, &v1.source_hash)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_summary(&v2.id, &v2.source_hash)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_sweep_is_scoped() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        for raw in ["AB-1", "AB-2", "SB-1"] {
            let bill = sample_bill(raw, "h1");
            store.put_bill(&bill).await.unwrap();
            store.put_summary(&summary_for(&bill)).await.unwrap();
        }

        let request = InvalidationRequest {
            scope: InvalidationScope::Matching {
                pattern: "AB-*".to_string(),
            },
            include_summaries: false,
        };
        let report = store.sweep(&request, Utc::now()).await.unwrap();

        assert_eq!(report.bills_removed, 2);
        assert_eq!(report.summaries_removed, 0);
        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.bill_fetched_at.len(), 1);
        assert_eq!(snapshot.summary_entries, 3);
    }

    #[tokio::test]
    async fn test_sweep_all_with_summaries() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let bill = sample_bill("AB-1", "h1");
        store.put_bill(&bill).await.unwrap();
        store.put_summary(&summary_for(&bill)).await.unwrap();

        let report = store
            .sweep(&InvalidationRequest::all(), Utc::now())
            .await
            .unwrap();

        assert_eq!(report.bills_removed, 1);
        assert_eq!(report.summaries_removed, 1);
        assert_eq!(store.snapshot().await.unwrap(), StoreSnapshot::default());
    }

    #[tokio::test]
    async fn test_sweep_expired_keeps_recent() {
        let store = SqliteStore::new_in_memory().await.unwrap();
        let old = sample_bill("AB-1", "h1");
        let mut recent = sample_bill("AB-2", "h1");
        recent.fetched_at = old.fetched_at + Duration::hours(2);
        store.put_bill(&old).await.unwrap();
        store.put_bill(&recent).await.unwrap();

        let now = old.fetched_at + Duration::hours(3);
        let report = store
            .sweep(&InvalidationRequest::expired(2 * 60 * 60 + 1), now)
            .await
            .unwrap();

        assert_eq!(report.bills_removed, 1);
        assert!(store.get_bill(&id("AB-2")).await.unwrap().is_some());
    }
}
