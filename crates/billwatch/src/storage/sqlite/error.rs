//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `CacheError`.

use billwatch_core::cache::CacheError;

/// Maps a rusqlite error to a CacheError.
///
/// - `CannotOpen`, `DatabaseBusy`, `DatabaseLocked` → `CacheError::ConnectionFailed`
/// - Column conversion failures → `CacheError::Serialization`
/// - All other errors → `CacheError::OperationFailed`
fn map_rusqlite_error(err: &rusqlite::Error) -> CacheError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            CacheError::ConnectionFailed(err.to_string())
        }

        rusqlite::Error::FromSqlConversionFailure(..) | rusqlite::Error::InvalidColumnType(..) => {
            CacheError::Serialization(err.to_string())
        }

        _ => CacheError::OperationFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a CacheError.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> CacheError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::Close(_) => {
            CacheError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => CacheError::OperationFailed(err.to_string()),
    }
}
