//! Timeout-bounded transaction scope.
//!
//! [`with_transaction`] wraps begin/commit around a closure and enforces an
//! explicit wall-clock ceiling on the whole scope. If the ceiling is hit,
//! the future is dropped and the transaction rolls back; nothing commits
//! unless the closure completed in time and without error.

use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};

/// Failure of a [`with_transaction`] scope.
#[derive(Debug, thiserror::Error)]
pub enum TxError<E> {
    /// The scope exceeded its time ceiling and was rolled back. Safe to
    /// retry.
    #[error("transaction exceeded its {}s time ceiling", .0.as_secs())]
    Timeout(Duration),

    /// The closure (or begin/commit) failed; the transaction rolled back.
    #[error(transparent)]
    Inner(E),
}

/// Run `f` inside a transaction that must finish within `ceiling`.
///
/// The closure receives the open transaction and returns a boxed future
/// borrowing it; queries inside run via `&mut **tx`. Commit happens only
/// after the closure returns `Ok` within the ceiling. On error or timeout
/// the transaction is dropped, which rolls it back.
pub async fn with_transaction<T, E, F>(
    pool: &PgPool,
    ceiling: Duration,
    f: F,
) -> Result<T, TxError<E>>
where
    E: From<sqlx::Error>,
    F: for<'t> FnOnce(&'t mut Transaction<'static, Postgres>) -> BoxFuture<'t, Result<T, E>>,
{
    let scope = async {
        let mut tx = pool.begin().await.map_err(E::from)?;
        let value = f(&mut tx).await?;
        tx.commit().await.map_err(E::from)?;
        Ok::<T, E>(value)
    };

    match tokio::time::timeout(ceiling, scope).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TxError::Inner(e)),
        Err(_) => Err(TxError::Timeout(ceiling)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_error_reports_the_ceiling_in_seconds() {
        let err: TxError<sqlx::Error> = TxError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "transaction exceeded its 15s time ceiling");
    }
}
