//! Store query and connection pool metrics.
//!
//! Every gate lookup is timed with its outcome, so failed lookups (which
//! deny origins and leave requests without a tenant) show up separately
//! from slow ones.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Label for a finished query.
fn outcome<T>(result: &Result<T, sqlx::Error>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(sqlx::Error::PoolTimedOut) => "pool_timeout",
        Err(_) => "error",
    }
}

/// Publishes connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Measures one store query from creation to [`QueryTimer::finish`].
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time labelled with the query's outcome and counts
    /// failures.
    pub fn finish<T>(self, result: &Result<T, sqlx::Error>) {
        let outcome = outcome(result);
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query,
            "outcome" => outcome
        )
        .record(self.start.elapsed().as_secs_f64());

        if outcome != "ok" {
            counter!(
                "database_query_errors_total",
                "query" => self.query,
                "outcome" => outcome
            )
            .increment(1);
        }
    }
}
