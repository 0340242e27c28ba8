//! PostgreSQL implementation of the Event store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{EVENT_COLUMNS, EventRow};
use super::store::{EventQuery, EventStore};
use crate::config::FestConfig;
use crate::domain::{Event, EventId, EventRecord, EventSchema, IndexKind, IndexSpec};
use crate::error::EventError;

/// Table definition. Constraints mirror the domain rules so that rows
/// written outside this service are held to the same schema.
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS events (
    id BIGSERIAL PRIMARY KEY,
    event_id TEXT NOT NULL CHECK (event_id <> '' AND event_id = btrim(event_id)),
    category TEXT NOT NULL CHECK (category IN ('technical', 'cultural', 'convenor')),
    society_name TEXT NOT NULL,
    event_name TEXT NOT NULL,
    reg_fees DOUBLE PRECISION NOT NULL CHECK (reg_fees >= 0),
    date_time TIMESTAMPTZ NOT NULL,
    location TEXT NOT NULL,
    brief_description TEXT NOT NULL,
    pdf_link TEXT NOT NULL,
    image TEXT NOT NULL,
    latitude DOUBLE PRECISION CHECK (latitude BETWEEN -90 AND 90),
    longitude DOUBLE PRECISION CHECK (longitude BETWEEN -180 AND 180),
    contact_info TEXT NOT NULL,
    team BIGINT NOT NULL DEFAULT 0 CHECK (team >= 0),
    team_limit BIGINT NOT NULL CHECK (team_limit >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CHECK ((latitude IS NULL) = (longitude IS NULL))
)";

/// Builds the idempotent `CREATE INDEX` statement for one index spec.
fn index_ddl(collection: &str, spec: &IndexSpec) -> String {
    let unique = match spec.kind {
        IndexKind::Unique => "UNIQUE ",
        IndexKind::Equality | IndexKind::Range => "",
    };
    format!(
        "CREATE {unique}INDEX IF NOT EXISTS {} ON {collection} ({})",
        spec.name, spec.column
    )
}

/// Maps a write failure, turning unique violations into
/// [`EventError::DuplicateKey`].
fn map_write_error(e: sqlx::Error, event_id: &EventId) -> EventError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            tracing::warn!(%event_id, "duplicate event id rejected by database");
            EventError::DuplicateKey {
                event_id: event_id.clone(),
            }
        }
        _ => EventError::from(e),
    }
}

/// PostgreSQL-backed Event store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Persistence`] if the database is unreachable.
    pub async fn connect(config: &FestConfig) -> Result<Self, EventError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "connected to postgres"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn register_indexes(&self, schema: &EventSchema) -> Result<(), EventError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        for spec in &schema.indexes {
            sqlx::query(&index_ddl(schema.collection, spec))
                .execute(&self.pool)
                .await?;
            tracing::debug!(index = spec.name, "index registered");
        }
        Ok(())
    }

    async fn insert(&self, record: EventRecord) -> Result<Event, EventError> {
        let coords = record.map_coordinates();
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "INSERT INTO events (event_id, category, society_name, event_name, reg_fees, \
             date_time, location, brief_description, pdf_link, image, latitude, longitude, \
             contact_info, team, team_limit) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(record.event_id().as_str())
        .bind(record.category().as_str())
        .bind(record.society_name())
        .bind(record.event_name())
        .bind(record.reg_fees())
        .bind(record.date_time())
        .bind(record.location())
        .bind(record.brief_description())
        .bind(record.pdf_link())
        .bind(record.image())
        .bind(coords.map(|c| c.latitude()))
        .bind(coords.map(|c| c.longitude()))
        .bind(record.contact_info())
        .bind(record.team())
        .bind(record.team_limit())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, record.event_id()))?;

        Event::try_from(row)
    }

    async fn get(&self, event_id: &EventId) -> Result<Event, EventError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EventError::NotFound(event_id.clone()))?;

        Event::try_from(row)
    }

    async fn replace(&self, event_id: &EventId, record: EventRecord) -> Result<Event, EventError> {
        let coords = record.map_coordinates();
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET event_id = $2, category = $3, society_name = $4, \
             event_name = $5, reg_fees = $6, date_time = $7, location = $8, \
             brief_description = $9, pdf_link = $10, image = $11, latitude = $12, \
             longitude = $13, contact_info = $14, team = $15, team_limit = $16, \
             updated_at = GREATEST(now(), updated_at) \
             WHERE event_id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id.as_str())
        .bind(record.event_id().as_str())
        .bind(record.category().as_str())
        .bind(record.society_name())
        .bind(record.event_name())
        .bind(record.reg_fees())
        .bind(record.date_time())
        .bind(record.location())
        .bind(record.brief_description())
        .bind(record.pdf_link())
        .bind(record.image())
        .bind(coords.map(|c| c.latitude()))
        .bind(coords.map(|c| c.longitude()))
        .bind(record.contact_info())
        .bind(record.team())
        .bind(record.team_limit())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, record.event_id()))?
        .ok_or_else(|| EventError::NotFound(event_id.clone()))?;

        Event::try_from(row)
    }

    async fn delete(&self, event_id: &EventId) -> Result<Event, EventError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "DELETE FROM events WHERE event_id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EventError::NotFound(event_id.clone()))?;

        Event::try_from(row)
    }

    async fn list(&self, query: &EventQuery) -> Result<Vec<Event>, EventError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE ($1::text IS NULL OR category = $1) \
             AND ($2::timestamptz IS NULL OR date_time >= $2) \
             AND ($3::timestamptz IS NULL OR date_time <= $3) \
             ORDER BY date_time ASC, event_id ASC"
        ))
        .bind(query.category.map(|c| c.as_str()))
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn count(&self) -> Result<u64, EventError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_ddl_per_kind() {
        let schema = EventSchema::get();
        let ddl: Vec<String> = schema
            .indexes
            .iter()
            .map(|spec| index_ddl(schema.collection, spec))
            .collect();
        assert_eq!(
            ddl,
            vec![
                "CREATE UNIQUE INDEX IF NOT EXISTS events_event_id_key ON events (event_id)",
                "CREATE INDEX IF NOT EXISTS events_category_idx ON events (category)",
                "CREATE INDEX IF NOT EXISTS events_date_time_idx ON events (date_time)",
            ]
        );
    }

    #[test]
    fn table_constraints_cover_domain_rules() {
        for fragment in [
            "reg_fees >= 0",
            "team >= 0",
            "team_limit >= 0",
            "latitude BETWEEN -90 AND 90",
            "longitude BETWEEN -180 AND 180",
            "(latitude IS NULL) = (longitude IS NULL)",
            "'technical', 'cultural', 'convenor'",
        ] {
            assert!(CREATE_TABLE.contains(fragment), "missing {fragment}");
        }
    }

    #[test]
    fn non_database_errors_stay_persistence_errors() {
        let Ok(id) = EventId::parse("x") else {
            return;
        };
        let err = map_write_error(sqlx::Error::RowNotFound, &id);
        assert!(matches!(err, EventError::Persistence(_)));
    }
}
