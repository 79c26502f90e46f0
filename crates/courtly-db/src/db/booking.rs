//! Booking repository.
//!
//! Creation runs the availability re-check and the insert inside one
//! transaction; the `bookings_no_overlap` exclusion constraint is the
//! authoritative guard, so even two transactions that both pass the check
//! under read committed cannot both commit. Status transitions take a row
//! lock (`FOR UPDATE`) and compare-and-set so concurrent updates cannot be
//! lost.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courtly_core::models::{Booking, BookingFilter, BookingStatus, NewBooking, Page, Visibility};
use courtly_core::{AppError, BookingStore};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::map_db_err;
use super::transaction::TransactionGuard;

const BOOKING_COLUMNS: &str =
    "id, resource_id, user_id, start_time, end_time, status, created_at, updated_at";

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Overlap probe reusable both standalone and inside the creation
    /// transaction. Half-open semantics: `start < $end AND end > $start`.
    async fn conflict_exists<'e, E>(
        executor: E,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE resource_id = $1
                  AND status <> 'cancelled'
                  AND start_time < $3
                  AND end_time > $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .bind(exclude_booking_id)
        .fetch_one(executor)
        .await
        .map_err(map_db_err)
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "bookings", db.operation = "insert"))]
    async fn create_pending(&self, new: NewBooking) -> Result<Booking, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await.map_err(map_db_err)?;

        // Friendly-path re-check; the exclusion constraint below is what
        // actually closes the race.
        if Self::conflict_exists(
            &mut **tx,
            new.resource_id,
            new.start_time,
            new.end_time,
            None,
        )
        .await?
        {
            tx.rollback().await.map_err(map_db_err)?;
            return Err(AppError::Conflict(
                "interval overlaps an existing booking on this resource".to_string(),
            ));
        }

        let booking = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                id, resource_id, user_id, start_time, end_time, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', now(), now())
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.resource_id)
        .bind(new.user_id)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_err)?;

        tx.commit().await.map_err(map_db_err)?;
        Ok(booking)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<Postgres, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "select"))]
    async fn has_conflict(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        Self::conflict_exists(&self.pool, resource_id, start, end, exclude_booking_id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "bookings", db.operation = "update"))]
    async fn transition(
        &self,
        id: Uuid,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await.map_err(map_db_err)?;

        let current = sqlx::query_as::<Postgres, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_err)?;

        let current = match current {
            Some(b) => b,
            None => {
                tx.rollback().await.map_err(map_db_err)?;
                return Err(AppError::NotFound(format!("booking {} not found", id)));
            }
        };

        if !from.contains(&current.status) {
            tx.rollback().await.map_err(map_db_err)?;
            return Err(AppError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        let updated = sqlx::query_as::<Postgres, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(to)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_err)?;

        tx.commit().await.map_err(map_db_err)?;
        Ok(updated)
    }

    #[tracing::instrument(
        skip(self, filter, visibility),
        fields(db.table = "bookings", db.operation = "select")
    )]
    async fn list(
        &self,
        filter: &BookingFilter,
        visibility: &Visibility,
    ) -> Result<Page<Booking>, AppError> {
        // Shared filter predicate; $1..$5 are the optional filter binds.
        const FILTER_SQL: &str = r#"
              ($1::uuid IS NULL OR b.resource_id = $1)
              AND ($2::uuid IS NULL OR b.user_id = $2)
              AND ($3::timestamptz IS NULL OR b.end_time > $3)
              AND ($4::timestamptz IS NULL OR b.start_time < $4)
              AND ($5::booking_status IS NULL OR b.status = $5)
        "#;

        let (items, total) = match visibility {
            Visibility::All => {
                let list_sql = format!(
                    r#"
                    SELECT b.id, b.resource_id, b.user_id, b.start_time, b.end_time,
                           b.status, b.created_at, b.updated_at
                    FROM bookings b
                    WHERE {FILTER_SQL}
                    ORDER BY b.start_time DESC, b.id
                    LIMIT $6 OFFSET $7
                    "#
                );
                let count_sql = format!("SELECT COUNT(*) FROM bookings b WHERE {FILTER_SQL}");

                let items = sqlx::query_as::<Postgres, Booking>(&list_sql)
                    .bind(filter.resource_id)
                    .bind(filter.user_id)
                    .bind(filter.from)
                    .bind(filter.until)
                    .bind(filter.status)
                    .bind(filter.limit())
                    .bind(filter.offset())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_db_err)?;
                let total = sqlx::query_scalar::<Postgres, i64>(&count_sql)
                    .bind(filter.resource_id)
                    .bind(filter.user_id)
                    .bind(filter.from)
                    .bind(filter.until)
                    .bind(filter.status)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_err)?;
                (items, total)
            }
            Visibility::Scoped {
                user_id,
                org_ids,
                location_ids,
            } => {
                // Own bookings, plus everything under managed/owned
                // organizations and managed locations.
                let list_sql = format!(
                    r#"
                    SELECT b.id, b.resource_id, b.user_id, b.start_time, b.end_time,
                           b.status, b.created_at, b.updated_at
                    FROM bookings b
                    JOIN resources r ON r.id = b.resource_id
                    WHERE {FILTER_SQL}
                      AND (b.user_id = $6
                           OR r.organization_id = ANY($7)
                           OR r.location_id = ANY($8))
                    ORDER BY b.start_time DESC, b.id
                    LIMIT $9 OFFSET $10
                    "#
                );
                let count_sql = format!(
                    r#"
                    SELECT COUNT(*)
                    FROM bookings b
                    JOIN resources r ON r.id = b.resource_id
                    WHERE {FILTER_SQL}
                      AND (b.user_id = $6
                           OR r.organization_id = ANY($7)
                           OR r.location_id = ANY($8))
                    "#
                );

                let items = sqlx::query_as::<Postgres, Booking>(&list_sql)
                    .bind(filter.resource_id)
                    .bind(filter.user_id)
                    .bind(filter.from)
                    .bind(filter.until)
                    .bind(filter.status)
                    .bind(user_id)
                    .bind(org_ids)
                    .bind(location_ids)
                    .bind(filter.limit())
                    .bind(filter.offset())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_db_err)?;
                let total = sqlx::query_scalar::<Postgres, i64>(&count_sql)
                    .bind(filter.resource_id)
                    .bind(filter.user_id)
                    .bind(filter.from)
                    .bind(filter.until)
                    .bind(filter.status)
                    .bind(user_id)
                    .bind(org_ids)
                    .bind(location_ids)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_db_err)?;
                (items, total)
            }
        };

        Ok(Page {
            items,
            total,
            limit: filter.limit(),
            offset: filter.offset(),
        })
    }
}
