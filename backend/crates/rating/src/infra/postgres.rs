//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{RatingId, StoreId, UserId, returned_id};
use kernel::pagination::{Page, PageRequest};
use kernel::rating::AverageRating;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::entity::rating::{
    Rating, RatingDetail, RatingFilter, RatingListItem, SubmitOutcome,
};
use crate::domain::entity::store::{NewStore, Rater, StoreChanges, StoreFilter, StoreSummary};
use crate::domain::repository::{RatingRepository, StoreRepository};
use crate::domain::value_object::rating_value::RatingValue;
use crate::error::{RatingError, RatingResult};

/// Store columns plus the rating aggregate; callers append filters and
/// the `GROUP BY`
const STORE_SELECT: &str = r#"
    SELECT
        stores.id,
        stores.name,
        stores.email,
        stores.address,
        stores.owner_id,
        AVG(r.rating_value)::float8 AS average_rating,
        COUNT(DISTINCT r.id) AS rating_count
    FROM stores
    LEFT JOIN ratings r ON stores.id = r.store_id
"#;

const RATING_COLUMNS: &str = r#"
    ratings.id,
    ratings.user_id,
    ratings.store_id,
    ratings.rating_value,
    ratings.created_at,
    ratings.updated_at
"#;

/// PostgreSQL-backed store and rating repository
#[derive(Clone)]
pub struct PgRatingRepository {
    pool: PgPool,
}

impl PgRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_page(query: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    query
        .push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
}

// ============================================================================
// Store Repository Implementation
// ============================================================================

impl StoreRepository for PgRatingRepository {
    async fn list(
        &self,
        filter: &StoreFilter,
        page: PageRequest,
    ) -> RatingResult<Page<StoreSummary>> {
        let mut query = QueryBuilder::<Postgres>::new(STORE_SELECT);
        push_store_filters(&mut query, filter);
        query.push(" GROUP BY stores.id ORDER BY stores.id");
        push_page(&mut query, page);

        let rows = query
            .build_query_as::<StoreRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM stores");
        push_store_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let items = rows.into_iter().map(StoreRow::into_summary).collect();
        Ok(Page::new(items, page, total))
    }

    async fn find_by_id(&self, id: StoreId) -> RatingResult<Option<StoreSummary>> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "{STORE_SELECT} WHERE stores.id = $1 GROUP BY stores.id"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoreRow::into_summary))
    }

    async fn find_by_owner(&self, owner: UserId) -> RatingResult<Option<StoreSummary>> {
        let row = sqlx::query_as::<_, StoreRow>(&format!(
            "{STORE_SELECT} WHERE stores.owner_id = $1 GROUP BY stores.id ORDER BY stores.id LIMIT 1"
        ))
        .bind(owner.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoreRow::into_summary))
    }

    async fn create(&self, store: &NewStore) -> RatingResult<StoreId> {
        let row = sqlx::query(
            r#"
            INSERT INTO stores (name, email, address, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(store.name.as_str())
        .bind(store.email.as_str())
        .bind(store.address.as_str())
        .bind(store.owner_id.map(UserId::get))
        .fetch_one(&self.pool)
        .await?;

        Ok(returned_id(&row)?)
    }

    async fn update(&self, id: StoreId, changes: &StoreChanges) -> RatingResult<()> {
        sqlx::query(
            r#"
            UPDATE stores SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                address = COALESCE($4, address),
                owner_id = CASE WHEN $5::bool THEN $6::int4 ELSE owner_id END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.email.as_ref().map(|e| e.as_str()))
        .bind(changes.address.as_ref().map(|a| a.as_str()))
        .bind(changes.owner.is_some())
        .bind(changes.owner.flatten().map(UserId::get))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: StoreId) -> RatingResult<bool> {
        let deleted = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn raters(&self, store: StoreId, page: PageRequest) -> RatingResult<Page<Rater>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                u.id,
                u.name,
                u.email,
                u.address,
                r.rating_value,
                r.created_at,
                r.updated_at
            FROM ratings r
            JOIN users u ON r.user_id = u.id
            WHERE r.store_id = "#,
        );
        query.push_bind(store.get()).push(" ORDER BY r.id");
        push_page(&mut query, page);

        let rows = query
            .build_query_as::<RaterRow>()
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings WHERE store_id = $1")
            .bind(store.get())
            .fetch_one(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(RaterRow::into_rater)
            .collect::<RatingResult<Vec<_>>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn count_stores(&self) -> RatingResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// ============================================================================
// Rating Repository Implementation
// ============================================================================

impl RatingRepository for PgRatingRepository {
    async fn upsert(
        &self,
        user: UserId,
        store: StoreId,
        value: RatingValue,
    ) -> RatingResult<(RatingId, SubmitOutcome)> {
        // xmax is 0 only for a freshly inserted tuple
        let row = sqlx::query(
            r#"
            INSERT INTO ratings (user_id, store_id, rating_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, store_id) DO UPDATE SET
                rating_value = EXCLUDED.rating_value,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS inserted
            "#,
        )
        .bind(user.get())
        .bind(store.get())
        .bind(value.into_db())
        .fetch_one(&self.pool)
        .await?;

        let id = returned_id(&row)?;
        let inserted: bool = row.try_get("inserted")?;

        Ok((id, SubmitOutcome::from_inserted(inserted)))
    }

    async fn find_detail(&self, id: RatingId) -> RatingResult<Option<RatingDetail>> {
        let row = sqlx::query_as::<_, DetailRow>(&format!(
            r#"
            SELECT {RATING_COLUMNS},
                users.name AS user_name,
                stores.name AS store_name
            FROM ratings
            JOIN users ON ratings.user_id = users.id
            JOIN stores ON ratings.store_id = stores.id
            WHERE ratings.id = $1
            "#
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DetailRow::into_detail).transpose()
    }

    async fn find_by_user_and_store(
        &self,
        user: UserId,
        store: StoreId,
    ) -> RatingResult<Option<Rating>> {
        let row = sqlx::query_as::<_, RatingRow>(&format!(
            "SELECT {RATING_COLUMNS} FROM ratings WHERE ratings.user_id = $1 AND ratings.store_id = $2"
        ))
        .bind(user.get())
        .bind(store.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(RatingRow::into_rating).transpose()
    }

    async fn ratings_by_user(
        &self,
        user: UserId,
        stores: &[StoreId],
    ) -> RatingResult<Vec<(StoreId, RatingValue)>> {
        let ids: Vec<i32> = stores.iter().map(|s| s.get()).collect();

        let rows = sqlx::query_as::<_, (i32, i16)>(
            "SELECT store_id, rating_value FROM ratings WHERE user_id = $1 AND store_id = ANY($2)",
        )
        .bind(user.get())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(store, value)| Ok((StoreId::new(store), stored_value(value)?)))
            .collect()
    }

    async fn search(
        &self,
        filter: &RatingFilter,
        page: PageRequest,
    ) -> RatingResult<Page<RatingListItem>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                ratings.id,
                ratings.rating_value,
                ratings.created_at,
                ratings.updated_at,
                users.name AS user_name,
                users.email AS user_email,
                stores.name AS store_name
            FROM ratings
            JOIN users ON ratings.user_id = users.id
            JOIN stores ON ratings.store_id = stores.id
            "#,
        );
        push_rating_filters(&mut query, filter);
        query.push(" ORDER BY ratings.id");
        push_page(&mut query, page);

        let rows = query
            .build_query_as::<ListRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ratings");
        push_rating_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let items = rows
            .into_iter()
            .map(ListRow::into_item)
            .collect::<RatingResult<Vec<_>>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn count_ratings(&self) -> RatingResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ratings")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Case-insensitive substring match on every supplied text field
fn push_store_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &StoreFilter) {
    let mut sep = " WHERE ";
    for (column, value) in [
        ("stores.name", &filter.name),
        ("stores.email", &filter.email),
        ("stores.address", &filter.address),
    ] {
        if let Some(value) = value {
            query
                .push(sep)
                .push(column)
                .push(" ILIKE ")
                .push_bind(format!("%{value}%"));
            sep = " AND ";
        }
    }
}

/// Exact ids, inclusive value bounds
fn push_rating_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &RatingFilter) {
    let mut sep = " WHERE ";
    if let Some(user) = filter.user_id {
        query.push(sep).push("ratings.user_id = ").push_bind(user.get());
        sep = " AND ";
    }
    if let Some(store) = filter.store_id {
        query.push(sep).push("ratings.store_id = ").push_bind(store.get());
        sep = " AND ";
    }
    if let Some(min) = filter.min_rating {
        query.push(sep).push("ratings.rating_value >= ").push_bind(min.into_db());
        sep = " AND ";
    }
    if let Some(max) = filter.max_rating {
        query.push(sep).push("ratings.rating_value <= ").push_bind(max.into_db());
    }
}

fn stored_value(value: i16) -> RatingResult<RatingValue> {
    RatingValue::from_db(value)
        .map_err(|_| RatingError::Internal(format!("Out-of-range rating value: {value}")))
}

// ============================================================================
// Row Types (for sqlx mapping)
// ============================================================================

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: i32,
    name: String,
    email: String,
    address: String,
    owner_id: Option<i32>,
    average_rating: Option<f64>,
    rating_count: i64,
}

impl StoreRow {
    fn into_summary(self) -> StoreSummary {
        StoreSummary {
            id: StoreId::new(self.id),
            name: self.name,
            email: self.email,
            address: self.address,
            owner_id: self.owner_id.map(UserId::new),
            average_rating: AverageRating::from_avg(self.average_rating),
            rating_count: self.rating_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RatingRow {
    id: i32,
    user_id: i32,
    store_id: i32,
    rating_value: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RatingRow {
    fn into_rating(self) -> RatingResult<Rating> {
        Ok(Rating {
            id: RatingId::new(self.id),
            user_id: UserId::new(self.user_id),
            store_id: StoreId::new(self.store_id),
            rating_value: stored_value(self.rating_value)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DetailRow {
    #[sqlx(flatten)]
    rating: RatingRow,
    user_name: String,
    store_name: String,
}

impl DetailRow {
    fn into_detail(self) -> RatingResult<RatingDetail> {
        let rating = self.rating.into_rating()?;
        Ok(RatingDetail {
            id: rating.id,
            rating_value: rating.rating_value,
            created_at: rating.created_at,
            updated_at: rating.updated_at,
            user_id: rating.user_id,
            store_id: rating.store_id,
            user_name: self.user_name,
            store_name: self.store_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListRow {
    id: i32,
    rating_value: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_name: String,
    user_email: String,
    store_name: String,
}

impl ListRow {
    fn into_item(self) -> RatingResult<RatingListItem> {
        Ok(RatingListItem {
            id: RatingId::new(self.id),
            rating_value: stored_value(self.rating_value)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_name: self.user_name,
            user_email: self.user_email,
            store_name: self.store_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RaterRow {
    id: i32,
    name: String,
    email: String,
    address: Option<String>,
    rating_value: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RaterRow {
    fn into_rater(self) -> RatingResult<Rater> {
        Ok(Rater {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            address: self.address.unwrap_or_default(),
            rating_value: stored_value(self.rating_value)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
