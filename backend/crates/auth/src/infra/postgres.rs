//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{UserId, returned_id};
use kernel::pagination::{Page, PageRequest};
use kernel::rating::AverageRating;
use platform::password::HashedPassword;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::domain::entity::user::{
    NewUser, User, UserChanges, UserCredentials, UserFilter, UserSummary,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Columns shared by every user projection
const USER_COLUMNS: &str = r#"
    users.id,
    users.name,
    users.email,
    users.address,
    roles.name AS role,
    users.created_at,
    users.updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users JOIN roles ON users.role_id = roles.id WHERE users.id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> AuthResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {USER_COLUMNS}, users.password FROM users JOIN roles ON users.role_id = roles.id WHERE users.email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn find_credentials_by_id(&self, id: UserId) -> AuthResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {USER_COLUMNS}, users.password FROM users JOIN roles ON users.role_id = roles.id WHERE users.id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn role_id(&self, role: UserRole) -> AuthResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM roles WHERE name = $1")
            .bind(role.code())
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }

    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, address, role_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(user.address.as_str())
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(returned_id(&row)?)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                address = COALESCE($4, address),
                role_id = COALESCE($5, role_id),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.email.as_ref().map(|e| e.as_str()))
        .bind(changes.address.as_ref().map(|a| a.as_str()))
        .bind(changes.role_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, id: UserId, password: &HashedPassword) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.get())
            .bind(password.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> AuthResult<Page<UserSummary>> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT {USER_COLUMNS},
                CASE WHEN roles.name = 'STORE_OWNER' THEN (
                    SELECT COALESCE(AVG(r.rating_value), 0)::float8
                    FROM stores s
                    LEFT JOIN ratings r ON s.id = r.store_id
                    WHERE s.owner_id = users.id
                ) END AS ranking
            FROM users
            JOIN roles ON users.role_id = roles.id
            "#
        ));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY users.id LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));

        let rows = query
            .build_query_as::<SummaryRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(users.id) FROM users JOIN roles ON users.role_id = roles.id",
        );
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let items = rows
            .into_iter()
            .map(SummaryRow::into_summary)
            .collect::<AuthResult<Vec<_>>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn owns_store(&self, owner: UserId) -> AuthResult<bool> {
        let owns =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM stores WHERE owner_id = $1)")
                .bind(owner.get())
                .fetch_one(&self.pool)
                .await?;

        Ok(owns)
    }

    async fn owned_store_rating(&self, owner: UserId) -> AuthResult<AverageRating> {
        let avg = sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(r.rating_value)::float8
            FROM stores s
            LEFT JOIN ratings r ON s.id = r.store_id
            WHERE s.owner_id = $1
            "#,
        )
        .bind(owner.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(AverageRating::from_avg(avg))
    }

    async fn count(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Substring (case-insensitive) match on text fields, exact match on role
fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut sep = " WHERE ";
    for (column, value) in [
        ("users.name", &filter.name),
        ("users.email", &filter.email),
        ("users.address", &filter.address),
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
    if let Some(role) = filter.role {
        query.push(sep).push("roles.name = ").push_bind(role.code());
    }
}

// ============================================================================
// Row Types (for sqlx mapping)
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    address: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Unknown role: {}", self.role)))?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: Email::from_db(self.email),
            address: self.address.unwrap_or_default(),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<UserCredentials> {
        Ok(UserCredentials {
            user: self.user.into_user()?,
            password: HashedPassword::from_stored(self.password),
        })
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    #[sqlx(flatten)]
    user: UserRow,
    ranking: Option<f64>,
}

impl SummaryRow {
    fn into_summary(self) -> AuthResult<UserSummary> {
        let user = self.user.into_user()?;
        let ranking = match user.role {
            UserRole::StoreOwner => Some(AverageRating::from_avg(self.ranking)),
            UserRole::Admin | UserRole::User => None,
        };
        Ok(UserSummary { user, ranking })
    }
}
