use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// User record store backed by Postgres.
///
/// Concurrency control is a `version` column: every update is guarded by
/// `WHERE id = .. AND version = ..` and bumps the version, so a record
/// modified between read and write fails the guarded update instead of
/// being silently overwritten.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    name: String,
    last_name: String,
    username: String,
    password_hash: String,
    email: String,
    phone_number: i64,
    version: i64,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            name: row.name,
            last_name: row.last_name,
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            email: EmailAddress::new(row.email)?,
            phone_number: row.phone_number,
            version: row.version,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, name, last_name, username, password_hash, email, phone_number, version
    FROM users
"#;

fn map_unique_violation(e: sqlx::Error, user: &User) -> UserError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_pkey") {
                return UserError::AlreadyExists(user.id.0);
            }
            if db_err.constraint() == Some("users_username_key") {
                return UserError::UsernameAlreadyExists(user.username.to_string());
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, last_name, username, password_hash, email, phone_number, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.0)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.email.as_str())
        .bind(user.phone_number)
        .bind(user.version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: User, expected_version: i64) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, last_name = $3, username = $4, password_hash = $5,
                email = $6, phone_number = $7, version = version + 1
            WHERE id = $1 AND version = $8
            "#,
        )
        .bind(user.id.0)
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.email.as_str())
        .bind(user.phone_number)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &user))?;

        if result.rows_affected() == 0 {
            // Either the record vanished or its version moved; probe to tell
            // the two apart.
            return match self.find_by_id(user.id).await? {
                Some(_) => Err(UserError::ConcurrentModification(user.id.0)),
                None => Err(UserError::NotFound(user.id.0)),
            };
        }

        Ok(User {
            version: expected_version + 1,
            ..user
        })
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.0));
        }

        Ok(())
    }
}
