use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewUser, UpdateUserRequest, UserModel};
use crate::repository::UserRepository;

use super::{constraint_error, PgStore};

const USER_COLUMNS: &str =
    "id, user_name, email, password_hash, first_name, last_name, phone, created_at";

const DUPLICATE_EMAIL: &str = "User with this email already exists";

#[async_trait]
impl UserRepository for PgStore {
    async fn list(&self) -> AppResult<Vec<UserModel>> {
        let users = sqlx::query_as(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get(&self, id: i32) -> AppResult<Option<UserModel>> {
        let user = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>> {
        let user = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> AppResult<UserModel> {
        sqlx::query_as(&format!(
            "INSERT INTO users (user_name, email, password_hash, first_name, last_name, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| constraint_error(e, DUPLICATE_EMAIL, "Invalid reference"))
    }

    async fn update(&self, id: i32, changes: &UpdateUserRequest) -> AppResult<Option<UserModel>> {
        sqlx::query_as(&format!(
            "UPDATE users SET user_name = $1, email = $2, first_name = $3, last_name = $4, phone = $5 \
             WHERE id = $6 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&changes.user_name)
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.phone)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| constraint_error(e, DUPLICATE_EMAIL, "Invalid reference"))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
