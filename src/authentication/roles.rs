use crate::domain::{Role, UserOverview};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Fetch user roles", skip(pool))]
pub async fn fetch_roles(pool: &PgPool, user_id: Uuid) -> Result<Vec<Role>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter()
        .map(|(role,)| Role::try_from(role).map_err(|e| sqlx::Error::Decode(e.into())))
        .collect()
}

/// Granting twice is a no-op. Returns `false` if the user does not exist.
#[tracing::instrument(name = "Grant admin role", skip(pool))]
pub async fn grant_admin(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role)
        SELECT user_id, $2 FROM users WHERE user_id = $1
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(Role::Admin.as_str())
    .execute(pool)
    .await?;
    if result.rows_affected() > 0 {
        return Ok(true);
    }
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

#[tracing::instrument(name = "Revoke admin role", skip(pool))]
pub async fn revoke_admin(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role = $2")
        .bind(user_id)
        .bind(Role::Admin.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

#[tracing::instrument(name = "List users with roles", skip(pool))]
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserOverview>, sqlx::Error> {
    sqlx::query_as::<_, UserOverview>(
        r#"
        SELECT
            u.user_id AS id,
            u.email,
            p.full_name,
            u.created_at,
            EXISTS (
                SELECT 1 FROM user_roles r
                WHERE r.user_id = u.user_id AND r.role = 'admin'
            ) AS is_admin
        FROM users u
        LEFT JOIN profiles p ON p.id = u.user_id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
