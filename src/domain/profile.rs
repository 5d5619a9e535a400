use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Author data safe for anonymous readers. Never carries an email.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct PublicProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Admin-only view of a user, including whether they hold the admin role.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserOverview {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_admin: bool,
}
