use crate::domain::Role;
use crate::telemetry::spawn_blocking_with_tracing;
use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateUserError {
    #[error("Ein Konto mit dieser E-Mail-Adresse existiert bereits.")]
    EmailTaken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

pub struct NewAccount {
    pub email: String,
    pub password: Secret<String>,
    pub full_name: Option<String>,
}

/// Emails are compared case-insensitively and stored lowercase.
pub fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[tracing::instrument(name = "Validate credentials", skip(credentials, pool))]
pub async fn validate_credentials(
    credentials: Credentials,
    pool: &PgPool,
) -> Result<Uuid, AuthError> {
    let mut user_id = None;
    // Unknown emails still pay for a full verification.
    let mut expected_password_hash = Secret::new(
        "$argon2id$v=19$m=15000,t=2,p=1$\
        gZiV/M1gPc22ElAH/Jh1Hw$\
        CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno"
            .to_string(),
    );

    if let Some((stored_user_id, stored_password_hash)) =
        get_stored_credentials(&normalise_email(&credentials.email), pool).await?
    {
        user_id = Some(stored_user_id);
        expected_password_hash = stored_password_hash;
    }

    spawn_blocking_with_tracing(move || {
        verify_password_hash(expected_password_hash, credentials.password)
    })
    .await
    .context("Failed to spawn blocking task.")??;

    user_id
        .ok_or_else(|| anyhow::anyhow!("Unknown email."))
        .map_err(AuthError::InvalidCredentials)
}

#[tracing::instrument(name = "Get stored credentials", skip(email, pool))]
async fn get_stored_credentials(
    email: &str,
    pool: &PgPool,
) -> Result<Option<(Uuid, Secret<String>)>, anyhow::Error> {
    let row: Option<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT user_id, password_hash
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to perform a query to retrieve stored credentials.")?;
    Ok(row.map(|(user_id, hash)| (user_id, Secret::new(hash))))
}

#[tracing::instrument(name = "Check if users exist", skip(pool))]
pub async fn check_users_exist(pool: &PgPool) -> Result<bool, anyhow::Error> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users)")
        .fetch_one(pool)
        .await
        .context("Failed to check if users exist.")?;
    Ok(exists)
}

/// Creates the login identity and its profile in one transaction.
#[tracing::instrument(name = "Sign up", skip(account, pool), fields(email = %account.email))]
pub async fn sign_up(account: NewAccount, pool: &PgPool) -> Result<Uuid, CreateUserError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let user_id = insert_account(&mut transaction, account).await?;
    transaction
        .commit()
        .await
        .context("Failed to commit the new account.")?;
    Ok(user_id)
}

/// Bootstraps the very first account with the admin role. Returns `None`
/// when any user already exists.
#[tracing::instrument(name = "Create initial admin", skip(account, pool), fields(email = %account.email))]
pub async fn create_initial_admin(
    account: NewAccount,
    pool: &PgPool,
) -> Result<Option<Uuid>, CreateUserError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    // Serialises concurrent bootstrap attempts.
    sqlx::query("LOCK TABLE users IN EXCLUSIVE MODE")
        .execute(&mut *transaction)
        .await
        .context("Failed to lock the users table.")?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users)")
        .fetch_one(&mut *transaction)
        .await
        .context("Failed to check if users exist.")?;
    if exists {
        return Ok(None);
    }

    let user_id = insert_account(&mut transaction, account).await?;
    sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
        .bind(user_id)
        .bind(Role::Admin.as_str())
        .execute(&mut *transaction)
        .await
        .context("Failed to grant the admin role.")?;
    transaction
        .commit()
        .await
        .context("Failed to commit the initial admin.")?;
    Ok(Some(user_id))
}

async fn insert_account(
    transaction: &mut Transaction<'_, Postgres>,
    account: NewAccount,
) -> Result<Uuid, CreateUserError> {
    let user_id = Uuid::new_v4();
    let email = normalise_email(&account.email);
    let password = account.password;
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking task.")?
        .context("Failed to hash password")?;

    sqlx::query(
        r#"
        INSERT INTO users (user_id, email, password_hash)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(password_hash.expose_secret())
    .execute(&mut **transaction)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => CreateUserError::EmailTaken,
        e => CreateUserError::UnexpectedError(
            anyhow::Error::new(e).context("Failed to insert the new user."),
        ),
    })?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, full_name)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(account.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()))
    .execute(&mut **transaction)
    .await
    .context("Failed to insert the user profile.")?;

    Ok(user_id)
}

fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = Params::new(15000, 2, 1, None)
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {}", e))?;
    let password_hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(Secret::new(password_hash))
}

#[tracing::instrument(
    name = "Verify password hash",
    skip(expected_password_hash, password_candidate)
)]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .map_err(|e| anyhow::anyhow!("Failed to parse hash in PHC string format: {}", e))?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .map_err(|e| AuthError::InvalidCredentials(anyhow::anyhow!("Invalid password: {}", e)))
}
