use crate::domain::CapabilitySet;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use tower_sessions::Session;
use uuid::Uuid;

/// The signed-in user as remembered by the session store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: String,
    pub capabilities: CapabilitySet,
}

pub struct TypedSession(pub Session);

impl TypedSession {
    const USER_KEY: &'static str = "user";

    /// Starts an authenticated session. The session id is cycled first so a
    /// pre-login id can never be reused.
    pub async fn insert_user(
        &self,
        user_id: Uuid,
        email: String,
        capabilities: CapabilitySet,
    ) -> Result<(), tower_sessions::session::Error> {
        self.0.cycle_id().await?;
        self.0
            .insert(
                Self::USER_KEY,
                SessionUser {
                    user_id,
                    email,
                    capabilities,
                },
            )
            .await
    }

    pub async fn get_user(&self) -> Result<Option<SessionUser>, tower_sessions::session::Error> {
        self.0.get(Self::USER_KEY).await
    }

    pub async fn get_user_id(&self) -> Result<Option<Uuid>, tower_sessions::session::Error> {
        Ok(self.get_user().await?.map(|user| user.user_id))
    }

    /// Forgets the user but keeps the session alive for flash messages.
    pub async fn log_out(&self) -> Result<(), tower_sessions::session::Error> {
        self.0.remove::<SessionUser>(Self::USER_KEY).await?;
        self.0.cycle_id().await
    }
}

impl<S> FromRequestParts<S> for TypedSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
            .clone();
        Ok(TypedSession(session))
    }
}
