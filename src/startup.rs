use crate::api_doc::ApiDoc;
use crate::authentication::{require_admin, require_auth};
use crate::autosave::{AutoSaveRegistry, PgDraftStore};
use crate::configuration::{DatabaseSettings, Settings, SiteSettings, StorageSettings};
use crate::contact_relay::ContactRelayClient;
use crate::routes::{
    admin_autosave_post, admin_create_post, admin_dashboard, admin_delete_post,
    admin_export_csv, admin_get_all_posts, admin_get_post_by_id, admin_grant_admin,
    admin_list_users, admin_preview, admin_revoke_admin, admin_seo_check, admin_suggest_slug,
    admin_update_post, admin_upload_image, auth_state, blog_index, blog_post_page,
    confirm_delete_post, datenschutz, delete_post_and_redirect, edit_post_editor,
    get_post_by_slug, get_published_posts, health_check, home, impressum, initial_admin,
    log_out, login, login_form, new_post_editor, not_found, signin, signout, signup,
    submit_contact_request,
};
use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_redis_store::{RedisStore, fred::prelude::*};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room for the multipart framing around an image of the maximum size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn get_connection_pool(db_configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(db_configuration.connect_options())
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub relay_client: ContactRelayClient,
    /// Where the plain HTML contact form posts to
    pub form_action: String,
    pub site: SiteSettings,
    pub storage: StorageSettings,
    pub autosave: Arc<AutoSaveRegistry>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let autosave = AutoSaveRegistry::new(
            Arc::new(PgDraftStore::new(connection_pool.clone())),
            configuration.site.autosave_debounce(),
        );
        let app_state = AppState {
            db: connection_pool,
            form_action: configuration.contact_relay.form_action(),
            relay_client: configuration.contact_relay.clone().client(),
            site: configuration.site.clone(),
            storage: configuration.storage.clone(),
            autosave: Arc::new(autosave),
        };

        let secure_cookies = configuration.application.base_url.starts_with("https://");
        let session_layer = session_layer(&configuration, secure_cookies).await?;
        let router = router(app_state).layer(session_layer);

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();
        tracing::info!(%address, port, "Listening");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        let listener = tokio::net::TcpListener::from_std(self.listener)?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Sessions live in Redis (or Valkey) and expire after an hour of inactivity.
async fn session_layer(
    configuration: &Settings,
    secure_cookies: bool,
) -> Result<SessionManagerLayer<RedisStore<Pool>>, anyhow::Error> {
    let redis_config = Config::from_url(configuration.redis_uri.expose_secret())
        .context("Invalid Redis URI.")?;
    let pool = Pool::new(redis_config, None, None, None, 6)
        .context("Failed to create the Redis pool.")?;
    let redis_conn = pool.connect();
    pool.wait_for_connect()
        .await
        .context("Failed to connect to Redis.")?;
    // The connection task ends when the pool is dropped.
    tokio::spawn(async move {
        let _ = redis_conn.await;
    });

    Ok(SessionManagerLayer::new(RedisStore::new(pool))
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(1),
        )))
}

fn router(state: AppState) -> Router {
    let upload_limit = state.storage.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    let admin_only = ServiceBuilder::new()
        .layer(from_fn(require_auth))
        .layer(from_fn(require_admin));

    let admin_api = Router::new()
        .route(
            "/blog/posts",
            get(admin_get_all_posts).post(admin_create_post),
        )
        .route(
            "/blog/posts/{id}",
            get(admin_get_post_by_id)
                .put(admin_update_post)
                .delete(admin_delete_post),
        )
        .route("/blog/posts/{id}/autosave", put(admin_autosave_post))
        .route("/blog/slug", get(admin_suggest_slug))
        .route("/blog/seo-check", post(admin_seo_check))
        .route("/blog/preview", post(admin_preview))
        .route(
            "/blog/images",
            post(admin_upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/blog/export.csv", get(admin_export_csv))
        .route("/users", get(admin_list_users))
        .route(
            "/users/{id}/admin",
            post(admin_grant_admin).delete(admin_revoke_admin),
        )
        .route_layer(admin_only);

    let admin_pages = Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/editor", get(new_post_editor))
        .route("/editor/{id}", get(edit_post_editor))
        .route(
            "/posts/{id}/delete",
            get(confirm_delete_post).post(delete_post_and_redirect),
        )
        .route_layer(from_fn(require_admin))
        .route("/logout", post(log_out))
        .route_layer(from_fn(require_auth))
        .route("/login", get(login_form).post(login));

    let upload_dir = state.storage.upload_dir.clone();
    let uploads_path = state.storage.public_path.clone();

    Router::new()
        .route("/", get(home))
        .route("/impressum", get(impressum))
        .route("/datenschutz", get(datenschutz))
        .route("/blog", get(blog_index))
        .route("/blog/{slug}", get(blog_post_page))
        .route("/health_check", get(health_check))
        .route("/api/blog/posts", get(get_published_posts))
        .route("/api/blog/posts/{slug}", get(get_post_by_slug))
        .route("/api/auth/session", get(auth_state))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/signin", post(signin))
        .route("/api/auth/signout", post(signout))
        .route("/api/contact", post(submit_contact_request))
        .route("/api/initial_admin", post(initial_admin))
        .nest("/api/admin", admin_api)
        .nest("/admin", admin_pages)
        .nest_service(&uploads_path, ServeDir::new(upload_dir))
        .fallback(not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error.cause_chain = ?e, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
