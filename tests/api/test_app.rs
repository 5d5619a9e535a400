use crate::helpers::{TRACING, configure_database, isolated_redis_uri};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version, password_hash::SaltString};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use uuid::Uuid;
use westermann_site::configuration::{Settings, get_configuration};
use westermann_site::startup::Application;
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db_connection_pool: PgPool,
    /// Stands in for the contact form relay
    pub relay_server: MockServer,
    pub upload_dir: PathBuf,
    pub api_client: reqwest::Client,
}

#[derive(Debug)]
pub struct TestUser {
    pub user_id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub is_admin: bool,
}

impl TestUser {
    pub fn generate(is_admin: bool) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            email: format!("{}@example.de", Uuid::new_v4()),
            password: Uuid::new_v4().to_string(),
            full_name: "Hennes Westermann".to_string(),
            is_admin,
        }
    }

    pub async fn store(&self, pool: &PgPool) {
        let salt = SaltString::generate(&mut rand::thread_rng());
        // Match parameters of the default password
        let password_hash = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(15000, 2, 1, None).unwrap(),
        )
        .hash_password(self.password.as_bytes(), &salt)
        .unwrap()
        .to_string();
        sqlx::query("INSERT INTO users (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(self.user_id)
            .bind(&self.email)
            .bind(password_hash)
            .execute(pool)
            .await
            .expect("Failed to store test user.");
        sqlx::query("INSERT INTO profiles (id, email, full_name) VALUES ($1, $2, $3)")
            .bind(self.user_id)
            .bind(&self.email)
            .bind(&self.full_name)
            .execute(pool)
            .await
            .expect("Failed to store test profile.");
        if self.is_admin {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, 'admin')")
                .bind(self.user_id)
                .execute(pool)
                .await
                .expect("Failed to grant the admin role.");
        }
    }
}

pub struct TestAppContainerWithUser {
    pub app: TestApp,
    pub test_user: TestUser,
}

impl TestAppContainerWithUser {
    pub async fn login(self) -> Self {
        let response = self
            .app
            .post_signin(&serde_json::json!({
                "email": self.test_user.email,
                "password": self.test_user.password
            }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response
            .json()
            .await
            .expect("Failed to parse sign-in response");
        assert!(body["success"].as_bool().unwrap());
        self
    }
}

impl TestApp {
    pub async fn get_page(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_page_html(&self, path: &str) -> String {
        self.get_page(path).await.text().await.unwrap()
    }

    pub async fn post_form<Body>(&self, path: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .form(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json<Body>(&self, path: &str, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_signin<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.post_json("/api/auth/signin", body).await
    }

    pub async fn post_signup<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.post_json("/api/auth/signup", body).await
    }

    pub async fn post_signout(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/auth/signout", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_auth_state(&self) -> serde_json::Value {
        self.get_page("/api/auth/session")
            .await
            .json()
            .await
            .expect("Failed to parse auth state")
    }

    // Blog public endpoints
    pub async fn get_published_posts(&self, query: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/blog/posts", &self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/blog/posts/{}", &self.address, slug))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    // Blog admin endpoints
    pub async fn admin_get_all_posts(&self) -> reqwest::Response {
        self.get_page("/api/admin/blog/posts").await
    }

    pub async fn admin_get_post_by_id(&self, post_id: Uuid) -> reqwest::Response {
        self.get_page(&format!("/api/admin/blog/posts/{}", post_id))
            .await
    }

    pub async fn admin_create_post<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.post_json("/api/admin/blog/posts", body).await
    }

    pub async fn admin_update_post<Body>(&self, post_id: Uuid, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .put(format!(
                "{}/api/admin/blog/posts/{}",
                &self.address, post_id
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_autosave_post<Body>(&self, post_id: Uuid, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.api_client
            .put(format!(
                "{}/api/admin/blog/posts/{}/autosave",
                &self.address, post_id
            ))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_delete_post(&self, post_id: Uuid) -> reqwest::Response {
        self.api_client
            .delete(format!(
                "{}/api/admin/blog/posts/{}",
                &self.address, post_id
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_upload_image(
        &self,
        file_name: &str,
        mime: &str,
        data: Vec<u8>,
    ) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .unwrap();
        self.api_client
            .post(format!("{}/api/admin/blog/images", &self.address))
            .multipart(reqwest::multipart::Form::new().part("file", part))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    // User management
    pub async fn admin_list_users(&self) -> reqwest::Response {
        self.get_page("/api/admin/users").await
    }

    pub async fn admin_grant_admin(&self, user_id: Uuid) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/admin/users/{}/admin", &self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_revoke_admin(&self, user_id: Uuid) -> reqwest::Response {
        self.api_client
            .delete(format!("{}/api/admin/users/{}/admin", &self.address, user_id))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn is_admin_in_db(&self, user_id: Uuid) -> bool {
        let (is_admin,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = 'admin')",
        )
        .bind(user_id)
        .fetch_one(&self.db_connection_pool)
        .await
        .unwrap();
        is_admin
    }

    pub async fn make_container_with_user(self, is_admin: bool) -> TestAppContainerWithUser {
        let test_user = TestUser::generate(is_admin);
        test_user.store(&self.db_connection_pool).await;
        TestAppContainerWithUser {
            app: self,
            test_user,
        }
    }
}

pub async fn spawn_app(test_name: impl AsRef<str>) -> TestApp {
    spawn_app_with(test_name, |_| {}).await
}

/// Like `spawn_app`, with a hook to adjust the configuration first.
#[tracing::instrument(name = "Spawning test application", skip_all)]
pub async fn spawn_app_with(
    test_name: impl AsRef<str>,
    customise: impl FnOnce(&mut Settings),
) -> TestApp {
    let test_name = test_name.as_ref();
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let relay_server = MockServer::start().await;
    let upload_dir = std::env::temp_dir().join(format!("westermann-uploads-{}", Uuid::new_v4()));

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.database.database_name = format!("test-{}", test_name);
        c.application.port = 0;
        c.contact_relay.base_url = relay_server.uri();
        c.storage.upload_dir = upload_dir.clone();
        c.redis_uri = secrecy::Secret::new(isolated_redis_uri(&c.redis_uri, test_name));
        customise(&mut c);
        c
    };

    let db_connection_pool = configure_database(&configuration.database).await;

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let address = format!("http://127.0.0.1:{}", port);

    #[allow(clippy::let_underscore_future)]
    let _ = tokio::spawn(application.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap();

    TestApp {
        address,
        port,
        db_connection_pool,
        relay_server,
        upload_dir,
        api_client,
    }
}

pub async fn spawn_app_container_with_user(
    test_name: impl AsRef<str>,
    is_admin: bool,
) -> TestAppContainerWithUser {
    spawn_app(test_name)
        .await
        .make_container_with_user(is_admin)
        .await
}

/// An app with a signed-in admin.
pub async fn spawn_admin_app(test_name: impl AsRef<str>) -> TestAppContainerWithUser {
    spawn_app_container_with_user(test_name, true)
        .await
        .login()
        .await
}
