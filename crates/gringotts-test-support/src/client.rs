//! In-process HTTP client fixture.
//!
//! Construction is the setup phase: a fresh database is provisioned, the
//! schema reset, the seed hook applied, and the application router built over
//! a private pool. Requests are driven through the router in-process, no
//! listener involved. [`TestApp::teardown`] releases pooled connections, the
//! scoped-release half of the fixture lifecycle.

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use gringotts_api::ApiState;
use gringotts_data::{connect_pool, dispose, reset_schema, seed};

use crate::fixtures::seed_requested;
use crate::postgres::{self, TestDatabase};

/// Base URL prepended to request paths; requests never leave the process.
pub const BASE_URL: &str = "http://testserver";

/// Status and decoded JSON body of an in-process response.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Decoded body; `Null` when the body was empty.
    pub body: Value,
}

/// HTTP test client bound to the in-process application router.
pub struct TestApp {
    db: Option<TestDatabase>,
    pool: PgPool,
    router: Router,
}

impl TestApp {
    /// Provision a database, reset the schema, and bind a client to the app.
    ///
    /// Loads the fixture rows first when the seed hook is on.
    ///
    /// # Errors
    ///
    /// Returns an error when database provisioning, schema reset, or seeding
    /// fails; any such failure aborts test setup.
    pub async fn launch() -> Result<Self> {
        let db = postgres::provision().await?;
        let pool = connect_pool(db.connection_string())
            .await
            .context("failed to connect test pool")?;
        let app = Self::over_pool(pool).await?;
        Ok(Self {
            db: Some(db),
            ..app
        })
    }

    /// Bind a client to the app over an existing pool.
    ///
    /// The schema is reset as setup; the pool is still closed at teardown.
    ///
    /// # Errors
    ///
    /// Returns an error when schema reset or seeding fails.
    pub async fn over_pool(pool: PgPool) -> Result<Self> {
        reset_schema(&pool).await.context("schema reset failed")?;
        if seed_requested() {
            seed::seed(&pool).await.context("seeding failed")?;
        }
        let router = gringotts_api::router(ApiState::new(pool.clone()));
        Ok(Self {
            db: None,
            pool,
            router,
        })
    }

    /// The pool backing this fixture, for direct database assertions.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Issue a GET request against the in-process router.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or the body is not
    /// valid JSON.
    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        self.request(Method::GET, path, Body::empty()).await
    }

    /// Issue a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be built or the body is not
    /// valid JSON.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<TestResponse> {
        let payload = serde_json::to_vec(body).context("failed to encode request body")?;
        self.request(Method::POST, path, Body::from(payload)).await
    }

    /// Close pooled connections and drop the fixture database.
    ///
    /// # Errors
    ///
    /// Returns an error when the fixture database cannot be dropped.
    pub async fn teardown(self) -> Result<()> {
        dispose(&self.pool).await;
        if let Some(db) = self.db {
            db.close().await?;
        }
        Ok(())
    }

    async fn request(&self, method: Method, path: &str, body: Body) -> Result<TestResponse> {
        let request = Request::builder()
            .method(method)
            .uri(format!("{BASE_URL}{path}"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .context("failed to build request")?;
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|err| anyhow!("router call failed: {err}"))?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read response body")?;
        // Non-JSON bodies (framework rejections) surface as plain strings.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse { status, body })
    }
}
