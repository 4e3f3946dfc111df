//! Postgres-backed harness for the production corpus store.
//!
//! One container is started on first use and shared by every test in the
//! binary. Each test gets its own freshly migrated database inside it, since
//! the store's queries scan the whole `words` table.
//!
//! Set `TEST_DATABASE_URL` to an admin connection string to use an existing
//! server instead of a container.

use anyhow::{Context, Result};
use annotator_core::domains::corpus::PostgresCorpusStore;
use sqlx::PgPool;
use std::sync::atomic::{AtomicUsize, Ordering};
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

static NEXT_DATABASE: AtomicUsize = AtomicUsize::new(0);

struct SharedPostgres {
    admin_url: String,
    // Keep the container alive for the entire test run
    _container: Option<ContainerAsync<Postgres>>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        if let Ok(admin_url) = std::env::var("TEST_DATABASE_URL") {
            return Ok(Self {
                admin_url,
                _container: None,
            });
        }

        let container = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;

        Ok(Self {
            admin_url: format!("postgresql://postgres:postgres@{}:{}/postgres", host, port),
            _container: Some(container),
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres")
            })
            .await
    }

    /// Create an empty database and return its connection string.
    async fn create_database(&self) -> Result<String> {
        let name = format!(
            "corpus_test_{}_{}",
            std::process::id(),
            NEXT_DATABASE.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgPool::connect(&self.admin_url)
            .await
            .context("Failed to connect to Postgres")?;
        sqlx::query(&format!("CREATE DATABASE {}", name))
            .execute(&admin)
            .await
            .with_context(|| format!("Failed to create database {}", name))?;
        admin.close().await;

        let (server, _) = self
            .admin_url
            .rsplit_once('/')
            .context("Admin URL has no database path")?;
        Ok(format!("{}/{}", server, name))
    }
}

/// A migrated, empty corpus database.
pub struct DatabaseHarness {
    pub store: PostgresCorpusStore,
}

impl AsyncTestContext for DatabaseHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create database harness")
    }

    async fn teardown(self) {
        self.store.pool().close().await;
    }
}

impl DatabaseHarness {
    pub async fn new() -> Result<Self> {
        let shared = SharedPostgres::get().await;
        let url = shared.create_database().await?;

        let store = PostgresCorpusStore::connect(&url)
            .await
            .context("Failed to connect to test database")?;
        store.migrate().await.context("Failed to run migrations")?;

        Ok(Self { store })
    }

    pub fn pool(&self) -> &PgPool {
        self.store.pool()
    }
}
