//! Disposable Postgres databases for integration tests.
//!
//! Prefers an externally supplied server via `GRINGOTTS_TEST_DATABASE_URL`
//! (each fixture still gets its own uniquely named database so parallel tests
//! stay isolated). When unset, a throwaway instance is spawned from locally
//! available Postgres binaries (`initdb`, `postgres`, `pg_isready`). Tests
//! decide whether to skip when neither is available.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use sqlx::{Connection, Executor, PgConnection};
use url::Url;

/// Environment variable naming an external Postgres server for tests.
pub const TEST_DATABASE_URL: &str = "GRINGOTTS_TEST_DATABASE_URL";

const READY_ATTEMPTS: u32 = 30;
const READY_POLL: Duration = Duration::from_millis(200);

/// Handle to a disposable test database.
///
/// Dropping the handle kills any locally spawned server process and removes
/// its data directory; call [`TestDatabase::close`] to also drop the unique
/// database on an external server.
pub struct TestDatabase {
    connection_string: String,
    admin_url: String,
    database: String,
    process: Option<Child>,
    data_dir: Option<PathBuf>,
}

impl TestDatabase {
    /// Connection string for the fixture's private database.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Drop the fixture database and tear down any local server.
    ///
    /// # Errors
    ///
    /// Returns an error when the drop statement cannot be issued; local
    /// process cleanup is best-effort and never fails the caller.
    pub async fn close(mut self) -> Result<()> {
        let result = run_admin(
            &self.admin_url,
            &format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", self.database),
        )
        .await;
        self.teardown_local();
        result
    }

    fn teardown_local(&mut self) {
        if let Some(process) = &mut self.process {
            let _ = process.kill();
            let _ = process.wait();
        }
        self.process = None;
        if let Some(dir) = self.data_dir.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        self.teardown_local();
    }
}

/// Whether a database can be provisioned in this environment.
#[must_use]
pub fn available() -> bool {
    std::env::var(TEST_DATABASE_URL).is_ok_and(|url| !url.trim().is_empty())
        || binaries().is_ok()
}

/// Provision a fresh, uniquely named database for one fixture.
///
/// # Errors
///
/// Returns an error when no external URL is provided and local Postgres
/// binaries are unavailable or fail to start.
pub async fn provision() -> Result<TestDatabase> {
    if let Ok(base_url) = std::env::var(TEST_DATABASE_URL)
        && !base_url.trim().is_empty()
    {
        return create_on_server(base_url.trim(), None, None).await;
    }
    spawn_local_instance().await
}

async fn spawn_local_instance() -> Result<TestDatabase> {
    let binaries = binaries()?;
    let port = reserve_port()?;
    let data_dir = allocate_data_dir()?;

    let data_dir_str = data_dir
        .to_str()
        .context("data dir contains non-utf8 characters")?;
    let initdb = Command::new(&binaries.initdb)
        .args(["-D", data_dir_str, "--username=postgres", "--auth=trust"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("failed to run initdb")?;
    if !initdb.success() {
        let _ = std::fs::remove_dir_all(&data_dir);
        bail!("initdb exited with failure status");
    }

    // -k keeps the unix socket inside the data dir so no shared path is needed.
    let process = Command::new(&binaries.postgres)
        .args([
            "-D",
            data_dir_str,
            "-p",
            &port.to_string(),
            "-h",
            "127.0.0.1",
            "-k",
            data_dir_str,
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to start postgres process")?;

    wait_for_ready(&binaries.pg_isready, port).await?;

    let base_url = format!("postgres://postgres@127.0.0.1:{port}/postgres");
    create_on_server(&base_url, Some(process), Some(data_dir)).await
}

async fn create_on_server(
    base_url: &str,
    process: Option<Child>,
    data_dir: Option<PathBuf>,
) -> Result<TestDatabase> {
    let parsed = Url::parse(base_url).context("invalid postgres connection url")?;
    let database = unique_database_name();

    let mut database_url = parsed.clone();
    database_url.set_path(&format!("/{database}"));

    let mut admin_url = parsed.clone();
    admin_url.set_path("/postgres");

    // Fall back to the caller's own database when `postgres` is not connectable.
    let statement = format!("CREATE DATABASE \"{database}\"");
    let admin_url = match run_admin(admin_url.as_str(), &statement).await {
        Ok(()) => admin_url.to_string(),
        Err(primary_err) => {
            if admin_url.path() == parsed.path() {
                return Err(primary_err);
            }
            run_admin(parsed.as_str(), &statement)
                .await
                .map_err(|_fallback_err| primary_err)?;
            parsed.to_string()
        }
    };

    Ok(TestDatabase {
        connection_string: database_url.to_string(),
        admin_url,
        database,
        process,
        data_dir,
    })
}

async fn run_admin(admin_url: &str, statement: &str) -> Result<()> {
    let mut conn = PgConnection::connect(admin_url)
        .await
        .with_context(|| format!("failed to connect to admin database at {admin_url}"))?;
    conn.execute(statement)
        .await
        .with_context(|| format!("failed to execute `{statement}`"))?;
    let _ = conn.close().await;
    Ok(())
}

struct PostgresBinaries {
    initdb: PathBuf,
    postgres: PathBuf,
    pg_isready: PathBuf,
}

fn binaries() -> Result<PostgresBinaries> {
    Ok(PostgresBinaries {
        initdb: resolve_binary("initdb")?,
        postgres: resolve_binary("postgres")?,
        pg_isready: resolve_binary("pg_isready")?,
    })
}

fn resolve_binary(name: &str) -> Result<PathBuf> {
    let mut search_paths: Vec<PathBuf> = Vec::new();
    // Full server installations first so `initdb` has the assets it needs.
    search_paths.extend(
        [
            "/usr/lib/postgresql/16/bin",
            "/usr/lib/postgresql/15/bin",
            "/usr/lib/postgresql/14/bin",
            "/opt/homebrew/opt/postgresql@16/bin",
            "/usr/local/opt/postgresql@16/bin",
        ]
        .map(PathBuf::from),
    );
    search_paths.extend(
        std::env::var_os("PATH").map_or_else(Vec::new, |paths| std::env::split_paths(&paths).collect()),
    );

    for dir in search_paths {
        let candidate = dir.join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    bail!("{name} binary is required for Postgres tests");
}

fn reserve_port() -> Result<u16> {
    let listener =
        std::net::TcpListener::bind("127.0.0.1:0").context("failed to reserve port")?;
    let port = listener
        .local_addr()
        .context("failed to read listener address")?
        .port();
    drop(listener);
    Ok(port)
}

fn allocate_data_dir() -> Result<PathBuf> {
    let base = std::env::temp_dir().join("gringotts-postgres");
    std::fs::create_dir_all(&base)
        .with_context(|| format!("failed to create base dir {}", base.display()))?;
    for attempt in 0..5 {
        let candidate = base.join(format!("{}-{attempt}", unique_database_name()));
        if !candidate.exists() {
            std::fs::create_dir_all(&candidate)
                .with_context(|| format!("failed to create data dir {}", candidate.display()))?;
            return Ok(candidate);
        }
    }
    bail!("failed to allocate temporary data directory for postgres");
}

async fn wait_for_ready(pg_isready: &Path, port: u16) -> Result<()> {
    for _ in 0..READY_ATTEMPTS {
        let status = Command::new(pg_isready)
            .args(["-h", "127.0.0.1", "-p", &port.to_string(), "-U", "postgres"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if matches!(status, Ok(ref s) if s.success()) {
            return Ok(());
        }
        tokio::time::sleep(READY_POLL).await;
    }

    bail!("postgres process did not become ready in time")
}

fn unique_database_name() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    format!("gringotts_test_{pid}_{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_do_not_collide() {
        let first = unique_database_name();
        let second = unique_database_name();
        assert_ne!(first, second);
        assert!(first.starts_with("gringotts_test_"));
    }

    #[test]
    fn reserved_ports_are_nonzero() {
        let port = reserve_port().expect("port reservation must succeed");
        assert_ne!(port, 0);
    }
}
