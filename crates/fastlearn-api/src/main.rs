//! FastLearn API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, seeds the default course catalog, and serves
//! the JSON API over HTTP.
//!
//! # Helper modes
//!
//! Print the argon2 PHC string for a password entered on stdin:
//!
//! ```
//! cargo run -p fastlearn-api --bin server -- --hash-password
//! ```
//!
//! Create an admin account (prompts for username and password):
//!
//! ```
//! cargo run -p fastlearn-api --bin server -- --create-admin admin@example.com
//! ```

use std::{
  net::SocketAddr,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use fastlearn_api::{AppState, ServerConfig, auth};
use fastlearn_core::{
  catalog::DEFAULT_CATALOG, store::LearnStore as _, user::NewUser,
};
use fastlearn_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "FastLearn API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Create an admin account with this email, then exit.
  #[arg(long, value_name = "EMAIL")]
  create_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = prompt("Password: ")?;
    println!("{}", auth::hash_password(&password)?);
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FASTLEARN"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open the SQLite store and make sure the default catalog is present.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let seeded = store.seed_catalog(DEFAULT_CATALOG).await?;
  if seeded > 0 {
    tracing::info!("seeded {seeded} default courses");
  }

  // Helper mode: create an admin account and exit.
  if let Some(email) = cli.create_admin {
    let username = prompt("Username: ")?;
    let password = prompt("Password: ")?;
    let user = store
      .create_user(NewUser {
        username,
        email: email.trim().to_lowercase(),
        password_hash: auth::hash_password(&password)?,
        is_admin: true,
      })
      .await
      .context("failed to create admin account")?;
    tracing::info!("created admin {} (id {})", user.username, user.id);
    return Ok(());
  }

  // Build application state.
  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg.clone()),
  };

  let app = fastlearn_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  // Connect info feeds the activity log's client-address column.
  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .context("server error")?;

  Ok(())
}

/// Read one line from stdin after printing `label`.
fn prompt(label: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("{label}");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
