/// PULSE Server - self-hosted multi-user music streaming
use anyhow::Context;
use clap::{Parser, Subcommand};
use pulse_core::CreateUser;
use pulse_metadata::LoftyMetadataReader;
use pulse_server::{
    api,
    config::ServerConfig,
    services::{AuthService, MediaStore},
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pulse-server")]
#[command(about = "PULSE multi-user music streaming server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "PULSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Login email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            username,
            email,
            password,
            admin,
        } => {
            add_user(&config, &username, &email, &password, admin).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::load_from(path)?,
        None => ServerConfig::load()?,
    };
    Ok(config)
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<sqlx::SqlitePool> {
    if let Some(parent) = sqlite_parent_dir(&config.storage.database_url) {
        tokio::fs::create_dir_all(&parent)
            .await
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    let pool = pulse_storage::create_pool(&config.storage.database_url).await?;
    pulse_storage::run_migrations(&pool).await?;
    Ok(pool)
}

/// Directory of a file-backed `sqlite://` URL, if any
fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }

    PathBuf::from(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting PULSE server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = open_database(&config).await?;
    tracing::info!("Database connected");

    // Initialize media directories
    let media = MediaStore::new(
        config.storage.uploads_path.clone(),
        config.storage.library_path.clone(),
    );
    media.initialize().await?;
    tracing::info!(
        "Media store initialized (uploads: {}, library: {})",
        config.storage.uploads_path.display(),
        config.storage.library_path.display()
    );

    // Initialize auth service
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.session_expiration_hours,
        config.auth.bcrypt_cost,
    );

    let purged = pulse_storage::sessions::delete_expired(
        &pool,
        auth_service.session_expiration().num_seconds(),
    )
    .await?;
    if purged > 0 {
        tracing::info!("Removed {} expired session(s)", purged);
    }

    // Build application state
    let app_state = AppState::new(
        pool,
        Arc::new(auth_service),
        Arc::new(media),
        Arc::new(LoftyMetadataReader::new()),
    );

    // Build router
    let app = api::create_router(app_state, &config);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    username: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> anyhow::Result<()> {
    let pool = open_database(config).await?;

    // Hashing does not need the token secret
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.session_expiration_hours,
        config.auth.bcrypt_cost,
    );
    let password_hash = auth_service.hash_password(password)?;

    let user = pulse_storage::users::create(
        &pool,
        CreateUser {
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            is_admin: admin,
        },
    )
    .await?;

    println!(
        "Created {} {} (id {})",
        if user.is_admin { "admin" } else { "user" },
        user.username,
        user.id
    );

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = open_database(config).await?;
    let users = pulse_storage::users::get_all(&pool).await?;

    println!("Users:");
    for summary in users {
        let user = summary.user;
        println!(
            "  {} - {} <{}>{} ({} songs)",
            user.id,
            user.username,
            user.email,
            if user.is_admin { " [admin]" } else { "" },
            summary.song_count
        );
    }

    Ok(())
}
