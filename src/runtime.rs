//! Account service runtime.
//!
//! Provides [`AccountRuntime`] that encapsulates the process lifecycle:
//! database init, migrations, default administrator provisioning and the
//! wiring of [`AccountService`] onto the SeaORM stores.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use crate::application::AccountService;
use crate::config::{AdminConfig, AppConfig};
use crate::domain::{
    AuthorityRepositoryInterface, DomainResult, PasswordHasher, User, UserRepositoryInterface,
};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{
    init_database, AuthorityRepository, BcryptPasswordHasher, DatabaseConfig, UserRepository,
};

/// [`AccountService`] backed by the SeaORM stores and bcrypt.
pub type SqlAccountService = AccountService<UserRepository, AuthorityRepository, BcryptPasswordHasher>;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the account runtime.
pub struct RuntimeOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── AccountRuntime ─────────────────────────────────────────────────

/// Handle to a started account runtime.
pub struct AccountRuntime {
    /// Account service wired onto the database stores.
    pub service: Arc<SqlAccountService>,

    db: DatabaseConnection,
}

impl AccountRuntime {
    /// Start the runtime with the given options.
    ///
    /// This will:
    /// 1. Connect to the database and run migrations (if enabled)
    /// 2. Build the account service on the SeaORM stores
    /// 3. Provision the default administrator (if enabled and no users exist)
    pub async fn start(opts: RuntimeOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        let db_config = DatabaseConfig {
            url: app_cfg.database.connection_url(),
        };
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        let service = Arc::new(AccountService::new(
            Arc::new(UserRepository::new(db.clone())),
            Arc::new(AuthorityRepository::new(db.clone())),
            Arc::new(BcryptPasswordHasher::new(app_cfg.security.bcrypt_cost)),
        ));

        if app_cfg.admin.enabled {
            create_default_admin(service.as_ref(), &app_cfg.admin).await?;
        }

        Ok(Self { service, db })
    }

    /// Close the database connection.
    pub async fn shutdown(self) {
        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Register the configured administrator if the store holds no users.
///
/// Returns the created record, or `None` when users already exist.
pub async fn create_default_admin<U, A, H>(
    service: &AccountService<U, A, H>,
    admin: &AdminConfig,
) -> DomainResult<Option<User>>
where
    U: UserRepositoryInterface,
    A: AuthorityRepositoryInterface,
    H: PasswordHasher,
{
    if !service.find_all().await?.is_empty() {
        return Ok(None);
    }

    info!("Creating default admin user...");
    let user = service
        .register(User::new(admin.login.clone(), admin.password.clone()), true)
        .await?;

    info!(login = %user.login, "Default admin created");
    warn!("Please change the admin password immediately!");
    Ok(Some(user))
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`AccountRuntime::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
