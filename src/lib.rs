//! Techpadie e-learning platform API
//!
//! Backend for the Techpadie platform:
//! - Signup/login with OTP email verification
//! - Course authoring with an admin approval workflow
//! - Certificate issuance and public verification
//! - Token reward ledger

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use api::state::AppState;
use domain::user::{User, UserId, UserRole, UserRepository};
use infrastructure::admin::AdminService;
use infrastructure::auth::{
    AuthService, JwtConfig, JwtService, OtpSettings, RateLimitConfig, RateLimiter,
};
use infrastructure::certificate::{CertificateService, PostgresCertificateRepository};
use infrastructure::course::{CourseService, PostgresCourseRepository};
use infrastructure::creator::PostgresCreatorRepository;
use infrastructure::email::{EmailConfig, LogMailer, OtpMailer, SmtpMailer};
use infrastructure::job::{JobQueue, PostgresJobRepository};
use infrastructure::otp::PostgresOtpRepository;
use infrastructure::reward::{PostgresRewardRepository, RewardService};
use infrastructure::user::{Argon2Hasher, PasswordHasher, PostgresUserRepository, UserService};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

    info!("Connecting to PostgreSQL...");
    let pg_pool = sqlx::PgPool::connect(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
    info!("PostgreSQL connection established");

    // Repositories
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let otp_repository = Arc::new(PostgresOtpRepository::new(pg_pool.clone()));
    let course_repository = Arc::new(PostgresCourseRepository::new(pg_pool.clone()));
    let creator_repository = Arc::new(PostgresCreatorRepository::new(pg_pool.clone()));
    let certificate_repository = Arc::new(PostgresCertificateRepository::new(pg_pool.clone()));
    let reward_repository = Arc::new(PostgresRewardRepository::new(pg_pool.clone()));
    let job_repository = Arc::new(PostgresJobRepository::new(pg_pool.clone()));

    // OTP delivery - SMTP when configured, log-only otherwise
    let mailer: Arc<dyn OtpMailer> = match EmailConfig::from_env() {
        Some(email_config) => {
            info!("SMTP configured, OTP codes delivered via email");
            Arc::new(SmtpMailer::new(&email_config)?)
        }
        None => {
            warn!("SMTP not configured; OTP codes will only be logged");
            Arc::new(LogMailer::new())
        }
    };

    let password_hasher = Arc::new(Argon2Hasher::new());
    let rate_limiter = Arc::new(RateLimiter::new());

    let otp_settings = OtpSettings {
        ttl_minutes: config.otp.ttl_minutes,
        max_attempts: config.otp.max_attempts,
        rate_limit: RateLimitConfig::new(
            config.otp.rate_limit_max_requests,
            config.otp.rate_limit_window_secs,
        ),
    };

    // Services
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        otp_repository,
        password_hasher.clone(),
        mailer,
        rate_limiter,
        otp_settings,
    ));

    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let course_service = Arc::new(CourseService::new(course_repository.clone()));
    let job_queue = Arc::new(JobQueue::new(job_repository));
    let reward_service = Arc::new(RewardService::new(reward_repository));

    let admin_service = Arc::new(AdminService::new(
        course_repository.clone(),
        creator_repository,
        user_service.clone(),
        job_queue,
    ));

    let certificate_service = Arc::new(CertificateService::new(
        certificate_repository,
        course_repository,
        user_repository.clone(),
        reward_service.clone(),
    ));

    // JWT service
    let jwt_expiration = u64::from(config.auth.jwt_expiration_hours);
    let jwt_service = Arc::new(create_jwt_service(config, jwt_expiration));

    // Create initial admin user if no users exist
    create_initial_admin_user(user_repository.as_ref(), password_hasher.as_ref()).await?;

    Ok(AppState::new(
        auth_service,
        user_service,
        course_service,
        admin_service,
        certificate_service,
        reward_service,
        jwt_service,
    ))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Create JWT service from secret (config, env var, or random)
fn create_jwt_service(config: &AppConfig, jwt_expiration: u64) -> JwtService {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Sessions will NOT persist across restarts."
            );
            generate_random_secret()
        });

    JwtService::new(JwtConfig::new(jwt_secret, jwt_expiration))
}

/// Create an initial admin user if no users exist
async fn create_initial_admin_user<R, H>(users: &R, hasher: &H) -> anyhow::Result<()>
where
    R: UserRepository,
    H: PasswordHasher,
{
    if users.count(None).await? > 0 {
        return Ok(());
    }

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@techpadie.local".to_string());

    // Use ADMIN_DEFAULT_PASSWORD env var if set, otherwise generate one
    let (password, is_default) = match std::env::var("ADMIN_DEFAULT_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (generate_random_password(), false),
    };

    let password_hash = hasher
        .hash(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;

    let mut admin = User::new(UserId::generate(), &email, "admin", password_hash);
    admin.set_role(UserRole::Admin);
    admin.verify();

    users.create(admin).await?;

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Email: {}", email);

    if is_default {
        info!("Password: (set via ADMIN_DEFAULT_PASSWORD)");
    } else {
        info!("Password: {}", password);
    }

    info!("Please change this password after first login.");
    info!("===========================================");

    Ok(())
}
