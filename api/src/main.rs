//! Classbook API Server
//!
//! Scheduling, attendance and prepaid-credit bookkeeping for a small music school.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    LogNotificationChannel, PostgresEnrollmentRepository, PostgresLedgerRepository,
    PostgresPaymentRepository, PostgresStudentDirectory, StaticCourseCatalog, SystemClock,
    WebhookNotificationChannel,
};
use app::{DashboardService, EnrollmentService, LedgerService, PaymentService};
use config::Config;
use domain::ports::{
    Clock, CourseCatalog, EnrollmentRepository, LedgerRepository, NotificationChannel,
    PaymentRepository, StudentDirectory,
};

pub type DynEnrollmentService =
    EnrollmentService<dyn EnrollmentRepository, dyn StudentDirectory, dyn CourseCatalog>;
pub type DynLedgerService = LedgerService<dyn LedgerRepository, dyn EnrollmentRepository, dyn Clock>;
pub type DynPaymentService = PaymentService<
    dyn PaymentRepository,
    dyn EnrollmentRepository,
    dyn StudentDirectory,
    dyn NotificationChannel,
    dyn Clock,
>;
pub type DynDashboardService = DashboardService<
    dyn EnrollmentRepository,
    dyn LedgerRepository,
    dyn PaymentRepository,
    dyn StudentDirectory,
    dyn CourseCatalog,
    dyn Clock,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub enrollment_service: Arc<DynEnrollmentService>,
    pub ledger_service: Arc<DynLedgerService>,
    pub payment_service: Arc<DynPaymentService>,
    pub dashboard_service: Arc<DynDashboardService>,
    pub catalog: Arc<dyn CourseCatalog>,
}

/// Storage and delivery backends the services are wired over
pub struct Backends {
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub directory: Arc<dyn StudentDirectory>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub notifier: Arc<dyn NotificationChannel>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(backends: Backends, config: &Config) -> Self {
        let Backends {
            enrollments,
            ledger,
            payments,
            directory,
            catalog,
            notifier,
            clock,
        } = backends;

        let enrollment_service = Arc::new(EnrollmentService::new(
            enrollments.clone(),
            directory.clone(),
            catalog.clone(),
        ));

        let ledger_service = Arc::new(LedgerService::new(
            ledger.clone(),
            enrollments.clone(),
            clock.clone(),
            config.utc_offset,
        ));

        let payment_service = Arc::new(PaymentService::new(
            payments.clone(),
            enrollments.clone(),
            directory.clone(),
            notifier,
            clock.clone(),
            config.credit_policy,
            config.utc_offset,
        ));

        let dashboard_service = Arc::new(DashboardService::new(
            enrollments,
            ledger,
            payments,
            directory,
            catalog.clone(),
            clock,
            config.utc_offset,
        ));

        Self {
            enrollment_service,
            ledger_service,
            payment_service,
            dashboard_service,
            catalog,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router
///
/// The governor keys on the peer address, so `rate_limited` must be false when the
/// router is served without connect info.
pub fn router(state: AppState, rate_limited: bool) -> Router {
    // Public submissions: enrollment requests and payment claims
    let mut submission_routes = Router::new()
        .route("/enrollments", post(handlers::submit_enrollment))
        .route("/payments", post(handlers::claim_payment));

    if rate_limited {
        // 2 req/sec sustained, burst of 5
        let governor_config = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(PeerIpKeyExtractor)
                .per_second(2)
                .burst_size(5)
                .finish()
                .expect("Failed to build governor config"),
        );
        submission_routes = submission_routes.layer(GovernorLayer {
            config: governor_config,
        });
    }

    Router::new()
        .route("/health", get(health))
        // Catalog and timetable
        .route("/courses", get(handlers::list_courses))
        .route("/schedule/grid", get(handlers::get_schedule_grid))
        .route("/schedule/today", get(handlers::get_today_classes))
        .route("/roster/:day", get(handlers::get_roster_for_day))
        // Enrollment review
        .route("/enrollments/pending", get(handlers::list_pending_enrollments))
        .route("/enrollments/:id/accept", post(handlers::accept_enrollment))
        .route("/enrollments/:id/reject", post(handlers::reject_enrollment))
        .route("/enrollments/:id/archive", post(handlers::archive_enrollment))
        // Attendance
        .route("/attendance", post(handlers::mark_attendance))
        .route("/attendance/:date", get(handlers::get_attendance_on))
        // Payments
        .route("/payments/pending", get(handlers::list_pending_payments))
        .route("/payments/:id/decision", post(handlers::decide_payment))
        .route(
            "/payments/reminders",
            get(handlers::preview_fee_reminders).post(handlers::send_fee_reminders),
        )
        // Students
        .route("/students/:id/balance", get(handlers::get_balance))
        .route("/students/:id/ledger", get(handlers::get_ledger_history))
        .route("/students/:id/payments", get(handlers::list_student_payments))
        .route("/students/:id/overview", get(handlers::get_student_overview))
        .merge(submission_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,classbook_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Classbook API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    let notifier: Arc<dyn NotificationChannel> = match &config.notify_webhook_url {
        Some(url) => {
            tracing::info!(url = %url, "Delivering notifications by webhook");
            Arc::new(WebhookNotificationChannel::new(
                url.clone(),
                config.notify_webhook_secret.clone(),
            ))
        }
        None => {
            tracing::warn!("NOTIFY_WEBHOOK_URL not set, notifications will only be logged");
            Arc::new(LogNotificationChannel)
        }
    };

    let backends = Backends {
        enrollments: Arc::new(PostgresEnrollmentRepository::new(db.clone())),
        ledger: Arc::new(PostgresLedgerRepository::new(db.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(db.clone())),
        directory: Arc::new(PostgresStudentDirectory::new(db)),
        catalog: Arc::new(StaticCourseCatalog::standard()),
        notifier,
        clock: Arc::new(SystemClock),
    };

    let state = AppState::new(backends, &config);
    let app = router(state, true);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
