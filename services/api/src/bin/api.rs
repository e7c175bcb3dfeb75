//! services/api/src/bin/api.rs

use api_lib::{
    adapters::PgStore,
    config::Config,
    error::ApiError,
    web::{
        admin, ancillary, applications, auth, files, interviews, postings, recruitments,
        require_auth, state::AppState, ApiDoc,
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool));
    info!("Running database migrations...");
    store
        .run_migrations()
        .await
        .map_err(|e| ApiError::Internal(format!("migration failed: {e}")))?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        db: store,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("invalid FRONTEND_ORIGIN: {e}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (no auth required). The direct-recruitment surface is
    // deliberately public, see the module docs.
    let public_routes = Router::new()
        .route("/auth/register/student", post(auth::register_student_handler))
        .route("/auth/register/company", post(auth::register_company_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/jobs", get(postings::list_jobs_handler))
        .route("/jobs/{id}", get(postings::get_job_handler))
        .route("/companies/{id}/reviews", get(ancillary::company_reviews_handler))
        .route(
            "/direct-recruitments",
            get(recruitments::list_recruitments_handler)
                .post(recruitments::create_recruitment_handler),
        )
        .route(
            "/direct-recruitments/{id}/status",
            put(recruitments::update_recruitment_status_handler),
        )
        .route(
            "/direct-recruitments/{id}",
            delete(recruitments::withdraw_recruitment_handler),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/jobs", post(postings::create_job_handler))
        .route("/jobs/my", get(postings::my_jobs_handler))
        .route(
            "/jobs/{id}",
            put(postings::update_job_handler).delete(postings::delete_job_handler),
        )
        .route("/jobs/{id}/applications", get(postings::job_applications_handler))
        .route(
            "/applications/jobs/{job_id}/apply",
            post(applications::apply_handler),
        )
        .route("/applications", get(applications::my_applications_handler))
        .route(
            "/applications/{id}",
            put(applications::update_application_handler)
                .delete(applications::withdraw_application_handler),
        )
        .route("/applications/admin/all", get(applications::all_applications_handler))
        .route("/interviews", post(interviews::schedule_interview_handler))
        .route("/interviews/upcoming", get(interviews::upcoming_interviews_handler))
        .route(
            "/interviews/{id}",
            get(interviews::get_interview_handler)
                .put(interviews::update_interview_handler)
                .delete(interviews::cancel_interview_handler),
        )
        .route("/interviews/{id}/complete", post(interviews::complete_interview_handler))
        .route("/cvs", post(files::upload_cv_handler).get(files::list_cvs_handler))
        .route("/cvs/{id}", delete(files::delete_cv_handler))
        .route("/cvs/{id}/file", get(files::download_cv_handler))
        .route("/admin/users/{id}/role", put(admin::update_user_role_handler))
        .route("/admin/users/{id}", delete(admin::delete_user_handler))
        .route("/admin/jobs/{id}/status", put(admin::moderate_posting_handler))
        .route("/admin/activity", get(admin::activity_handler))
        .route(
            "/bookmarks",
            post(ancillary::create_bookmark_handler).get(ancillary::list_bookmarks_handler),
        )
        .route("/bookmarks/{id}", delete(ancillary::delete_bookmark_handler))
        .route("/notifications", get(ancillary::list_notifications_handler))
        .route(
            "/notifications/{id}/read",
            put(ancillary::mark_notification_read_handler),
        )
        .route("/reviews", post(ancillary::create_review_handler))
        .route(
            "/portfolios",
            post(ancillary::create_portfolio_handler).get(ancillary::list_portfolios_handler),
        )
        .route("/portfolios/{id}", delete(ancillary::delete_portfolio_handler))
        .route("/messages", post(ancillary::send_message_handler))
        .route("/messages/{peer}", get(ancillary::conversation_handler))
        .route(
            "/settings",
            get(ancillary::list_settings_handler).put(ancillary::upsert_setting_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
