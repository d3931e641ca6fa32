use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_superadmin, require_user_auth,
    security_headers_middleware, trace_id,
};
use crate::routes::{
    activity_logs, auth, dashboard, drones, health, profile, requests, scene, users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/scene", get(scene::get_scene))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout));

    // Any signed-in account
    let user_routes = Router::new()
        .route("/api/v1/me", get(profile::get_me))
        .route("/api/v1/navigation", get(profile::get_navigation))
        .route("/api/v1/dashboard", get(dashboard::get_overview))
        .route("/api/v1/dashboards/user", get(dashboard::get_user_dashboard))
        .route("/api/v1/dashboards/admin", get(dashboard::get_admin_dashboard))
        .route(
            "/api/v1/dashboards/superadmin",
            get(dashboard::get_superadmin_dashboard),
        )
        .route("/api/v1/drones", get(drones::list_drones))
        .route("/api/v1/drones/:drone_id", get(drones::get_drone))
        .route(
            "/api/v1/requests",
            post(requests::submit_request).get(requests::list_my_requests),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Admin routes: authentication runs first, then the role check
    let admin_routes = Router::new()
        .route("/api/v1/admin/drones", post(drones::create_drone))
        .route(
            "/api/v1/admin/drones/:drone_id",
            patch(drones::update_drone).delete(drones::delete_drone),
        )
        .route("/api/v1/admin/requests", get(requests::list_all_requests))
        .route(
            "/api/v1/admin/requests/:request_id/approve",
            post(requests::approve_request),
        )
        .route(
            "/api/v1/admin/requests/:request_id/reject",
            post(requests::reject_request),
        )
        .route(
            "/api/v1/admin/requests/:request_id/return",
            post(requests::return_request),
        )
        .route("/api/v1/admin/users", get(users::list_users))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let superadmin_routes = Router::new()
        .route(
            "/api/v1/superadmin/users/:user_id/role",
            patch(users::change_role),
        )
        .route("/api/v1/superadmin/logs", get(activity_logs::list_logs))
        .route_layer(middleware::from_fn(require_superadmin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .merge(superadmin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
