use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::info;

use fittrack::database;
use fittrack::state::AppState;
use fittrack::web::middleware::auth as auth_middleware;
use fittrack::web::routes::{health, invites, members, notifications, programs, workouts};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt::init();

    // 2. Database
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");
    info!("connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");
    database::ensure_schema(&pool)
        .await
        .expect("cannot apply schema");

    let state = AppState::new(pool);

    // 3. Protected routes behind the auth middleware
    let protected_routes = Router::new()
        .route(
            "/programs",
            get(programs::list_programs_handler).post(programs::create_program_handler),
        )
        .route("/programs/:program_id", get(programs::program_detail_handler))
        .route("/programs/:program_id/join", post(programs::join_program_handler))
        .route("/programs/:program_id/leave", post(programs::leave_program_handler))
        .route(
            "/programs/:program_id/invites",
            post(invites::create_invite_handler).get(invites::list_invites_handler),
        )
        .route("/invites/:invite_id/accept", post(invites::accept_invite_handler))
        .route(
            "/programs/:program_id/workouts",
            post(workouts::log_workout_handler).get(workouts::list_workouts_handler),
        )
        .route(
            "/health-logs",
            put(health::upsert_health_log_handler).get(health::list_health_logs_handler),
        )
        .route(
            "/members/me",
            get(members::me_handler).delete(members::delete_account_handler),
        )
        .route("/members/me/emails", post(members::add_email_handler))
        .route("/members/:member_id", delete(members::remove_member_handler))
        .route("/notifications", get(notifications::list_notifications_handler))
        .route(
            "/notifications/:notification_id/ack",
            post(notifications::acknowledge_handler),
        )
        .route("/notifications/stream", get(notifications::stream_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));

    // 4. Full application
    let app = Router::new()
        .route(
            "/healthz",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .merge(protected_routes)
        .layer(CatchPanicLayer::new())
        .with_state(state);

    // 5. Serve (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "could not bind {}: {}. trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    info!("server listening on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
