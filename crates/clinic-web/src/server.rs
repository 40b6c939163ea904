//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::analytics;
use crate::handlers::{
    api_root, department_workload, health, list_departments, list_lab_tests, list_symptoms,
};
use crate::intake;
use crate::state::AppState;

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            app: create_app(state),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start web server: {}", e))?;

        Ok(())
    }
}

/// 完整的应用路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api/v1", api_routes())
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/catalog", catalog_routes())
        .nest("/intake", intake_routes())
        .nest("/analytics", analytics_routes())
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments))
        .route("/departments/:name/workload", get(department_workload))
        .route("/lab-tests", get(list_lab_tests))
        .route("/symptoms", get(list_symptoms))
}

/// 登记向导路由
fn intake_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(intake::create_session))
        .route(
            "/sessions/:id",
            get(intake::get_session).delete(intake::close_session),
        )
        .route("/sessions/:id/patient-info", post(intake::submit_patient_info))
        .route("/sessions/:id/symptoms", post(intake::submit_symptoms))
        .route("/sessions/:id/doctor", post(intake::select_doctor))
        .route("/sessions/:id/lab-tests", post(intake::submit_lab_tests))
        .route("/sessions/:id/schedule", post(intake::confirm_appointment))
        .route("/sessions/:id/back", post(intake::go_back))
        .route("/sessions/:id/restart", post(intake::restart))
        .route("/suggestions", post(intake::suggest_departments))
}

/// 分析报表路由
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(analytics::overview))
        .route("/doctors", get(analytics::doctors))
        .route("/doctors/:name/schedule", get(analytics::doctor_schedule))
        .route("/departments", get(analytics::departments))
        .route("/departments/:name/symptoms", get(analytics::department_symptoms))
        .route("/revenue", get(analytics::revenue))
        .route("/trends", get(analytics::trends))
        .route("/patients", get(analytics::patients))
}
