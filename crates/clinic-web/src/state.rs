//! 共享应用状态

use clinic_analytics::AnalyticsDashboard;
use clinic_intake::IntakeEngine;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 路由共享的状态
///
/// 登记引擎只接受独占访问，所有请求经同一把锁串行执行，
/// 并发会话看到的结果与依次执行一致。
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<IntakeEngine>>,
    pub dashboard: Arc<AnalyticsDashboard>,
}

impl AppState {
    pub fn new(engine: IntakeEngine, dashboard: AnalyticsDashboard) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            dashboard: Arc::new(dashboard),
        }
    }
}
