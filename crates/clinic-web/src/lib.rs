//! # 门诊 Web 模块
//!
//! 基于 axum 的 HTTP 接口：目录查询、登记向导与分析报表。

pub mod analytics;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::{create_app, WebServer};
pub use state::AppState;
