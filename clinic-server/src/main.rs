//! 门诊服务主程序

mod config;

use chrono::Duration;
use clap::Parser;
use clinic_analytics::{AnalyticsDashboard, JsonFileSource};
use clinic_core::{DepartmentCatalog, HospitalCatalog};
use clinic_intake::IntakeEngine;
use clinic_web::{AppState, WebServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::ClinicConfig;

/// 门诊服务命令行参数，未指定的项取配置文件或默认值
#[derive(Parser, Debug)]
#[command(name = "clinic-server")]
#[command(about = "门诊预约登记与运营分析服务")]
struct Args {
    /// 监听地址
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,

    /// 外部预约数据集（JSON 数组）
    #[arg(short, long)]
    dataset: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut config: ClinicConfig) -> ClinicConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(dataset) = self.dataset {
            config.analytics.dataset_path = Some(dataset);
        }
        config
    }
}

async fn load_dashboard(
    config: &ClinicConfig,
    departments: DepartmentCatalog,
) -> anyhow::Result<AnalyticsDashboard> {
    match &config.analytics.dataset_path {
        Some(path) => {
            let source = JsonFileSource::new(path);
            Ok(AnalyticsDashboard::load(&source, departments).await?)
        }
        None => {
            warn!("未配置外部数据集，报表只包含本次运行登记的预约");
            Ok(AnalyticsDashboard::new(Vec::new(), departments))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ClinicConfig::load(args.config.as_deref())?;
    let config = args.apply(config);

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .init();

    info!("启动门诊服务...");
    info!("门诊服务配置:");
    info!("  监听地址: {}", config.bind_address());
    info!("  会话回收: {} 分钟", config.intake.session_ttl_minutes);
    if let Some(path) = &config.analytics.dataset_path {
        info!("  数据集: {}", path.display());
    }

    let catalog = HospitalCatalog::standard();
    let dashboard = load_dashboard(&config, catalog.departments.clone()).await?;
    let engine = IntakeEngine::new(catalog)
        .with_session_ttl(Duration::minutes(config.intake.session_ttl_minutes));

    let addr: SocketAddr = config.bind_address().parse()?;
    let server = WebServer::new(addr, AppState::new(engine, dashboard));

    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e);
    }

    Ok(())
}
