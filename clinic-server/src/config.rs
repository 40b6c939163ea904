//! 服务配置
//!
//! 加载顺序：内置默认值、TOML 配置文件、`CLINIC__` 前缀的环境变量，
//! 后者覆盖前者。

use clinic_intake::DEFAULT_SESSION_TTL_MINUTES;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub intake: IntakeConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeConfig {
    /// 登记会话的空闲回收时长（分钟）
    pub session_ttl_minutes: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// 外部预约数据集，为空时报表只包含本进程登记的预约
    pub dataset_path: Option<PathBuf>,
}

impl ClinicConfig {
    /// 加载配置，`path` 为 `None` 时跳过配置文件
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("intake.session_ttl_minutes", DEFAULT_SESSION_TTL_MINUTES)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix("CLINIC").separator("__"))
            .build()?;

        let config: ClinicConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::load(None).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.intake.session_ttl_minutes, 120);
        assert!(config.analytics.dataset_path.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[intake]\nsession_ttl_minutes = 15\n\n\
             [analytics]\ndataset_path = \"data/appointments.json\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = ClinicConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.intake.session_ttl_minutes, 15);
        assert_eq!(
            config.analytics.dataset_path,
            Some(PathBuf::from("data/appointments.json"))
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(ClinicConfig::load(Some("/definitely/not/here.toml")).is_err());
    }
}
