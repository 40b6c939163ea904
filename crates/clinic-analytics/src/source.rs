//! 预约数据源
//!
//! 分析报表只依赖固定的表格结构，数据可以来自外部数据集或登记记录簿。

use async_trait::async_trait;
use clinic_core::{AppointmentRecord, ClinicError, Result};
use std::path::PathBuf;

/// 预约记录提供者
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 数据源名称，用于日志
    fn name(&self) -> &str;

    /// 读取全部预约记录
    async fn load_records(&self) -> Result<Vec<AppointmentRecord>>;
}

/// 内存数据源
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<AppointmentRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<AppointmentRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn load_records(&self) -> Result<Vec<AppointmentRecord>> {
        Ok(self.records.clone())
    }
}

/// JSON 文件数据源，文件内容为预约记录数组
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_records(&self) -> Result<Vec<AppointmentRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ClinicError::Io(format!("Failed to read dataset {}: {}", self.name, e)))?;

        let records: Vec<AppointmentRecord> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} appointment records from {}", records.len(), self.name);
        Ok(records)
    }
}
