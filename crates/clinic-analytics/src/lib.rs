//! # 门诊分析模块
//!
//! 只读报表，基于固定结构的预约记录表：
//! - 数据源：外部数据集与内存记录
//! - 分析表：日期派生列与计数列
//! - 报表：总览、医生、科室、营收、趋势、患者明细

pub mod dashboard;
pub mod reports;
pub mod source;
pub mod stats;
pub mod table;

pub use dashboard::AnalyticsDashboard;
pub use reports::{
    DateRange, DepartmentAnalytics, DepartmentSymptoms, DoctorAnalytics, DoctorSchedule,
    OverviewReport, PatientFilter, PatientSearchResult, RevenueAnalytics, RevenuePeriod,
    TrendAnalysis,
};
pub use source::{InMemorySource, JsonFileSource, RecordSource};
pub use table::{AnalyticsRow, AnalyticsTable};
