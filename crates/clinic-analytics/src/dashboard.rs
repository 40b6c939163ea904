//! 分析看板
//!
//! 看板持有启动时加载的外部数据集，每次出报表时与运行期间登记的预约合并。

use clinic_core::{AppointmentRecord, DepartmentCatalog, Result};

use crate::reports::{
    self, DateRange, DepartmentAnalytics, DepartmentSymptoms, DoctorAnalytics, DoctorSchedule,
    OverviewReport, PatientFilter, PatientSearchResult, RevenueAnalytics, RevenuePeriod,
    TrendAnalysis,
};
use crate::source::RecordSource;
use crate::table::AnalyticsTable;

pub struct AnalyticsDashboard {
    dataset: Vec<AppointmentRecord>,
    departments: DepartmentCatalog,
}

impl AnalyticsDashboard {
    pub fn new(dataset: Vec<AppointmentRecord>, departments: DepartmentCatalog) -> Self {
        Self { dataset, departments }
    }

    /// 从数据源加载外部数据集
    pub async fn load(source: &dyn RecordSource, departments: DepartmentCatalog) -> Result<Self> {
        let dataset = source.load_records().await?;
        tracing::info!(
            "Analytics dashboard loaded {} records from {}",
            dataset.len(),
            source.name()
        );
        Ok(Self::new(dataset, departments))
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset.len()
    }

    /// 外部数据集加上已登记的预约
    pub fn table(&self, booked: &[AppointmentRecord]) -> AnalyticsTable {
        let mut table = AnalyticsTable::new(self.dataset.iter().cloned());
        table.extend(booked.iter().cloned());
        tracing::debug!(
            "Built analytics table with {} dataset and {} booked records",
            self.dataset.len(),
            booked.len()
        );
        table
    }

    pub fn overview(&self, booked: &[AppointmentRecord]) -> OverviewReport {
        reports::overview(&self.table(booked), &self.departments)
    }

    pub fn doctors(&self, booked: &[AppointmentRecord]) -> DoctorAnalytics {
        reports::doctor_analytics(&self.table(booked))
    }

    pub fn doctor_schedule(
        &self,
        booked: &[AppointmentRecord],
        doctor: &str,
    ) -> Option<DoctorSchedule> {
        reports::doctor_schedule(&self.table(booked), doctor)
    }

    pub fn departments(&self, booked: &[AppointmentRecord]) -> DepartmentAnalytics {
        reports::department_analytics(&self.table(booked))
    }

    pub fn department_symptoms(
        &self,
        booked: &[AppointmentRecord],
        department: &str,
    ) -> Option<DepartmentSymptoms> {
        reports::department_symptoms(&self.table(booked), department)
    }

    pub fn revenue(
        &self,
        booked: &[AppointmentRecord],
        range: DateRange,
        period: RevenuePeriod,
    ) -> RevenueAnalytics {
        reports::revenue_analytics(&self.table(booked), range, period)
    }

    pub fn trends(&self, booked: &[AppointmentRecord]) -> TrendAnalysis {
        reports::trend_analysis(&self.table(booked))
    }

    pub fn patients(
        &self,
        booked: &[AppointmentRecord],
        filter: &PatientFilter,
    ) -> PatientSearchResult {
        reports::patient_details(&self.table(booked), filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;
    use crate::table::fixtures::record;
    use clinic_core::TimeSlot;

    #[tokio::test]
    async fn test_booked_records_join_the_dataset() {
        let source = InMemorySource::new(vec![record(
            "P001",
            "Cardiology",
            "Dr. Ravi Kumar",
            (2024, 1, 1),
            TimeSlot::TenAm,
            900.0,
            &[],
            0.0,
        )]);
        let dashboard = AnalyticsDashboard::load(&source, DepartmentCatalog::standard())
            .await
            .unwrap();
        assert_eq!(dashboard.dataset_len(), 1);
        assert_eq!(dashboard.overview(&[]).total_patients, 1);

        let booked = vec![record(
            "P001",
            "Neurology",
            "Dr. Sanjay Verma",
            (2024, 1, 2),
            TimeSlot::TwoPm,
            1200.0,
            &["MRI"],
            5000.0,
        )];
        let overview = dashboard.overview(&booked);
        assert_eq!(overview.total_patients, 2);
        assert_eq!(overview.total_revenue, 7100.0);
        assert_eq!(dashboard.doctors(&booked).doctors.len(), 2);
    }
}
