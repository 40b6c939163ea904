//! 门诊登记演示程序
//!
//! 走完一次六步登记向导，然后在已登记的预约上生成分析报表

use chrono::{Duration, Local, NaiveDate};
use clinic_analytics::{AnalyticsDashboard, DateRange, InMemorySource, PatientFilter, RevenuePeriod};
use clinic_core::utils::format_rupees;
use clinic_core::{Gender, HospitalCatalog, PatientType, TimeSlot};
use clinic_intake::{
    DoctorSelectionForm, IntakeEngine, LabTestsForm, PatientInfoForm, ScheduleForm, StepOutcome,
    SymptomsForm,
};

fn report(label: &str, outcome: &StepOutcome) {
    if outcome.is_ok() {
        println!("✅ {} -> 第 {} 步", label, outcome.step.number());
    } else {
        println!("❌ {} 未通过:", label);
        for error in &outcome.errors {
            println!("   - {}", error);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    let catalog = HospitalCatalog::standard();
    let departments = catalog.departments.clone();
    let mut engine = IntakeEngine::new(catalog);

    println!("🚀 门诊登记向导演示\n");

    let session = engine.create_session();

    // 1. 患者信息，第一次故意填错
    let mut patient = PatientInfoForm {
        name: "Anjali Rao".to_string(),
        age: 0,
        blood_group: Some("A+".to_string()),
        gender: Some(Gender::Female.to_string()),
        mobile: "98765-432".to_string(),
        email: "anjali.rao@example".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1991, 8, 17).unwrap_or_default(),
    };
    report("患者信息", &engine.submit_patient_info(session, &patient)?);

    patient.age = 33;
    patient.mobile = "98765-43210".to_string();
    patient.email = "anjali.rao@example.com".to_string();
    report("患者信息", &engine.submit_patient_info(session, &patient)?);

    // 2. 症状与科室
    let symptoms = vec!["chest pain".to_string(), "dizziness".to_string()];
    println!("💡 推荐科室: {:?}", engine.suggest_departments(&symptoms));
    let outcome = engine.submit_symptoms(
        session,
        &SymptomsForm {
            symptoms,
            department: Some("Cardiology".to_string()),
        },
    )?;
    report("症状与科室", &outcome);

    // 3. 选择医生
    let view = engine.session_view(session)?;
    let doctor = view
        .doctors
        .first()
        .ok_or_else(|| anyhow::anyhow!("Cardiology has no doctors"))?;
    println!("👨‍⚕️ 选择 {} (诊室 {})", doctor.name, doctor.room);
    let selection = DoctorSelectionForm {
        doctor_id: Some(doctor.id),
    };
    let outcome = engine.select_doctor(session, &selection)?;
    report("选择医生", &outcome);

    // 4. 检验项目
    let outcome = engine.submit_lab_tests(
        session,
        &LabTestsForm {
            tests: vec!["X-ray".to_string(), "CBC".to_string()],
        },
    )?;
    report("检验项目", &outcome);

    // 5. 时段与计费
    let outcome = engine.confirm_appointment(
        session,
        &ScheduleForm {
            time_slot: Some(TimeSlot::ElevenAm.to_string()),
            appointment_date: Local::now().date_naive() + Duration::days(2),
            patient_type: Some(PatientType::NewPatient.to_string()),
            consultation_fee: 900.0,
        },
    )?;
    report("预约确认", &outcome);

    // 6. 确认摘要
    if let Some(summary) = engine.session_view(session)?.summary {
        println!("\n📋 预约摘要:");
        println!("   患者编号: {}", summary.patient_id);
        println!("   患者: {} ({} 岁)", summary.patient.name, summary.patient.age);
        println!("   医生: {} / {}", summary.department, summary.doctor.name);
        println!("   日期: {} {}", summary.appointment_date, summary.time_slot);
        println!("   诊费: {}", format_rupees(summary.consultation_fee));
        println!("   检验费: {}", format_rupees(summary.lab_cost));
        println!("   合计: {}", format_rupees(summary.total_billing));
    }

    report("重新开始", &engine.restart(session)?);

    // 分析报表
    let dashboard = AnalyticsDashboard::load(&InMemorySource::default(), departments).await?;
    let booked = engine.appointments();

    let overview = dashboard.overview(booked);
    println!("\n📊 总览:");
    println!("   患者数: {}", overview.total_patients);
    println!("   总收入: {}", format_rupees(overview.total_revenue));
    println!("   医生数: {}", overview.total_doctors);

    let revenue = dashboard.revenue(booked, DateRange::default(), RevenuePeriod::Monthly);
    println!("\n💰 营收:");
    println!("   诊费收入: {}", format_rupees(revenue.consultation_revenue));
    println!("   检验收入: {}", format_rupees(revenue.lab_revenue));
    for point in &revenue.trend {
        println!("   {}: {}", point.period, format_rupees(point.revenue));
    }

    let search = PatientFilter {
        search: Some("anjali".to_string()),
        ..Default::default()
    };
    let patients = dashboard.patients(booked, &search);
    println!("\n🔍 {}，命中 {:?}", patients.summary(), patients.matches);

    Ok(())
}
