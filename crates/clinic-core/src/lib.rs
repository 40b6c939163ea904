//! # Clinic Core
//!
//! 门诊系统的核心模块，提供基础数据结构、静态目录、字段校验和错误定义。

pub mod catalog;
pub mod error;
pub mod models;
pub mod utils;
pub mod validation;

pub use catalog::{DepartmentCatalog, HospitalCatalog, LabTestCatalog, SymptomDepartmentMap};
pub use error::{ClinicError, Result};
pub use models::*;
