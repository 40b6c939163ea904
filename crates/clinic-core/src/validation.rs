//! 字段校验
//!
//! 纯函数，无副作用。失败时返回可直接展示给用户的原因。

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// 单字段校验结果
pub type FieldResult = std::result::Result<(), &'static str>;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 120;
pub const MOBILE_DIGITS: usize = 10;
pub const MAX_BILLING_AMOUNT: f64 = 1_000_000.0;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// 姓名：非空，仅字母与空格，去除首尾空白后至少2个字符
pub fn validate_name(name: &str) -> FieldResult {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if !name.chars().filter(|c| *c != ' ').all(char::is_alphabetic) {
        return Err("Name should only contain letters and spaces");
    }
    if name.trim().chars().count() < 2 {
        return Err("Name must be at least 2 characters");
    }
    Ok(())
}

/// 年龄：闭区间 [1, 120]
pub fn validate_age(age: i64) -> FieldResult {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err("Age must be between 1 and 120");
    }
    Ok(())
}

/// 手机号：去除 `-`、空格和括号后必须恰好10位数字
pub fn validate_mobile(mobile: &str) -> FieldResult {
    let digits = strip_mobile(mobile);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Mobile number should contain only digits");
    }
    if digits.len() != MOBILE_DIGITS {
        return Err("Mobile number must be exactly 10 digits");
    }
    Ok(())
}

/// 去除手机号中的分隔符
pub fn strip_mobile(mobile: &str) -> String {
    mobile
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')'))
        .collect()
}

pub fn validate_email(email: &str) -> FieldResult {
    if !EMAIL_PATTERN.is_match(email) {
        return Err("Please enter a valid email address");
    }
    Ok(())
}

/// 计费金额：(0, 1,000,000]
pub fn validate_billing(amount: f64) -> FieldResult {
    if amount.is_nan() || amount <= 0.0 {
        return Err("Billing amount must be greater than 0");
    }
    if amount > MAX_BILLING_AMOUNT {
        return Err("Billing amount seems unusually high");
    }
    Ok(())
}

/// 出生日期：1900-01-01 至今天
pub fn validate_date_of_birth(date_of_birth: NaiveDate, today: NaiveDate) -> FieldResult {
    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid calendar date");
    if date_of_birth < earliest || date_of_birth > today {
        return Err("Date of birth must be between 01/01/1900 and today");
    }
    Ok(())
}

/// 预约日期不得早于今天
pub fn validate_appointment_date(date: NaiveDate, today: NaiveDate) -> FieldResult {
    if date < today {
        return Err("Appointment date cannot be in the past");
    }
    Ok(())
}
