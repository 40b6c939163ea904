//! 通用工具函数

use uuid::Uuid;

/// 医生标识的命名空间
const DOCTOR_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_52a4_8d3e_4b7a_9e21_c0d4_57a8_e913);

/// 由科室与姓名派生稳定的医生标识
pub fn doctor_id(department: &str, name: &str) -> Uuid {
    Uuid::new_v5(&DOCTOR_NAMESPACE, format!("{}/{}", department, name).as_bytes())
}

/// 生成顺序患者编号，如 `P001`
pub fn patient_id(sequence: usize) -> String {
    format!("P{:03}", sequence)
}

/// 症状与检验名称的归一化形式
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// 按卢比金额格式输出，千分位分隔，保留两位小数
pub fn format_rupees(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}₹{}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}

/// 逗号拼接列表的序列化
///
/// 空列表写作 `None`，与表格数据集保持一致。
pub mod comma_list {
    use serde::{Deserialize, Deserializer, Serializer};

    const EMPTY: &str = "None";

    pub fn join(items: &[String]) -> String {
        if items.is_empty() {
            EMPTY.to_string()
        } else {
            items.join(", ")
        }
    }

    pub fn split(raw: &str) -> Vec<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == EMPTY {
            return Vec::new();
        }
        trimmed
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn serialize<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&join(items))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(split(&raw))
    }
}
