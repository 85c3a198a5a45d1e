//! `/readSTS` 状态文本解析
//!
//! 固件返回的是给网页直接显示的半结构化文本，例如：
//!
//! ```text
//! Active ID: 3  Mode: Servo<p>Position: 2047  Speed: 0  Load: 0.5
//! ```
//!
//! 记录之间用 `<p>` 或换行分隔，同一记录内的字段用两个空格分隔，
//! 每个字段形如 `Key: value`。

use crate::{FIELD_DELIMITER, ProtocolError, RECORD_MARKER, ServoId};
use std::collections::BTreeMap;
use std::fmt;

/// 当前选中舵机的字段名
pub const ACTIVE_ID_KEY: &str = "Active ID";

/// 状态字段值
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StatusValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StatusValue {
    /// 数值强制转换
    ///
    /// - 含小数点：尝试解析为 `f64`
    /// - 否则：尝试解析为 `i64`（允许正负号）
    /// - 都失败：保留为字符串
    pub fn coerce(raw: &str) -> Self {
        if raw.contains('.') {
            if let Ok(v) = raw.parse::<f64>() {
                return StatusValue::Float(v);
            }
        } else if let Ok(v) = raw.parse::<i64>() {
            return StatusValue::Int(v);
        }
        StatusValue::Text(raw.to_string())
    }

    /// 按整数读取
    ///
    /// 浮点数向零截断，字符串去除空白后按整数解析。
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StatusValue::Int(v) => Some(*v),
            StatusValue::Float(v) if v.is_finite() => {
                let truncated = v.trunc();
                if truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
                    Some(truncated as i64)
                } else {
                    None
                }
            },
            StatusValue::Float(_) => None,
            StatusValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatusValue::Int(v) => Some(*v as f64),
            StatusValue::Float(v) => Some(*v),
            StatusValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StatusValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusValue::Int(v) => write!(f, "{v}"),
            StatusValue::Float(v) => write!(f, "{v}"),
            StatusValue::Text(s) => f.write_str(s),
        }
    }
}

/// 解析后的舵机状态
///
/// 每次读取都重新构造，构造后不再修改。字段顺序没有语义，
/// 内部使用 `BTreeMap` 只是为了输出稳定。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ServoStatus {
    fields: BTreeMap<String, StatusValue>,
}

impl ServoStatus {
    /// 解析状态文本
    ///
    /// # 错误
    ///
    /// - `ProtocolError::EmptyStatus`: 输入为空
    ///
    /// 其它结构异常不会报错：缺少 `:` 的片段和空键会被丢弃，
    /// 结果可能是部分甚至空的映射。重复的键以后出现的值为准。
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        if text.is_empty() {
            return Err(ProtocolError::EmptyStatus);
        }

        let normalized = text.replace(RECORD_MARKER, "\n");
        let mut fields = BTreeMap::new();

        for line in normalized.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            for part in line.split(FIELD_DELIMITER) {
                let Some((key, value)) = part.split_once(':') else {
                    continue;
                };
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                fields.insert(key.to_string(), StatusValue::coerce(value.trim()));
            }
        }

        Ok(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&StatusValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatusValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 控制器报告的 Active ID
    ///
    /// 字段缺失、非数值、或超出 ID 范围时返回 `None`。
    pub fn active_id(&self) -> Option<ServoId> {
        self.get(ACTIVE_ID_KEY)
            .and_then(StatusValue::as_i64)
            .and_then(|v| ServoId::try_from(v).ok())
    }
}

impl fmt::Display for ServoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                StatusValue::Text(s) => write!(f, "{key}: {s:?}")?,
                other => write!(f, "{key}: {other}")?,
            }
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_mixed_types() {
        let status = ServoStatus::parse("A: 1  B: 2.5\nC: foo").unwrap();
        assert_eq!(status.len(), 3);
        assert_eq!(status.get("A"), Some(&StatusValue::Int(1)));
        assert_eq!(status.get("B"), Some(&StatusValue::Float(2.5)));
        assert_eq!(status.get("C"), Some(&StatusValue::Text("foo".to_string())));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert_eq!(ServoStatus::parse(""), Err(ProtocolError::EmptyStatus));
    }

    #[test]
    fn test_parse_whitespace_only_is_empty_map() {
        let status = ServoStatus::parse("  \n \n").unwrap();
        assert!(status.is_empty());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let status = ServoStatus::parse("Speed: 10<p>Speed: 20").unwrap();
        assert_eq!(status.get("Speed"), Some(&StatusValue::Int(20)));
    }

    #[test]
    fn test_record_marker_and_firmware_layout() {
        let raw = "Active ID: 3  Mode: Servo<p>Position: 2047  Voltage: 7.4<p>Load: -12";
        let status = ServoStatus::parse(raw).unwrap();
        assert_eq!(status.active_id(), Some(ServoId(3)));
        assert_eq!(status.get("Mode").and_then(StatusValue::as_str), Some("Servo"));
        assert_eq!(status.get("Voltage"), Some(&StatusValue::Float(7.4)));
        assert_eq!(status.get("Load"), Some(&StatusValue::Int(-12)));
    }

    #[test]
    fn test_fields_without_colon_are_dropped() {
        let status = ServoStatus::parse("garbage  Key: 1  more garbage").unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status.get("Key"), Some(&StatusValue::Int(1)));
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let status = ServoStatus::parse("Time: 12:30").unwrap();
        assert_eq!(status.get("Time"), Some(&StatusValue::Text("12:30".into())));
    }

    #[test]
    fn test_malformed_numbers_stay_text() {
        let status = ServoStatus::parse("V: 1.2.3  W: 12a  E: ").unwrap();
        assert_eq!(status.get("V"), Some(&StatusValue::Text("1.2.3".into())));
        assert_eq!(status.get("W"), Some(&StatusValue::Text("12a".into())));
        assert_eq!(status.get("E"), Some(&StatusValue::Text(String::new())));
    }

    #[test]
    fn test_active_id_variants() {
        let as_float = ServoStatus::parse("Active ID: 4.0").unwrap();
        assert_eq!(as_float.active_id(), Some(ServoId(4)));

        let as_text = ServoStatus::parse("Active ID: none").unwrap();
        assert_eq!(as_text.active_id(), None);

        let negative = ServoStatus::parse("Active ID: -1").unwrap();
        assert_eq!(negative.active_id(), None);

        let broadcast = ServoStatus::parse("Active ID: 254").unwrap();
        assert_eq!(broadcast.active_id(), None);

        let reserved = ServoStatus::parse("Active ID: 255").unwrap();
        assert_eq!(reserved.active_id(), None);

        let missing = ServoStatus::parse("Mode: Servo").unwrap();
        assert_eq!(missing.active_id(), None);
    }

    #[test]
    fn test_display_is_stable() {
        let status = ServoStatus::parse("B: x  A: 1").unwrap();
        assert_eq!(status.to_string(), "{A: 1, B: \"x\"}");
    }

    proptest! {
        #[test]
        fn prop_parse_never_fails_on_non_empty(text in ".{1,200}") {
            prop_assert!(ServoStatus::parse(&text).is_ok());
        }

        #[test]
        fn prop_integer_fields_roundtrip(key in "[A-Za-z][A-Za-z_]{0,11}", value in any::<i64>()) {
            let status = ServoStatus::parse(&format!("{key}: {value}")).unwrap();
            prop_assert_eq!(status.get(key.as_str()), Some(&StatusValue::Int(value)));
        }
    }
}
