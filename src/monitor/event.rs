//! Icinga 事件流记录
//!
//! 每行一个 JSON 对象。只有 `"type": "CheckResult"` 携带状态，
//! 其余类型报告为 [`StreamRecord::Other`]。

use serde::{Deserialize, Deserializer};

/// 会更新状态的事件类型
pub const CHECK_RESULT_TYPE: &str = "CheckResult";

/// Icinga 对象名中 host 与 service 的分隔符
pub const SERVICE_SEPARATOR: char = '!';

/// 事件流中解码后的一行
#[derive(Debug, Clone, PartialEq)]
pub enum StreamRecord {
    CheckResult(CheckResultEvent),
    /// 格式正确的其他类型记录
    Other { kind: String },
    Malformed { reason: String },
}

/// 检查结果属于 host 还是其 service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckTarget {
    Host,
    Service,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckResultEvent {
    pub host: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub service: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    pub check_result: CheckResultField,
}

/// 线上原样的 `check_result` 字段。
///
/// 有的来源给出 JSON 对象，有的给出编码后的字符串。两者分开保存，
/// 只有结构化形式会用于更新状态。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CheckResultField {
    Structured(CheckResult),
    Encoded(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckResult {
    #[serde(deserialize_with = "state_code")]
    pub state: u32,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub exit_status: Option<f64>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub check_source: Option<String>,
}

impl CheckResultEvent {
    pub fn target(&self) -> CheckTarget {
        if self.service.is_some() {
            CheckTarget::Service
        } else {
            CheckTarget::Host
        }
    }

    /// host 检查为 `host`，service 检查为 `host!service`
    pub fn identity(&self) -> String {
        match &self.service {
            Some(service) => format!("{}{}{}", self.host, SERVICE_SEPARATOR, service),
            None => self.host.clone(),
        }
    }

    /// 结构化结果 (如果有)
    pub fn structured(&self) -> Option<&CheckResult> {
        match &self.check_result {
            CheckResultField::Structured(result) => Some(result),
            CheckResultField::Encoded(_) => None,
        }
    }
}

/// 解码事件流中的一行
pub fn parse_record(line: &str) -> StreamRecord {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            return StreamRecord::Malformed {
                reason: e.to_string(),
            }
        }
    };

    let Some(kind) = value.get("type").and_then(|t| t.as_str()) else {
        return StreamRecord::Malformed {
            reason: "missing string field 'type'".to_string(),
        };
    };

    if kind != CHECK_RESULT_TYPE {
        return StreamRecord::Other {
            kind: kind.to_string(),
        };
    }

    match serde_json::from_value::<CheckResultEvent>(value) {
        Ok(event) => StreamRecord::CheckResult(event),
        Err(e) => StreamRecord::Malformed {
            reason: e.to_string(),
        },
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// Icinga 把状态序列化为浮点数 (0.0, 2.0, ...)
fn state_code<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= u32::MAX as f64 {
        Ok(raw as u32)
    } else {
        Err(serde::de::Error::custom(format!("invalid state code {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_LINE: &str = r#"{"check_result":{"active":true,"check_source":"icinga2","exit_status":2.0,"output":"SSH CRITICAL - connection refused","state":2.0},"host":"i-a78837bf","service":"ssh","timestamp":1461245300.12,"type":"CheckResult"}"#;

    #[test]
    fn test_parse_service_check_result() {
        let StreamRecord::CheckResult(event) = parse_record(SERVICE_LINE) else {
            panic!("expected a check result");
        };
        assert_eq!(event.identity(), "i-a78837bf!ssh");
        assert_eq!(event.target(), CheckTarget::Service);
        let result = event.structured().unwrap();
        assert_eq!(result.state, 2);
        assert_eq!(result.output, "SSH CRITICAL - connection refused");
        assert_eq!(result.active, Some(true));
        assert_eq!(result.check_source.as_deref(), Some("icinga2"));
    }

    #[test]
    fn test_empty_service_is_host_check() {
        let line = r#"{"type":"CheckResult","host":"h1","service":"","check_result":{"state":0,"output":"PING OK"}}"#;
        let StreamRecord::CheckResult(event) = parse_record(line) else {
            panic!("expected a check result");
        };
        assert_eq!(event.identity(), "h1");
        assert_eq!(event.target(), CheckTarget::Host);
    }

    #[test]
    fn test_missing_service_is_host_check() {
        let line = r#"{"type":"CheckResult","host":"h1","check_result":{"state":1}}"#;
        let StreamRecord::CheckResult(event) = parse_record(line) else {
            panic!("expected a check result");
        };
        assert_eq!(event.identity(), "h1");
        assert_eq!(event.structured().unwrap().output, "");
    }

    #[test]
    fn test_encoded_check_result_is_kept_apart() {
        let line = r#"{"type":"CheckResult","host":"h1","service":"ssh","check_result":"{\"state\":2}"}"#;
        let StreamRecord::CheckResult(event) = parse_record(line) else {
            panic!("expected a check result");
        };
        assert!(event.structured().is_none());
        assert_eq!(
            event.check_result,
            CheckResultField::Encoded("{\"state\":2}".to_string())
        );
    }

    #[test]
    fn test_other_types() {
        let line = r#"{"type":"StateChange","host":"h1","state":1}"#;
        assert_eq!(
            parse_record(line),
            StreamRecord::Other {
                kind: "StateChange".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_records() {
        for line in [
            "not json",
            "[1,2,3]",
            r#"{"host":"h1"}"#,
            r#"{"type":"CheckResult","check_result":{"state":0}}"#,
            r#"{"type":"CheckResult","host":"h1","check_result":{"state":-1}}"#,
            r#"{"type":"CheckResult","host":"h1","check_result":{"state":1.5}}"#,
            r#"{"type":"CheckResult","host":"h1","check_result":{"output":"no state"}}"#,
        ] {
            assert!(
                matches!(parse_record(line), StreamRecord::Malformed { .. }),
                "expected malformed: {}",
                line
            );
        }
    }
}
