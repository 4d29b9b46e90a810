//! 由 Gauge suite 结果构造的被动检查载荷

use serde::{Deserialize, Serialize};

use crate::protocol::SuiteExecutionResult;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CRITICAL: u8 = 2;

/// `POST /v1/actions/process-check-result` 的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveCheckResult {
    pub plugin_output: String,
    pub exit_status: u8,
    pub performance_data: Vec<String>,
}

impl PassiveCheckResult {
    /// 把一次运行映射为检查结果：suite 失败或没有汇总时为 CRITICAL，否则 OK
    pub fn from_suite(result: &SuiteExecutionResult, run_name: &str) -> Self {
        let run = if run_name.is_empty() {
            String::new()
        } else {
            format!(" run {}", run_name)
        };

        let Some(suite) = result.suite_result.as_ref() else {
            return Self {
                plugin_output: format!(
                    "GAUGE CRITICAL{}: no suite result received",
                    subject_label(&run)
                ),
                exit_status: EXIT_CRITICAL,
                performance_data: Vec::new(),
            };
        };

        let (label, exit_status) = if suite.failed {
            ("CRITICAL", EXIT_CRITICAL)
        } else {
            ("OK", EXIT_OK)
        };

        let project = if suite.project_name.is_empty() {
            String::new()
        } else {
            format!(" {}", suite.project_name)
        };
        let environment = if suite.environment.is_empty() {
            String::new()
        } else {
            format!(" [{}]", suite.environment)
        };

        let subject = subject_label(&format!("{}{}{}", project, run, environment));

        let plugin_output = format!(
            "GAUGE {}{}: {} specs failed, {} skipped, success rate {:.2}%",
            label,
            subject,
            suite.specs_failed_count,
            suite.specs_skipped_count,
            suite.success_rate,
        );

        let performance_data = vec![
            format!("specs_failed={}", suite.specs_failed_count),
            format!("specs_skipped={}", suite.specs_skipped_count),
            format!("success_rate={:.2}%;;;0;100", suite.success_rate),
            format!("execution_time={:.3}s", suite.execution_time as f64 / 1000.0),
        ];

        Self {
            plugin_output,
            exit_status,
            performance_data,
        }
    }
}

// 空主题时省略 " -"，避免输出 "GAUGE OK -: ..."
fn subject_label(subject: &str) -> String {
    if subject.is_empty() {
        String::new()
    } else {
        format!(" -{}", subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtoSuiteResult;

    fn suite(failed: bool) -> SuiteExecutionResult {
        SuiteExecutionResult {
            suite_result: Some(ProtoSuiteResult {
                failed,
                specs_failed_count: if failed { 2 } else { 0 },
                specs_skipped_count: 1,
                success_rate: if failed { 60.0 } else { 100.0 },
                execution_time: 1534,
                project_name: "shop".to_string(),
                environment: "default".to_string(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_failed_suite_is_critical() {
        let check = PassiveCheckResult::from_suite(&suite(true), "2026-10-17 09.05.03");
        assert_eq!(check.exit_status, EXIT_CRITICAL);
        assert_eq!(
            check.plugin_output,
            "GAUGE CRITICAL - shop run 2026-10-17 09.05.03 [default]: 2 specs failed, 1 skipped, success rate 60.00%"
        );
        assert_eq!(
            check.performance_data,
            vec![
                "specs_failed=2",
                "specs_skipped=1",
                "success_rate=60.00%;;;0;100",
                "execution_time=1.534s",
            ]
        );
    }

    #[test]
    fn test_passing_suite_with_stable_name() {
        let check = PassiveCheckResult::from_suite(&suite(false), "");
        assert_eq!(check.exit_status, EXIT_OK);
        assert!(check.plugin_output.starts_with("GAUGE OK - shop [default]:"));
    }

    #[test]
    fn test_unlabelled_run_has_no_dangling_separator() {
        let result = SuiteExecutionResult {
            suite_result: Some(ProtoSuiteResult {
                success_rate: 100.0,
                ..Default::default()
            }),
        };
        let check = PassiveCheckResult::from_suite(&result, "");
        assert_eq!(
            check.plugin_output,
            "GAUGE OK: 0 specs failed, 0 skipped, success rate 100.00%"
        );

        let check = PassiveCheckResult::from_suite(&result, "2026-10-17 09.05.03");
        assert!(check.plugin_output.starts_with("GAUGE OK - run 2026-10-17 09.05.03:"));
    }

    #[test]
    fn test_missing_summary_is_critical() {
        let check = PassiveCheckResult::from_suite(&SuiteExecutionResult::default(), "");
        assert_eq!(check.exit_status, EXIT_CRITICAL);
        assert_eq!(check.plugin_output, "GAUGE CRITICAL: no suite result received");
        assert!(check.performance_data.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let check = PassiveCheckResult::from_suite(&suite(false), "");
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["exit_status"], 0);
        assert!(json["plugin_output"].is_string());
        assert_eq!(json["performance_data"].as_array().unwrap().len(), 4);
    }
}
