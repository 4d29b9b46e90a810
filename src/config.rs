//! 从环境变量读取的配置，启动时解析一次

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::notification::{IcingaConfig, RunNaming};

/// Gauge 总是在本地回环地址上等待插件连接
pub const GAUGE_HOST: &str = "127.0.0.1";

/// Gauge 设置，告诉插件启动原因
pub const PLUGIN_ACTION_ENV: &str = "icinga-psv-notify_action";
pub const EXECUTION_ACTION: &str = "execution";

pub const GAUGE_PORT_ENV: &str = "plugin_connection_port";
pub const PROJECT_ROOT_ENV: &str = "GAUGE_PROJECT_ROOT";
pub const OVERWRITE_REPORTS_ENV: &str = "overwrite_reports";
pub const ICINGA_URL_ENV: &str = "icinga_url";
pub const ICINGA_HOSTNAME_ENV: &str = "icinga_hostname";
pub const ICINGA_CHECK_ENV: &str = "icinga_check";
pub const ICINGA_USER_ENV: &str = "icinga_user";
pub const ICINGA_PASSWORD_ENV: &str = "icinga_password";
pub const ICINGA_INSECURE_ENV: &str = "icinga_insecure";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub gauge_host: String,
    pub gauge_port: u16,
    pub project_root: Option<PathBuf>,
    pub naming: RunNaming,
    /// 未配置 Icinga URL 时为 `None`，结果只记录日志
    pub icinga: Option<IcingaConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过 `lookup` 解析配置，空值视为未设置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get(GAUGE_PORT_ENV).ok_or(ConfigError::Missing(GAUGE_PORT_ENV))?;
        let gauge_port = port.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: GAUGE_PORT_ENV,
            value: port.clone(),
        })?;

        let naming = RunNaming::from_overwrite(is_true(get(OVERWRITE_REPORTS_ENV).as_deref()));

        let icinga = match get(ICINGA_URL_ENV) {
            None => None,
            Some(base_url) => {
                let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
                Some(IcingaConfig {
                    base_url,
                    host: require(ICINGA_HOSTNAME_ENV)?,
                    check: get(ICINGA_CHECK_ENV).unwrap_or_else(|| IcingaConfig::default().check),
                    user: require(ICINGA_USER_ENV)?,
                    password: require(ICINGA_PASSWORD_ENV)?,
                    insecure: is_true(get(ICINGA_INSECURE_ENV).as_deref()),
                    ..Default::default()
                })
            }
        };

        Ok(Self {
            gauge_host: GAUGE_HOST.to_string(),
            gauge_port,
            // 手动运行时可能没有设置，此时沿用当前工作目录而不是退出
            project_root: get(PROJECT_ROOT_ENV).map(PathBuf::from),
            naming,
            icinga,
        })
    }
}

/// Gauge 在安装/卸载时也会启动插件；只有 `execution`
/// (或手动运行时没有 action) 才启动监听。
pub fn is_execution_action<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(PLUGIN_ACTION_ENV) {
        Some(action) => action.trim() == EXECUTION_ACTION,
        None => true,
    }
}

fn is_true(value: Option<&str>) -> bool {
    value.map(|v| v.trim().eq_ignore_ascii_case("true")).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_plugin_action() {
        assert!(is_execution_action(lookup(&[])));
        assert!(is_execution_action(lookup(&[(PLUGIN_ACTION_ENV, "execution")])));
        assert!(!is_execution_action(lookup(&[(PLUGIN_ACTION_ENV, "install")])));
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_lookup(lookup(&[(GAUGE_PORT_ENV, "46123")])).unwrap();
        assert_eq!(config.gauge_host, "127.0.0.1");
        assert_eq!(config.gauge_port, 46123);
        assert_eq!(config.naming, RunNaming::Timestamped);
        assert!(config.icinga.is_none());
        assert!(config.project_root.is_none());
    }

    #[test]
    fn test_missing_or_invalid_port() {
        assert_eq!(
            Config::from_lookup(lookup(&[])),
            Err(ConfigError::Missing(GAUGE_PORT_ENV))
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[(GAUGE_PORT_ENV, "not-a-port")])),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_overwrite_reports_selects_stable_naming() {
        let config = Config::from_lookup(lookup(&[
            (GAUGE_PORT_ENV, "1"),
            (OVERWRITE_REPORTS_ENV, "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.naming, RunNaming::Stable);
    }

    #[test]
    fn test_icinga_group() {
        let config = Config::from_lookup(lookup(&[
            (GAUGE_PORT_ENV, "1"),
            (ICINGA_URL_ENV, "https://icinga:5665"),
            (ICINGA_HOSTNAME_ENV, "ci"),
            (ICINGA_USER_ENV, "root"),
            (ICINGA_PASSWORD_ENV, "secret"),
        ]))
        .unwrap();
        let icinga = config.icinga.unwrap();
        assert_eq!(icinga.host, "ci");
        assert_eq!(icinga.check, "gauge");
        assert!(!icinga.insecure);

        let incomplete = Config::from_lookup(lookup(&[
            (GAUGE_PORT_ENV, "1"),
            (ICINGA_URL_ENV, "https://icinga:5665"),
            (ICINGA_HOSTNAME_ENV, "ci"),
        ]));
        assert_eq!(incomplete, Err(ConfigError::Missing(ICINGA_USER_ENV)));
    }
}
