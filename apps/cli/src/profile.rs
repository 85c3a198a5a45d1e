//! CLI 配置文件
//!
//! TOML 格式，所有时间字段以毫秒为单位，未设置的字段使用库的默认值：
//!
//! ```toml
//! device = "192.168.4.1"
//! timeout_ms = 2000
//! settle_ms = 150
//! max_select_steps = 256   # 0 表示不限制
//! routine = ["middle", "position_plus", "stop", "position_minus", "stop"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use servolink_sdk::{DriverConfig, SequencerConfig, ServoOp};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件路径：`<config_dir>/servolink/config.toml`
pub fn default_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("servolink");
    path.push("config.toml");
    Ok(path)
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// 控制器地址
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_ms: Option<u64>,
    /// 选择步数上限（0 表示不限制）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_select_steps: Option<u32>,
    /// 编排动作之间的等待时间
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_retries: Option<u32>,
    /// 激活流程
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine: Option<Vec<ServoOp>>,
}

impl Profile {
    /// 加载配置（文件不存在时返回空配置）
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let body = toml::to_string_pretty(self).context("序列化配置失败")?;
        let content = format!("# Servolink CLI Configuration\n\n{body}");
        fs::write(path, content).with_context(|| format!("写入配置文件失败: {}", path.display()))
    }

    /// 用 `other` 中已设置的字段覆盖当前配置
    pub fn merge(&mut self, other: Profile) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(
            device,
            timeout_ms,
            read_retries,
            retry_delay_ms,
            settle_ms,
            max_select_steps,
            delay_ms,
            action_retries,
            routine
        );
    }

    pub fn driver_config(&self) -> DriverConfig {
        let defaults = DriverConfig::default();
        DriverConfig {
            timeout: self.timeout_ms.map(Duration::from_millis).unwrap_or(defaults.timeout),
            read_retries: self.read_retries.unwrap_or(defaults.read_retries),
            retry_delay: self
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            settle_delay: self.settle_ms.map(Duration::from_millis).unwrap_or(defaults.settle_delay),
            max_select_steps: match self.max_select_steps {
                Some(0) => None,
                Some(n) => Some(n),
                None => defaults.max_select_steps,
            },
        }
    }

    pub fn sequencer_config(&self) -> SequencerConfig {
        let defaults = SequencerConfig::default();
        SequencerConfig {
            delay: self.delay_ms.map(Duration::from_millis).unwrap_or(defaults.delay),
            action_retries: self.action_retries.unwrap_or(defaults.action_retries),
            routine: self.routine.clone().unwrap_or(defaults.routine),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile::load(&dir.path().join("none.toml")).unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let profile = Profile {
            device: Some("192.168.4.1".into()),
            settle_ms: Some(80),
            routine: Some(vec![ServoOp::Middle, ServoOp::Stop]),
            ..Default::default()
        };
        profile.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Servolink CLI Configuration"));
        assert!(content.contains("device = \"192.168.4.1\""));
        assert_eq!(Profile::load(&path).unwrap(), profile);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "devcie = \"x\"\n").unwrap();
        assert!(Profile::load(&path).is_err());
    }

    #[test]
    fn test_driver_config_mapping() {
        let profile = Profile {
            timeout_ms: Some(500),
            max_select_steps: Some(0),
            ..Default::default()
        };
        let config = profile.driver_config();
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.max_select_steps, None);
        assert_eq!(config.read_retries, 3);

        assert_eq!(Profile::default().driver_config(), DriverConfig::default());
        assert_eq!(Profile::default().sequencer_config(), SequencerConfig::default());
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base = Profile {
            device: Some("10.0.0.1".into()),
            delay_ms: Some(100),
            ..Default::default()
        };
        base.merge(Profile {
            device: Some("10.0.0.2".into()),
            ..Default::default()
        });
        assert_eq!(base.device.as_deref(), Some("10.0.0.2"));
        assert_eq!(base.delay_ms, Some(100));
    }
}
