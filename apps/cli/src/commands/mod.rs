//! 命令定义和实现

pub mod config;
pub mod matrix;
pub mod servo;

pub use config::ConfigCommand;
pub use matrix::{ActivateCommand, MatrixCommand};
pub use servo::{OpCommand, RawCommand, SelectCommand, StatusCommand};

use crate::profile::Profile;
use anyhow::{Context, Result};
use servolink_sdk::{MatrixSequencer, ReqwestTransport, ServoDriver, ServoDriverBuilder};
use std::path::PathBuf;
use tracing::debug;

/// 一次 CLI 调用的上下文：合并了命令行覆盖项后的配置
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: Profile,
    pub profile_path: PathBuf,
}

impl Session {
    /// 连接控制器
    pub fn connect(&self) -> Result<ServoDriver<ReqwestTransport>> {
        let device = self.profile.device.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "未设置控制器地址（配置文件 {}）：使用 --device 或 `servolink-cli config set --device <ip>`",
                self.profile_path.display()
            )
        })?;

        debug!("Using profile {}", self.profile_path.display());
        ServoDriverBuilder::new()
            .address(device)
            .config(self.profile.driver_config())
            .build()
            .with_context(|| format!("无法连接控制器 {device}"))
    }

    pub fn sequencer(&self) -> Result<MatrixSequencer<ReqwestTransport>> {
        Ok(MatrixSequencer::new(
            self.connect()?,
            self.profile.sequencer_config(),
        ))
    }
}
