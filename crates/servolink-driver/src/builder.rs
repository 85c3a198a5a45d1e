//! Builder 模式实现
//!
//! 提供链式构造 `ServoDriver` 实例的便捷方式。

use crate::config::DriverConfig;
use crate::driver::ServoDriver;
use crate::error::DriverError;
use servolink_http::HttpTransport;
#[cfg(feature = "reqwest-backend")]
use servolink_http::ReqwestTransport;
use std::time::Duration;
use tracing::info;

/// ServoDriver Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use servolink_driver::ServoDriverBuilder;
/// use std::time::Duration;
///
/// let driver = ServoDriverBuilder::new()
///     .address("192.168.4.1")
///     .read_retries(5)
///     .settle_delay(Duration::from_millis(100))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServoDriverBuilder {
    /// 控制器地址（IP、`IP:port` 或完整 URL）
    address: Option<String>,
    config: DriverConfig,
}

impl ServoDriverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置控制器地址（使用 reqwest 后端时必需）
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// 单个请求超时（默认 2s）
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// 读取最大尝试次数（默认 3）
    pub fn read_retries(mut self, retries: u32) -> Self {
        self.config.read_retries = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// ID± 命令后的等待时间（默认 150ms）
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// 选择步数上限，`None` 表示不限制
    pub fn max_select_steps(mut self, max: Option<u32>) -> Self {
        self.config.max_select_steps = max;
        self
    }

    /// 整体替换驱动配置
    pub fn config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// 使用 reqwest 后端构建驱动
    ///
    /// # 错误
    ///
    /// - `DriverError::InvalidConfig`: 未设置地址
    /// - `DriverError::Transport`: 地址无效或 HTTP 客户端初始化失败
    #[cfg(feature = "reqwest-backend")]
    pub fn build(self) -> Result<ServoDriver<ReqwestTransport>, DriverError> {
        let address = self
            .address
            .as_deref()
            .ok_or_else(|| DriverError::InvalidConfig("device address is required".into()))?;
        let transport = ReqwestTransport::new(address)?;
        Ok(self.build_with(transport))
    }

    /// 使用自定义传输构建驱动（测试或其它 HTTP 后端）
    pub fn build_with<T: HttpTransport>(self, transport: T) -> ServoDriver<T> {
        info!(
            "Servo controller at {} (timeout {:?}, {} read attempts)",
            transport.base_url(),
            self.config.timeout,
            self.config.read_attempts()
        );
        ServoDriver::new(transport, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servolink_http::MockController;

    #[test]
    fn test_builder_applies_settings() {
        let driver = ServoDriverBuilder::new()
            .timeout(Duration::from_millis(500))
            .read_retries(7)
            .retry_delay(Duration::from_millis(10))
            .settle_delay(Duration::ZERO)
            .max_select_steps(None)
            .build_with(MockController::default());

        let config = driver.config();
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.read_retries, 7);
        assert_eq!(config.retry_delay, Duration::from_millis(10));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.max_select_steps, None);
    }

    #[test]
    fn test_builder_defaults() {
        let driver = ServoDriverBuilder::new().build_with(MockController::default());
        assert_eq!(driver.config(), &DriverConfig::default());
        assert_eq!(driver.transport().base_url(), "http://mock-controller");
    }

    #[cfg(feature = "reqwest-backend")]
    #[test]
    fn test_build_requires_address() {
        assert!(matches!(
            ServoDriverBuilder::new().build(),
            Err(DriverError::InvalidConfig(_))
        ));
    }

    #[cfg(feature = "reqwest-backend")]
    #[test]
    fn test_build_rejects_bad_address() {
        assert!(matches!(
            ServoDriverBuilder::new().address("not a host").build(),
            Err(DriverError::Transport(_))
        ));
    }

    #[cfg(feature = "reqwest-backend")]
    #[test]
    fn test_build_with_address() {
        let driver = ServoDriverBuilder::new().address("192.168.4.1").build().unwrap();
        assert_eq!(driver.transport().base_url(), "http://192.168.4.1");
    }
}
