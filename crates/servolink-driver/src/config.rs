//! 驱动配置

use std::time::Duration;

/// 默认选择步数上限
///
/// 等于 `u8` ID 空间大小：正确回报 ID 的控制器从任意起点出发，
/// 单位步进都不可能超过这个步数。
pub const DEFAULT_MAX_SELECT_STEPS: u32 = 256;

/// 驱动配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// 单个 HTTP 请求的超时
    pub timeout: Duration,
    /// 读取端点的最大尝试次数（0 按 1 处理）
    pub read_retries: u32,
    /// 读取失败后的等待时间
    pub retry_delay: Duration,
    /// ID± 命令之后、回读状态之前的等待时间
    pub settle_delay: Duration,
    /// 单次选择允许的最大 ID± 步数
    ///
    /// `None` 表示不设上限：如果控制器一直报告错误的 ID，选择会无限循环。
    pub max_select_steps: Option<u32>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            read_retries: 3,
            retry_delay: Duration::from_millis(200),
            settle_delay: Duration::from_millis(150),
            max_select_steps: Some(DEFAULT_MAX_SELECT_STEPS),
        }
    }
}

impl DriverConfig {
    /// 实际的读取尝试次数
    pub fn read_attempts(&self) -> u32 {
        self.read_retries.max(1)
    }
}
