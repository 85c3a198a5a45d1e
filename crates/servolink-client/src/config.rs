//! 编排配置

use servolink_protocol::ServoOp;
use std::time::Duration;

/// 激活流程的默认动作序列
pub const DEFAULT_ROUTINE: [ServoOp; 3] =
    [ServoOp::Middle, ServoOp::PositionPlus, ServoOp::PositionMinus];

/// 编排配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    /// 每次尝试（无论成败）之后的等待时间
    pub delay: Duration,
    /// 单个动作的最大尝试次数（0 按 1 处理）
    pub action_retries: u32,
    /// 激活一个舵机时依次执行的动作
    pub routine: Vec<ServoOp>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
            action_retries: 3,
            routine: DEFAULT_ROUTINE.to_vec(),
        }
    }
}

impl SequencerConfig {
    pub fn action_attempts(&self) -> u32 {
        self.action_retries.max(1)
    }
}
