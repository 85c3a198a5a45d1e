//! 编排层错误类型定义

use servolink_driver::DriverError;
use servolink_protocol::ServoId;
use thiserror::Error;

/// 编排层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// 选择或动作在全部尝试后仍然失败
    #[error("{label} on servo {servo} failed after {attempts} attempts: {last}")]
    AttemptsExhausted {
        servo: ServoId,
        label: String,
        attempts: u32,
        last: DriverError,
    },
}

impl SequenceError {
    /// 最后一次失败的驱动层错误
    pub fn last_error(&self) -> &DriverError {
        match self {
            SequenceError::AttemptsExhausted { last, .. } => last,
        }
    }
}
