//! 驱动层错误类型定义

use servolink_http::TransportError;
use servolink_protocol::{ProtocolError, ServoId};
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// 传输层错误
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 协议解析错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 读取端点在全部重试后仍然失败
    #[error("Failed after {attempts} attempts: /{endpoint} ({last})")]
    ReadExhausted {
        endpoint: String,
        attempts: u32,
        last: TransportError,
    },

    /// 状态中缺少 Active ID 或其值不是有效的舵机 ID
    #[error("Invalid Active ID in status: {raw:?}")]
    InvalidActiveId { raw: Option<String> },

    /// 选择步数超过上限（控制器可能误报 ID）
    #[error("Selecting servo {target} exceeded {steps} steps (last reported: {last_seen})")]
    SelectionStepLimit {
        target: ServoId,
        last_seen: ServoId,
        steps: u32,
    },

    /// 配置无效
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriverError {
    /// 是否为读取失败（网络层面，重试后仍失败）
    pub fn is_read_failure(&self) -> bool {
        matches!(self, DriverError::ReadExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::ReadExhausted {
            endpoint: "readSTS".to_string(),
            attempts: 3,
            last: TransportError::Timeout,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempts") && msg.contains("/readSTS"), "{msg}");

        let err = DriverError::SelectionStepLimit {
            target: ServoId(9),
            last_seen: ServoId(4),
            steps: 256,
        };
        let msg = err.to_string();
        assert!(msg.contains("servo 9") && msg.contains("256"), "{msg}");

        let err = DriverError::InvalidActiveId { raw: None };
        assert_eq!(err.to_string(), "Invalid Active ID in status: None");
    }

    #[test]
    fn test_from_transport_error() {
        let err: DriverError = TransportError::Timeout.into();
        assert!(matches!(err, DriverError::Transport(TransportError::Timeout)));
        assert!(!err.is_read_failure());
    }

    #[test]
    fn test_from_protocol_error() {
        let err: DriverError = ProtocolError::EmptyStatus.into();
        assert!(matches!(err, DriverError::Protocol(ProtocolError::EmptyStatus)));
    }
}
