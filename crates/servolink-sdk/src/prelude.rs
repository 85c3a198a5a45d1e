//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use servolink_sdk::prelude::*;
//! ```

// 编排层（推荐使用）
pub use crate::client::{MatrixSequencer, SequencerConfig, ServoRole};

// 驱动层
pub use crate::driver::{DriverConfig, SelectionState, ServoDriver, ServoDriverBuilder};

// 协议类型
pub use crate::protocol::{Command, ServoId, ServoOp, ServoStatus, StatusValue};

// 传输 Trait
pub use crate::http::HttpTransport;

// 错误类型
pub use crate::client::SequenceError;
pub use crate::driver::DriverError;
pub use crate::http::TransportError;
pub use crate::protocol::ProtocolError;
