//! 编排层模块
//!
//! 在 `ServoDriver` 之上提供多舵机的批量动作编排：
//! - 单个动作的 "选择 + 执行" 重试单元（`attempt_command` / `attempt_with`）
//! - 按行列角色的激活流程（`activate_column` / `activate_row`）
//! - 先进先出的工作队列（`enqueue` / `process_queue`）
//!
//! 单个舵机或单个棋子失败只会记录在报告里，不会中断整批处理。
//!
//! # Example
//!
//! ```no_run
//! use servolink_client::{MatrixSequencer, SequencerConfig};
//! use servolink_driver::ServoDriverBuilder;
//! use servolink_protocol::ServoId;
//!
//! let driver = ServoDriverBuilder::new().address("192.168.4.1").build().unwrap();
//! let mut sequencer = MatrixSequencer::new(driver, SequencerConfig::default());
//!
//! sequencer.enqueue(ServoId(1), ServoId(2));
//! sequencer.enqueue(ServoId(3), ServoId(1));
//! for piece in sequencer.process_queue() {
//!     println!("{}", piece);
//! }
//! ```

mod config;
mod error;
mod sequencer;
pub mod types;

pub use config::{DEFAULT_ROUTINE, SequencerConfig};
pub use error::SequenceError;
pub use sequencer::MatrixSequencer;
pub use types::{ActivationReport, PieceReport, ServoRole, StepOutcome, WorkItem};
