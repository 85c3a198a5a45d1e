//! 驱动层模块
//!
//! 本模块提供 ESP32 舵机控制器的设备驱动功能，包括：
//! - 一次性命令通道（fire-and-forget，不确认送达）
//! - 带重试的状态读取
//! - Active ID 选择状态机（单位步进 + 回读确认，带步数上限）
//! - 原子计数器指标
//!
//! # 使用场景
//!
//! 适用于需要逐条控制命令、自己编排选择和动作的场景。
//! 多舵机批量动作请使用 `servolink-client` 提供的 `MatrixSequencer`。
//!
//! # 并发模型
//!
//! `ServoDriver` 是控制器的唯一所有者，所有会改变控制器状态的方法都需要 `&mut self`。
//! 同一控制器上不支持多个驱动实例并发工作（Active ID 是控制器侧的共享状态）。

mod builder;
mod config;
mod driver;
mod error;
pub mod metrics;
pub mod selection;

pub use builder::ServoDriverBuilder;
pub use config::{DEFAULT_MAX_SELECT_STEPS, DriverConfig};
pub use driver::ServoDriver;
pub use error::DriverError;
pub use metrics::{DriverMetrics, MetricsSnapshot};
pub use selection::SelectionState;
