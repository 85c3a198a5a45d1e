//! Servolink SDK - ESP32 HTTP 舵机控制器 Rust SDK
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 命令四元组、具名操作表、状态文本解析
//! - **传输层** (`http`): `HttpTransport` 抽象，reqwest 阻塞后端与模拟控制器
//! - **驱动层** (`driver`): 命令通道、带重试的读取、Active ID 选择
//! - **编排层** (`client`): 带重试的多舵机激活与 FIFO 工作队列
//!
//! # 快速开始
//!
//! ```no_run
//! use servolink_sdk::prelude::*;
//!
//! servolink_sdk::init_logger();
//!
//! let driver = ServoDriverBuilder::new().address("192.168.4.1").build().unwrap();
//! let mut sequencer = MatrixSequencer::new(driver, SequencerConfig::default());
//! sequencer.enqueue(ServoId(1), ServoId(2));
//! let reports = sequencer.process_queue();
//! ```

pub use servolink_client as client;
pub use servolink_driver as driver;
pub use servolink_http as http;
pub use servolink_protocol as protocol;

pub mod prelude;

// --- 公共 API ---

pub use protocol::{Command, ProtocolError, ServoId, ServoOp, ServoStatus, StatusValue};

pub use http::{HttpTransport, TransportError};

#[cfg(feature = "reqwest-backend")]
pub use http::ReqwestTransport;

pub use driver::{DriverConfig, DriverError, SelectionState, ServoDriver, ServoDriverBuilder};

pub use client::{
    ActivationReport, MatrixSequencer, PieceReport, SequenceError, SequencerConfig, ServoRole,
    WorkItem,
};

/// 默认日志级别（`RUST_LOG` 未设置时）
const DEFAULT_LOG_FILTER: &str = "info";

/// 初始化日志
///
/// 安装 `tracing-subscriber` 的 fmt subscriber，级别由 `RUST_LOG` 控制（默认 `info`），
/// 并把 `log` crate 的记录转发到 tracing。重复调用是安全的：已有全局 subscriber 时什么也不做。
pub fn init_logger() {
    init_logger_with(DEFAULT_LOG_FILTER);
}

/// 使用指定的默认过滤规则初始化日志（`RUST_LOG` 仍然优先）
pub fn init_logger_with(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    match tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        // try_init 在 tracing-log feature 下已经装好了 LogTracer
        Ok(()) => tracing::debug!(filter = default_filter, "servolink logger initialised"),
        // 全局 subscriber 已由调用方安装，只补上 log 转发（已有 logger 时忽略）
        Err(_) => {
            let _ = tracing_log::LogTracer::init();
        },
    }
}
