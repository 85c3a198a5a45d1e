//! # Servolink Protocol
//!
//! ESP32 舵机控制器 HTTP 协议定义（无网络依赖）
//!
//! ## 模块
//!
//! - `endpoints`: HTTP 端点与查询参数名常量
//! - `ops`: 具名操作 → 命令四元组的固定映射表
//! - `status`: `/readSTS` 自由文本的解析
//!
//! ## 命令模型
//!
//! 控制器的全部命令词汇都编码为 `(inputT, inputI, inputA, inputB)` 四个整数，
//! 通过 `GET /cmd` 的查询参数发送。本 crate 只负责编码和解析，不发送任何请求。

pub mod endpoints;
pub mod ops;
pub mod status;

// 重新导出常用类型
pub use endpoints::*;
pub use ops::ServoOp;
pub use status::{ACTIVE_ID_KEY, ServoStatus, StatusValue};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// 状态文本为空（控制器没有返回任何内容）
    #[error("Empty status response")]
    EmptyStatus,

    #[error("Unknown servo operation: {0}")]
    UnknownOp(String),

    #[error("Invalid servo id: {0}")]
    InvalidServoId(String),
}

/// 舵机 ID
///
/// 总线上的舵机地址。控制器同一时刻只有一个 "Active ID"，
/// 该状态保存在控制器侧，客户端每次操作前都需要重新确认。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ServoId(pub u8);

impl ServoId {
    /// 总线允许的最大 ID（0xFE 为广播地址，0xFF 保留）
    pub const MAX: ServoId = ServoId(253);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for ServoId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl From<ServoId> for i64 {
    fn from(id: ServoId) -> Self {
        id.0 as i64
    }
}

impl TryFrom<i64> for ServoId {
    type Error = ProtocolError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|&id| id <= Self::MAX.0)
            .map(ServoId)
            .ok_or_else(|| ProtocolError::InvalidServoId(value.to_string()))
    }
}

impl FromStr for ServoId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(|v| ServoId::try_from(v).ok())
            .ok_or_else(|| ProtocolError::InvalidServoId(s.to_string()))
    }
}

impl fmt::Display for ServoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `/cmd` 命令四元组
///
/// # 字段
///
/// - `command_type`（inputT）：命令类别，0 = ID 选择，1 = 运动/配置，9 = 搜索
/// - `command_index`（inputI）：类别内的命令编号，ID 选择时为 ±1
/// - `arg_a` / `arg_b`（inputA / inputB）：附加参数，默认 0
///
/// 所有字段都是整数，这是控制器固件唯一接受的参数形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub command_type: i32,
    pub command_index: i32,
    pub arg_a: i32,
    pub arg_b: i32,
}

impl Command {
    /// 创建命令（附加参数为 0）
    pub const fn new(command_type: i32, command_index: i32) -> Self {
        Self {
            command_type,
            command_index,
            arg_a: 0,
            arg_b: 0,
        }
    }

    /// 设置附加参数
    pub const fn with_args(mut self, arg_a: i32, arg_b: i32) -> Self {
        self.arg_a = arg_a;
        self.arg_b = arg_b;
        self
    }

    /// 生成 `/cmd` 查询参数（顺序固定：T, I, A, B）
    pub fn query_pairs(&self) -> [(&'static str, i32); 4] {
        [
            (PARAM_TYPE, self.command_type),
            (PARAM_INDEX, self.command_index),
            (PARAM_ARG_A, self.arg_a),
            (PARAM_ARG_B, self.arg_b),
        ]
    }
}

impl From<ServoOp> for Command {
    fn from(op: ServoOp) -> Self {
        op.command()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.command_type, self.command_index, self.arg_a, self.arg_b
        )
    }
}
