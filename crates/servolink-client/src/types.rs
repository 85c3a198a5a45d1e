//! 编排结果类型

use servolink_protocol::{ServoId, ServoOp, ServoStatus};
use std::fmt;

/// 舵机在矩阵中的角色（只影响日志和报告）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServoRole {
    Column,
    Row,
    Generic,
}

impl fmt::Display for ServoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServoRole::Column => f.write_str("column"),
            ServoRole::Row => f.write_str("row"),
            ServoRole::Generic => f.write_str("servo"),
        }
    }
}

/// 队列中的一个棋子：先激活列舵机，再激活行舵机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkItem {
    pub column: ServoId,
    pub row: ServoId,
}

impl WorkItem {
    pub fn new(column: ServoId, row: ServoId) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(C{}, R{})", self.column, self.row)
    }
}

/// 激活流程中单个动作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepOutcome {
    pub op: ServoOp,
    /// 失败原因，成功时为 `None`
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// 单个舵机的激活报告
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationReport {
    pub servo: ServoId,
    pub role: ServoRole,
    pub steps: Vec<StepOutcome>,
    /// 流程结束后读取的状态，读取失败时为 `None`
    pub status: Option<ServoStatus>,
}

impl ActivationReport {
    /// 所有动作都成功
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepOutcome::is_ok)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.is_ok())
    }
}

impl fmt::Display for ActivationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ok = self.steps.iter().filter(|s| s.is_ok()).count();
        write!(f, "{} {}: {}/{} steps ok", self.role, self.servo, ok, self.steps.len())?;
        match &self.status {
            Some(status) => write!(f, ", status {status}"),
            None => f.write_str(", status unavailable"),
        }
    }
}

/// 一个棋子（列 + 行）的报告
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceReport {
    pub item: WorkItem,
    pub column: ActivationReport,
    pub row: ActivationReport,
}

impl PieceReport {
    pub fn is_success(&self) -> bool {
        self.column.is_success() && self.row.is_success()
    }
}

impl fmt::Display for PieceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece {}: [{}] [{}]", self.item, self.column, self.row)
    }
}
