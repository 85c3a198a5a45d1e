//! Active ID 选择状态
//!
//! ```text
//! Idle ──read──▶ Selecting{target} ──(current == target)──▶ Selected(target)
//!   │                   │
//!   └──unreadable──▶ Failed{target} ◀──unreadable / step limit──┘
//! ```
//!
//! 状态只描述驱动最近一次选择的结果。控制器侧的 Active ID 可能被其它操作改变，
//! 因此 `Selected` 不代表控制器当前一定仍然选中该舵机。

use servolink_protocol::ServoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// 尚未选择，或手动发送了 ID± 命令
    #[default]
    Idle,
    /// 正在步进
    Selecting { target: ServoId },
    /// 最近一次选择成功
    Selected(ServoId),
    /// 最近一次选择失败
    Failed { target: ServoId },
}

impl SelectionState {
    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionState::Selected(_))
    }

    /// 最近一次成功选择的舵机
    pub fn selected(&self) -> Option<ServoId> {
        match self {
            SelectionState::Selected(id) => Some(*id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SelectionState::default(), SelectionState::Idle);
        assert!(!SelectionState::Idle.is_selected());
    }

    #[test]
    fn test_selected_accessor() {
        assert_eq!(SelectionState::Selected(ServoId(2)).selected(), Some(ServoId(2)));
        assert_eq!(SelectionState::Failed { target: ServoId(2) }.selected(), None);
    }
}
