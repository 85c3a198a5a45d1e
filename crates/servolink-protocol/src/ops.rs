//! 具名操作表
//!
//! 控制器网页上的每个按钮都对应一个固定的 `(inputT, inputI)` 组合。
//! `ServoOp` 是这张表的封闭枚举形式，按名称调用操作时先解析为 `ServoOp`，
//! 再通过 [`ServoOp::command`] 得到要发送的 [`Command`]。

use crate::{Command, ProtocolError};
use std::fmt;
use std::str::FromStr;

/// 具名舵机操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServoOp {
    /// 扫描总线上的舵机
    StartSearch,
    /// Active ID + 1
    IdPlus,
    /// Active ID - 1
    IdMinus,
    /// 回到中位
    Middle,
    Stop,
    /// 释放力矩
    Release,
    /// 开启力矩
    Torque,
    PositionPlus,
    PositionMinus,
    SpeedPlus,
    SpeedMinus,
    /// 将当前位置设为中位
    SetMiddle,
    /// 切换到舵机（位置）模式
    ServoMode,
    /// 切换到电机（连续旋转）模式
    MotorMode,
    SerialForwardOn,
    SerialForwardOff,
    SetNewId,
    RoleNormal,
    RoleLeader,
    RoleFollower,
    RainbowOn,
    RainbowOff,
}

impl ServoOp {
    /// 全部操作（按命令表顺序）
    pub const ALL: [ServoOp; 22] = [
        ServoOp::StartSearch,
        ServoOp::IdPlus,
        ServoOp::IdMinus,
        ServoOp::Middle,
        ServoOp::Stop,
        ServoOp::Release,
        ServoOp::Torque,
        ServoOp::PositionPlus,
        ServoOp::PositionMinus,
        ServoOp::SpeedPlus,
        ServoOp::SpeedMinus,
        ServoOp::SetMiddle,
        ServoOp::ServoMode,
        ServoOp::MotorMode,
        ServoOp::SerialForwardOn,
        ServoOp::SerialForwardOff,
        ServoOp::SetNewId,
        ServoOp::RoleNormal,
        ServoOp::RoleLeader,
        ServoOp::RoleFollower,
        ServoOp::RainbowOn,
        ServoOp::RainbowOff,
    ];

    /// 操作对应的 `(inputT, inputI)`，附加参数为 0
    pub const fn command(self) -> Command {
        let (command_type, command_index) = match self {
            ServoOp::StartSearch => (9, 0),
            ServoOp::IdPlus => (0, 1),
            ServoOp::IdMinus => (0, -1),
            ServoOp::Middle => (1, 1),
            ServoOp::Stop => (1, 2),
            ServoOp::Release => (1, 3),
            ServoOp::Torque => (1, 4),
            ServoOp::PositionPlus => (1, 5),
            ServoOp::PositionMinus => (1, 6),
            ServoOp::SpeedPlus => (1, 7),
            ServoOp::SpeedMinus => (1, 8),
            ServoOp::SetMiddle => (1, 11),
            ServoOp::ServoMode => (1, 12),
            ServoOp::MotorMode => (1, 13),
            ServoOp::SerialForwardOn => (1, 14),
            ServoOp::SerialForwardOff => (1, 15),
            ServoOp::SetNewId => (1, 16),
            ServoOp::RoleNormal => (1, 17),
            ServoOp::RoleLeader => (1, 18),
            ServoOp::RoleFollower => (1, 19),
            ServoOp::RainbowOn => (1, 20),
            ServoOp::RainbowOff => (1, 21),
        };
        Command::new(command_type, command_index)
    }

    /// snake_case 名称（与配置文件中的写法一致）
    pub const fn name(self) -> &'static str {
        match self {
            ServoOp::StartSearch => "start_search",
            ServoOp::IdPlus => "id_plus",
            ServoOp::IdMinus => "id_minus",
            ServoOp::Middle => "middle",
            ServoOp::Stop => "stop",
            ServoOp::Release => "release",
            ServoOp::Torque => "torque",
            ServoOp::PositionPlus => "position_plus",
            ServoOp::PositionMinus => "position_minus",
            ServoOp::SpeedPlus => "speed_plus",
            ServoOp::SpeedMinus => "speed_minus",
            ServoOp::SetMiddle => "set_middle",
            ServoOp::ServoMode => "servo_mode",
            ServoOp::MotorMode => "motor_mode",
            ServoOp::SerialForwardOn => "serial_forward_on",
            ServoOp::SerialForwardOff => "serial_forward_off",
            ServoOp::SetNewId => "set_new_id",
            ServoOp::RoleNormal => "role_normal",
            ServoOp::RoleLeader => "role_leader",
            ServoOp::RoleFollower => "role_follower",
            ServoOp::RainbowOn => "rainbow_on",
            ServoOp::RainbowOff => "rainbow_off",
        }
    }

    /// 是否为 ID 选择命令（会改变控制器侧的 Active ID）
    pub const fn is_id_step(self) -> bool {
        matches!(self, ServoOp::IdPlus | ServoOp::IdMinus)
    }
}

impl fmt::Display for ServoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServoOp {
    type Err = ProtocolError;

    /// 接受 snake_case 名称、连字符写法（`position-plus`）以及网页按钮上的短写
    /// （`id+`、`position-`、`serial_fwd_on` 等）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let alias = match lowered.as_str() {
            "id+" => Some(ServoOp::IdPlus),
            "id-" => Some(ServoOp::IdMinus),
            "position+" => Some(ServoOp::PositionPlus),
            "position-" => Some(ServoOp::PositionMinus),
            "speed+" => Some(ServoOp::SpeedPlus),
            "speed-" => Some(ServoOp::SpeedMinus),
            "serial_fwd_on" | "serial-fwd-on" => Some(ServoOp::SerialForwardOn),
            "serial_fwd_off" | "serial-fwd-off" => Some(ServoOp::SerialForwardOff),
            _ => None,
        };
        if let Some(op) = alias {
            return Ok(op);
        }

        let normalized = lowered.replace('-', "_");
        ServoOp::ALL
            .into_iter()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| ProtocolError::UnknownOp(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_table() {
        let expected = [
            (ServoOp::StartSearch, 9, 0),
            (ServoOp::IdPlus, 0, 1),
            (ServoOp::IdMinus, 0, -1),
            (ServoOp::Middle, 1, 1),
            (ServoOp::Stop, 1, 2),
            (ServoOp::Release, 1, 3),
            (ServoOp::Torque, 1, 4),
            (ServoOp::PositionPlus, 1, 5),
            (ServoOp::PositionMinus, 1, 6),
            (ServoOp::SpeedPlus, 1, 7),
            (ServoOp::SpeedMinus, 1, 8),
            (ServoOp::SetMiddle, 1, 11),
            (ServoOp::ServoMode, 1, 12),
            (ServoOp::MotorMode, 1, 13),
            (ServoOp::SerialForwardOn, 1, 14),
            (ServoOp::SerialForwardOff, 1, 15),
            (ServoOp::SetNewId, 1, 16),
            (ServoOp::RoleNormal, 1, 17),
            (ServoOp::RoleLeader, 1, 18),
            (ServoOp::RoleFollower, 1, 19),
            (ServoOp::RainbowOn, 1, 20),
            (ServoOp::RainbowOff, 1, 21),
        ];

        assert_eq!(expected.len(), ServoOp::ALL.len());
        for (op, t, i) in expected {
            let cmd = op.command();
            assert_eq!((cmd.command_type, cmd.command_index), (t, i), "{op}");
            assert_eq!((cmd.arg_a, cmd.arg_b), (0, 0));
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for op in ServoOp::ALL {
            assert_eq!(op.name().parse::<ServoOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("id+".parse::<ServoOp>().unwrap(), ServoOp::IdPlus);
        assert_eq!("ID-".parse::<ServoOp>().unwrap(), ServoOp::IdMinus);
        assert_eq!(
            "position-plus".parse::<ServoOp>().unwrap(),
            ServoOp::PositionPlus
        );
        assert_eq!(
            "serial_fwd_off".parse::<ServoOp>().unwrap(),
            ServoOp::SerialForwardOff
        );
        assert!(matches!(
            "warp".parse::<ServoOp>(),
            Err(ProtocolError::UnknownOp(name)) if name == "warp"
        ));
    }

    #[test]
    fn test_is_id_step() {
        assert!(ServoOp::IdPlus.is_id_step());
        assert!(ServoOp::IdMinus.is_id_step());
        assert!(!ServoOp::Middle.is_id_step());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ServoOp::PositionMinus).unwrap();
        assert_eq!(json, "\"position_minus\"");
        let op: ServoOp = serde_json::from_str("\"rainbow_on\"").unwrap();
        assert_eq!(op, ServoOp::RainbowOn);
    }
}
