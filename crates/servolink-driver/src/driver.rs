//! 舵机驱动
//!
//! 提供对外的 `ServoDriver` 结构体：命令通道、状态读取和 Active ID 选择。
//! 所有操作都是阻塞的：一次 HTTP 请求加上固定的等待时间，不与其它操作重叠。

use crate::config::DriverConfig;
use crate::error::DriverError;
use crate::metrics::{DriverMetrics, MetricsSnapshot};
use crate::selection::SelectionState;
use servolink_http::HttpTransport;
use servolink_protocol::{
    CMD_ENDPOINT, Command, IDENTITY_ENDPOINT, STATUS_ENDPOINT, ServoId, ServoOp, ServoStatus,
};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, trace};

/// ESP32 舵机控制器驱动
///
/// # Example
///
/// ```no_run
/// use servolink_driver::{ServoDriverBuilder, DriverError};
/// use servolink_protocol::ServoId;
///
/// # fn main() -> Result<(), DriverError> {
/// let mut driver = ServoDriverBuilder::new().address("192.168.4.1").build()?;
/// driver.select_id(ServoId(3))?;
/// driver.middle();
/// println!("{}", driver.read_status()?);
/// # Ok(())
/// # }
/// ```
pub struct ServoDriver<T> {
    transport: T,
    config: DriverConfig,
    metrics: Arc<DriverMetrics>,
    selection: SelectionState,
    last_selected: Option<ServoId>,
}

macro_rules! named_ops {
    ($($(#[$meta:meta])* $method:ident => $op:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $method(&mut self) -> bool {
                self.send(ServoOp::$op)
            }
        )*
    };
}

impl<T: HttpTransport> ServoDriver<T> {
    /// 使用给定传输和配置创建驱动
    pub fn new(transport: T, config: DriverConfig) -> Self {
        Self {
            transport,
            config,
            metrics: Arc::new(DriverMetrics::new()),
            selection: SelectionState::Idle,
            last_selected: None,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 消费驱动并取回传输
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// 获取指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 共享的指标句柄（可以交给监控线程读取）
    pub fn metrics_handle(&self) -> Arc<DriverMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection
    }

    /// 最近一次选择成功的舵机
    ///
    /// 之后发生的失败选择或手动 ID± 不会清除这个记录，
    /// 控制器当前是否仍停在该 ID 以 `selection_state()` 为准。
    pub fn last_selected(&self) -> Option<ServoId> {
        self.last_selected
    }

    // ==================== 命令通道 ====================

    /// 发送一次性命令
    ///
    /// 请求发出即视为成功，总是返回 `true`。控制器可能在回复前关闭连接，
    /// 传输层错误只记录日志和指标，不会重试（重复发送可能导致重复动作）。
    ///
    /// 手动发送 ID± 命令会让驱动的选择状态回到 `Idle`。
    pub fn send_command(&mut self, command: Command) -> bool {
        if command == ServoOp::IdPlus.command() || command == ServoOp::IdMinus.command() {
            self.selection = SelectionState::Idle;
        }
        self.dispatch(command)
    }

    /// 发送具名操作
    pub fn send(&mut self, op: ServoOp) -> bool {
        trace!("send {} {}", op, op.command());
        self.send_command(op.command())
    }

    /// 直接发送原始四元组
    pub fn send_raw(&mut self, command_type: i32, command_index: i32, arg_a: i32, arg_b: i32) -> bool {
        self.send_command(Command::new(command_type, command_index).with_args(arg_a, arg_b))
    }

    fn dispatch(&mut self, command: Command) -> bool {
        DriverMetrics::incr(&self.metrics.commands_dispatched);
        if let Err(e) = self.transport.dispatch(
            CMD_ENDPOINT,
            &command.query_pairs(),
            self.config.timeout,
        ) {
            DriverMetrics::incr(&self.metrics.commands_unconfirmed);
            debug!("Command {} not acknowledged: {}", command, e);
        }
        true
    }

    // ==================== 状态读取 ====================

    /// 读取端点原始文本（带重试）
    ///
    /// 传输失败时等待 `retry_delay` 后重试，最多尝试 `read_retries` 次。
    ///
    /// # 错误
    ///
    /// - `DriverError::ReadExhausted`: 全部尝试都失败
    pub fn read_raw(&mut self, endpoint: &str) -> Result<String, DriverError> {
        let attempts = self.config.read_attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            DriverMetrics::incr(&self.metrics.read_attempts);
            match self.transport.get_text(endpoint, &[], self.config.timeout) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    debug!("GET /{} attempt {}/{} failed: {}", endpoint, attempt, attempts, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        thread::sleep(self.config.retry_delay);
                    }
                },
            }
        }

        DriverMetrics::incr(&self.metrics.read_failures);
        error!("Failed after {} retries → /{}", attempts, endpoint);
        Err(DriverError::ReadExhausted {
            endpoint: endpoint.to_string(),
            attempts,
            last: last_error.unwrap_or(servolink_http::TransportError::Timeout),
        })
    }

    /// `/readSTS` 原始文本
    pub fn read_status_raw(&mut self) -> Result<String, DriverError> {
        self.read_raw(STATUS_ENDPOINT)
    }

    /// 读取并解析 `/readSTS`
    ///
    /// # 错误
    ///
    /// - `DriverError::ReadExhausted`: 读取失败
    /// - `DriverError::Protocol`: 控制器返回了空文本
    pub fn read_status(&mut self) -> Result<ServoStatus, DriverError> {
        let raw = self.read_status_raw()?;
        Ok(ServoStatus::parse(&raw)?)
    }

    /// `/readID` 身份字符串（原样返回）
    pub fn read_identity(&mut self) -> Result<String, DriverError> {
        self.read_raw(IDENTITY_ENDPOINT)
    }

    /// 读取控制器当前的 Active ID
    ///
    /// # 错误
    ///
    /// - `DriverError::InvalidActiveId`: 字段缺失或不是有效 ID
    pub fn read_active_id(&mut self) -> Result<ServoId, DriverError> {
        let status = self.read_status()?;
        status.active_id().ok_or_else(|| DriverError::InvalidActiveId {
            raw: status.get(servolink_protocol::ACTIVE_ID_KEY).map(ToString::to_string),
        })
    }

    // ==================== Active ID 选择 ====================

    /// 将控制器的 Active ID 切换到 `target`
    ///
    /// 先读取当前 ID，然后每次发送一个 ID± 命令、等待 `settle_delay`、回读确认，
    /// 直到回读的 ID 等于目标。
    ///
    /// # 错误
    ///
    /// - 任意一次读取失败或 Active ID 无效：立即失败，不再发送命令
    /// - `DriverError::SelectionStepLimit`: 步数达到 `max_select_steps` 仍未到达目标
    ///
    /// # 阻塞行为
    ///
    /// 此方法是**阻塞的**，耗时约为 `|当前 - 目标| × (settle_delay + 一次读取)`。
    pub fn select_id(&mut self, target: ServoId) -> Result<(), DriverError> {
        self.selection = SelectionState::Idle;

        let mut current = match self.read_active_id() {
            Ok(id) => id,
            Err(e) => return Err(self.fail_selection(target, e)),
        };

        self.selection = SelectionState::Selecting { target };
        let mut steps: u32 = 0;

        while current != target {
            if self.config.max_select_steps.is_some_and(|max| steps >= max) {
                let err = DriverError::SelectionStepLimit {
                    target,
                    last_seen: current,
                    steps,
                };
                return Err(self.fail_selection(target, err));
            }

            let op = if current < target {
                ServoOp::IdPlus
            } else {
                ServoOp::IdMinus
            };
            trace!("select {}: at {}, sending {}", target, current, op);
            self.dispatch(op.command());
            DriverMetrics::incr(&self.metrics.select_steps);
            steps += 1;

            thread::sleep(self.config.settle_delay);

            current = match self.read_active_id() {
                Ok(id) => id,
                Err(e) => return Err(self.fail_selection(target, e)),
            };
        }

        DriverMetrics::incr(&self.metrics.selections_ok);
        self.selection = SelectionState::Selected(target);
        self.last_selected = Some(target);
        info!("Servo {} selected after {} steps", target, steps);
        Ok(())
    }

    fn fail_selection(&mut self, target: ServoId, err: DriverError) -> DriverError {
        DriverMetrics::incr(&self.metrics.selections_failed);
        self.selection = SelectionState::Failed { target };
        debug!("Selecting servo {} failed: {}", target, err);
        err
    }

    // ==================== 具名操作 ====================

    named_ops! {
        /// 扫描总线上的舵机
        start_search => StartSearch;
        /// Active ID + 1（会让选择状态回到 Idle）
        id_plus => IdPlus;
        /// Active ID - 1（会让选择状态回到 Idle）
        id_minus => IdMinus;
        middle => Middle;
        stop => Stop;
        /// 释放力矩
        release => Release;
        torque => Torque;
        position_plus => PositionPlus;
        position_minus => PositionMinus;
        speed_plus => SpeedPlus;
        speed_minus => SpeedMinus;
        /// 将当前位置设为中位
        set_middle => SetMiddle;
        servo_mode => ServoMode;
        motor_mode => MotorMode;
        serial_forward_on => SerialForwardOn;
        serial_forward_off => SerialForwardOff;
        set_new_id => SetNewId;
        role_normal => RoleNormal;
        role_leader => RoleLeader;
        role_follower => RoleFollower;
        rainbow_on => RainbowOn;
        rainbow_off => RainbowOff;
    }
}
