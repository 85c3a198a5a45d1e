//! Mock 控制器
//!
//! 模拟 ESP32 舵机控制器的 HTTP 行为，用于在没有硬件的情况下测试驱动层和编排层：
//!
//! - `/cmd` 的 ID± 命令让 Active ID 按 ±1 变化（限制在 ID 范围内）
//! - `/readSTS` 按固件格式渲染 Active ID 和当前舵机的位置/速度
//! - `/readID` 返回固定的身份字符串
//!
//! 支持故障注入：整机不可达、接下来 N 次读取失败、状态文本替换、ID 冻结。
//! `MockController` 可以廉价克隆，测试保留一份克隆用于检查请求记录。

use crate::{HttpTransport, TransportError};
use servolink_protocol::{CMD_ENDPOINT, Command, IDENTITY_ENDPOINT, STATUS_ENDPOINT, ServoOp};
use servolink_protocol::{PARAM_ARG_A, PARAM_ARG_B, PARAM_INDEX, PARAM_TYPE};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const MIDDLE_POSITION: i32 = 2048;
const POSITION_STEP: i32 = 512;
const SPEED_STEP: i32 = 100;
const MAX_POSITION: i32 = 4095;

/// 记录下来的一次请求
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub endpoint: String,
    pub query: Vec<(String, i32)>,
    pub at: Instant,
    pub timeout: Duration,
}

impl MockRequest {
    /// 将 `/cmd` 请求还原为命令四元组
    pub fn command(&self) -> Option<Command> {
        if self.endpoint != CMD_ENDPOINT {
            return None;
        }
        let param = |name: &str| {
            self.query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| *v)
        };
        Some(
            Command::new(param(PARAM_TYPE)?, param(PARAM_INDEX)?)
                .with_args(param(PARAM_ARG_A).unwrap_or(0), param(PARAM_ARG_B).unwrap_or(0)),
        )
    }
}

#[derive(Debug)]
struct MockState {
    active_id: i64,
    id_range: (i64, i64),
    frozen: bool,
    unreachable: bool,
    fail_reads_remaining: usize,
    fail_all_reads: bool,
    reads_before_failure: Option<usize>,
    status_override: Option<String>,
    identity: String,
    positions: BTreeMap<i64, i32>,
    speeds: BTreeMap<i64, i32>,
    requests: Vec<MockRequest>,
}

impl MockState {
    fn apply(&mut self, cmd: Command) {
        let id = self.active_id;
        match (cmd.command_type, cmd.command_index) {
            (0, step @ (1 | -1)) => {
                if !self.frozen {
                    let (min, max) = self.id_range;
                    self.active_id = (self.active_id + step as i64).clamp(min, max);
                }
            },
            _ if cmd == ServoOp::Middle.command() => {
                self.positions.insert(id, MIDDLE_POSITION);
            },
            _ if cmd == ServoOp::PositionPlus.command() => {
                let pos = self.positions.entry(id).or_insert(MIDDLE_POSITION);
                *pos = (*pos + POSITION_STEP).min(MAX_POSITION);
            },
            _ if cmd == ServoOp::PositionMinus.command() => {
                let pos = self.positions.entry(id).or_insert(MIDDLE_POSITION);
                *pos = (*pos - POSITION_STEP).max(0);
            },
            _ if cmd == ServoOp::SpeedPlus.command() => {
                *self.speeds.entry(id).or_insert(0) += SPEED_STEP;
            },
            _ if cmd == ServoOp::SpeedMinus.command() => {
                *self.speeds.entry(id).or_insert(0) -= SPEED_STEP;
            },
            _ if cmd == ServoOp::Stop.command() => {
                self.speeds.insert(id, 0);
            },
            _ => {},
        }
    }

    fn read_gate(&mut self) -> Result<(), TransportError> {
        if self.fail_all_reads {
            return Err(TransportError::Timeout);
        }
        if self.fail_reads_remaining > 0 {
            self.fail_reads_remaining -= 1;
            return Err(TransportError::Timeout);
        }
        match self.reads_before_failure {
            Some(0) => return Err(TransportError::Timeout),
            Some(ref mut n) => *n -= 1,
            None => {},
        }
        Ok(())
    }

    fn render_status(&self) -> String {
        let id = self.active_id;
        let pos = self.positions.get(&id).copied().unwrap_or(MIDDLE_POSITION);
        let speed = self.speeds.get(&id).copied().unwrap_or(0);
        format!(
            "Active ID: {id}  Mode: Servo<p>Position: {pos}  Speed: {speed}<p>Voltage: 7.4  Temperature: 31"
        )
    }
}

/// 模拟控制器（可克隆句柄）
#[derive(Debug, Clone)]
pub struct MockController {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockController {
    fn default() -> Self {
        Self::new(0)
    }
}

impl MockController {
    /// 创建 Active ID 为 `active_id` 的模拟控制器
    pub fn new(active_id: i64) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                active_id,
                id_range: (0, 253),
                frozen: false,
                unreachable: false,
                fail_reads_remaining: 0,
                fail_all_reads: false,
                reads_before_failure: None,
                status_override: None,
                identity: "ESP32 Servo Driver  MAC: 24:6F:28:00:00:01".to_string(),
                positions: BTreeMap::new(),
                speeds: BTreeMap::new(),
                requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn active_id(&self) -> i64 {
        self.lock().active_id
    }

    pub fn set_active_id(&self, id: i64) {
        self.lock().active_id = id;
    }

    /// 限制 ID± 命令可到达的范围（闭区间）
    pub fn set_id_range(&self, min: i64, max: i64) {
        self.lock().id_range = (min, max);
    }

    /// 冻结后 ID± 命令不再生效（模拟误报 ID 的控制器）
    pub fn set_frozen(&self, frozen: bool) {
        self.lock().frozen = frozen;
    }

    /// 所有请求都返回连接失败
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// 接下来 `n` 次读取请求超时
    pub fn fail_next_reads(&self, n: usize) {
        self.lock().fail_reads_remaining = n;
    }

    /// 所有读取请求超时（命令仍然生效）
    pub fn set_fail_all_reads(&self, fail: bool) {
        self.lock().fail_all_reads = fail;
    }

    /// 先放行 `ok_reads` 次读取，之后的读取全部超时
    pub fn fail_reads_after(&self, ok_reads: usize) {
        self.lock().reads_before_failure = Some(ok_reads);
    }

    /// 用固定文本替换 `/readSTS` 的响应
    pub fn set_status_override(&self, text: Option<String>) {
        self.lock().status_override = text;
    }

    pub fn set_identity(&self, identity: impl Into<String>) {
        self.lock().identity = identity.into();
    }

    pub fn position(&self, id: i64) -> Option<i32> {
        self.lock().positions.get(&id).copied()
    }

    /// 全部请求记录（按时间顺序）
    pub fn requests(&self) -> Vec<MockRequest> {
        self.lock().requests.clone()
    }

    /// 全部 `/cmd` 命令（按时间顺序）
    pub fn commands(&self) -> Vec<Command> {
        self.lock()
            .requests
            .iter()
            .filter_map(MockRequest::command)
            .collect()
    }

    /// 指定端点的请求时间戳
    pub fn request_times(&self, endpoint: &str) -> Vec<Instant> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .map(|r| r.at)
            .collect()
    }

    /// ID± 命令的数量
    pub fn id_step_count(&self) -> usize {
        self.commands()
            .into_iter()
            .filter(|c| c.command_type == 0 && c.command_index.abs() == 1)
            .count()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }
}

impl HttpTransport for MockController {
    fn get_text(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<String, TransportError> {
        let mut state = self.lock();
        state.requests.push(MockRequest {
            endpoint: endpoint.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            at: Instant::now(),
            timeout,
        });

        if state.unreachable {
            return Err(TransportError::Connect("mock controller unreachable".into()));
        }

        match endpoint {
            STATUS_ENDPOINT => {
                state.read_gate()?;
                Ok(state
                    .status_override
                    .clone()
                    .unwrap_or_else(|| state.render_status()))
            },
            IDENTITY_ENDPOINT => {
                state.read_gate()?;
                Ok(state.identity.clone())
            },
            CMD_ENDPOINT => {
                if let Some(cmd) = state.requests.last().and_then(MockRequest::command) {
                    state.apply(cmd);
                }
                Ok(String::new())
            },
            other => Err(TransportError::Request(format!("404 Not Found: /{other}"))),
        }
    }

    fn dispatch(
        &mut self,
        endpoint: &str,
        query: &[(&str, i32)],
        timeout: Duration,
    ) -> Result<(), TransportError> {
        self.get_text(endpoint, query, timeout).map(drop)
    }

    fn base_url(&self) -> &str {
        "http://mock-controller"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(10);

    fn send(mock: &mut MockController, op: ServoOp) {
        let cmd = op.command();
        mock.dispatch(CMD_ENDPOINT, &cmd.query_pairs(), T).unwrap();
    }

    #[test]
    fn test_id_steps_move_active_id() {
        let mut mock = MockController::new(2);
        send(&mut mock, ServoOp::IdPlus);
        send(&mut mock, ServoOp::IdPlus);
        send(&mut mock, ServoOp::IdMinus);
        assert_eq!(mock.active_id(), 3);
        assert_eq!(mock.id_step_count(), 3);
    }

    #[test]
    fn test_id_range_clamps() {
        let mut mock = MockController::new(1);
        mock.set_id_range(1, 4);
        send(&mut mock, ServoOp::IdMinus);
        assert_eq!(mock.active_id(), 1);
    }

    #[test]
    fn test_frozen_ignores_id_steps() {
        let mut mock = MockController::new(5);
        mock.set_frozen(true);
        send(&mut mock, ServoOp::IdPlus);
        assert_eq!(mock.active_id(), 5);
    }

    #[test]
    fn test_status_render_contains_active_id() {
        let mut mock = MockController::new(7);
        let text = mock.get_text(STATUS_ENDPOINT, &[], T).unwrap();
        assert!(text.starts_with("Active ID: 7"));
    }

    #[test]
    fn test_motion_commands_track_position() {
        let mut mock = MockController::new(1);
        send(&mut mock, ServoOp::Middle);
        send(&mut mock, ServoOp::PositionPlus);
        assert_eq!(mock.position(1), Some(MIDDLE_POSITION + POSITION_STEP));
        send(&mut mock, ServoOp::PositionMinus);
        assert_eq!(mock.position(1), Some(MIDDLE_POSITION));
    }

    #[test]
    fn test_fail_next_reads() {
        let mut mock = MockController::new(0);
        mock.fail_next_reads(2);
        assert_eq!(
            mock.get_text(STATUS_ENDPOINT, &[], T),
            Err(TransportError::Timeout)
        );
        assert!(mock.get_text(IDENTITY_ENDPOINT, &[], T).is_err());
        assert!(mock.get_text(STATUS_ENDPOINT, &[], T).is_ok());
    }

    #[test]
    fn test_fail_reads_after() {
        let mut mock = MockController::new(0);
        mock.fail_reads_after(1);
        assert!(mock.get_text(STATUS_ENDPOINT, &[], T).is_ok());
        assert!(mock.get_text(STATUS_ENDPOINT, &[], T).is_err());
        assert!(mock.get_text(STATUS_ENDPOINT, &[], T).is_err());
    }

    #[test]
    fn test_unreachable_records_request() {
        let mut mock = MockController::new(0);
        mock.set_unreachable(true);
        assert!(matches!(
            mock.dispatch(CMD_ENDPOINT, &ServoOp::Stop.command().query_pairs(), T),
            Err(TransportError::Connect(_))
        ));
        assert_eq!(mock.requests().len(), 1);
        assert_eq!(mock.commands(), vec![ServoOp::Stop.command()]);
    }

    #[test]
    fn test_unknown_endpoint() {
        let mut mock = MockController::new(0);
        assert!(matches!(
            mock.get_text("nope", &[], T),
            Err(TransportError::Request(_))
        ));
    }
}
