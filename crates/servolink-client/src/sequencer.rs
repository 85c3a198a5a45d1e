//! 矩阵编排器
//!
//! 控制器一次只能操作一个 Active ID，所以任何动作之前都要先选择目标舵机。
//! 编排器把 "选择 + 动作" 作为一个可重试的单元，在此之上构建激活流程和工作队列。

use crate::config::SequencerConfig;
use crate::error::SequenceError;
use crate::types::{ActivationReport, PieceReport, ServoRole, StepOutcome, WorkItem};
use servolink_driver::{DriverError, ServoDriver};
use servolink_http::HttpTransport;
use servolink_protocol::{ServoId, ServoOp};
use std::collections::VecDeque;
use std::thread;
use tracing::{error, info, warn};

/// 多舵机批量编排器
///
/// 持有唯一的 `ServoDriver`，所有操作都需要 `&mut self`：
/// 同一个控制器上不会有两个编排过程交错执行。
pub struct MatrixSequencer<T> {
    driver: ServoDriver<T>,
    config: SequencerConfig,
    queue: VecDeque<WorkItem>,
}

impl<T: HttpTransport> MatrixSequencer<T> {
    pub fn new(driver: ServoDriver<T>, config: SequencerConfig) -> Self {
        Self {
            driver,
            config,
            queue: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn driver(&self) -> &ServoDriver<T> {
        &self.driver
    }

    /// 直接访问驱动（单条命令、读取身份等）
    pub fn driver_mut(&mut self) -> &mut ServoDriver<T> {
        &mut self.driver
    }

    pub fn into_driver(self) -> ServoDriver<T> {
        self.driver
    }

    // ==================== 重试单元 ====================

    /// 选择 `servo` 并发送 `op`，失败时整体重试
    pub fn attempt_command(&mut self, servo: ServoId, op: ServoOp) -> Result<(), SequenceError> {
        self.attempt_with(servo, op.name(), |driver| {
            driver.send(op);
            Ok(())
        })
    }

    /// 通用重试单元
    ///
    /// 每次尝试都会重新选择 `servo`（上一次尝试可能已经改变了 Active ID），
    /// 选择成功后执行 `action`。无论成败，每次尝试后都等待 `delay`。
    ///
    /// # 错误
    ///
    /// - `SequenceError::AttemptsExhausted`: `action_retries` 次尝试全部失败
    pub fn attempt_with<F>(
        &mut self,
        servo: ServoId,
        label: &str,
        mut action: F,
    ) -> Result<(), SequenceError>
    where
        F: FnMut(&mut ServoDriver<T>) -> Result<(), DriverError>,
    {
        let attempts = self.config.action_attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            if let Err(e) = self.driver.select_id(servo) {
                warn!(
                    "Attempt {}/{}: selecting servo {} for {} failed: {}",
                    attempt, attempts, servo, label, e
                );
                last_error = Some(e);
                thread::sleep(self.config.delay);
                continue;
            }

            match action(&mut self.driver) {
                Ok(()) => {
                    thread::sleep(self.config.delay);
                    return Ok(());
                },
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: {} on servo {} failed: {}",
                        attempt, attempts, label, servo, e
                    );
                    last_error = Some(e);
                    thread::sleep(self.config.delay);
                },
            }
        }

        error!("{} failed on servo {} after {} attempts", label, servo, attempts);
        Err(SequenceError::AttemptsExhausted {
            servo,
            label: label.to_string(),
            attempts,
            last: last_error.unwrap_or(DriverError::InvalidActiveId { raw: None }),
        })
    }

    // ==================== 激活流程 ====================

    /// 对单个舵机执行激活动作序列，然后读取一次状态
    ///
    /// 动作失败只记录在报告里，后续动作照常执行。
    /// 最后的状态读取不会重新选择舵机。
    pub fn activate_servo(&mut self, servo: ServoId, role: ServoRole) -> ActivationReport {
        info!("===== Activating {} servo {} =====", role, servo);

        let routine = self.config.routine.clone();
        let steps = routine
            .into_iter()
            .map(|op| StepOutcome {
                op,
                error: self.attempt_command(servo, op).err().map(|e| e.to_string()),
            })
            .collect();

        let status = match self.driver.read_status() {
            Ok(status) => {
                info!("{} servo {} status: {}", role, servo, status);
                Some(status)
            },
            Err(e) => {
                warn!("Reading status after activating {} servo {} failed: {}", role, servo, e);
                None
            },
        };

        let report = ActivationReport {
            servo,
            role,
            steps,
            status,
        };
        if report.is_success() {
            info!("{}", report);
        } else {
            warn!("{}", report);
        }
        report
    }

    pub fn activate_column(&mut self, servo: ServoId) -> ActivationReport {
        self.activate_servo(servo, ServoRole::Column)
    }

    pub fn activate_row(&mut self, servo: ServoId) -> ActivationReport {
        self.activate_servo(servo, ServoRole::Row)
    }

    /// 按给定顺序依次激活
    pub fn activate_all(&mut self, servos: &[ServoId]) -> Vec<ActivationReport> {
        servos
            .iter()
            .map(|&servo| self.activate_servo(servo, ServoRole::Generic))
            .collect()
    }

    // ==================== 工作队列 ====================

    /// 在队尾追加一个棋子
    pub fn enqueue(&mut self, column: ServoId, row: ServoId) {
        self.queue.push_back(WorkItem::new(column, row));
    }

    /// 待处理的棋子数量
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 按入队顺序处理全部棋子，处理完后队列为空
    ///
    /// 重复的 ID 不会合并，失败的棋子不会中断后续处理。
    pub fn process_queue(&mut self) -> Vec<PieceReport> {
        let mut reports = Vec::with_capacity(self.queue.len());

        while let Some(item) = self.queue.pop_front() {
            info!("Processing piece {} ({} remaining)", item, self.queue.len());
            let column = self.activate_column(item.column);
            let row = self.activate_row(item.row);
            reports.push(PieceReport { item, column, row });
        }

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        if failed > 0 {
            warn!("Queue drained: {} pieces, {} with failures", reports.len(), failed);
        } else {
            info!("Queue drained: {} pieces", reports.len());
        }
        reports
    }
}
