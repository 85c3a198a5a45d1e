//! 驱动指标模块
//!
//! 提供零开销的原子计数器，用于观察命令通道和读取链路的健康状态。
//! 所有计数器都使用原子操作，可以在任何线程安全地读取。

use std::sync::atomic::{AtomicU64, Ordering};

/// 驱动实时指标
///
/// # 使用示例
///
/// ```rust
/// use servolink_driver::DriverMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = DriverMetrics::default();
/// metrics.commands_dispatched.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(metrics.snapshot().commands_dispatched, 1);
/// ```
#[derive(Debug, Default)]
pub struct DriverMetrics {
    /// 已发出的 `/cmd` 请求总数（包括传输失败的）
    pub commands_dispatched: AtomicU64,

    /// 传输层报告失败的命令数
    ///
    /// 控制器经常在回复前关闭连接，所以这里的计数不代表命令没有生效。
    pub commands_unconfirmed: AtomicU64,

    /// 读取请求尝试次数（每次重试单独计数）
    pub read_attempts: AtomicU64,

    /// 重试耗尽的读取次数
    pub read_failures: AtomicU64,

    /// 选择过程中发出的 ID± 命令数
    pub select_steps: AtomicU64,

    pub selections_ok: AtomicU64,
    pub selections_failed: AtomicU64,
}

impl DriverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_unconfirmed: self.commands_unconfirmed.load(Ordering::Relaxed),
            read_attempts: self.read_attempts.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            select_steps: self.select_steps.load(Ordering::Relaxed),
            selections_ok: self.selections_ok.load(Ordering::Relaxed),
            selections_failed: self.selections_failed.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.commands_dispatched.store(0, Ordering::Relaxed);
        self.commands_unconfirmed.store(0, Ordering::Relaxed);
        self.read_attempts.store(0, Ordering::Relaxed);
        self.read_failures.store(0, Ordering::Relaxed);
        self.select_steps.store(0, Ordering::Relaxed);
        self.selections_ok.store(0, Ordering::Relaxed);
        self.selections_failed.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变，用于读取）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub commands_dispatched: u64,
    pub commands_unconfirmed: u64,
    pub read_attempts: u64,
    pub read_failures: u64,
    pub select_steps: u64,
    pub selections_ok: u64,
    pub selections_failed: u64,
}

impl MetricsSnapshot {
    /// 命令未确认比例（0.0 - 1.0）
    pub fn unconfirmed_ratio(&self) -> f64 {
        if self.commands_dispatched == 0 {
            0.0
        } else {
            self.commands_unconfirmed as f64 / self.commands_dispatched as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_reset() {
        let metrics = DriverMetrics::new();
        DriverMetrics::incr(&metrics.commands_dispatched);
        DriverMetrics::incr(&metrics.commands_dispatched);
        DriverMetrics::incr(&metrics.commands_unconfirmed);

        let snap = metrics.snapshot();
        assert_eq!(snap.commands_dispatched, 2);
        assert_eq!(snap.commands_unconfirmed, 1);
        assert!((snap.unconfirmed_ratio() - 0.5).abs() < f64::EPSILON);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_unconfirmed_ratio_without_commands() {
        assert_eq!(MetricsSnapshot::default().unconfirmed_ratio(), 0.0);
    }
}
