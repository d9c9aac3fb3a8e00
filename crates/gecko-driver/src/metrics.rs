//! 控制器运行指标
//!
//! 原子计数器，可在任何线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 控制器实时指标
#[derive(Debug, Default)]
pub struct ControllerMetrics {
    /// 收到的遥测向量总数
    pub telemetry_total: AtomicU64,

    /// 解码成功并发布的状态数
    pub telemetry_valid: AtomicU64,

    /// 格式错误的遥测（长度、同步字、包 ID、非有限值）
    pub telemetry_malformed: AtomicU64,

    /// 过温保护次数
    pub device_faults: AtomicU64,

    /// 跳过的批量/科学数据包
    pub unsupported_packets: AtomicU64,

    /// 成功编码的命令数（含反馈监控器触发的命令）
    pub commands_dispatched: AtomicU64,

    /// 未识别而拒绝的操作员令牌
    pub commands_rejected: AtomicU64,

    /// 收到的误差样本数
    pub feedback_samples: AtomicU64,

    /// 反馈监控器触发次数
    pub feedback_triggers: AtomicU64,
}

impl ControllerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照（各计数器之间可能有微小的时间差）
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            telemetry_total: self.telemetry_total.load(Ordering::Relaxed),
            telemetry_valid: self.telemetry_valid.load(Ordering::Relaxed),
            telemetry_malformed: self.telemetry_malformed.load(Ordering::Relaxed),
            device_faults: self.device_faults.load(Ordering::Relaxed),
            unsupported_packets: self.unsupported_packets.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_rejected: self.commands_rejected.load(Ordering::Relaxed),
            feedback_samples: self.feedback_samples.load(Ordering::Relaxed),
            feedback_triggers: self.feedback_triggers.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.telemetry_total.store(0, Ordering::Relaxed);
        self.telemetry_valid.store(0, Ordering::Relaxed);
        self.telemetry_malformed.store(0, Ordering::Relaxed);
        self.device_faults.store(0, Ordering::Relaxed);
        self.unsupported_packets.store(0, Ordering::Relaxed);
        self.commands_dispatched.store(0, Ordering::Relaxed);
        self.commands_rejected.store(0, Ordering::Relaxed);
        self.feedback_samples.store(0, Ordering::Relaxed);
        self.feedback_triggers.store(0, Ordering::Relaxed);
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    pub telemetry_total: u64,
    pub telemetry_valid: u64,
    pub telemetry_malformed: u64,
    pub device_faults: u64,
    pub unsupported_packets: u64,
    pub commands_dispatched: u64,
    pub commands_rejected: u64,
    pub feedback_samples: u64,
    pub feedback_triggers: u64,
}

impl MetricsSnapshot {
    /// 有效遥测率（百分比）
    ///
    /// `telemetry_total` 为 0 时返回 0.0。
    pub fn valid_rate(&self) -> f64 {
        if self.telemetry_total == 0 {
            return 0.0;
        }
        (self.telemetry_valid as f64 / self.telemetry_total as f64) * 100.0
    }
}
