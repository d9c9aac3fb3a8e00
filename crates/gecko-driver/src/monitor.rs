//! 反馈监控器
//!
//! 栖停时比较位姿误差与容差，误差达到容差后一次性触发"吸附并锁定"。

use gecko_protocol::CommandId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 默认误差容差
pub const DEFAULT_TOLERANCE: f64 = 0.18;

/// 监控器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// 未使能：误差样本只记录不触发
    #[default]
    Disarmed,
    /// 已使能：下一个越过容差的样本触发
    Armed,
}

/// 误差反馈监控器
///
/// 状态机：`Disarmed --arm--> Armed --|e| >= tolerance--> Disarmed`。
/// 触发后立即解除使能，重复的高误差样本不会再次触发，需要重新 `arm`。
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMonitor {
    state: MonitorState,
    tolerance: f64,
    last_error: Option<f64>,
}

impl Default for FeedbackMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl FeedbackMonitor {
    /// 创建未使能的监控器
    ///
    /// 容差的合法性由配置层检查（见 [`ControllerConfig::validate`](crate::ControllerConfig::validate)）。
    pub fn new(tolerance: f64) -> Self {
        Self {
            state: MonitorState::Disarmed,
            tolerance,
            last_error: None,
        }
    }

    pub fn arm(&mut self) {
        if self.state != MonitorState::Armed {
            info!(tolerance = self.tolerance, "Feedback monitor armed");
        }
        self.state = MonitorState::Armed;
    }

    pub fn disarm(&mut self) {
        if self.state != MonitorState::Disarmed {
            info!("Feedback monitor disarmed");
        }
        self.state = MonitorState::Disarmed;
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == MonitorState::Armed
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    /// 最近一次误差样本
    pub fn last_error(&self) -> Option<f64> {
        self.last_error
    }

    /// 处理一个误差样本
    ///
    /// 使能且 `|error| >= tolerance` 时返回 [`CommandId::EngageAndLock`] 并解除使能。
    /// NaN 样本永不触发（比较结果为 false），但仍会被记录。
    pub fn on_sample(&mut self, error: f64) -> Option<CommandId> {
        self.last_error = Some(error);

        if !self.is_armed() {
            return None;
        }

        if error.abs() >= self.tolerance {
            info!(
                sample = error,
                tolerance = self.tolerance,
                "Error reached tolerance, engaging and locking"
            );
            self.state = MonitorState::Disarmed;
            return Some(CommandId::EngageAndLock);
        }

        debug!(sample = error, tolerance = self.tolerance, "Error below tolerance");
        None
    }
}
