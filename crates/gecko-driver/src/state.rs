//! 夹爪状态记录

use serde::{Deserialize, Serialize};

/// 夹爪状态（值类型，每次成功解码时整体替换）
///
/// `validity = false` 表示"丢弃该样本"：不得覆盖下游已发布的健康状态。
/// `overtemperature_flag = true` 时 `validity` 必为 false。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GripperState {
    /// 最近的错误码（只在解码值为 0 时清零，见 [`ErrorStatusPolicy`](crate::ErrorStatusPolicy)）
    pub error_status: i32,
    /// 设备上报的时间计数
    pub last_status_read_time: i64,
    pub overtemperature_flag: bool,
    pub experiment_in_progress: bool,
    pub file_is_open: bool,
    pub automatic_mode_enable: bool,
    pub wrist_lock: bool,
    pub adhesive_engage: bool,
    pub delay: i32,
    pub exp_idx: i32,
    /// 是否可信、可发布
    pub validity: bool,
}

impl GripperState {
    /// 无效记录（格式错误、批量/科学数据包）
    pub fn invalid() -> Self {
        Self::default()
    }

    /// 过温保护记录：其余字段均不可信
    pub fn device_fault() -> Self {
        Self {
            overtemperature_flag: true,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity
    }
}
