//! 遥测解码器
//!
//! 把遥测向量解码为 [`GripperState`]。任何失败都折叠为 `validity = false`
//! 的记录，调用方只需判断 `validity`。

use crate::error::DecodeError;
use crate::state::GripperState;
use gecko_protocol::{StatusFeedback, TelemetryFormat, TelemetryFrame, TelemetryPacket};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// 错误码写入策略
///
/// 设备上的旧实现只在解码值为 0 时写入（即只"清零"），非零错误码不会进入状态。
/// 这很可能不是本意，但默认保持该行为；需要完整错误码时使用 `AlwaysStore`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatusPolicy {
    /// 仅当解码值为 0 时覆盖（清零），否则保留旧值
    #[default]
    ClearOnly,
    /// 总是写入解码值
    AlwaysStore,
}

impl ErrorStatusPolicy {
    /// 根据策略计算新的错误码
    pub fn apply(self, previous: i32, decoded: i32) -> i32 {
        match self {
            ErrorStatusPolicy::ClearOnly if decoded == 0 => 0,
            ErrorStatusPolicy::ClearOnly => previous,
            ErrorStatusPolicy::AlwaysStore => decoded,
        }
    }
}

impl std::str::FromStr for ErrorStatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "clear_only" => Ok(ErrorStatusPolicy::ClearOnly),
            "always_store" => Ok(ErrorStatusPolicy::AlwaysStore),
            other => Err(format!("unknown error status policy: {}", other)),
        }
    }
}

/// 遥测解码器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetryDecoder {
    format: TelemetryFormat,
    policy: ErrorStatusPolicy,
}

impl TelemetryDecoder {
    pub fn new(format: TelemetryFormat, policy: ErrorStatusPolicy) -> Self {
        Self { format, policy }
    }

    pub fn format(&self) -> TelemetryFormat {
        self.format
    }

    pub fn policy(&self) -> ErrorStatusPolicy {
        self.policy
    }

    /// 解码遥测向量
    ///
    /// `previous` 是当前持有的状态，用于错误码策略以及旧版格式中不携带的字段。
    /// 失败时返回 `validity = false` 的记录，从不 panic。
    pub fn decode(&self, values: &[f64], previous: &GripperState) -> GripperState {
        self.try_decode(values, previous)
            .unwrap_or_else(|err| Self::discard(&err))
    }

    /// 把解码失败折叠为无效记录并记录日志
    ///
    /// 过温返回 [`GripperState::device_fault`]，其余失败返回 [`GripperState::invalid`]。
    pub fn discard(err: &DecodeError) -> GripperState {
        match err {
            DecodeError::DeviceFault => {
                warn!("Overtemperature flag set, discarding telemetry sample");
                GripperState::device_fault()
            },
            DecodeError::Unsupported(kind) => {
                trace!("Skipping {} packet", kind);
                GripperState::invalid()
            },
            DecodeError::Malformed(_) => {
                warn!("Discarding telemetry sample: {}", err);
                GripperState::invalid()
            },
        }
    }

    /// 解码遥测向量，保留失败原因
    pub fn try_decode(
        &self,
        values: &[f64],
        previous: &GripperState,
    ) -> Result<GripperState, DecodeError> {
        let frame = TelemetryFrame::from_vector(values, self.format)?;
        let status = match frame.parse()? {
            TelemetryPacket::Status(status) => status,
            TelemetryPacket::Skipped(kind) => return Err(DecodeError::Unsupported(kind)),
        };

        // 过温保护：其余字段不可信
        if status.flags.overtemperature {
            return Err(DecodeError::DeviceFault);
        }

        let state = self.apply(&status, previous);
        trace!(
            format = ?frame.format(),
            error_status = state.error_status,
            time = state.last_status_read_time,
            "Decoded gripper status"
        );
        Ok(state)
    }

    fn apply(&self, status: &StatusFeedback, previous: &GripperState) -> GripperState {
        let flags = &status.flags;
        GripperState {
            error_status: self.policy.apply(previous.error_status, status.error_status),
            last_status_read_time: status.last_status_read_time,
            overtemperature_flag: flags.overtemperature,
            experiment_in_progress: flags.experiment_in_progress,
            file_is_open: flags.file_is_open,
            automatic_mode_enable: flags.automatic_mode_enable,
            wrist_lock: flags.wrist_lock,
            adhesive_engage: flags.adhesive_engage,
            delay: status.delay.unwrap_or(previous.delay),
            exp_idx: status.exp_idx.unwrap_or(previous.exp_idx),
            validity: true,
        }
    }
}
