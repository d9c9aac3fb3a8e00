//! Driver 模块错误类型定义

use gecko_protocol::{PacketKind, ProtocolError};
use thiserror::Error;

/// 单次遥测解码失败的原因
///
/// 解码失败从不向上抛出：[`TelemetryDecoder::decode`](crate::TelemetryDecoder::decode)
/// 会把它折叠为 `validity = false` 的状态记录，这里的分类只用于日志与指标。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// 向量过短、同步字不匹配、包 ID 未知或槽位非有限值
    #[error("Malformed telemetry: {0}")]
    Malformed(#[from] ProtocolError),

    /// 设备过温保护
    #[error("Device fault: overtemperature flag set")]
    DeviceFault,

    /// 已识别但实时路径不解码的数据包
    #[error("Unsupported {0} packet skipped")]
    Unsupported(PacketKind),
}

impl DecodeError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn is_device_fault(&self) -> bool {
        matches!(self, Self::DeviceFault)
    }
}

/// Driver 模块错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 操作员令牌不在表中（不会发送任何内容）
    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),

    /// 协议层错误
    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 参数无效
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// 参数名
        param: String,
        /// 原因
        reason: String,
    },

    /// 事件通道已关闭
    #[error("Event channel closed")]
    ChannelClosed,
}

impl From<ProtocolError> for DriverError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::UnrecognizedCommand(token) => DriverError::UnrecognizedCommand(token),
            other => DriverError::Protocol(other),
        }
    }
}

impl DriverError {
    /// 是否为配置错误
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidParameter { .. })
    }

    /// 创建参数无效错误
    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}
