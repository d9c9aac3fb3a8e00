//! Gecko 夹爪协议层
//!
//! 负责将遥测向量（定长 `f64` 序列）解析为类型安全的状态反馈，
//! 以及将命令标识符编码为下行参数列表（名称 + 数值）。
//!
//! 本层无状态、不做 I/O：状态保持、闭环监控见 `gecko-driver`。

pub mod command;
pub mod flags;
pub mod ids;
pub mod operator;
pub mod telemetry;

pub use command::*;
pub use flags::*;
pub use ids::*;
pub use operator::*;
pub use telemetry::*;

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid telemetry length: expected at least {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Sync pattern mismatch: expected FF FF FD, got {found:02X?}")]
    SyncMismatch { found: [u8; 3] },

    #[error("Unknown packet id: 0x{id:02X}")]
    UnknownPacketId { id: u8 },

    #[error("Non-finite value in telemetry slot {slot}")]
    NonFiniteSlot { slot: usize },

    #[error("Unknown command identifier: {0}")]
    UnknownCommand(String),

    #[error("Unrecognized operator command: {0}")]
    UnrecognizedCommand(String),

    #[error("Parameter names do not match any command: {0:?}")]
    UnmatchedParameters(Vec<String>),
}

/// 小端字节序转 u16
///
/// 旧版帧格式中 ERR / TIME 字段按 L、H 顺序排列。
pub fn bytes_to_u16_le(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// 大端字节序转 u16
///
/// 旧版帧格式中状态字按 H、L 顺序排列。
pub fn bytes_to_u16_be(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// 将遥测槽位中的 `f64` 还原为其 8 字节原始位模式（大端）
///
/// 旧版帧格式把原始字节塞进 `f64` 的位模式中传输。
pub fn f64_to_raw_bytes(value: f64) -> [u8; 8] {
    value.to_bits().to_be_bytes()
}

/// 将 8 字节原始位模式（大端）打包为 `f64`，与 [`f64_to_raw_bytes`] 互逆
pub fn raw_bytes_to_f64(bytes: [u8; 8]) -> f64 {
    f64::from_bits(u64::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_u16_le() {
        assert_eq!(bytes_to_u16_le([0x34, 0x12]), 0x1234);
    }

    #[test]
    fn test_bytes_to_u16_be() {
        assert_eq!(bytes_to_u16_be([0x12, 0x34]), 0x1234);
    }

    #[test]
    fn test_raw_bytes_preserve_nan_payload() {
        // FF FF FD 开头的位模式是一个 NaN，必须原样保留
        let bytes = [0xFF, 0xFF, 0xFD, 0x00, 0x01, 0x02, 0x03, 0x04];
        let value = raw_bytes_to_f64(bytes);
        assert!(value.is_nan());
        assert_eq!(f64_to_raw_bytes(value), bytes);
    }

    #[test]
    fn test_error_display() {
        let err = ProtocolError::InvalidLength {
            expected: 11,
            actual: 4,
        };
        assert!(format!("{}", err).contains("at least 11"));

        let err = ProtocolError::SyncMismatch {
            found: [0x00, 0x12, 0xAB],
        };
        assert!(format!("{}", err).contains("AB"));

        let err = ProtocolError::UnknownPacketId { id: 0x07 };
        assert_eq!(format!("{}", err), "Unknown packet id: 0x07");
    }
}
