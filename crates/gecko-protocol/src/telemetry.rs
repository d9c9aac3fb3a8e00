//! 遥测帧结构体定义
//!
//! 同一个遥测向量可能承载两种帧格式：
//! - [`TelemetryFrame::PositionalFields`]：槽位 0~10 逐字段对应状态字段
//! - [`TelemetryFrame::BitPacked`]：旧版格式，槽位 7、8 的 `f64` 位模式中
//!   依次是同步字、子包 ID、ERR、TIME 以及 16 位状态字
//!
//! 两者都通过 [`TelemetryFrame::parse`] 归一为 [`TelemetryPacket`]。

use crate::flags::StatusFlags;
use crate::ids::{
    LEGACY_HEADER_SLOT, LEGACY_STATUS_SLOT, MIN_TELEMETRY_LEN, PacketId, PacketKind,
    SLOT_DELAY, SLOT_ERROR_STATUS, SLOT_EXP_IDX, SLOT_LAST_STATUS_READ_TIME, SLOT_PACKET_TYPE,
    SYNC_PATTERN,
};
use crate::{ProtocolError, bytes_to_u16_be, bytes_to_u16_le, f64_to_raw_bytes};

/// 帧格式选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TelemetryFormat {
    /// 根据槽位 7 是否以同步字开头自动判断
    #[default]
    Auto,
    /// 强制按逐字段格式解析
    Positional,
    /// 强制按旧版位打包格式解析
    BitPacked,
}

impl std::str::FromStr for TelemetryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(TelemetryFormat::Auto),
            "positional" => Ok(TelemetryFormat::Positional),
            "bit_packed" | "legacy" => Ok(TelemetryFormat::BitPacked),
            other => Err(format!("unknown telemetry format: {}", other)),
        }
    }
}

/// 遥测帧（按格式打标签）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryFrame {
    /// 旧版位打包格式：帧头 8 字节 + 状态 8 字节（均为 `f64` 原始位模式）
    ///
    /// `packet_type` 是槽位 0 的原值，非零时整帧为批量数据包。
    BitPacked {
        packet_type: f64,
        header: [u8; 8],
        status: [u8; 8],
    },
    /// 逐字段格式：槽位 0~10
    PositionalFields([f64; MIN_TELEMETRY_LEN]),
}

/// 状态包内容（尚未应用任何状态保持策略）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFeedback {
    pub error_status: i32,
    pub last_status_read_time: i64,
    pub flags: StatusFlags,
    /// 旧版格式不携带
    pub delay: Option<i32>,
    /// 旧版格式不携带
    pub exp_idx: Option<i32>,
}

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryPacket {
    /// 状态包
    Status(StatusFeedback),
    /// 已识别但实时路径不解码的数据包
    Skipped(PacketKind),
}

/// 判断一个槽位值的位模式是否以旧版同步字开头
pub fn has_sync_pattern(value: f64) -> bool {
    f64_to_raw_bytes(value)[..3] == SYNC_PATTERN
}

/// 浮点数截断为整数（越界时饱和）
fn truncate_i32(value: f64) -> i32 {
    value.trunc() as i32
}

fn truncate_i64(value: f64) -> i64 {
    value.trunc() as i64
}

impl TelemetryFrame {
    /// 从遥测向量构造帧
    ///
    /// # 错误
    ///
    /// - `InvalidLength`: 向量短于 [`MIN_TELEMETRY_LEN`]
    /// - `SyncMismatch`: 指定 `BitPacked` 格式但槽位 7 没有同步字
    ///
    /// 自动检测只在槽位 0 为 0 时才认定旧版格式，槽位 0 非零的向量一律按批量包处理。
    pub fn from_vector(values: &[f64], format: TelemetryFormat) -> Result<Self, ProtocolError> {
        if values.len() < MIN_TELEMETRY_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: MIN_TELEMETRY_LEN,
                actual: values.len(),
            });
        }

        let bit_packed = match format {
            TelemetryFormat::Auto => {
                values[SLOT_PACKET_TYPE] == 0.0 && has_sync_pattern(values[LEGACY_HEADER_SLOT])
            },
            TelemetryFormat::Positional => false,
            TelemetryFormat::BitPacked => true,
        };

        if bit_packed {
            let header = f64_to_raw_bytes(values[LEGACY_HEADER_SLOT]);
            if header[..3] != SYNC_PATTERN {
                return Err(ProtocolError::SyncMismatch {
                    found: [header[0], header[1], header[2]],
                });
            }
            Ok(TelemetryFrame::BitPacked {
                packet_type: values[SLOT_PACKET_TYPE],
                header,
                status: f64_to_raw_bytes(values[LEGACY_STATUS_SLOT]),
            })
        } else {
            let mut slots = [0.0; MIN_TELEMETRY_LEN];
            slots.copy_from_slice(&values[..MIN_TELEMETRY_LEN]);
            Ok(TelemetryFrame::PositionalFields(slots))
        }
    }

    /// 帧格式
    pub fn format(&self) -> TelemetryFormat {
        match self {
            TelemetryFrame::BitPacked { .. } => TelemetryFormat::BitPacked,
            TelemetryFrame::PositionalFields(_) => TelemetryFormat::Positional,
        }
    }

    /// 解析帧内容
    pub fn parse(&self) -> Result<TelemetryPacket, ProtocolError> {
        match self {
            TelemetryFrame::BitPacked {
                packet_type,
                header,
                status,
            } => parse_bit_packed(*packet_type, header, status),
            TelemetryFrame::PositionalFields(slots) => parse_positional(slots),
        }
    }
}

/// 逐字段格式
///
/// 槽位 0 非零时为批量数据包，不再解释其余槽位。
fn parse_positional(slots: &[f64; MIN_TELEMETRY_LEN]) -> Result<TelemetryPacket, ProtocolError> {
    let packet_type = slots[SLOT_PACKET_TYPE];
    if !packet_type.is_finite() {
        return Err(ProtocolError::NonFiniteSlot {
            slot: SLOT_PACKET_TYPE,
        });
    }
    if packet_type != 0.0 {
        return Ok(TelemetryPacket::Skipped(PacketKind::Bulk));
    }

    if let Some(slot) = slots.iter().position(|v| !v.is_finite()) {
        return Err(ProtocolError::NonFiniteSlot { slot });
    }

    Ok(TelemetryPacket::Status(StatusFeedback {
        error_status: truncate_i32(slots[SLOT_ERROR_STATUS]),
        last_status_read_time: truncate_i64(slots[SLOT_LAST_STATUS_READ_TIME]),
        flags: StatusFlags::from_slots(slots),
        delay: Some(truncate_i32(slots[SLOT_DELAY])),
        exp_idx: Some(truncate_i32(slots[SLOT_EXP_IDX])),
    }))
}

/// 旧版位打包格式
///
/// 帧头：`SYNC[0..3] | ID | ERR_L | ERR_H | TIME_L | TIME_H`
/// 状态：`STATUS_H | STATUS_L | 保留...`
fn parse_bit_packed(
    packet_type: f64,
    header: &[u8; 8],
    status: &[u8; 8],
) -> Result<TelemetryPacket, ProtocolError> {
    if !packet_type.is_finite() {
        return Err(ProtocolError::NonFiniteSlot {
            slot: SLOT_PACKET_TYPE,
        });
    }
    if packet_type != 0.0 {
        return Ok(TelemetryPacket::Skipped(PacketKind::Bulk));
    }

    if header[..3] != SYNC_PATTERN {
        return Err(ProtocolError::SyncMismatch {
            found: [header[0], header[1], header[2]],
        });
    }

    let id = PacketId::try_from(header[3])
        .map_err(|_| ProtocolError::UnknownPacketId { id: header[3] })?;

    match id {
        PacketId::Science => Ok(TelemetryPacket::Skipped(PacketKind::Science)),
        PacketId::Status => {
            let error_status = bytes_to_u16_le([header[4], header[5]]);
            let time = bytes_to_u16_le([header[6], header[7]]);
            let word = bytes_to_u16_be([status[0], status[1]]);

            Ok(TelemetryPacket::Status(StatusFeedback {
                error_status: i32::from(error_status),
                last_status_read_time: i64::from(time),
                flags: StatusFlags::from_word(word),
                delay: None,
                exp_idx: None,
            }))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_bytes_to_f64;

    fn legacy_vector(id: u8, err: u16, time: u16, status_h: u8, status_l: u8) -> Vec<f64> {
        let err = err.to_le_bytes();
        let time = time.to_le_bytes();
        let header = [0xFF, 0xFF, 0xFD, id, err[0], err[1], time[0], time[1]];
        let status = [status_h, status_l, 0, 0, 0, 0, 0, 0];

        let mut values = vec![0.0; MIN_TELEMETRY_LEN];
        values[LEGACY_HEADER_SLOT] = raw_bytes_to_f64(header);
        values[LEGACY_STATUS_SLOT] = raw_bytes_to_f64(status);
        values
    }

    fn expect_status(packet: TelemetryPacket) -> StatusFeedback {
        match packet {
            TelemetryPacket::Status(status) => status,
            other => panic!("expected status packet, got {:?}", other),
        }
    }

    #[test]
    fn test_short_vector_rejected() {
        let result = TelemetryFrame::from_vector(&[0.0; 10], TelemetryFormat::Auto);
        assert_eq!(
            result,
            Err(ProtocolError::InvalidLength {
                expected: 11,
                actual: 10
            })
        );
    }

    #[test]
    fn test_positional_slot_mapping() {
        let values = [0.0, 4.0, 5.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 3.0, 2.0];
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(frame.format(), TelemetryFormat::Positional);

        let status = expect_status(frame.parse().unwrap());
        assert_eq!(status.error_status, 4);
        assert_eq!(status.last_status_read_time, 5);
        assert!(!status.flags.overtemperature);
        assert!(status.flags.experiment_in_progress);
        assert!(status.flags.file_is_open);
        assert!(!status.flags.automatic_mode_enable);
        assert!(status.flags.wrist_lock);
        assert!(!status.flags.adhesive_engage);
        assert_eq!(status.delay, Some(3));
        assert_eq!(status.exp_idx, Some(2));
    }

    #[test]
    fn test_positional_truncates_toward_zero() {
        let values = [0.0, -1.9, 7.99, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.5, -0.5];
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Positional).unwrap();
        let status = expect_status(frame.parse().unwrap());
        assert_eq!(status.error_status, -1);
        assert_eq!(status.last_status_read_time, 7);
        assert_eq!(status.delay, Some(2));
        assert_eq!(status.exp_idx, Some(0));
    }

    #[test]
    fn test_positional_extra_slots_ignored() {
        let mut values = vec![0.0; 16];
        values[SLOT_EXP_IDX] = 9.0;
        values[15] = f64::NAN;
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(expect_status(frame.parse().unwrap()).exp_idx, Some(9));
    }

    #[test]
    fn test_bulk_packet_skipped() {
        // 槽位 0 非零时，即使其余槽位是 NaN 也不解释
        let mut values = [f64::NAN; MIN_TELEMETRY_LEN];
        values[SLOT_PACKET_TYPE] = 1.0;
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Positional).unwrap();
        assert_eq!(
            frame.parse(),
            Ok(TelemetryPacket::Skipped(PacketKind::Bulk))
        );
    }

    #[test]
    fn test_non_finite_slot_rejected() {
        let mut values = [0.0; MIN_TELEMETRY_LEN];
        values[SLOT_DELAY] = f64::INFINITY;
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Positional).unwrap();
        assert_eq!(
            frame.parse(),
            Err(ProtocolError::NonFiniteSlot { slot: SLOT_DELAY })
        );

        let mut values = [0.0; MIN_TELEMETRY_LEN];
        values[SLOT_PACKET_TYPE] = f64::NAN;
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Positional).unwrap();
        assert_eq!(
            frame.parse(),
            Err(ProtocolError::NonFiniteSlot { slot: 0 })
        );
    }

    #[test]
    fn test_auto_detects_legacy_frame() {
        let values = legacy_vector(0x00, 0x0203, 0x1234, 0x01, 0x4B);
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(frame.format(), TelemetryFormat::BitPacked);

        let status = expect_status(frame.parse().unwrap());
        assert_eq!(status.error_status, 0x0203);
        assert_eq!(status.last_status_read_time, 0x1234);
        assert!(!status.flags.overtemperature);
        assert!(status.flags.experiment_in_progress);
        assert!(status.flags.file_is_open);
        assert!(status.flags.automatic_mode_enable);
        assert!(status.flags.wrist_lock);
        assert!(status.flags.adhesive_engage);
        assert_eq!(status.delay, None);
        assert_eq!(status.exp_idx, None);
    }

    #[test]
    fn test_sync_pattern_with_bulk_packet_type() {
        let mut values = legacy_vector(0x00, 0, 5, 0x01, 0x00);
        values[SLOT_PACKET_TYPE] = 1.0;

        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(frame.format(), TelemetryFormat::Positional);
        assert_eq!(frame.parse(), Ok(TelemetryPacket::Skipped(PacketKind::Bulk)));

        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::BitPacked).unwrap();
        assert_eq!(frame.format(), TelemetryFormat::BitPacked);
        assert_eq!(frame.parse(), Ok(TelemetryPacket::Skipped(PacketKind::Bulk)));
    }

    #[test]
    fn test_legacy_overtemperature_bit() {
        let values = legacy_vector(0x00, 0, 0, 0x80, 0x00);
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::BitPacked).unwrap();
        let status = expect_status(frame.parse().unwrap());
        assert!(status.flags.overtemperature);
    }

    #[test]
    fn test_legacy_science_packet_skipped() {
        let values = legacy_vector(0x01, 0, 0, 0xFF, 0xFF);
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(
            frame.parse(),
            Ok(TelemetryPacket::Skipped(PacketKind::Science))
        );
    }

    #[test]
    fn test_legacy_unknown_packet_id() {
        let values = legacy_vector(0x05, 0, 0, 0, 0);
        let frame = TelemetryFrame::from_vector(&values, TelemetryFormat::Auto).unwrap();
        assert_eq!(
            frame.parse(),
            Err(ProtocolError::UnknownPacketId { id: 0x05 })
        );
    }

    #[test]
    fn test_forced_legacy_without_sync() {
        let values = [0.0; MIN_TELEMETRY_LEN];
        let result = TelemetryFrame::from_vector(&values, TelemetryFormat::BitPacked);
        assert_eq!(
            result,
            Err(ProtocolError::SyncMismatch {
                found: [0x00, 0x00, 0x00]
            })
        );
    }

    #[test]
    fn test_positional_flag_values_never_look_like_sync() {
        for value in [0.0, 1.0, -1.0, 255.0, f64::MAX, f64::INFINITY] {
            assert!(!has_sync_pattern(value), "{} looks like sync", value);
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("auto".parse::<TelemetryFormat>(), Ok(TelemetryFormat::Auto));
        assert_eq!("Positional".parse::<TelemetryFormat>(), Ok(TelemetryFormat::Positional));
        assert_eq!("bit-packed".parse::<TelemetryFormat>(), Ok(TelemetryFormat::BitPacked));
        assert_eq!("legacy".parse::<TelemetryFormat>(), Ok(TelemetryFormat::BitPacked));
        assert!("csv".parse::<TelemetryFormat>().is_err());
    }
}
