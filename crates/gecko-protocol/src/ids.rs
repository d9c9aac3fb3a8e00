//! 遥测槽位与包标识常量定义
//!
//! 定义定长遥测向量的槽位布局、旧版帧格式的同步字与包 ID。

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 遥测向量的最小长度（槽位 0~10）
pub const MIN_TELEMETRY_LEN: usize = 11;

// ============================================================================
// 逐字段格式（PositionalFields）槽位
// ============================================================================

/// 包类型标志（0：状态包；非 0：离线/批量数据包，实时路径不支持）
pub const SLOT_PACKET_TYPE: usize = 0;
/// 错误码
pub const SLOT_ERROR_STATUS: usize = 1;
/// 设备上报的时间计数
pub const SLOT_LAST_STATUS_READ_TIME: usize = 2;
/// 过温标志
pub const SLOT_OVERTEMPERATURE: usize = 3;
/// 实验记录中
pub const SLOT_EXPERIMENT_IN_PROGRESS: usize = 4;
/// 日志文件已打开
pub const SLOT_FILE_IS_OPEN: usize = 5;
/// 自动模式使能
pub const SLOT_AUTOMATIC_MODE_ENABLE: usize = 6;
/// 腕部锁定
pub const SLOT_WRIST_LOCK: usize = 7;
/// 粘附垫接合
pub const SLOT_ADHESIVE_ENGAGE: usize = 8;
/// 延时参数
pub const SLOT_DELAY: usize = 9;
/// 实验/记录索引
pub const SLOT_EXP_IDX: usize = 10;

// ============================================================================
// 旧版位打包格式（BitPacked）
// ============================================================================

/// 旧版帧头所在槽位（8 字节：SYNC[3] + ID + ERR_L + ERR_H + TIME_L + TIME_H）
pub const LEGACY_HEADER_SLOT: usize = 7;

/// 旧版状态字所在槽位（Byte 0: STATUS_H, Byte 1: STATUS_L）
pub const LEGACY_STATUS_SLOT: usize = 8;

/// 旧版帧同步字
pub const SYNC_PATTERN: [u8; 3] = [0xFF, 0xFF, 0xFD];

/// 旧版帧的子包类型（帧头 Byte 3）
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PacketId {
    /// 状态包
    Status = 0x00,
    /// 科学数据包（实时路径不解码，识别后跳过）
    Science = 0x01,
}

/// 被识别但不解码的数据包类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PacketKind {
    /// 逐字段格式中槽位 0 非零：离线/批量数据包
    Bulk,
    /// 旧版格式中的科学数据子包
    Science,
}

impl std::fmt::Display for PacketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketKind::Bulk => write!(f, "bulk"),
            PacketKind::Science => write!(f, "science"),
        }
    }
}
