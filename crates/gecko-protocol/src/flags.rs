//! 夹爪状态标志
//!
//! 两种帧格式共用一张命名标志表（[`StatusFlag`]）：
//! - 逐字段格式：每个标志占一个遥测槽位，非零即为真
//! - 旧版位打包格式：标志位于 16 位状态字（`STATUS_H << 8 | STATUS_L`）中的固定位

use crate::ids::{
    SLOT_ADHESIVE_ENGAGE, SLOT_AUTOMATIC_MODE_ENABLE, SLOT_EXPERIMENT_IN_PROGRESS,
    SLOT_FILE_IS_OPEN, SLOT_OVERTEMPERATURE, SLOT_WRIST_LOCK,
};
use bilge::prelude::*;

// ============================================================================
// 位域结构定义（使用 bilge）
// ============================================================================

/// 旧版状态字位域（16 位）
///
/// 协议定义（STATUS_L 为低字节，STATUS_H 为高字节）：
/// - Bit 0: 粘附垫接合（STATUS_L & 0x01）
/// - Bit 1: 腕部锁定（STATUS_L & 0x02）
/// - Bit 3: 自动模式使能（STATUS_L & 0x08）
/// - Bit 6: 日志文件已打开（STATUS_L & 0x40）
/// - Bit 8: 实验记录中（STATUS_H & 0x01）
/// - Bit 15: 过温（STATUS_H & 0x80）
/// - 其余位：保留
#[bitsize(16)]
#[derive(FromBits, DebugBits, Clone, Copy, Default)]
pub struct StatusWord {
    pub adhesive_engage: bool,        // Bit 0
    pub wrist_lock: bool,             // Bit 1
    reserved_2: u1,                   // Bit 2
    pub automatic_mode_enable: bool,  // Bit 3
    reserved_4: u2,                   // Bit 4-5
    pub file_is_open: bool,           // Bit 6
    reserved_7: u1,                   // Bit 7
    pub experiment_in_progress: bool, // Bit 8
    reserved_9: u6,                   // Bit 9-14
    pub overtemperature: bool,        // Bit 15
}

// ============================================================================
// 命名标志表
// ============================================================================

/// 状态标志名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    Overtemperature,
    ExperimentInProgress,
    FileIsOpen,
    AutomaticModeEnable,
    WristLock,
    AdhesiveEngage,
}

impl StatusFlag {
    /// 全部标志（按逐字段格式的槽位顺序）
    pub const ALL: [StatusFlag; 6] = [
        StatusFlag::Overtemperature,
        StatusFlag::ExperimentInProgress,
        StatusFlag::FileIsOpen,
        StatusFlag::AutomaticModeEnable,
        StatusFlag::WristLock,
        StatusFlag::AdhesiveEngage,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StatusFlag::Overtemperature => "overtemperature",
            StatusFlag::ExperimentInProgress => "experiment_in_progress",
            StatusFlag::FileIsOpen => "file_is_open",
            StatusFlag::AutomaticModeEnable => "automatic_mode_enable",
            StatusFlag::WristLock => "wrist_lock",
            StatusFlag::AdhesiveEngage => "adhesive_engage",
        }
    }

    /// 在 16 位状态字中的位置
    pub const fn bit(self) -> u8 {
        match self {
            StatusFlag::Overtemperature => 15,
            StatusFlag::ExperimentInProgress => 8,
            StatusFlag::FileIsOpen => 6,
            StatusFlag::AutomaticModeEnable => 3,
            StatusFlag::WristLock => 1,
            StatusFlag::AdhesiveEngage => 0,
        }
    }

    /// 在状态字中的掩码
    pub const fn mask(self) -> u16 {
        1 << self.bit()
    }

    /// 在逐字段格式遥测向量中的槽位
    pub const fn slot(self) -> usize {
        match self {
            StatusFlag::Overtemperature => SLOT_OVERTEMPERATURE,
            StatusFlag::ExperimentInProgress => SLOT_EXPERIMENT_IN_PROGRESS,
            StatusFlag::FileIsOpen => SLOT_FILE_IS_OPEN,
            StatusFlag::AutomaticModeEnable => SLOT_AUTOMATIC_MODE_ENABLE,
            StatusFlag::WristLock => SLOT_WRIST_LOCK,
            StatusFlag::AdhesiveEngage => SLOT_ADHESIVE_ENGAGE,
        }
    }
}

impl std::fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 解码后的状态标志集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags {
    pub overtemperature: bool,
    pub experiment_in_progress: bool,
    pub file_is_open: bool,
    pub automatic_mode_enable: bool,
    pub wrist_lock: bool,
    pub adhesive_engage: bool,
}

impl StatusFlags {
    /// 读取单个标志
    pub fn get(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::Overtemperature => self.overtemperature,
            StatusFlag::ExperimentInProgress => self.experiment_in_progress,
            StatusFlag::FileIsOpen => self.file_is_open,
            StatusFlag::AutomaticModeEnable => self.automatic_mode_enable,
            StatusFlag::WristLock => self.wrist_lock,
            StatusFlag::AdhesiveEngage => self.adhesive_engage,
        }
    }

    /// 设置单个标志
    pub fn set(&mut self, flag: StatusFlag, value: bool) {
        let field = match flag {
            StatusFlag::Overtemperature => &mut self.overtemperature,
            StatusFlag::ExperimentInProgress => &mut self.experiment_in_progress,
            StatusFlag::FileIsOpen => &mut self.file_is_open,
            StatusFlag::AutomaticModeEnable => &mut self.automatic_mode_enable,
            StatusFlag::WristLock => &mut self.wrist_lock,
            StatusFlag::AdhesiveEngage => &mut self.adhesive_engage,
        };
        *field = value;
    }

    /// 从逐字段格式的遥测槽位解析（非零即为真）
    ///
    /// 越界的槽位视为 false；长度校验由调用方负责。
    pub fn from_slots(values: &[f64]) -> Self {
        let mut flags = Self::default();
        for flag in StatusFlag::ALL {
            let set = values.get(flag.slot()).is_some_and(|v| *v != 0.0);
            flags.set(flag, set);
        }
        flags
    }

    /// 从 16 位状态字解析
    pub fn from_word(word: u16) -> Self {
        StatusWord::from(u16::new(word)).into()
    }

    /// 编码为 16 位状态字（保留位为 0）
    pub fn to_word(&self) -> u16 {
        let mut word = StatusWord::from(u16::new(0));
        word.set_overtemperature(self.overtemperature);
        word.set_experiment_in_progress(self.experiment_in_progress);
        word.set_file_is_open(self.file_is_open);
        word.set_automatic_mode_enable(self.automatic_mode_enable);
        word.set_wrist_lock(self.wrist_lock);
        word.set_adhesive_engage(self.adhesive_engage);
        u16::from(word).value()
    }

    /// 按表顺序遍历 (标志, 值)
    pub fn iter(&self) -> impl Iterator<Item = (StatusFlag, bool)> + '_ {
        StatusFlag::ALL.into_iter().map(move |flag| (flag, self.get(flag)))
    }
}

impl From<StatusWord> for StatusFlags {
    fn from(word: StatusWord) -> Self {
        Self {
            overtemperature: word.overtemperature(),
            experiment_in_progress: word.experiment_in_progress(),
            file_is_open: word.file_is_open(),
            automatic_mode_enable: word.automatic_mode_enable(),
            wrist_lock: word.wrist_lock(),
            adhesive_engage: word.adhesive_engage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word_bit_order() {
        // STATUS_H = 0x80（过温），STATUS_L = 0x41（文件已打开 + 粘附垫接合）
        let word = u16::from_be_bytes([0x80, 0x41]);
        let status = StatusWord::from(u16::new(word));

        assert!(status.overtemperature());
        assert!(!status.experiment_in_progress());
        assert!(status.file_is_open());
        assert!(!status.automatic_mode_enable());
        assert!(!status.wrist_lock());
        assert!(status.adhesive_engage());
    }

    #[test]
    fn test_flag_table_matches_bitfield() {
        // 每个表项的掩码必须只点亮对应的位域字段
        for flag in StatusFlag::ALL {
            let flags = StatusFlags::from_word(flag.mask());
            for other in StatusFlag::ALL {
                assert_eq!(
                    flags.get(other),
                    other == flag,
                    "mask of {} leaked into {}",
                    flag,
                    other
                );
            }
        }
    }

    #[test]
    fn test_legacy_masks() {
        assert_eq!(StatusFlag::Overtemperature.mask(), 0x80 << 8);
        assert_eq!(StatusFlag::ExperimentInProgress.mask(), 0x01 << 8);
        assert_eq!(StatusFlag::FileIsOpen.mask(), 0x40);
        assert_eq!(StatusFlag::AutomaticModeEnable.mask(), 0x08);
        assert_eq!(StatusFlag::WristLock.mask(), 0x02);
        assert_eq!(StatusFlag::AdhesiveEngage.mask(), 0x01);
    }

    #[test]
    fn test_reserved_bits_ignored() {
        // 只有保留位被置位
        let flags = StatusFlags::from_word(0b0111_1110_1011_0100);
        assert_eq!(flags, StatusFlags::default());
    }

    #[test]
    fn test_to_word() {
        let mut flags = StatusFlags::default();
        flags.set(StatusFlag::WristLock, true);
        flags.set(StatusFlag::ExperimentInProgress, true);
        assert_eq!(flags.to_word(), 0x0102);
        assert_eq!(StatusFlags::from_word(flags.to_word()), flags);
    }

    #[test]
    fn test_from_slots() {
        let values = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -2.5, 0.0, 1.0, 0.0, 0.0];
        let flags = StatusFlags::from_slots(&values);

        assert!(!flags.overtemperature);
        assert!(flags.experiment_in_progress);
        assert!(!flags.file_is_open);
        assert!(flags.automatic_mode_enable);
        assert!(!flags.wrist_lock);
        assert!(flags.adhesive_engage);
    }

    #[test]
    fn test_from_slots_short_input() {
        let flags = StatusFlags::from_slots(&[0.0, 1.0, 1.0, 1.0]);
        assert!(flags.overtemperature);
        assert!(!flags.adhesive_engage);
    }

    #[test]
    fn test_iter_follows_table_order() {
        let flags = StatusFlags {
            wrist_lock: true,
            ..Default::default()
        };
        let set: Vec<_> = flags.iter().filter(|(_, v)| *v).map(|(f, _)| f).collect();
        assert_eq!(set, vec![StatusFlag::WristLock]);
        assert_eq!(flags.iter().count(), 6);
    }
}
