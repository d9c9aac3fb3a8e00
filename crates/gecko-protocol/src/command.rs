//! 命令表
//!
//! 内部命令标识符（[`CommandId`]）到下行参数列表（名称 + 数值）的静态映射。
//! 命令表只负责编码，从不发送。

use crate::ProtocolError;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// 内部命令标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandId {
    Open,
    Close,
    Engage,
    Disengage,
    Lock,
    Unlock,
    EnableAuto,
    DisableAuto,
    ToggleAuto,
    /// 设置延时（调用方提供 1 个数值）
    SetDelay,
    /// 标记夹爪（调用方提供 1 个数值：索引）
    MarkGripper,
    /// 打开实验（调用方提供 1 个数值：实验索引）
    OpenExp,
    /// 跳到下一条记录（调用方提供 1 个数值：跳过条数）
    NextRecord,
    /// 定位记录（调用方提供 1 个数值：记录号）
    SeekRecord,
    CloseExp,
    Record,
    Exp,
    Delay,
    Status,
    /// 接合 + 锁定，一次发出两个参数
    EngageAndLock,
    /// 复合复位序列，一次发出五个参数
    Reset,
}

impl CommandId {
    /// 全部命令
    pub const ALL: [CommandId; 21] = [
        CommandId::Open,
        CommandId::Close,
        CommandId::Engage,
        CommandId::Disengage,
        CommandId::Lock,
        CommandId::Unlock,
        CommandId::EnableAuto,
        CommandId::DisableAuto,
        CommandId::ToggleAuto,
        CommandId::SetDelay,
        CommandId::MarkGripper,
        CommandId::OpenExp,
        CommandId::NextRecord,
        CommandId::SeekRecord,
        CommandId::CloseExp,
        CommandId::Record,
        CommandId::Exp,
        CommandId::Delay,
        CommandId::Status,
        CommandId::EngageAndLock,
        CommandId::Reset,
    ];

    /// 内部标识符字符串
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandId::Open => "open",
            CommandId::Close => "close",
            CommandId::Engage => "engage",
            CommandId::Disengage => "disengage",
            CommandId::Lock => "lock",
            CommandId::Unlock => "unlock",
            CommandId::EnableAuto => "enable_auto",
            CommandId::DisableAuto => "disable_auto",
            CommandId::ToggleAuto => "toggle_auto",
            CommandId::SetDelay => "set_delay",
            CommandId::MarkGripper => "mark_gripper",
            CommandId::OpenExp => "open_exp",
            CommandId::NextRecord => "next_record",
            CommandId::SeekRecord => "seek_record",
            CommandId::CloseExp => "close_exp",
            CommandId::Record => "record",
            CommandId::Exp => "exp",
            CommandId::Delay => "delay",
            CommandId::Status => "status",
            CommandId::EngageAndLock => "engage_and_lock",
            CommandId::Reset => "reset",
        }
    }

    /// 下行参数名（不含前缀），顺序即发送顺序
    pub const fn parameter_names(self) -> &'static [&'static str] {
        match self {
            CommandId::Open => &["gripper_open"],
            CommandId::Close => &["gripper_close"],
            CommandId::Engage => &["gripper_engage"],
            CommandId::Disengage => &["gripper_disengage"],
            CommandId::Lock => &["gripper_lock"],
            CommandId::Unlock => &["gripper_unlock"],
            CommandId::EnableAuto => &["gripper_enable_auto"],
            CommandId::DisableAuto => &["gripper_disable_auto"],
            CommandId::ToggleAuto => &["gripper_toggle_auto"],
            CommandId::SetDelay => &["gripper_set_delay"],
            CommandId::MarkGripper => &["gripper_mark_gripper"],
            CommandId::OpenExp => &["gripper_open_exp"],
            CommandId::NextRecord => &["gripper_next_record"],
            CommandId::SeekRecord => &["gripper_seek_record"],
            CommandId::CloseExp => &["gripper_close_exp"],
            CommandId::Record => &["record"],
            CommandId::Exp => &["gripper_exp"],
            CommandId::Delay => &["gripper_delay"],
            CommandId::Status => &["gripper_status"],
            CommandId::EngageAndLock => &["gripper_engage", "gripper_lock"],
            CommandId::Reset => &[
                "disable_auto",
                "disengage",
                "unlock",
                "set_delay",
                "query_exp",
            ],
        }
    }

    /// 是否携带 1 个调用方提供的数值
    pub const fn takes_value(self) -> bool {
        matches!(
            self,
            CommandId::SetDelay
                | CommandId::MarkGripper
                | CommandId::OpenExp
                | CommandId::NextRecord
                | CommandId::SeekRecord
        )
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownCommand(s.to_string()))
    }
}

/// 单个下行参数
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: Cow<'static, str>,
    pub value: f64,
}

impl Parameter {
    pub fn new(name: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// 下行参数列表（最长的复位序列为 5 项，全部内联存储）
pub type ParameterList = SmallVec<[Parameter; 5]>;

/// 命令表
///
/// 可选的名称前缀会加在每个下行参数名之前（实际设备期望如 `perching_gecko_`）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    prefix: String,
}

impl CommandTable {
    /// 创建无前缀的命令表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带名称前缀的命令表
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 编码命令
    ///
    /// 只有 [`CommandId::takes_value`] 为真的命令使用 `value`（缺省 0.0），
    /// 其余参数一律为 0.0。
    pub fn encode(&self, id: CommandId, value: Option<f64>) -> ParameterList {
        let value = if id.takes_value() {
            value.unwrap_or(0.0)
        } else {
            0.0
        };

        id.parameter_names()
            .iter()
            .map(|name| {
                let name: Cow<'static, str> = if self.prefix.is_empty() {
                    Cow::Borrowed(*name)
                } else {
                    Cow::Owned(format!("{}{}", self.prefix, name))
                };
                Parameter { name, value }
            })
            .collect()
    }

    /// 按内部标识符字符串查找并编码（默认数值）
    ///
    /// # 错误
    ///
    /// - `UnknownCommand`: 标识符不在表中
    pub fn lookup(&self, identifier: &str) -> Result<ParameterList, ProtocolError> {
        self.lookup_with_value(identifier, None)
    }

    /// 按内部标识符字符串查找并编码
    pub fn lookup_with_value(
        &self,
        identifier: &str,
        value: Option<f64>,
    ) -> Result<ParameterList, ProtocolError> {
        let id = identifier.parse::<CommandId>()?;
        Ok(self.encode(id, value))
    }

    /// 反查：由下行参数名序列还原命令标识符
    ///
    /// 名称可以带或不带本表的前缀。
    pub fn identify<S: AsRef<str>>(&self, names: &[S]) -> Result<CommandId, ProtocolError> {
        let stripped: SmallVec<[&str; 5]> = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                name.strip_prefix(self.prefix.as_str()).unwrap_or(name)
            })
            .collect();

        CommandId::ALL
            .into_iter()
            .find(|id| id.parameter_names() == stripped.as_slice())
            .ok_or_else(|| {
                ProtocolError::UnmatchedParameters(
                    names.iter().map(|n| n.as_ref().to_string()).collect(),
                )
            })
    }
}
