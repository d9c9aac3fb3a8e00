//! 操作员命令表
//!
//! 面向人的命令令牌（如 `"close the gripper"`、`gecko_gripper_close`）先映射到
//! [`OperatorAction`]，再由 [`CommandTable`](crate::CommandTable) 编码。
//! 两层表分开维护，操作员侧改名不影响内部标识符空间。

use crate::ProtocolError;
use crate::command::CommandId;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 操作员令牌的统一前缀（`gecko_gripper_<内部标识符>`）
pub const OPERATOR_TOKEN_PREFIX: &str = "gecko_gripper_";

/// 操作员命令解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorAction {
    /// 编码并下发内部命令
    Dispatch(CommandId),
    /// 启动自主栖停：使能反馈监控器
    ArmPerching,
    /// 中止自主栖停：解除反馈监控器
    DisarmPerching,
}

impl fmt::Display for OperatorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorAction::Dispatch(id) => write!(f, "{}", id),
            OperatorAction::ArmPerching => f.write_str("arm_perching"),
            OperatorAction::DisarmPerching => f.write_str("disarm_perching"),
        }
    }
}

impl FromStr for OperatorAction {
    type Err = ProtocolError;

    /// 解析别名目标：内部标识符，或 `arm_perching` / `disarm_perching`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arm_perching" => Ok(OperatorAction::ArmPerching),
            "disarm_perching" => Ok(OperatorAction::DisarmPerching),
            other => other.parse::<CommandId>().map(OperatorAction::Dispatch),
        }
    }
}

/// 内置的自然语言短语
const BUILTIN_PHRASES: &[(&str, OperatorAction)] = &[
    ("open the gripper", OperatorAction::Dispatch(CommandId::Open)),
    ("close the gripper", OperatorAction::Dispatch(CommandId::Close)),
    ("engage adhesive", OperatorAction::Dispatch(CommandId::Engage)),
    ("disengage adhesive", OperatorAction::Dispatch(CommandId::Disengage)),
    ("lock the wrist", OperatorAction::Dispatch(CommandId::Lock)),
    ("unlock the wrist", OperatorAction::Dispatch(CommandId::Unlock)),
    ("enable automatic mode", OperatorAction::Dispatch(CommandId::EnableAuto)),
    ("disable automatic mode", OperatorAction::Dispatch(CommandId::DisableAuto)),
    ("engage and lock", OperatorAction::Dispatch(CommandId::EngageAndLock)),
    ("reset the gripper", OperatorAction::Dispatch(CommandId::Reset)),
    ("query status", OperatorAction::Dispatch(CommandId::Status)),
    ("begin autonomous perching", OperatorAction::ArmPerching),
    ("abort autonomous perching", OperatorAction::DisarmPerching),
];

/// 令牌归一化：去首尾空白、ASCII 小写、合并连续空白
pub fn normalize_token(token: &str) -> String {
    token
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 操作员命令表
#[derive(Debug, Clone)]
pub struct OperatorTable {
    entries: HashMap<String, OperatorAction>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl OperatorTable {
    /// 空表
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 内置表
    ///
    /// - 每个内部命令：`gecko_gripper_<id>`
    /// - `gecko_gripper_begin_perching` / `gecko_gripper_abort_perching`
    /// - 常用自然语言短语
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for id in CommandId::ALL {
            table.insert(
                format!("{}{}", OPERATOR_TOKEN_PREFIX, id.as_str()),
                OperatorAction::Dispatch(id),
            );
        }
        table.insert(
            format!("{}begin_perching", OPERATOR_TOKEN_PREFIX),
            OperatorAction::ArmPerching,
        );
        table.insert(
            format!("{}abort_perching", OPERATOR_TOKEN_PREFIX),
            OperatorAction::DisarmPerching,
        );
        for (phrase, action) in BUILTIN_PHRASES {
            table.insert(*phrase, *action);
        }
        table
    }

    /// 添加或覆盖一个令牌，返回被覆盖的旧动作
    pub fn insert(
        &mut self,
        token: impl AsRef<str>,
        action: OperatorAction,
    ) -> Option<OperatorAction> {
        self.entries.insert(normalize_token(token.as_ref()), action)
    }

    /// 解析令牌
    ///
    /// # 错误
    ///
    /// - `UnrecognizedCommand`: 令牌不在表中
    pub fn resolve(&self, token: &str) -> Result<OperatorAction, ProtocolError> {
        self.entries
            .get(&normalize_token(token))
            .copied()
            .ok_or_else(|| ProtocolError::UnrecognizedCommand(token.to_string()))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&normalize_token(token))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按字典序列出所有令牌
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}
