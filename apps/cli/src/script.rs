//! 会话脚本
//!
//! JSON 格式的事件序列，按顺序回放到控制器：
//!
//! ```json
//! {
//!   "name": "perch",
//!   "description": "arm, approach, perch",
//!   "events": [
//!     { "type": "command", "token": "begin autonomous perching" },
//!     { "type": "telemetry", "values": [0, 0, 5, 0, 0, 0, 0, 0, 0, 3, 2] },
//!     { "type": "error", "value": 0.05 },
//!     { "type": "error", "value": 0.2 }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use gecko_sdk::ControllerEvent;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 会话脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    #[serde(default)]
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 事件序列
    pub events: Vec<ScriptEvent>,
}

/// 脚本事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// 遥测向量
    Telemetry { values: Vec<f64> },

    /// 误差样本
    Error { value: f64 },

    /// 操作员命令
    Command {
        token: String,
        #[serde(default)]
        value: Option<f64>,
    },

    /// 使能反馈监控器
    Arm,

    /// 解除反馈监控器
    Disarm,
}

impl From<ScriptEvent> for ControllerEvent {
    fn from(event: ScriptEvent) -> Self {
        match event {
            ScriptEvent::Telemetry { values } => ControllerEvent::Telemetry(values),
            ScriptEvent::Error { value } => ControllerEvent::Error(value),
            ScriptEvent::Command { token, value } => ControllerEvent::Command { token, value },
            ScriptEvent::Arm => ControllerEvent::Arm,
            ScriptEvent::Disarm => ControllerEvent::Disarm,
        }
    }
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse session script")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&text)
    }
}
