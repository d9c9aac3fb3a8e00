//! 控制器配置
//!
//! 配置文件为 TOML，所有键都有默认值：
//!
//! ```toml
//! tolerance = 0.18
//! telemetry_format = "auto"          # auto | positional | bit_packed
//! error_status_policy = "clear_only" # clear_only | always_store
//! name_prefix = "perching_gecko_"
//! start_armed = false
//!
//! [operator_aliases]
//! "grab it" = "engage_and_lock"
//! "stop perching" = "disarm_perching"
//! ```

use crate::decoder::ErrorStatusPolicy;
use crate::error::DriverError;
use crate::monitor::DEFAULT_TOLERANCE;
use gecko_protocol::{OperatorAction, OperatorTable, TelemetryFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// 反馈监控器容差（必须为有限正数）
    pub tolerance: f64,
    /// 遥测帧格式
    pub telemetry_format: TelemetryFormat,
    /// 错误码写入策略
    pub error_status_policy: ErrorStatusPolicy,
    /// 下行参数名前缀
    pub name_prefix: String,
    /// 构造时即使能反馈监控器
    pub start_armed: bool,
    /// 额外的操作员令牌 → 内部标识符（或 `arm_perching` / `disarm_perching`）
    pub operator_aliases: BTreeMap<String, String>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            telemetry_format: TelemetryFormat::Auto,
            error_status_policy: ErrorStatusPolicy::ClearOnly,
            name_prefix: String::new(),
            start_armed: false,
            operator_aliases: BTreeMap::new(),
        }
    }
}

impl ControllerConfig {
    /// 从 TOML 文本加载并校验
    pub fn from_toml_str(text: &str) -> Result<Self, DriverError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| DriverError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载并校验
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DriverError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// 序列化为 TOML 文本
    pub fn to_toml_string(&self) -> Result<String, DriverError> {
        toml::to_string_pretty(self)
            .map_err(|e| DriverError::Config(format!("failed to serialize config: {}", e)))
    }

    /// 校验配置
    ///
    /// # 错误
    ///
    /// - `InvalidParameter`: 容差不是有限正数
    /// - `Config`: 别名为空或指向未知的内部标识符
    pub fn validate(&self) -> Result<(), DriverError> {
        validate_tolerance(self.tolerance)?;
        self.operator_table().map(|_| ())
    }

    /// 构造操作员命令表：内置令牌之上叠加别名
    pub fn operator_table(&self) -> Result<OperatorTable, DriverError> {
        let mut table = OperatorTable::builtin();
        for (token, target) in &self.operator_aliases {
            table.insert(token, parse_alias(token, target)?);
        }
        Ok(table)
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<(), DriverError> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(DriverError::invalid_parameter(
            "tolerance",
            format!("must be a finite positive number, got {}", tolerance),
        ));
    }
    Ok(())
}

pub(crate) fn parse_alias(token: &str, target: &str) -> Result<OperatorAction, DriverError> {
    if token.trim().is_empty() {
        return Err(DriverError::Config(format!(
            "empty operator alias for '{}'",
            target
        )));
    }
    target.parse::<OperatorAction>().map_err(|_| {
        DriverError::Config(format!(
            "operator alias '{}' targets unknown command '{}'",
            token, target
        ))
    })
}
