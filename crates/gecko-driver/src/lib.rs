//! 驱动层模块
//!
//! 本模块提供 Gecko 夹爪的状态保持与决策逻辑，包括：
//! - 遥测解码（逐字段 / 旧版位打包两种帧格式）
//! - 反馈监控器（误差越过容差时一次性触发吸附并锁定）
//! - 操作员命令分发（令牌 → 内部标识符 → 参数列表）
//! - 状态发布（ArcSwap 无锁读取）与运行指标
//!
//! 本层不做 I/O：遥测的接收与参数的发送由外部传输层完成。

mod config;
mod controller;
mod decoder;
mod error;
pub mod event_loop;
pub mod metrics;
pub mod monitor;
pub mod state;

pub use config::ControllerConfig;
pub use controller::{Controller, ControllerBuilder};
pub use decoder::{ErrorStatusPolicy, TelemetryDecoder};
pub use error::{DecodeError, DriverError};
pub use event_loop::{ControllerEvent, Outbound};
pub use metrics::{ControllerMetrics, MetricsSnapshot};
pub use monitor::{DEFAULT_TOLERANCE, FeedbackMonitor, MonitorState};
pub use state::*;
