//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use gecko_sdk::prelude::*;
//! ```

// 控制器（推荐入口）
pub use crate::driver::{Controller, ControllerBuilder, ControllerConfig};
pub use crate::driver::{ControllerEvent, Outbound, event_loop};

// 状态与策略
pub use crate::driver::{ErrorStatusPolicy, GripperState, MonitorState};
pub use crate::protocol::TelemetryFormat;

// 命令
pub use crate::protocol::{CommandId, CommandTable, OperatorAction, OperatorTable};
pub use crate::protocol::{Parameter, ParameterList};

// 错误类型
pub use crate::driver::{DecodeError, DriverError};
pub use crate::protocol::ProtocolError;
