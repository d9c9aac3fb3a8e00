//! Gecko SDK - Astrobee 壁虎栖停夹爪 Rust SDK
//!
//! 解码夹爪的周期性遥测，并把操作员意图或反馈闭环决策编码为下行参数列表。
//!
//! # 架构设计
//!
//! - **协议层** (`protocol`): 遥测帧解析、状态位表、命令表与操作员令牌表（无状态）
//! - **驱动层** (`driver`): 控制器、反馈监控器、配置、指标与事件循环
//!
//! 传输层（发布/订阅）不在本 SDK 内：外部把遥测向量、误差样本和命令令牌交给
//! [`Controller`]，再把返回的状态与参数列表发出去。
//!
//! # 快速开始
//!
//! ```rust
//! use gecko_sdk::prelude::*;
//!
//! let controller = Controller::builder()
//!     .name_prefix("perching_gecko_")
//!     .build()
//!     .unwrap();
//!
//! let state = controller.on_telemetry(&[0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 2.0]);
//! assert!(state.validity);
//!
//! controller.arm();
//! let params = controller.on_error(0.25).unwrap();
//! assert_eq!(params[0].name, "perching_gecko_gripper_engage");
//! ```

pub mod logging;
pub mod prelude;

pub use gecko_driver as driver;
pub use gecko_protocol as protocol;

// --- 用户以此为界 ---

pub use driver::{
    Controller, ControllerBuilder, ControllerConfig, ControllerEvent, DriverError,
    ErrorStatusPolicy, GripperState, MonitorState, Outbound,
};
pub use logging::{init_logger, init_logger_with_filter};
pub use protocol::{CommandId, Parameter, ParameterList, ProtocolError, TelemetryFormat};
