//! 控制器
//!
//! 持有最新的 [`GripperState`] 与反馈监控器，把三类事件（遥测、误差反馈、操作员命令）
//! 路由到解码器、监控器和命令表。
//!
//! 所有处理函数在同一把互斥锁内执行到底，同一实例上的两次解码、解码与命令分发
//! 都不会交错。已发布状态通过 `ArcSwap` 无锁读取。

use crate::config::{ControllerConfig, parse_alias, validate_tolerance};
use crate::decoder::{ErrorStatusPolicy, TelemetryDecoder};
use crate::error::{DecodeError, DriverError};
use crate::metrics::{ControllerMetrics, MetricsSnapshot};
use crate::monitor::{FeedbackMonitor, MonitorState};
use crate::state::GripperState;
use arc_swap::ArcSwap;
use gecko_protocol::{
    CommandId, CommandTable, OperatorAction, OperatorTable, ParameterList, TelemetryFormat,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 互斥保护的内部状态
#[derive(Debug)]
struct ControllerCore {
    decoder: TelemetryDecoder,
    monitor: FeedbackMonitor,
    commands: CommandTable,
    operators: OperatorTable,
    /// 最近一次有效解码的状态
    state: GripperState,
}

/// 夹爪控制器
///
/// 由嵌入的应用构造一个实例，并以引用或 `Arc` 交给需要它的协作者。
///
/// # Example
///
/// ```
/// use gecko_driver::Controller;
///
/// let controller = Controller::new();
/// let state = controller.on_telemetry(&[0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 2.0]);
/// assert!(state.validity);
/// assert_eq!(controller.snapshot().last_status_read_time, 5);
/// ```
#[derive(Debug)]
pub struct Controller {
    core: Mutex<ControllerCore>,
    published: ArcSwap<GripperState>,
    metrics: Arc<ControllerMetrics>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// 使用默认配置创建控制器
    pub fn new() -> Self {
        Self::from_parts(
            TelemetryDecoder::default(),
            FeedbackMonitor::default(),
            CommandTable::new(),
            OperatorTable::builtin(),
        )
    }

    /// 从配置创建控制器
    pub fn from_config(config: &ControllerConfig) -> Result<Self, DriverError> {
        config.validate()?;

        let mut monitor = FeedbackMonitor::new(config.tolerance);
        if config.start_armed {
            monitor.arm();
        }

        Ok(Self::from_parts(
            TelemetryDecoder::new(config.telemetry_format, config.error_status_policy),
            monitor,
            CommandTable::with_prefix(config.name_prefix.clone()),
            config.operator_table()?,
        ))
    }

    pub fn builder() -> ControllerBuilder {
        ControllerBuilder::new()
    }

    fn from_parts(
        decoder: TelemetryDecoder,
        monitor: FeedbackMonitor,
        commands: CommandTable,
        operators: OperatorTable,
    ) -> Self {
        Self {
            core: Mutex::new(ControllerCore {
                decoder,
                monitor,
                commands,
                operators,
                state: GripperState::default(),
            }),
            published: ArcSwap::from_pointee(GripperState::default()),
            metrics: Arc::new(ControllerMetrics::new()),
        }
    }

    /// 处理一个遥测向量
    ///
    /// 返回本次解码结果供外部发布。只有有效记录会替换持有的状态与已发布快照，
    /// 无效记录（`validity = false`）只用于告知调用方丢弃该样本。
    pub fn on_telemetry(&self, values: &[f64]) -> GripperState {
        let mut core = self.core.lock();
        ControllerMetrics::incr(&self.metrics.telemetry_total);

        let result = core.decoder.try_decode(values, &core.state);
        match result {
            Ok(state) => {
                debug!(
                    time = state.last_status_read_time,
                    exp_idx = state.exp_idx,
                    "Gripper state replaced"
                );
                core.state = state;
                self.published.store(Arc::new(state));
                ControllerMetrics::incr(&self.metrics.telemetry_valid);
                state
            },
            Err(err) => {
                let counter = match &err {
                    DecodeError::Malformed(_) => &self.metrics.telemetry_malformed,
                    DecodeError::DeviceFault => &self.metrics.device_faults,
                    DecodeError::Unsupported(_) => &self.metrics.unsupported_packets,
                };
                ControllerMetrics::incr(counter);
                TelemetryDecoder::discard(&err)
            },
        }
    }

    /// 处理一个误差反馈样本
    ///
    /// 监控器触发时返回"吸附并锁定"的参数列表，由调用方负责发送。
    /// 发送失败时监控器不会自动重新使能，需要调用方显式 [`arm`](Self::arm)。
    pub fn on_error(&self, error: f64) -> Option<ParameterList> {
        let mut core = self.core.lock();
        ControllerMetrics::incr(&self.metrics.feedback_samples);

        let id = core.monitor.on_sample(error)?;
        ControllerMetrics::incr(&self.metrics.feedback_triggers);
        ControllerMetrics::incr(&self.metrics.commands_dispatched);
        Some(core.commands.encode(id, None))
    }

    /// 处理一个操作员命令令牌
    ///
    /// `value` 只代入携带调用方数值的命令（如 `set_delay`）。
    /// 使能/解除栖停的令牌返回空列表（没有需要发送的内容）。
    ///
    /// # 错误
    ///
    /// - `UnrecognizedCommand`: 令牌不在操作员表中，不会产生任何参数
    pub fn on_command(&self, token: &str, value: Option<f64>) -> Result<ParameterList, DriverError> {
        let mut core = self.core.lock();

        let action = match core.operators.resolve(token) {
            Ok(action) => action,
            Err(err) => {
                warn!("Rejecting operator command '{}'", token);
                ControllerMetrics::incr(&self.metrics.commands_rejected);
                return Err(err.into());
            },
        };

        match action {
            OperatorAction::Dispatch(id) => {
                if value.is_some() && !id.takes_value() {
                    debug!("Command '{}' takes no value, ignoring {:?}", id, value);
                }
                info!("Dispatching '{}' as {}", token, id);
                ControllerMetrics::incr(&self.metrics.commands_dispatched);
                Ok(core.commands.encode(id, value))
            },
            OperatorAction::ArmPerching => {
                core.monitor.arm();
                Ok(ParameterList::new())
            },
            OperatorAction::DisarmPerching => {
                core.monitor.disarm();
                Ok(ParameterList::new())
            },
        }
    }

    /// 按内部标识符查找参数列表（跳过操作员表）
    pub fn lookup(&self, identifier: &str, value: Option<f64>) -> Result<ParameterList, DriverError> {
        let core = self.core.lock();
        core.commands
            .lookup_with_value(identifier, value)
            .map_err(|_| {
                ControllerMetrics::incr(&self.metrics.commands_rejected);
                DriverError::UnrecognizedCommand(identifier.to_string())
            })
    }

    /// 编码一个内部命令
    pub fn encode(&self, id: CommandId, value: Option<f64>) -> ParameterList {
        self.core.lock().commands.encode(id, value)
    }

    /// 由下行参数名反查内部命令
    pub fn identify<S: AsRef<str>>(&self, names: &[S]) -> Result<CommandId, DriverError> {
        Ok(self.core.lock().commands.identify(names)?)
    }

    /// 使能反馈监控器
    pub fn arm(&self) {
        self.core.lock().monitor.arm();
    }

    /// 解除反馈监控器
    pub fn disarm(&self) {
        self.core.lock().monitor.disarm();
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.core.lock().monitor.state()
    }

    pub fn is_armed(&self) -> bool {
        self.core.lock().monitor.is_armed()
    }

    /// 最近一次误差样本（未收到时为 `None`）
    pub fn last_error(&self) -> Option<f64> {
        self.core.lock().monitor.last_error()
    }

    pub fn tolerance(&self) -> f64 {
        self.core.lock().monitor.tolerance()
    }

    /// 运行时修改容差
    pub fn set_tolerance(&self, tolerance: f64) -> Result<(), DriverError> {
        validate_tolerance(tolerance)?;
        self.core.lock().monitor.set_tolerance(tolerance);
        Ok(())
    }

    /// 运行时添加操作员令牌别名
    pub fn add_operator_alias(&self, token: &str, target: &str) -> Result<(), DriverError> {
        let action = parse_alias(token, target)?;
        if let Some(previous) = self.core.lock().operators.insert(token, action) {
            debug!("Operator token '{}' remapped from {} to {}", token, previous, action);
        }
        Ok(())
    }

    /// 最近一次发布的有效状态
    ///
    /// - 无锁读取（ArcSwap::load）
    /// - 尚未收到有效遥测时返回 `validity = false` 的默认记录
    pub fn snapshot(&self) -> GripperState {
        **self.published.load()
    }

    pub fn metrics(&self) -> Arc<ControllerMetrics> {
        self.metrics.clone()
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// 控制器 Builder（链式构造）
///
/// ```
/// use gecko_driver::{ControllerBuilder, ErrorStatusPolicy};
///
/// let controller = ControllerBuilder::new()
///     .tolerance(0.25)
///     .name_prefix("perching_gecko_")
///     .error_status_policy(ErrorStatusPolicy::AlwaysStore)
///     .operator_alias("grab it", "engage_and_lock")
///     .build()
///     .unwrap();
/// assert_eq!(controller.tolerance(), 0.25);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ControllerBuilder {
    config: ControllerConfig,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有配置为起点
    pub fn from_config(config: ControllerConfig) -> Self {
        Self { config }
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn telemetry_format(mut self, format: TelemetryFormat) -> Self {
        self.config.telemetry_format = format;
        self
    }

    pub fn error_status_policy(mut self, policy: ErrorStatusPolicy) -> Self {
        self.config.error_status_policy = policy;
        self
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.name_prefix = prefix.into();
        self
    }

    pub fn operator_alias(mut self, token: impl Into<String>, target: impl Into<String>) -> Self {
        self.config.operator_aliases.insert(token.into(), target.into());
        self
    }

    pub fn start_armed(mut self, armed: bool) -> Self {
        self.config.start_armed = armed;
        self
    }

    /// 构建控制器
    ///
    /// # 错误
    ///
    /// 配置校验失败时返回 `InvalidParameter` 或 `Config`。
    pub fn build(self) -> Result<Controller, DriverError> {
        let controller = Controller::from_config(&self.config)?;
        info!(
            tolerance = self.config.tolerance,
            format = ?self.config.telemetry_format,
            prefix = %self.config.name_prefix,
            "Gripper controller created"
        );
        Ok(controller)
    }
}

impl From<ControllerConfig> for ControllerBuilder {
    fn from(config: ControllerConfig) -> Self {
        Self::from_config(config)
    }
}
