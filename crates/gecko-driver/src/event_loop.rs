//! 事件循环
//!
//! 把遥测、误差反馈与操作员命令三路异步输入串行化到同一个 [`Controller`]：
//! 按到达顺序逐个处理到底，把需要发布或发送的结果写入输出通道。
//! 传输层（发布/订阅）留在外部，只需要往输入通道投递 [`ControllerEvent`]。

use crate::controller::Controller;
use crate::error::DriverError;
use crate::state::GripperState;
use crossbeam_channel::{Receiver, Sender};
use gecko_protocol::ParameterList;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, trace};

/// 事件循环线程名
pub const THREAD_NAME: &str = "gecko-controller";

/// 控制器输入事件
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// 遥测向量
    Telemetry(Vec<f64>),
    /// 位姿误差样本
    Error(f64),
    /// 操作员命令令牌（可选数值）
    Command { token: String, value: Option<f64> },
    /// 使能反馈监控器
    Arm,
    /// 解除反馈监控器
    Disarm,
}

/// 控制器输出
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// 有效状态，供发布
    State(GripperState),
    /// 待发送的参数列表
    Parameters(ParameterList),
    /// 被拒绝的命令（错误描述）
    Rejected(String),
}

/// 处理单个事件，返回需要输出的结果
pub fn handle(controller: &Controller, event: ControllerEvent) -> Option<Outbound> {
    match event {
        ControllerEvent::Telemetry(values) => {
            let state = controller.on_telemetry(&values);
            // 无效样本不得覆盖下游的健康状态
            state.validity.then_some(Outbound::State(state))
        },
        ControllerEvent::Error(error) => controller.on_error(error).map(Outbound::Parameters),
        ControllerEvent::Command { token, value } => match controller.on_command(&token, value) {
            Ok(params) if params.is_empty() => None,
            Ok(params) => Some(Outbound::Parameters(params)),
            Err(err) => Some(Outbound::Rejected(err.to_string())),
        },
        ControllerEvent::Arm => {
            controller.arm();
            None
        },
        ControllerEvent::Disarm => {
            controller.disarm();
            None
        },
    }
}

/// 运行事件循环（阻塞）
///
/// 输入通道断开时正常返回；输出通道关闭时返回 `ChannelClosed`。
pub fn run(
    controller: &Controller,
    rx: &Receiver<ControllerEvent>,
    tx: &Sender<Outbound>,
) -> Result<(), DriverError> {
    while let Ok(event) = rx.recv() {
        trace!("Controller event: {:?}", event);
        if let Some(outbound) = handle(controller, event) {
            tx.send(outbound).map_err(|_| {
                debug!("Outbound channel closed, stopping controller loop");
                DriverError::ChannelClosed
            })?;
        }
    }

    debug!("Event channel disconnected, stopping controller loop");
    Ok(())
}

/// 在独立线程上运行事件循环
pub fn spawn(
    controller: Arc<Controller>,
    rx: Receiver<ControllerEvent>,
    tx: Sender<Outbound>,
) -> std::io::Result<JoinHandle<Result<(), DriverError>>> {
    std::thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || run(&controller, &rx, &tx))
}
