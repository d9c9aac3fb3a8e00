//! command 命令
//!
//! 解析操作员令牌（或内部标识符）并打印下行参数列表，不发送任何内容

use anyhow::Result;
use clap::Args;
use gecko_sdk::{Controller, ParameterList};

/// 命令解析参数
#[derive(Args, Debug)]
pub struct CommandCommand {
    /// 操作员令牌，如 "close the gripper" 或 gecko_gripper_close
    pub token: String,

    /// 调用方数值（仅 set_delay、mark_gripper 等命令使用）
    #[arg(short, long, allow_negative_numbers = true)]
    pub value: Option<f64>,

    /// 把令牌当作内部标识符查找（跳过操作员表）
    #[arg(long)]
    pub internal: bool,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

impl CommandCommand {
    pub fn resolve(&self, controller: &Controller) -> Result<ParameterList> {
        let params = if self.internal {
            controller.lookup(&self.token, self.value)?
        } else {
            controller.on_command(&self.token, self.value)?
        };
        Ok(params)
    }

    pub fn execute(&self, controller: &Controller) -> Result<()> {
        let params = self.resolve(controller)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&params)?);
            return Ok(());
        }

        if params.is_empty() {
            println!("(nothing to transmit, monitor {:?})", controller.monitor_state());
        }
        for param in &params {
            println!("{} = {}", param.name, param.value);
        }
        Ok(())
    }
}
