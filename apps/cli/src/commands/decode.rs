//! decode 命令
//!
//! 解码单个遥测向量并打印状态记录

use anyhow::Result;
use clap::Args;
use gecko_sdk::driver::{GripperState, TelemetryDecoder};
use gecko_sdk::{ControllerConfig, ErrorStatusPolicy, TelemetryFormat};

/// 解码命令参数
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// 遥测向量（至少 11 个数值）
    #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// 帧格式（覆盖配置）：auto / positional / bit_packed
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<TelemetryFormat>,

    /// 错误码策略（覆盖配置）：clear_only / always_store
    #[arg(long, value_parser = parse_policy)]
    pub policy: Option<ErrorStatusPolicy>,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

fn parse_format(s: &str) -> Result<TelemetryFormat, String> {
    s.parse()
}

fn parse_policy(s: &str) -> Result<ErrorStatusPolicy, String> {
    s.parse()
}

impl DecodeCommand {
    pub fn decoder(&self, config: &ControllerConfig) -> TelemetryDecoder {
        TelemetryDecoder::new(
            self.format.unwrap_or(config.telemetry_format),
            self.policy.unwrap_or(config.error_status_policy),
        )
    }

    pub fn execute(&self, config: &ControllerConfig) -> Result<()> {
        let decoder = self.decoder(config);
        let previous = GripperState::default();

        let (state, reason) = match decoder.try_decode(&self.values, &previous) {
            Ok(state) => (state, None),
            Err(err) => (decoder.decode(&self.values, &previous), Some(err.to_string())),
        };

        if self.json {
            let output = serde_json::json!({
                "state": state,
                "reason": reason,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        print_state(&state);
        if let Some(reason) = reason {
            println!("reason:                 {}", reason);
        }
        Ok(())
    }
}

pub fn print_state(state: &GripperState) {
    println!("validity:               {}", state.validity);
    println!("error_status:           {}", state.error_status);
    println!("last_status_read_time:  {}", state.last_status_read_time);
    println!("overtemperature_flag:   {}", state.overtemperature_flag);
    println!("experiment_in_progress: {}", state.experiment_in_progress);
    println!("file_is_open:           {}", state.file_is_open);
    println!("automatic_mode_enable:  {}", state.automatic_mode_enable);
    println!("wrist_lock:             {}", state.wrist_lock);
    println!("adhesive_engage:        {}", state.adhesive_engage);
    println!("delay:                  {}", state.delay);
    println!("exp_idx:                {}", state.exp_idx);
}
