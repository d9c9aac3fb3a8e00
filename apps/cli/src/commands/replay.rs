//! replay 命令
//!
//! 把 JSON 会话脚本通过事件循环回放到控制器，打印每个输出

use crate::commands::decode::print_state;
use crate::script::Script;
use anyhow::{Context, Result};
use clap::Args;
use crossbeam_channel::unbounded;
use gecko_sdk::driver::event_loop;
use gecko_sdk::{Controller, ControllerConfig, ControllerEvent, Outbound};
use std::path::PathBuf;
use std::sync::Arc;

/// 回放命令参数
#[derive(Args, Debug)]
pub struct ReplayCommand {
    /// 脚本文件路径
    pub input: PathBuf,

    /// 以 JSON Lines 输出
    #[arg(long)]
    pub json: bool,

    /// 结束后打印运行指标
    #[arg(long)]
    pub metrics: bool,
}

impl ReplayCommand {
    /// 回放脚本，返回按顺序产生的输出
    pub fn run(&self, config: &ControllerConfig) -> Result<(Arc<Controller>, Vec<Outbound>)> {
        let script = Script::load(&self.input)?;
        tracing::info!(
            "Replaying '{}' ({} events)",
            script.name,
            script.events.len()
        );

        let controller = Arc::new(Controller::from_config(config)?);
        let (event_tx, event_rx) = unbounded::<ControllerEvent>();
        let (out_tx, out_rx) = unbounded::<Outbound>();

        let handle = event_loop::spawn(controller.clone(), event_rx, out_tx)
            .context("failed to spawn controller thread")?;

        for event in script.events {
            event_tx
                .send(ControllerEvent::from(event))
                .context("controller thread stopped early")?;
        }
        drop(event_tx);

        handle
            .join()
            .map_err(|_| anyhow::anyhow!("controller thread panicked"))??;

        Ok((controller, out_rx.try_iter().collect()))
    }

    pub fn execute(&self, config: &ControllerConfig) -> Result<()> {
        let (controller, outputs) = self.run(config)?;

        for output in &outputs {
            if self.json {
                println!("{}", serde_json::to_string(&to_json(output))?);
                continue;
            }
            match output {
                Outbound::State(state) => {
                    println!("--- state ---");
                    print_state(state);
                },
                Outbound::Parameters(params) => {
                    println!("--- transmit ---");
                    for param in params {
                        println!("{} = {}", param.name, param.value);
                    }
                },
                Outbound::Rejected(reason) => println!("--- rejected: {}", reason),
            }
        }

        if self.metrics {
            let snapshot = controller.metrics_snapshot();
            if self.json {
                println!("{}", serde_json::to_string(&snapshot)?);
            } else {
                println!("--- metrics ---");
                println!("{:#?}", snapshot);
                println!("valid rate: {:.1}%", snapshot.valid_rate());
            }
        }
        Ok(())
    }
}

fn to_json(output: &Outbound) -> serde_json::Value {
    match output {
        Outbound::State(state) => serde_json::json!({ "state": state }),
        Outbound::Parameters(params) => serde_json::json!({ "transmit": params }),
        Outbound::Rejected(reason) => serde_json::json!({ "rejected": reason }),
    }
}
