//! # Gecko CLI
//!
//! 壁虎夹爪遥测解码与控制器会话回放的命令行工具。
//!
//! ```bash
//! # 解码一个遥测向量
//! gecko-cli decode 0 0 5 0 0 0 0 0 0 3 2
//!
//! # 查看操作员令牌会下发哪些参数
//! gecko-cli command "close the gripper"
//! gecko-cli command gecko_gripper_set_delay --value 4
//!
//! # 回放一段 JSON 会话脚本
//! gecko-cli --config gecko.toml replay session.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gecko_sdk::{Controller, ControllerConfig};
use std::path::PathBuf;

mod commands;
mod script;

use commands::{CommandCommand, DecodeCommand, ReplayCommand, TokensCommand};

/// Gecko CLI - 壁虎夹爪命令行工具
#[derive(Parser, Debug)]
#[command(name = "gecko-cli")]
#[command(about = "Decode gecko gripper telemetry and exercise the command controller", long_about = None)]
#[command(version)]
struct Cli {
    /// 控制器配置文件（TOML）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 解码一个遥测向量
    Decode {
        #[command(flatten)]
        args: DecodeCommand,
    },

    /// 解析操作员命令令牌并打印下行参数
    Command {
        #[command(flatten)]
        args: CommandCommand,
    },

    /// 回放 JSON 会话脚本
    Replay {
        #[command(flatten)]
        args: ReplayCommand,
    },

    /// 列出所有操作员令牌
    Tokens {
        #[command(flatten)]
        args: TokensCommand,
    },

    /// 打印生效的配置（TOML）
    ShowConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directives(self) -> String {
        let level = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        format!("gecko_cli={level},gecko_driver={level},gecko_protocol={level}")
    }
}

impl Cli {
    /// 加载配置文件（未指定时使用默认配置）
    fn load_config(&self) -> Result<ControllerConfig> {
        match &self.config {
            Some(path) => ControllerConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => Ok(ControllerConfig::default()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    gecko_sdk::init_logger_with_filter(&cli.log_level.directives());

    let config = cli.load_config()?;
    tracing::debug!("Using config: {:?}", config);

    match cli.command {
        Commands::Decode { args } => args.execute(&config),
        Commands::Command { args } => {
            let controller = Controller::from_config(&config)?;
            args.execute(&controller)
        },
        Commands::Replay { args } => args.execute(&config),
        Commands::Tokens { args } => args.execute(&config),
        Commands::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        },
    }
}
