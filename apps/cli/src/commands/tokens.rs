//! tokens 命令
//!
//! 列出操作员令牌及其对应动作（含配置中的别名）

use anyhow::Result;
use clap::Args;
use gecko_sdk::ControllerConfig;

/// 令牌列表参数
#[derive(Args, Debug)]
pub struct TokensCommand {
    /// 只列出包含该子串的令牌
    #[arg(short, long)]
    pub filter: Option<String>,
}

impl TokensCommand {
    pub fn execute(&self, config: &ControllerConfig) -> Result<()> {
        let table = config.operator_table()?;
        for token in table.tokens() {
            if self.filter.as_deref().is_some_and(|f| !token.contains(f)) {
                continue;
            }
            let action = table.resolve(token)?;
            println!("{:<40} {}", token, action);
        }
        Ok(())
    }
}
