//! 日志初始化
//!
//! SDK 内部全部使用 `tracing` 记录日志。嵌入的应用可以自行安装 subscriber，
//! 也可以调用这里的便捷函数：过滤规则取自 `RUST_LOG`，缺省为 `info`，
//! 同时把 `log` crate 的记录桥接到 `tracing`。

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// 使用 `RUST_LOG` 初始化日志（缺省 `info`）
///
/// 只有第一次调用生效，返回是否由本次调用完成初始化。
pub fn init_logger() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter)
}

/// 使用指定过滤规则初始化日志（如 `"gecko_driver=debug"`）
///
/// 规则无法解析时回退到 `info`。只有第一次调用生效。
pub fn init_logger_with_filter(directives: &str) -> bool {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter)
}

fn install(filter: EnvFilter) -> bool {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return false;
    }

    // 其他 logger 已安装时忽略
    let _ = tracing_log::LogTracer::init();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
