//! 日志初始化
//!
//! 默认 `warn,obscura_upload=info`，可用 `RUST_LOG` 覆盖。

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,obscura_upload=info";
const VERBOSE_FILTER: &str = "warn,obscura_upload=debug";

/// 初始化全局日志
pub fn init() {
    init_with_verbose(false);
}

/// 初始化全局日志；`verbose` 为 true 时本 crate 输出 debug 级别
///
/// 已初始化过时静默忽略（测试里会多次调用）。
pub fn init_with_verbose(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
