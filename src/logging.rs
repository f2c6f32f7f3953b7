//! 日誌初始化
//!
//! 預設只開啟本工作區各 crate 的 info 層級，其他依賴維持 warn；
//! 設定 `RUST_LOG` 時完全以其為準。

use tracing_subscriber::{fmt, EnvFilter};

/// 預設過濾規則
pub const DEFAULT_DIRECTIVES: &str =
    "warn,gel_core=info,gel_calc=info,gel_store=info,gel_inventory=info";

/// 依 `RUST_LOG` 的值建立過濾器
///
/// 未設定或無法解析時使用 [`DEFAULT_DIRECTIVES`]。
pub fn filter_from(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// 安裝全域訂閱者（示範程式與執行檔使用）
///
/// 例如 `RUST_LOG=gel_calc=debug` 可看到每項產品的需求與跑道細節。
pub fn init() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    fmt()
        .with_env_filter(filter_from(rust_log.as_deref()))
        .with_target(true)
        .init();
}

/// 測試用：工作區 crate 開到 debug，輸出交給測試擷取；重複呼叫無副作用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(
            "warn,gel_core=debug,gel_calc=debug,gel_store=debug",
        ))
        .with_test_writer()
        .without_time()
        .compact()
        .try_init();
}
