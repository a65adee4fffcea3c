use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

/// 慢操作阈值环境变量（毫秒）
pub const SLOW_OP_ENV: &str = "CONFIGURATOR_SLOW_OP_MS";

static SLOW_OP_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static VALIDATION_COUNT: Cell<u64> = Cell::new(0);
    static RULE_COUNT: Cell<u64> = Cell::new(0);
}

/// 慢操作阈值
///
/// - `CONFIGURATOR_SLOW_OP_MS=50` 配置阈值（毫秒），0 表示关闭
/// - 缺省: Debug 50ms，Release 200ms
pub fn slow_op_threshold_ms() -> u64 {
    *SLOW_OP_THRESHOLD_MS.get_or_init(|| {
        std::env::var(SLOW_OP_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
    })
}

fn active() -> bool {
    PERF_DEPTH.with(|d| d.get() > 0)
}

/// 记录一次完整校验（含其评估的规则数）
///
/// 仅在当前线程存在 PerfGuard 时计数
pub fn record_validation(rules_evaluated: u64) {
    if !active() {
        return;
    }
    VALIDATION_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    RULE_COUNT.with(|c| c.set(c.get().saturating_add(rules_evaluated)));
}

/// 批量记录在其他线程完成的校验（并行求解后由调用线程补记）
pub fn record_validations(validations: u64, rules_evaluated: u64) {
    if !active() {
        return;
    }
    VALIDATION_COUNT.with(|c| c.set(c.get().saturating_add(validations)));
    RULE_COUNT.with(|c| c.set(c.get().saturating_add(rules_evaluated)));
}

/// 性能统计 Guard：记录 elapsed_ms + 校验次数 + 规则评估次数
///
/// 使用方式：
/// ```ignore
/// let _perf = modular_configurator::perf::PerfGuard::new("solve_reverse");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    validation_start: u64,
    rule_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            validation_start: VALIDATION_COUNT.with(|c| c.get()),
            rule_start: RULE_COUNT.with(|c| c.get()),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let validations = VALIDATION_COUNT
            .with(|c| c.get())
            .saturating_sub(self.validation_start);
        let rules = RULE_COUNT.with(|c| c.get()).saturating_sub(self.rule_start);

        let threshold = slow_op_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                validations,
                rules,
                threshold_ms = threshold,
                "slow op"
            );
        } else {
            tracing::debug!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                validations,
                rules,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
