use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
}

/// 当前线程上仍在计时的 PerfGuard 数量（嵌套深度）
pub fn active_depth() -> u32 {
    PERF_DEPTH.with(|d| d.get())
}

/// 性能统计 Guard：drop 时记录 op + elapsed_ms + 嵌套深度
///
/// 使用方式：
/// ```ignore
/// let _perf = warehouse_grid::perf::PerfGuard::new("load_from_file");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    depth: u32,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        let depth = PERF_DEPTH.with(|d| {
            let next = d.get().saturating_add(1);
            d.set(next);
            next
        });
        Self {
            op,
            start: Instant::now(),
            depth,
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            depth = self.depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
