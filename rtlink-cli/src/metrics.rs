use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

/// Метрики стриминга, обновляемые lock-free из нескольких потоков.
#[derive(Debug, Default)]
pub struct StreamMetrics {
    pub chunks_received: AtomicU64,
    pub bytes_received: AtomicU64,
    pub dropped_bytes: AtomicU64,
    pub bytes_written: AtomicU64,
    pub write_errors: AtomicU64,
}

/// Snapshot метрик для отображения / тестирования.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub duration_secs: f64,
    pub chunks_received: u64,
    pub bytes_received: u64,
    pub dropped_bytes: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
    pub data_rate_mbps: f64,
    pub drop_rate_pct: f64,
}

impl StreamMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Скорость приёма в МБ/с.
    pub fn data_rate_mbps(
        &self,
        elapsed: &Instant,
    ) -> f64 {
        let secs = elapsed.elapsed().as_secs_f64();

        if secs < 1e-9 {
            return 0.0;
        }

        self.bytes_received.load(Ordering::Relaxed) as f64 / secs / 1_000_000.0
    }

    /// Процент потерянных байт (0.0-100.0).
    pub fn drop_rate_pct(&self) -> f64 {
        let written = self.bytes_written.load(Ordering::Relaxed);
        let dropped = self.dropped_bytes.load(Ordering::Relaxed);
        let total = written + dropped;

        if total == 0 {
            0.0
        } else {
            dropped as f64 / total as f64 * 100.0
        }
    }

    /// Итоговая сводка для вывода в конце сессии.
    pub fn summary(
        &self,
        elapsed: &Instant,
    ) -> MetricsSummary {
        MetricsSummary {
            duration_secs: elapsed.elapsed().as_secs_f64(),
            chunks_received: self.chunks_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            dropped_bytes: self.dropped_bytes.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            data_rate_mbps: self.data_rate_mbps(elapsed),
            drop_rate_pct: self.drop_rate_pct(),
        }
    }
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Chunks        : {}", self.chunks_received)?;
        writeln!(
            f,
            "  Received      : {:.1} MB",
            self.bytes_received as f64 / 1e6
        )?;
        writeln!(
            f,
            "  Written       : {:.1} MB",
            self.bytes_written as f64 / 1e6
        )?;
        writeln!(
            f,
            "  Dropped       : {} B ({:.2}%)",
            self.dropped_bytes, self.drop_rate_pct
        )?;
        writeln!(f, "  Write errors  : {}", self.write_errors)?;
        writeln!(f, "  Data rate     : {:.1} MB/s", self.data_rate_mbps)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
