use std::{
    io::{ErrorKind, Read, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crossbeam_channel::{RecvTimeoutError, Sender, TrySendError};
use log::{info, warn};

use crate::{error::StreamResult, metrics::StreamMetrics};

/// Параметры сессии стриминга выборок.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Размер одного чтения из сокета (байты)
    pub chunk_bytes: usize,
    /// Ёмкость кольцевого буфера (кол-во chunk-слотов)
    pub ring_capacity: usize,
    /// Ограничение по времени (None = до Ctrl+C)
    pub duration_secs: Option<u64>,
    /// Интервал вывода статистики (секунды)
    pub stats_interval_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: 16 * 1024,
            ring_capacity: 256, // 256 * 16 KB ≈ 4 МБ ring buffer
            duration_secs: None,
            stats_interval_secs: 5,
        }
    }
}

/// Оркестрирует сессию стриминга: поток захвата читает chunk-и выборок
/// из сокета, цикл записи сливает их в выходной поток.
pub struct StreamPipeline {
    config: StreamConfig,
    metrics: Arc<StreamMetrics>,
    stop_flag: Arc<AtomicBool>,
}

impl StreamPipeline {
    /// Создаёт пайплайн. Возвращает также shared-ссылку на метрики.
    pub fn new(config: StreamConfig) -> (Self, Arc<StreamMetrics>) {
        let metrics = StreamMetrics::new();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let p = Self {
            config,
            metrics: metrics.clone(),
            stop_flag,
        };

        (p, metrics)
    }

    /// Флаг остановки. Установить в `true` для graceful shutdown.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Запускает стриминг. Блокируется до конца потока выборок, истечения
    /// `duration_secs` или установки stop-флага.
    ///
    /// `source` — поток выборок (обычно клон TCP-сокета с выставленным
    /// read-таймаутом, чтобы stop-флаг проверялся и при молчащем сервере).
    pub fn run<R, W>(
        self,
        source: R,
        sink: W,
    ) -> StreamResult<()>
    where
        R: Read + Send + 'static,
        W: Write,
    {
        let (tx, rx) = crossbeam_channel::bounded::<Vec<u8>>(self.config.ring_capacity);
        let stop_flag = self.stop_flag.clone();
        let stop_flag_capture = stop_flag.clone();
        let metrics_capture = self.metrics.clone();
        let chunk_bytes = self.config.chunk_bytes;

        // Захват потока
        let capture_handle = std::thread::spawn(move || {
            let result = capture_loop(
                source,
                tx,
                chunk_bytes,
                metrics_capture,
                stop_flag_capture,
            );

            if let Err(ref e) = result {
                warn!("Capture thread error: {e}");
            }

            result
        });

        // Цикл записи (текущий поток)
        let writer_result = self.writer_loop(rx, sink);

        // Сигнализируем потоку захвата остановиться
        stop_flag.store(true, Ordering::Relaxed);

        match capture_handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Capture thread finished with error: {e}"),
            Err(_) => warn!("Capture thread panicked"),
        }

        writer_result
    }

    fn writer_loop<W: Write>(
        &self,
        rx: crossbeam_channel::Receiver<Vec<u8>>,
        mut sink: W,
    ) -> StreamResult<()> {
        let metrics = &self.metrics;
        let recv_timeout = Duration::from_millis(100);
        let stats_interval = Duration::from_secs(self.config.stats_interval_secs);

        let session_start = Instant::now();
        let mut last_stats = Instant::now();

        loop {
            //  Проверяем ограничение по времени
            if let Some(dur) = self.config.duration_secs {
                if session_start.elapsed().as_secs() >= dur {
                    info!("Duration limit reached ({dur}s). Finalizing...");
                    break;
                }
            }

            //  Проверяем внешний stop_flag (Ctrl+C)
            if self.stop_flag.load(Ordering::Relaxed) {
                info!("Stop signal received. Finalizing...");
                break;
            }

            //  Получаем следующий chunk
            let chunk = match rx.recv_timeout(recv_timeout) {
                Ok(c) => c,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Sample stream ended. Flushing...");
                    break;
                }
            };

            // Ошибка записи фатальна: молча терять выборки нельзя
            if let Err(e) = sink.write_all(&chunk) {
                metrics.write_errors.fetch_add(1, Ordering::Relaxed);
                return Err(e.into());
            }

            metrics
                .bytes_written
                .fetch_add(chunk.len() as u64, Ordering::Relaxed);

            // Периодически выводим статистику
            if last_stats.elapsed() >= stats_interval {
                self.log_progress(&session_start);
                last_stats = Instant::now();
            }
        }

        sink.flush()?;

        Ok(())
    }

    fn log_progress(
        &self,
        start: &Instant,
    ) {
        let m = &self.metrics;

        info!(
            "[ {:.0}s ] received={} written={} dropped={} ({:.2}%) rate={:.1}MB/s",
            start.elapsed().as_secs_f64(),
            m.bytes_received.load(Ordering::Relaxed),
            m.bytes_written.load(Ordering::Relaxed),
            m.dropped_bytes.load(Ordering::Relaxed),
            m.drop_rate_pct(),
            m.data_rate_mbps(start),
        );
    }
}

/// Читает chunk-и из потока выборок и передаёт их циклу записи.
///
/// Полный канал — потеря данных (consumer не успевает), байты дропаются
/// и считаются. Read-таймауты не ошибка: они дают шанс проверить
/// stop-флаг при молчащем сервере.
fn capture_loop<R: Read>(
    mut source: R,
    tx: Sender<Vec<u8>>,
    chunk_bytes: usize,
    metrics: Arc<StreamMetrics>,
    stop_flag: Arc<AtomicBool>,
) -> std::io::Result<()> {
    let mut buf = vec![0u8; chunk_bytes];

    while !stop_flag.load(Ordering::Relaxed) {
        let n = match source.read(&mut buf) {
            Ok(0) => break, // сервер закрыл поток
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(e) => return Err(e),
        };

        metrics.chunks_received.fetch_add(1, Ordering::Relaxed);
        metrics
            .bytes_received
            .fetch_add(n as u64, Ordering::Relaxed);

        match tx.try_send(buf[..n].to_vec()) {
            Ok(()) => {}
            Err(TrySendError::Full(c)) => {
                metrics
                    .dropped_bytes
                    .fetch_add(c.len() as u64, Ordering::Relaxed);
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Seek, SeekFrom};

    use tempfile::NamedTempFile;

    use super::*;

    fn test_config() -> StreamConfig {
        StreamConfig {
            chunk_bytes: 4_096,
            ring_capacity: 64,
            duration_secs: None,
            stats_interval_secs: 60, // не выводим stats в тестах
        }
    }

    #[test]
    fn test_pipeline_copies_all_bytes() {
        let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let source = Cursor::new(payload.clone());

        let (pipeline, metrics) = StreamPipeline::new(test_config());
        let mut out = Vec::<u8>::new();

        pipeline.run(source, &mut out).unwrap();

        assert_eq!(out, payload);
        assert_eq!(metrics.bytes_received.load(Ordering::Relaxed), 100_000);
        assert_eq!(metrics.bytes_written.load(Ordering::Relaxed), 100_000);
        assert_eq!(metrics.dropped_bytes.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.write_errors.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_pipeline_stop_flag_works() {
        // Бесконечный источник — завершение только по stop-флагу
        let source = std::io::repeat(0u8);

        let (pipeline, _metrics) = StreamPipeline::new(test_config());
        let stop = pipeline.stop_flag();

        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            stop.store(true, Ordering::Relaxed);
        });

        let mut out = Vec::<u8>::new();
        let result = pipeline.run(source, &mut out);

        assert!(result.is_ok(), "graceful stop не должен быть ошибкой");
        assert!(!out.is_empty());
    }

    #[test]
    fn test_pipeline_duration_limit() {
        let source = std::io::repeat(0u8);

        let mut config = test_config();
        config.duration_secs = Some(1);

        let (pipeline, metrics) = StreamPipeline::new(config);

        let mut file = NamedTempFile::new().unwrap();
        pipeline.run(source, file.as_file_mut()).unwrap();

        // Файл должен содержать ровно записанные байты
        let mut file = file.into_file();
        file.seek(SeekFrom::Start(0)).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();

        assert_eq!(
            contents.len() as u64,
            metrics.bytes_written.load(Ordering::Relaxed)
        );
        assert!(!contents.is_empty());
    }

    #[test]
    fn test_pipeline_counts_drops_on_overflow() {
        // Большой источник, крошечный канал и медленный writer не нужны:
        // дропы проверяем напрямую через try_send-путь захвата
        let payload = vec![0u8; 64 * 1024];
        let source = Cursor::new(payload);

        let config = StreamConfig {
            chunk_bytes: 1_024,
            ring_capacity: 1,
            duration_secs: None,
            stats_interval_secs: 60,
        };

        let (tx, _rx) = crossbeam_channel::bounded::<Vec<u8>>(config.ring_capacity);
        let metrics = StreamMetrics::new();
        let stop_flag = Arc::new(AtomicBool::new(false));

        capture_loop(
            source,
            tx,
            config.chunk_bytes,
            metrics.clone(),
            stop_flag,
        )
        .unwrap();

        // Канал на 1 слот, rx никто не читает: всё сверх первого chunk-а
        // должно быть посчитано как потерянное
        assert!(metrics.dropped_bytes.load(Ordering::Relaxed) > 0);
        assert_eq!(
            metrics.bytes_received.load(Ordering::Relaxed),
            metrics.dropped_bytes.load(Ordering::Relaxed) + 1_024
        );
    }
}
