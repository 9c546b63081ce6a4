use std::{
    fs::File,
    io::Write,
    sync::atomic::Ordering,
    time::{Duration, Instant},
};

use clap::Parser;
use log::{error, info, warn};
use rtlink_cli::{parse_freq_hz, StreamConfig, StreamPipeline};
use rtlink_client::{Config, Sdr, DEFAULT_ADDRESS};

#[derive(Parser, Debug)]
#[command(
    name = "rtlink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Configure a remote RTL-SDR dongle over rtl_tcp and stream raw samples",
    long_about = None,
)]
struct Cli {
    /// Адрес rtl_tcp-сервера (<host>:<port>)
    #[arg(short, long, default_value = DEFAULT_ADDRESS)]
    addr: String,
    /// Несущая частота (100M, 1.602GHz, 100000000)
    #[arg(short = 'f', long, default_value = "100M")]
    freq: String,
    /// Частота дискретизации (2.4M, 2400000)
    #[arg(short = 'r', long, default_value = "2.4M")]
    rate: String,
    /// Ручной режим усиления (по умолчанию — авто)
    #[arg(long)]
    manual_gain: bool,
    /// Усиление тюнера, дБ
    #[arg(short, long, default_value = "0.0")]
    gain: f64,
    /// Коррекция частоты, ppm
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    ppm: i32,
    /// Тестовый режим (сервер шлёт счётчик вместо выборок)
    #[arg(long)]
    test_mode: bool,
    /// RTL AGC
    #[arg(long)]
    agc: bool,
    /// Прямая выборка (direct sampling)
    #[arg(long)]
    direct_sampling: bool,
    /// Offset tuning
    #[arg(long)]
    offset_tuning: bool,
    /// Усиление по индексу из таблицы устройства
    #[arg(long, default_value = "0")]
    gain_index: u32,
    /// Путь к выходному файлу ('-' = stdout)
    #[arg(short, long, default_value = "samples.iq")]
    output: String,
    /// Ограничение записи (секунды). По умолчанию: до Ctrl+C
    #[arg(short, long)]
    duration: Option<u64>,
    /// Таймаут подключения (мс)
    #[arg(long, default_value = "10000")]
    connect_timeout_ms: u64,
    /// Размер одного чтения из сокета (байты)
    #[arg(long, default_value = "16384")]
    chunk_bytes: usize,
    /// Ёмкость кольцевого буфера (кол-во chunk-слотов)
    #[arg(long, default_value = "256")]
    ring_capacity: usize,
    /// Интервал вывода статистики (секунды)
    #[arg(long, default_value = "5")]
    stats_interval: u64,
    /// Тихий режим (только ошибки)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet { "error" } else { "info" };

    env_logger::Builder::new()
        .filter_level(level.parse().unwrap())
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let center_freq = match parse_freq_hz(&cli.freq) {
        Ok(f) if f <= u32::MAX as u64 => f as u32,
        Ok(f) => {
            error!("--freq {f} Hz exceeds u32::MAX");
            std::process::exit(1);
        }
        Err(e) => {
            error!("--freq: {e}");
            std::process::exit(1);
        }
    };

    let sample_rate = match parse_freq_hz(&cli.rate) {
        Ok(r) if r <= u32::MAX as u64 => r as u32,
        Ok(r) => {
            error!("--rate {r} Hz exceeds u32::MAX");
            std::process::exit(1);
        }
        Err(e) => {
            error!("--rate: {e}");
            std::process::exit(1);
        }
    };

    let config = Config {
        center_freq,
        sample_rate,
        tuner_gain_mode: cli.manual_gain,
        tuner_gain_db: cli.gain,
        freq_correction_ppm: cli.ppm,
        test_mode: cli.test_mode,
        agc_mode: cli.agc,
        direct_sampling: cli.direct_sampling,
        offset_tuning: cli.offset_tuning,
        gain_by_index: cli.gain_index,
        ..Config::default()
    };

    let timeout = Duration::from_millis(cli.connect_timeout_ms);
    let mut sdr = match Sdr::connect(&cli.addr, timeout) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    // Выводим параметры сессии
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Server        : {}", cli.addr);
    info!("  Dongle        : {}", sdr.info());
    info!("  Center freq   : {:.3} MHz", center_freq as f64 / 1e6);
    info!("  Sample rate   : {:.3} Msps", sample_rate as f64 / 1e6);
    info!(
        "  Gain          : {} ({} dB)",
        if cli.manual_gain { "manual" } else { "auto" },
        cli.gain
    );
    info!("  Output        : {}", cli.output);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if let Err(e) = sdr.configure(&config) {
        error!("Failed to configure dongle: {e}");
        std::process::exit(1);
    }

    // Клон сокета для выборок; read-таймаут, чтобы stop-флаг проверялся
    // и при молчащем сервере
    let samples = match sdr.sample_stream() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to clone sample stream: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = samples.set_read_timeout(Some(Duration::from_millis(100))) {
        warn!("Failed to set read timeout: {e}");
    }

    let stream_config = StreamConfig {
        chunk_bytes: cli.chunk_bytes,
        ring_capacity: cli.ring_capacity,
        duration_secs: cli.duration,
        stats_interval_secs: cli.stats_interval,
    };
    let (pipeline, metrics) = StreamPipeline::new(stream_config);
    let stop_flag = pipeline.stop_flag();

    let stop_ctrlc = stop_flag.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if stop_ctrlc.swap(true, Ordering::SeqCst) {
            // Второй Ctrl+C — принудительный выход
            warn!("Force exit");
            std::process::exit(130);
        }
        warn!("Ctrl+C received — flushing and closing...");
    }) {
        warn!("Failed to set Ctrl+C handler: {e}");
    }

    let sink: Box<dyn Write> = if cli.output == "-" {
        Box::new(std::io::stdout().lock())
    } else {
        match File::create(&cli.output) {
            Ok(f) => Box::new(f),
            Err(e) => {
                error!("Failed to create {}: {e}", cli.output);
                std::process::exit(1);
            }
        }
    };

    let session_start = Instant::now();

    if let Err(e) = pipeline.run(samples, sink) {
        error!("Streaming failed: {e}");
        std::process::exit(1);
    }

    // --- Итоговая статистика ---
    let summary = metrics.summary(&session_start);
    info!("\n{summary}");

    if metrics.dropped_bytes.load(Ordering::Relaxed) > 0 {
        warn!(
            "⚠ {} bytes dropped ({:.2}% loss). Consider: larger --ring-capacity or faster sink",
            metrics.dropped_bytes.load(Ordering::Relaxed),
            summary.drop_rate_pct
        );
    }

    info!("✓ Streaming complete: {}", cli.output);
}
