use std::{
    io::{self, Read, Write},
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use log::{debug, info};
use rtlink_proto::{Command, ControlOp, DongleInfo};

use crate::{
    config::Config,
    error::{ClientError, ClientResult},
};

/// Адрес rtl_tcp-сервера по умолчанию.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:1234";

/// Хэндл удалённого донгла: владеет соединением и handshake-записью.
///
/// Управляющий канал (команды) и канал данных (выборки) разделены явно:
/// хэндл сам не реализует `Read`, поток выборок выдаётся отдельным
/// методом [`Sdr::sample_stream`].
///
/// Команды из нескольких потоков требуют внешней синхронизации: запись
/// одной команды не атомарна на уровне транспорта.
pub struct Sdr<C> {
    conn: C,
    info: DongleInfo,
}

impl<C: Read + Write> Sdr<C> {
    /// Выполняет handshake на готовом двунаправленном потоке.
    ///
    /// Блокируется до получения всех 12 байт идентификационной записи.
    /// Неверный magic или обрыв потока делают соединение непригодным.
    pub fn handshake(mut conn: C) -> ClientResult<Self> {
        let info = DongleInfo::read_from(&mut conn)?;
        debug!("dongle info: {info}");

        Ok(Self { conn, info })
    }

    /// Идентификация устройства, прочитанная при handshake.
    pub fn info(&self) -> &DongleInfo {
        &self.info
    }

    /// Потребляет хэндл, возвращая соединение.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Кодирует команду и отправляет её одним `write_all`.
    ///
    /// Без повторов: любая транспортная ошибка возвращается сразу,
    /// с именем операции в контексте.
    pub fn execute(
        &mut self,
        op: ControlOp,
        param: u32,
    ) -> ClientResult<()> {
        let cmd = Command::new(op, param);

        self.conn
            .write_all(&cmd.encode())
            .map_err(|source| ClientError::Send { op, source })
    }

    /// Устанавливает несущую частоту (Гц).
    pub fn set_center_freq(
        &mut self,
        hz: u32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::CenterFreq, hz)
    }

    /// Устанавливает частоту дискретизации (Гц).
    pub fn set_sample_rate(
        &mut self,
        hz: u32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::SampleRate, hz)
    }

    /// Режим усиления тюнера: `true` — ручной, `false` — авто.
    ///
    /// Кодировка инвертирована (0 = ручной режим включён) — это
    /// семантика rtl_tcp-сервера, сохранена в точности.
    pub fn set_gain_mode(
        &mut self,
        manual: bool,
    ) -> ClientResult<()> {
        self.execute(ControlOp::TunerGainMode, if manual { 0 } else { 1 })
    }

    /// Усиление в десятых долях дБ (197 => 19.7 дБ).
    pub fn set_gain(
        &mut self,
        tenths_db: u32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::TunerGain, tenths_db)
    }

    /// Коррекция частоты в ppm (знаковая, на провод уходит как u32).
    pub fn set_freq_correction(
        &mut self,
        ppm: i32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::FreqCorrection, ppm as u32)
    }

    /// IF-каскад тюнера: `stage` в старших 16 битах, `gain` в младших.
    pub fn set_tuner_if_gain(
        &mut self,
        stage: u16,
        gain: u16,
    ) -> ClientResult<()> {
        self.execute(
            ControlOp::TunerIfGain,
            (u32::from(stage) << 16) | u32::from(gain),
        )
    }

    /// Тестовый режим, `true` — включён.
    pub fn set_test_mode(
        &mut self,
        on: bool,
    ) -> ClientResult<()> {
        self.execute(ControlOp::TestMode, if on { 1 } else { 0 })
    }

    /// RTL AGC, `true` — включён.
    pub fn set_agc_mode(
        &mut self,
        on: bool,
    ) -> ClientResult<()> {
        self.execute(ControlOp::AgcMode, if on { 1 } else { 0 })
    }

    /// Прямая выборка, `true` — включена.
    pub fn set_direct_sampling(
        &mut self,
        on: bool,
    ) -> ClientResult<()> {
        self.execute(ControlOp::DirectSampling, if on { 1 } else { 0 })
    }

    /// Offset tuning, `true` — включён.
    pub fn set_offset_tuning(
        &mut self,
        on: bool,
    ) -> ClientResult<()> {
        self.execute(ControlOp::OffsetTuning, if on { 1 } else { 0 })
    }

    /// Частота кварца RTL (Гц).
    pub fn set_rtl_xtal_freq(
        &mut self,
        hz: u32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::RtlXtalFreq, hz)
    }

    /// Частота кварца тюнера (Гц).
    pub fn set_tuner_xtal_freq(
        &mut self,
        hz: u32,
    ) -> ClientResult<()> {
        self.execute(ControlOp::TunerXtalFreq, hz)
    }

    /// Усиление по индексу; допустимы значения `idx <= gain_count`.
    ///
    /// Валидация выполняется до записи: при неверном индексе в сокет
    /// не уходит ни байта, соединение остаётся пригодным.
    pub fn set_gain_by_index(
        &mut self,
        idx: u32,
    ) -> ClientResult<()> {
        if idx > self.info.gain_count {
            return Err(ClientError::GainIndex {
                index: idx,
                count: self.info.gain_count,
            });
        }

        self.execute(ControlOp::GainByIndex, idx)
    }

    /// Применяет конфигурацию целиком, поля — в порядке объявления
    /// [`Config`].
    ///
    /// Таблица (имя поля, обработчик) фиксирована на этапе компиляции:
    /// массив из 12 элементов, по одному на каждое поле записи. Первый
    /// сбой останавливает цикл; имя поля добавляется в контекст ошибки.
    /// Частичного отката нет.
    pub fn configure(
        &mut self,
        config: &Config,
    ) -> ClientResult<()> {
        let steps: [(&'static str, fn(&mut Self, &Config) -> ClientResult<()>); 12] = [
            ("center_freq", |sdr, c| sdr.set_center_freq(c.center_freq)),
            ("sample_rate", |sdr, c| sdr.set_sample_rate(c.sample_rate)),
            ("tuner_gain_mode", |sdr, c| {
                sdr.set_gain_mode(c.tuner_gain_mode)
            }),
            ("tuner_gain", |sdr, c| {
                sdr.set_gain((c.tuner_gain_db * 10.0) as u32)
            }),
            ("freq_correction", |sdr, c| {
                sdr.set_freq_correction(c.freq_correction_ppm)
            }),
            ("test_mode", |sdr, c| sdr.set_test_mode(c.test_mode)),
            ("agc_mode", |sdr, c| sdr.set_agc_mode(c.agc_mode)),
            ("direct_sampling", |sdr, c| {
                sdr.set_direct_sampling(c.direct_sampling)
            }),
            ("offset_tuning", |sdr, c| {
                sdr.set_offset_tuning(c.offset_tuning)
            }),
            ("rtl_xtal_freq", |sdr, c| {
                sdr.set_rtl_xtal_freq(c.rtl_xtal_freq)
            }),
            ("tuner_xtal_freq", |sdr, c| {
                sdr.set_tuner_xtal_freq(c.tuner_xtal_freq)
            }),
            ("gain_by_index", |sdr, c| {
                sdr.set_gain_by_index(c.gain_by_index)
            }),
        ];

        for (field, apply) in steps {
            apply(self, config).map_err(|e| ClientError::Configure {
                field,
                source: Box::new(e),
            })?;
        }

        Ok(())
    }
}

impl Sdr<TcpStream> {
    /// Подключается к серверу и выполняет handshake.
    ///
    /// Пустой адрес означает [`DEFAULT_ADDRESS`]. Нулевой таймаут —
    /// блокирующее подключение без ограничения.
    pub fn connect(
        address: &str,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let address = if address.is_empty() {
            DEFAULT_ADDRESS
        } else {
            address
        };

        let connect_err = |source: io::Error| ClientError::Connect {
            addr: address.to_string(),
            source,
        };

        let addr = address
            .to_socket_addrs()
            .map_err(connect_err)?
            .next()
            .ok_or_else(|| {
                connect_err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no socket addresses resolved",
                ))
            })?;

        let conn = if timeout.is_zero() {
            TcpStream::connect(addr).map_err(connect_err)?
        } else {
            TcpStream::connect_timeout(&addr, timeout).map_err(connect_err)?
        };

        info!("connected to rtl_tcp server at {address}");
        Self::handshake(conn)
    }

    /// Клон сокета для чтения потока выборок.
    ///
    /// Чтение выборок и запись команд могут идти параллельно: это два
    /// независимых направления одного TCP-соединения.
    pub fn sample_stream(&self) -> io::Result<TcpStream> {
        self.conn.try_clone()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
