// ~/ignite/src/logging.rs

use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Sender, SyncSender},
        OnceLock,
    },
    thread,
    time::Duration,
};

use crate::error::{Result, ThemeError};

/* =========================
   GLOBAL STATE
   ========================= */

static ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_TX: OnceLock<Sender<Record>> = OnceLock::new();

/// How long `flush` waits for the writer thread.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

enum Record {
    Line(String),
    /// Acknowledged once every earlier line is on disk.
    Flush(SyncSender<()>),
}

/* =========================
   PUBLIC API
   ========================= */

/// Start the writer thread. `debug` turns on `info!` output; warnings and
/// errors are always written once the logger is running.
pub fn init(debug: bool) -> Result<()> {
    if LOG_TX.get().is_some() {
        return Err(ThemeError::AlreadyInitialized("logging"));
    }

    let path = log_path().clone();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let (tx, rx) = mpsc::channel::<Record>();
    LOG_TX
        .set(tx)
        .map_err(|_| ThemeError::AlreadyInitialized("logging"))?;
    ENABLED.store(debug, Ordering::Relaxed);

    thread::spawn(move || {
        let mut file = file;
        while let Ok(record) = rx.recv() {
            match record {
                Record::Line(line) => {
                    let _ = writeln!(file, "{line}");
                }
                Record::Flush(ack) => {
                    let _ = file.flush();
                    let _ = ack.send(());
                }
            }
        }
    });

    Ok(())
}

#[inline]
pub fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Block until queued lines are written. The writer thread dies with the
/// process, so hosts call this before returning from `main`.
/// Returns false if the logger is not running or did not answer in time.
pub fn flush() -> bool {
    let Some(tx) = LOG_TX.get() else {
        return false;
    };
    let (ack_tx, ack_rx) = mpsc::sync_channel(1);
    if tx.send(Record::Flush(ack_tx)).is_err() {
        return false;
    }
    ack_rx.recv_timeout(FLUSH_TIMEOUT).is_ok()
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: &str, msg: String) {
    if let Some(tx) = LOG_TX.get() {
        let ts = timestamp();
        let _ = tx.send(Record::Line(format!("{ts} [{level}] {msg}")));
    }
}

fn timestamp() -> String {
    let now = chrono::Local::now();
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::enabled() {
            $crate::logging::enqueue(
                "INFO",
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "WARN",
            format!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "ERROR",
            format!($($arg)*)
        );
    }};
}

/* =========================
   PATH
   ========================= */

fn log_path() -> &'static PathBuf {
    LOG_PATH.get_or_init(|| crate::paths::ignite_root_dir().join("ignite.log"))
}
