use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::{BoolishValueParser, RangedU64ValueParser};
use clap::{ArgAction, Parser};

/// Application-level constants
pub const APP_NAME: &str = "Merit Portal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_OCR_PYTHON: &str = "python3";
pub const DEFAULT_OCR_SCRIPT: &str = "scripts/ocr_extractor.py";
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;
/// 10 MiB, the limit advertised by the upload form.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Tracing filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "merit_portal=info,tower_http=warn"
}

/// Runtime settings, from flags or `MERIT_PORTAL_*` variables.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "merit-portal", version, about, long_about = None)]
pub struct PortalConfig {
    /// Address the HTTP API listens on
    #[arg(long, default_value = DEFAULT_BIND, env = "MERIT_PORTAL_BIND")]
    pub bind: SocketAddr,

    /// Interpreter used to run the OCR script
    #[arg(long, default_value = DEFAULT_OCR_PYTHON, env = "MERIT_PORTAL_OCR_PYTHON")]
    pub ocr_python: PathBuf,

    /// OCR extractor script
    #[arg(long, default_value = DEFAULT_OCR_SCRIPT, env = "MERIT_PORTAL_OCR_SCRIPT")]
    pub ocr_script: PathBuf,

    /// Seconds before a running OCR process is killed
    #[arg(
        long,
        default_value_t = DEFAULT_OCR_TIMEOUT_SECS,
        value_parser = RangedU64ValueParser::<u64>::new().range(1..),
        env = "MERIT_PORTAL_OCR_TIMEOUT_SECS"
    )]
    pub ocr_timeout_secs: u64,

    /// Largest accepted upload, in bytes
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_UPLOAD_BYTES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        env = "MERIT_PORTAL_MAX_UPLOAD_BYTES"
    )]
    pub max_upload_bytes: usize,

    /// Seed one demo student and one demo teacher account
    #[arg(
        long = "seed-demo",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        env = "MERIT_PORTAL_SEED_DEMO"
    )]
    pub seed_demo_accounts: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            ocr_python: PathBuf::from(DEFAULT_OCR_PYTHON),
            ocr_script: PathBuf::from(DEFAULT_OCR_SCRIPT),
            ocr_timeout_secs: DEFAULT_OCR_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_demo_accounts: true,
        }
    }
}

impl PortalConfig {
    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }
}
