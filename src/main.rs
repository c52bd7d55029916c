#![forbid(unsafe_code)]

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pingate::config::AppConfig;
use pingate::core::pin_flow::{EnrollOutcome, PinFlowController, VerifyOutcome};
use pingate::crypto::device_key;
use pingate::crypto::pin_hash::DeviceHasher;
use pingate::error::Result;
use pingate::platform::Peripherals;
use pingate::storage::credential_file::CredentialStore;
use pingate::storage::fs_storage::FsStorage;
use pingate::ui::terminal::{KeyboardButtons, TerminalPower, TerminalScreen};

/// Verify returned Absent: no usable PIN is enrolled for this length.
const EXIT_ABSENT: u8 = 2;

#[derive(Parser)]
#[command(name = "pingate", version, about = "Boot-time PIN gate")]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the PIN and device key files
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enroll a new PIN, replacing the current one
    Enroll {
        /// PIN length level: 1 = 4 symbols, 2 = 6, 3 = 8
        #[arg(short, long)]
        level: Option<u8>,

        /// Do not allow START to skip enrollment
        #[arg(long)]
        no_skip: bool,
    },
    /// Ask for the enrolled PIN
    Verify {
        /// PIN length level the PIN was enrolled with
        #[arg(short, long)]
        level: Option<u8>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = if let Some(ref config_path) = cli.config {
        AppConfig::load_from(config_path).unwrap_or_else(|e| {
            eprintln!("Warning: could not load config: {e}");
            AppConfig::default()
        })
    } else {
        AppConfig::load().unwrap_or_else(|_| AppConfig::default())
    };

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    match cli.command {
        Command::Enroll { level, no_skip } => {
            if let Some(level) = level {
                config.length_level = level;
            }
            if no_skip {
                config.allow_skipping = false;
            }
        }
        Command::Verify { level: Some(level) } => config.length_level = level,
        Command::Verify { level: None } => {}
    }

    if let Err(e) = init_logging(&config) {
        eprintln!("Warning: could not open log file: {e}");
    }

    match run(&cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "PIN flow failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &AppConfig) -> io::Result<()> {
    // Raw-mode terminal: logs only go to a file.
    let Some(ref path) = config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pingate=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(command: &Command, config: &AppConfig) -> Result<ExitCode> {
    config.validate()?;
    fs::create_dir_all(&config.data_dir)?;

    let mut storage = FsStorage::new(&config.data_dir);
    let secret = device_key::load_or_create(&mut storage)?;
    let hasher = DeviceHasher::new(secret, &config.kdf_params())?;
    let flow_config = config.flow_config();

    // Install panic hook that restores terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut screen = TerminalScreen::new(ratatui::init());
    let mut buttons = KeyboardButtons;
    let mut power = TerminalPower;
    let io = Peripherals {
        screen: &mut screen,
        buttons: &mut buttons,
        power: &mut power,
    };
    let mut flow = PinFlowController::new(CredentialStore::new(&mut storage), &hasher, io);

    let result = match command {
        Command::Enroll { .. } => flow.enroll(&flow_config).map(|outcome| match outcome {
            EnrollOutcome::Completed | EnrollOutcome::Skipped => ExitCode::SUCCESS,
        }),
        Command::Verify { .. } => flow.verify(&flow_config).map(|outcome| match outcome {
            VerifyOutcome::Granted => ExitCode::SUCCESS,
            VerifyOutcome::Absent => ExitCode::from(EXIT_ABSENT),
        }),
    };
    ratatui::restore();
    result
}
