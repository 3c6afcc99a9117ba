//! # Scene Host
//!
//! 无窗口播放场景，输出每个精灵的最终变换。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --scene scene.json --fps 30 --seconds 3
//! cargo run -p host-cli -- --scene scene.json --dump-config
//! cargo run -p host-cli -- --dump-config effective.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use host_cli::{DriveMode, HostConfig, run_scene};
use tracing::Level;

#[derive(Parser)]
#[command(name = "scene-host")]
#[command(about = "无窗口场景播放器 - 用手动推进的帧时钟驱动补间")]
#[command(version)]
struct Cli {
    /// 场景文件（JSON），缺省时使用内置演示场景
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// 模拟帧率（覆盖场景文件）
    #[arg(long)]
    fps: Option<u32>,

    /// 模拟时长，单位秒（覆盖场景文件）
    #[arg(long)]
    seconds: Option<f64>,

    /// 帧时钟驱动方式（覆盖场景文件）
    #[arg(long, value_enum)]
    drive: Option<DriveArg>,

    /// 日志级别
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// 输出生效的配置后退出；给出路径时写入文件
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    dump_config: Option<Option<PathBuf>>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DriveArg {
    SelfDriven,
    HostTicker,
}

impl From<DriveArg> for DriveMode {
    fn from(arg: DriveArg) -> Self {
        match arg {
            DriveArg::SelfDriven => DriveMode::SelfDriven,
            DriveArg::HostTicker => DriveMode::HostTicker,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(cli) {
        eprintln!("scene-host error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.scene {
        Some(path) => HostConfig::load(path),
        None => HostConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(seconds) = cli.seconds {
        config.seconds = seconds;
    }
    if let Some(drive) = cli.drive {
        config.drive_mode = drive.into();
    }

    match cli.dump_config {
        Some(Some(path)) => {
            config.save(&path)?;
            eprintln!("配置已写入: {}", path.display());
            return Ok(());
        }
        Some(None) => {
            println!("{}", config.to_json()?);
            return Ok(());
        }
        None => {}
    }

    let report = run_scene(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
