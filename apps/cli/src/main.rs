//! # Servolink CLI
//!
//! Command-line interface for ESP32 HTTP servo controllers.
//!
//! ```bash
//! # 配置默认控制器
//! servolink-cli config set --device 192.168.4.1
//!
//! # 单条命令
//! servolink-cli select 3
//! servolink-cli op middle --servo 3
//! servolink-cli raw 1 5
//!
//! # 批量激活（列, 行）
//! servolink-cli matrix --piece 1,2 --piece 3,1 --piece 4,2
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod profile;

use commands::{
    ActivateCommand, ConfigCommand, MatrixCommand, OpCommand, RawCommand, SelectCommand, Session,
    StatusCommand,
};
use profile::Profile;

/// Servolink CLI - 舵机控制器命令行工具
#[derive(Parser, Debug)]
#[command(name = "servolink-cli")]
#[command(about = "Command-line interface for ESP32 HTTP servo controllers", long_about = None)]
#[command(version)]
struct Cli {
    /// 控制器地址（覆盖配置文件）
    #[arg(short, long, global = true)]
    device: Option<String>,

    /// 配置文件路径（默认 <config_dir>/servolink/config.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 单个请求超时（毫秒，覆盖配置文件）
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// 编排动作间隔（毫秒，覆盖配置文件）
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// 日志详细程度（-v: debug, -vv: trace）
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 发送具名操作
    Op {
        #[command(flatten)]
        args: OpCommand,
    },

    /// 发送原始命令（inputT inputI [inputA] [inputB]）
    #[command(allow_negative_numbers = true)]
    Raw {
        #[command(flatten)]
        args: RawCommand,
    },

    /// 读取并解析状态
    Status {
        #[command(flatten)]
        args: StatusCommand,
    },

    /// 读取控制器身份
    Identity,

    /// 切换 Active ID
    Select {
        #[command(flatten)]
        args: SelectCommand,
    },

    /// 按顺序激活舵机
    Activate {
        #[command(flatten)]
        args: ActivateCommand,
    },

    /// 处理棋子队列（列舵机, 行舵机）
    Matrix {
        #[command(flatten)]
        args: MatrixCommand,
    },

    /// 列出所有具名操作
    ListOps,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in [
        "servolink_cli",
        "servolink_client",
        "servolink_driver",
        "servolink_http",
    ] {
        filter = filter.add_directive(format!("{target}={level}").parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let profile_path = match cli.config {
        Some(path) => path,
        None => profile::default_path()?,
    };

    // 配置管理直接操作文件，不合并命令行覆盖项
    let session = || -> Result<Session> {
        let mut profile = Profile::load(&profile_path)?;
        profile.merge(Profile {
            device: cli.device.clone(),
            timeout_ms: cli.timeout_ms,
            delay_ms: cli.delay_ms,
            ..Default::default()
        });
        Ok(Session {
            profile,
            profile_path: profile_path.clone(),
        })
    };

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&profile_path),
        Commands::ListOps => {
            println!("{}", commands::servo::list_ops());
            Ok(())
        },
        Commands::Op { args } => args.execute(&session()?),
        Commands::Raw { args } => args.execute(&session()?),
        Commands::Status { args } => args.execute(&session()?),
        Commands::Identity => commands::servo::identity(&session()?),
        Commands::Select { args } => args.execute(&session()?),
        Commands::Activate { args } => args.execute(&session()?),
        Commands::Matrix { args } => args.execute(&session()?),
    }
}
