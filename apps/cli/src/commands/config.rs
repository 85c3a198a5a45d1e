//! 配置管理命令
//!
//! 用于管理 CLI 配置文件（控制器地址、超时、激活流程等）

use crate::profile::Profile;
use anyhow::{Result, bail};
use clap::Subcommand;
use servolink_sdk::ServoOp;
use servolink_sdk::http::normalize_base_url;
use std::path::Path;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        #[command(flatten)]
        values: ProfileArgs,
    },

    /// 获取配置项
    Get {
        /// 配置项名称
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

/// 可写入配置文件的字段
#[derive(clap::Args, Debug, Default)]
pub struct ProfileArgs {
    /// 控制器地址（IP、IP:port 或 URL）
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long)]
    pub read_retries: Option<u32>,

    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// 选择步数上限（0 表示不限制）
    #[arg(long)]
    pub max_select_steps: Option<u32>,

    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[arg(long)]
    pub action_retries: Option<u32>,

    /// 激活流程，逗号分隔的操作名
    #[arg(long, value_delimiter = ',')]
    pub routine: Option<Vec<ServoOp>>,
}

impl From<ProfileArgs> for Profile {
    fn from(args: ProfileArgs) -> Self {
        Profile {
            device: args.device,
            timeout_ms: args.timeout_ms,
            read_retries: args.read_retries,
            retry_delay_ms: args.retry_delay_ms,
            settle_ms: args.settle_ms,
            max_select_steps: args.max_select_steps,
            delay_ms: args.delay_ms,
            action_retries: args.action_retries,
            routine: args.routine,
        }
    }
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set { values } => Self::set_(path, values.into()),

            ConfigCommand::Get { key } => Self::get_(path, &key),

            ConfigCommand::Check => Self::check_(path),
        }
    }

    fn set_(path: &Path, values: Profile) -> Result<()> {
        if values == Profile::default() {
            bail!("没有要设置的配置项（参见 `config set --help`）");
        }
        if let Some(ref device) = values.device {
            normalize_base_url(device)?;
        }

        let mut profile = Profile::load(path)?;
        profile.merge(values);
        profile.save(path)?;

        println!("✅ 已写入 {}", path.display());
        Ok(())
    }

    fn get_(path: &Path, key: &str) -> Result<()> {
        let profile = Profile::load(path)?;
        let table: toml::Table = toml::from_str(&toml::to_string(&profile)?)?;

        match key {
            "all" => print!("{}", toml::to_string_pretty(&profile)?),
            key => match table.get(key) {
                Some(toml::Value::String(s)) => println!("{s}"),
                Some(value) => println!("{value}"),
                None if is_known_key(key) => println!("(未设置)"),
                None => bail!("未知配置项: {key}"),
            },
        }
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let profile = Profile::load(path)?;

        println!("配置文件: {}", path.display());
        match profile.device {
            Some(ref device) => println!("  控制器: {}", normalize_base_url(device)?),
            None => println!("  控制器: (未设置)"),
        }

        let driver = profile.driver_config();
        println!("  超时: {:?}", driver.timeout);
        println!("  读取尝试: {}（间隔 {:?}）", driver.read_attempts(), driver.retry_delay);
        println!("  选择等待: {:?}", driver.settle_delay);
        match driver.max_select_steps {
            Some(n) => println!("  选择步数上限: {n}"),
            None => println!("  选择步数上限: 不限制"),
        }

        let sequencer = profile.sequencer_config();
        println!("  动作间隔: {:?}", sequencer.delay);
        println!("  动作尝试: {}", sequencer.action_attempts());
        let routine: Vec<_> = sequencer.routine.iter().map(|op| op.name()).collect();
        println!("  激活流程: {}", routine.join(", "));
        Ok(())
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        "device"
            | "timeout_ms"
            | "read_retries"
            | "retry_delay_ms"
            | "settle_ms"
            | "max_select_steps"
            | "delay_ms"
            | "action_retries"
            | "routine"
    )
}
