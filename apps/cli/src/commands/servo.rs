//! 单舵机命令：具名操作、原始命令、状态、身份、选择

use super::Session;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use servolink_sdk::{ServoId, ServoOp, ServoStatus};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 发送具名操作
#[derive(Args, Debug)]
pub struct OpCommand {
    /// 操作名（如 middle、position-plus、id+），`list-ops` 查看全部
    pub op: ServoOp,

    /// 先选择该舵机再发送
    #[arg(short, long)]
    pub servo: Option<ServoId>,
}

impl OpCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut driver = session.connect()?;

        if let Some(servo) = self.servo {
            driver
                .select_id(servo)
                .with_context(|| format!("选择舵机 {servo} 失败"))?;
        }

        driver.send(self.op);
        println!("✅ {} {}", self.op, self.op.command());
        Ok(())
    }
}

/// 发送原始命令四元组
#[derive(Args, Debug)]
pub struct RawCommand {
    /// inputT
    pub command_type: i32,
    /// inputI
    pub command_index: i32,
    /// inputA
    #[arg(default_value_t = 0)]
    pub arg_a: i32,
    /// inputB
    #[arg(default_value_t = 0)]
    pub arg_b: i32,
}

impl RawCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut driver = session.connect()?;
        driver.send_raw(self.command_type, self.command_index, self.arg_a, self.arg_b);
        println!(
            "✅ ({}, {}, {}, {})",
            self.command_type, self.command_index, self.arg_a, self.arg_b
        );
        Ok(())
    }
}

/// 读取状态
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl StatusCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut driver = session.connect()?;
        let status = driver.read_status().context("读取状态失败")?;
        println!("{}", render_status(&status, self.format)?);
        Ok(())
    }
}

/// 渲染状态
pub fn render_status(status: &ServoStatus, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(status).context("序列化状态失败"),
        OutputFormat::Table => {
            let width = status.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
            Ok(status
                .iter()
                .map(|(key, value)| format!("{key:<width$}  {value}"))
                .collect::<Vec<_>>()
                .join("\n"))
        },
    }
}

/// 选择舵机
#[derive(Args, Debug)]
pub struct SelectCommand {
    /// 目标 ID
    pub id: ServoId,
}

impl SelectCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut driver = session.connect()?;
        driver
            .select_id(self.id)
            .with_context(|| format!("选择舵机 {} 失败", self.id))?;
        println!("✅ Active ID = {}", self.id);
        Ok(())
    }
}

/// 读取控制器身份字符串
pub fn identity(session: &Session) -> Result<()> {
    let mut driver = session.connect()?;
    let identity = driver.read_identity().context("读取身份失败")?;
    println!("{identity}");
    Ok(())
}

/// 列出所有具名操作
pub fn list_ops() -> String {
    ServoOp::ALL
        .iter()
        .map(|op| {
            let cmd = op.command();
            format!("{:<20} ({}, {})", op.name(), cmd.command_type, cmd.command_index)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
