//! 多舵机编排命令

use super::Session;
use anyhow::{Result, bail};
use clap::Args;
use servolink_sdk::{ServoId, WorkItem};

/// 按顺序激活若干舵机
#[derive(Args, Debug)]
pub struct ActivateCommand {
    /// 舵机 ID（按给定顺序激活，可重复）
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<ServoId>,
}

impl ActivateCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut sequencer = session.sequencer()?;
        let reports = sequencer.activate_all(&self.ids);

        let mut failed = 0;
        for report in &reports {
            let mark = if report.is_success() { "✅" } else { "❌" };
            println!("{mark} {report}");
            failed += usize::from(!report.is_success());
        }

        if failed > 0 {
            bail!("{failed}/{} 个舵机激活失败", reports.len());
        }
        Ok(())
    }
}

/// 将棋子（列舵机, 行舵机）加入队列并依次处理
#[derive(Args, Debug)]
pub struct MatrixCommand {
    /// 棋子，格式 `C,R`，按给定顺序入队
    #[arg(short, long = "piece", required = true, value_parser = parse_piece)]
    pub pieces: Vec<WorkItem>,
}

impl MatrixCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let mut sequencer = session.sequencer()?;
        for piece in &self.pieces {
            sequencer.enqueue(piece.column, piece.row);
        }
        println!("⏳ 队列中共 {} 个棋子", sequencer.pending());

        let reports = sequencer.process_queue();
        let mut failed = 0;
        for report in &reports {
            let mark = if report.is_success() { "✅" } else { "❌" };
            println!("{mark} {report}");
            failed += usize::from(!report.is_success());
        }

        if failed > 0 {
            bail!("{failed}/{} 个棋子处理失败", reports.len());
        }
        Ok(())
    }
}

/// 解析 `C,R` 形式的棋子
pub fn parse_piece(s: &str) -> Result<WorkItem, String> {
    let (column, row) = s
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW, got '{s}'"))?;
    let column: ServoId = column.parse().map_err(|e| format!("column: {e}"))?;
    let row: ServoId = row.parse().map_err(|e| format!("row: {e}"))?;
    Ok(WorkItem::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_piece() {
        assert_eq!(
            parse_piece("3,1").unwrap(),
            WorkItem::new(ServoId(3), ServoId(1))
        );
        assert_eq!(
            parse_piece(" 4 , 2 ").unwrap(),
            WorkItem::new(ServoId(4), ServoId(2))
        );
    }

    #[test]
    fn test_parse_piece_rejects_bad_input() {
        assert!(parse_piece("3").is_err());
        assert!(parse_piece("a,1").is_err());
        assert!(parse_piece("1,999").is_err());
        assert!(parse_piece("1,255").is_err());
        assert!(parse_piece("254,1").is_err());
    }
}
