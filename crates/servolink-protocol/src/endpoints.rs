//! HTTP 端点与查询参数常量
//!
//! 集中定义控制器固件暴露的路径，避免在代码中散落字符串。

/// 一次性命令端点（`GET /cmd?inputT=..&inputI=..&inputA=..&inputB=..`）
pub const CMD_ENDPOINT: &str = "cmd";

/// 完整状态端点（自由文本，包含 "Active ID"）
pub const STATUS_ENDPOINT: &str = "readSTS";

/// 身份端点（原样返回，不解析）
pub const IDENTITY_ENDPOINT: &str = "readID";

pub const PARAM_TYPE: &str = "inputT";
pub const PARAM_INDEX: &str = "inputI";
pub const PARAM_ARG_A: &str = "inputA";
pub const PARAM_ARG_B: &str = "inputB";

/// 固件在状态文本中使用的记录分隔标记
pub const RECORD_MARKER: &str = "<p>";

/// 同一行内多个字段之间的分隔符（两个空格）
pub const FIELD_DELIMITER: &str = "  ";
