//! Response Sanitizer
//!
//! 去掉模型输出外层的 markdown 代码块标记
//!
//! 匹配规则（按顺序执行，仅执行一次）:
//! 1. 去掉首尾空白
//! 2. 以 "```json" 开头则去掉这 7 个字符
//! 3. 以 "```" 结尾则去掉这 3 个字符
//! 4. 再次去掉首尾空白

/// 起始代码块标记
pub const JSON_FENCE_OPEN: &str = "```json";

/// 结束代码块标记
pub const FENCE_CLOSE: &str = "```";

/// 清理模型原始输出
///
/// 对已经干净的文本（无代码块、无首尾空白）是幂等的
pub fn sanitize(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix(JSON_FENCE_OPEN) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(FENCE_CLOSE) {
        text = rest;
    }
    text.trim()
}
