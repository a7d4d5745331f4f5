// ==========================================
// Excel 表格数据工具 - 表头层
// ==========================================
// 职责: 层级表头标签 → 表头行 + 合并区域
// ==========================================

pub mod layout;

pub use layout::{HeaderLayout, HeaderLayoutCompiler, LABEL_DELIMITER};
