// ==========================================
// Excel 表格数据工具 - 工具层
// ==========================================

pub mod dates;
