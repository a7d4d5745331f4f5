// ==========================================
// Excel 表格数据工具 - 导出层
// ==========================================
// 职责: 表头块 + 数据行写入网格
// ==========================================

pub mod sheet_exporter;

pub use sheet_exporter::SheetExporter;
