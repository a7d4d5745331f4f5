// ==========================================
// Excel 表格数据工具 - 导入层
// ==========================================
// 职责: 网格数据采集、逐行校验、对象物化
// 说明: 工作簿文件的解析由外部协作方完成，本层只面向 CellGrid
// ==========================================

// 模块声明
pub mod error;
pub mod handler;
pub mod materializer;
pub mod sheet_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use handler::{
    FieldHandler, HandlerBinding, HandlerFactory, HandlerParams, HandlerRegistry, RawRow,
};
pub use materializer::{FieldValue, FromRow, Materializer, TypedRow};
pub use sheet_importer::{
    CellAnnotation, RowOutcome, RowStatus, SheetImporter, UniqueTracker, ValidationReport,
};
