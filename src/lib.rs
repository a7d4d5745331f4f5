// ==========================================
// Excel 表格数据工具 - 核心库
// ==========================================
// 定位: 单元格网格之上的表头布局编译与行校验管道
// 说明: 工作簿二进制读写、单元格视觉样式、模板宏由外部协作方承担
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 网格抽象 - 表格协作方接口
pub mod grid;

// 字段模式 - 每列的校验与排序规则
pub mod schema;

// 表头层 - 层级标签 → 合并区域
pub mod header;

// 导入层 - 采集、校验、物化
pub mod importer;

// 导出层 - 表头块与数据行写入
pub mod exporter;

// 工具层 - 固定模式日期解析
pub mod util;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use exporter::SheetExporter;
pub use grid::{CellFlag, CellGrid, CellStyle, MemoryGrid, MergeRect, NoteAnchor};
pub use header::{HeaderLayout, HeaderLayoutCompiler, LABEL_DELIMITER};
pub use importer::{
    CellAnnotation, FieldHandler, FieldValue, FromRow, HandlerBinding, HandlerFactory,
    HandlerParams, HandlerRegistry, ImportError, ImportResult, Materializer, RawRow, RowOutcome,
    RowStatus, SheetImporter, TypedRow, UniqueTracker, ValidationReport,
};
pub use schema::{FieldDescriptor, FieldFormat, FieldType, Schema, SchemaError};

// ==========================================
// 常量定义
// ==========================================

// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 库名称
pub const APP_NAME: &str = "Excel 表格数据工具";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
