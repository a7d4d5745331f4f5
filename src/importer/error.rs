// ==========================================
// Excel 表格数据工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有模式错误在会话开始前中止；行级失败一律降级为
//       单元格标注，不在这里出现
// ==========================================

use crate::schema::SchemaError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 模式错误（致命）=====
    #[error("字段模式错误: {0}")]
    Schema(#[from] SchemaError),

    // ===== 数据区定位错误 =====
    #[error("数据起始行 {data_row} 超出网格范围（最后一行 {last_row}）")]
    DataRowOutOfRange { data_row: usize, last_row: usize },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
