// ==========================================
// Excel 表格数据工具 - 表格导出器
// ==========================================
// 职责: 空白首行 + 表头块 + 数据行写入网格
// 布局: 每行 0 列留白做分隔，数据列从 1 开始
// ==========================================

use crate::grid::CellGrid;
use crate::header::HeaderLayoutCompiler;
use crate::importer::materializer::TypedRow;
use crate::importer::RawRow;
use crate::schema::{Schema, SchemaError};
use tracing::debug;

/// 表格导出器（一次导出会话，行游标单调前进）
pub struct SheetExporter<'g, G: CellGrid> {
    grid: &'g mut G,
    row_cursor: usize,
}

impl<'g, G: CellGrid> SheetExporter<'g, G> {
    pub fn new(grid: &'g mut G) -> Self {
        Self {
            grid,
            row_cursor: 0,
        }
    }

    /// 常规导出: 逗号分隔的表头与 Key 列表 + 原始值 Map 行
    ///
    /// 表头标签可含 "#" 层级；表头数与 Key 数不一致是致命错误。
    pub fn export_maps(
        &mut self,
        columns: &str,
        keys: &str,
        rows: &[RawRow],
    ) -> Result<(), SchemaError> {
        let column_names: Vec<String> = columns.split(',').map(|s| s.to_string()).collect();
        let key_names: Vec<String> = keys.split(',').map(|s| s.to_string()).collect();
        if column_names.len() != key_names.len() {
            return Err(SchemaError::ColumnKeyMismatch {
                columns: column_names.len(),
                keys: key_names.len(),
            });
        }

        self.write_header(&column_names);
        for row in rows {
            let grid_row = self.next_row();
            for (idx, key) in key_names.iter().enumerate() {
                if let Some(value) = row.get(key) {
                    self.grid.set_cell_text(grid_row, idx + 1, value);
                }
            }
        }
        debug!(rows = rows.len(), "常规导出完成");
        Ok(())
    }

    /// 模式导出: 表头取字段的 column_name，数据行为类型化行
    pub fn export_schema(&mut self, schema: &Schema, rows: &[TypedRow]) {
        self.write_header(&schema.column_names());
        for row in rows {
            let grid_row = self.next_row();
            for (idx, field) in schema.fields().iter().enumerate() {
                if let Some(value) = row.get(&field.name) {
                    self.grid.set_cell_text(grid_row, idx + 1, &value.to_string());
                }
            }
        }
        debug!(rows = rows.len(), "模式导出完成");
    }

    /// 空白首行 + 编译后的表头块
    fn write_header(&mut self, column_names: &[String]) {
        // 首行留白分隔
        let blank_row = self.next_row();
        self.grid.set_cell_text(blank_row, 0, "");

        let layout = HeaderLayoutCompiler::compile(column_names);
        HeaderLayoutCompiler::write_to(self.grid, self.row_cursor, &layout);
        self.row_cursor += layout.depth();
    }

    /// 占用下一行: 创建空白分隔单元格并前进游标
    fn next_row(&mut self) -> usize {
        let row = self.row_cursor;
        self.grid.create_row(row);
        self.grid.set_cell_text(row, 0, "");
        self.row_cursor += 1;
        row
    }
}
