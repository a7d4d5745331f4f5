// ==========================================
// Excel 表格数据工具 - 内存网格实现
// ==========================================
// 职责: CellGrid 的内存参考实现
// 用途: 测试替身 + 渲染层落盘前的中间载体
// ==========================================

use crate::grid::types::{CellFlag, CellStyle, MergeRect, NoteAnchor};
use crate::grid::CellGrid;
use std::collections::BTreeMap;

/// 单元格批注
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub anchor: NoteAnchor,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
struct Cell {
    text: String,
    style: Option<CellStyle>,
    flag: CellFlag,
    note: Option<Note>,
}

/// 内存中的二维单元格网格
///
/// BTreeMap 保证行列遍历顺序稳定
#[derive(Debug, Default)]
pub struct MemoryGrid {
    rows: BTreeMap<usize, BTreeMap<usize, Cell>>,
    merges: Vec<MergeRect>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        self.rows.entry(row).or_default().entry(col).or_default()
    }

    /// 读取批注（测试与渲染层使用）
    pub fn note(&self, row: usize, col: usize) -> Option<&Note> {
        self.cell(row, col).and_then(|c| c.note.as_ref())
    }

    /// 已登记的合并区域
    pub fn merged_regions(&self) -> &[MergeRect] {
        &self.merges
    }

    /// 行内有内容的列号列表
    pub fn row_cols(&self, row: usize) -> Vec<usize> {
        self.rows
            .get(&row)
            .map(|r| r.keys().copied().collect())
            .unwrap_or_default()
    }
}

impl CellGrid for MemoryGrid {
    fn last_row(&self) -> usize {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    fn create_row(&mut self, row: usize) {
        self.rows.entry(row).or_default();
    }

    fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        self.cell(row, col).map(|c| c.text.clone())
    }

    fn set_cell_text(&mut self, row: usize, col: usize, text: &str) {
        self.cell_mut(row, col).text = text.to_string();
    }

    fn style(&self, row: usize, col: usize) -> Option<CellStyle> {
        self.cell(row, col).and_then(|c| c.style)
    }

    fn set_style(&mut self, row: usize, col: usize, style: CellStyle) {
        self.cell_mut(row, col).style = Some(style);
    }

    fn flag(&self, row: usize, col: usize) -> CellFlag {
        self.cell(row, col).map(|c| c.flag).unwrap_or_default()
    }

    fn set_flag(&mut self, row: usize, col: usize, flag: CellFlag) {
        self.cell_mut(row, col).flag = flag;
    }

    fn add_note(&mut self, row: usize, col: usize, anchor: NoteAnchor, text: &str) {
        self.cell_mut(row, col).note = Some(Note {
            anchor,
            text: text.to_string(),
        });
    }

    fn remove_note(&mut self, row: usize, col: usize) {
        if let Some(r) = self.rows.get_mut(&row) {
            if let Some(c) = r.get_mut(&col) {
                c.note = None;
            }
        }
    }

    fn add_merged_region(&mut self, rect: MergeRect) {
        self.merges.push(rect);
    }
}
