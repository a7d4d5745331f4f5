// ==========================================
// Excel 表格数据工具 - 单元格基础类型
// ==========================================
// 职责: 合并区域 / 批注锚点 / 单元格标记与语义样式
// ==========================================

use serde::Serialize;

/// 合并区域（行列均为 0 基、闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeRect {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

impl MergeRect {
    /// 创建合并区域
    ///
    /// 不变量: first_row <= last_row 且 first_col <= last_col
    pub fn new(first_row: usize, last_row: usize, first_col: usize, last_col: usize) -> Self {
        debug_assert!(first_row <= last_row);
        debug_assert!(first_col <= last_col);
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    /// 整体下移 offset 行（表头块写入指定起始行时使用）
    pub fn shifted_down(&self, offset: usize) -> Self {
        Self {
            first_row: self.first_row + offset,
            last_row: self.last_row + offset,
            first_col: self.first_col,
            last_col: self.last_col,
        }
    }

    /// 区域包含的行数
    pub fn row_span(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    /// 区域包含的列数
    pub fn col_span(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

/// 批注锚点（覆盖单元格右下方的显示框）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteAnchor {
    pub first_col: usize,
    pub first_row: usize,
    pub last_col: usize,
    pub last_row: usize,
}

impl NoteAnchor {
    /// 错误批注的默认锚点: 从单元格向右下各扩展 3 格
    pub fn for_cell(row: usize, col: usize) -> Self {
        Self {
            first_col: col,
            first_row: row,
            last_col: col + 3,
            last_row: row + 3,
        }
    }
}

/// 单元格校验标记状态
///
/// Flagged 表示该单元格上次校验失败，重新校验前需要复位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CellFlag {
    #[default]
    Clear,
    Flagged,
}

/// 填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    #[default]
    None,
    Solid(Color),
}

/// 语义化颜色（由外部渲染层映射到真实调色板）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Automatic,
    Black,
    Tan,
}

/// 单元格语义样式
///
/// 只描述管道会读写的样式维度，其余视觉属性由外部渲染层负责
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub fill: Fill,
    pub font_color: Color,
    pub bold: bool,
}

/// 由 (基础样式, 校验标记) 计算目标样式（纯函数，不修改入参）
///
/// - Flagged: 土黄色填充、自动字色、去粗体
/// - Clear: 去除填充、字体转黑，其余保持
pub fn resolve(base: CellStyle, flag: CellFlag) -> CellStyle {
    match flag {
        CellFlag::Flagged => CellStyle {
            fill: Fill::Solid(Color::Tan),
            font_color: Color::Automatic,
            bold: false,
        },
        CellFlag::Clear => CellStyle {
            fill: Fill::None,
            font_color: Color::Black,
            ..base
        },
    }
}

/// 表头样式
pub fn header() -> CellStyle {
    CellStyle {
        fill: Fill::None,
        font_color: Color::Black,
        bold: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_rect_spans() {
        let rect = MergeRect::new(0, 1, 1, 3);
        assert_eq!(rect.row_span(), 2);
        assert_eq!(rect.col_span(), 3);
    }

    #[test]
    fn test_merge_rect_shifted_down() {
        let rect = MergeRect::new(0, 0, 1, 2).shifted_down(5);
        assert_eq!(rect.first_row, 5);
        assert_eq!(rect.last_row, 5);
        assert_eq!(rect.first_col, 1);
    }

    #[test]
    fn test_resolve_flagged_style() {
        let base = CellStyle {
            fill: Fill::None,
            font_color: Color::Black,
            bold: true,
        };
        let styled = resolve(base, CellFlag::Flagged);
        assert_eq!(styled.fill, Fill::Solid(Color::Tan));
        assert!(!styled.bold);
        // 入参不受影响
        assert_eq!(base.fill, Fill::None);
    }

    #[test]
    fn test_resolve_clear_keeps_bold() {
        let styled = resolve(header(), CellFlag::Clear);
        assert_eq!(styled.fill, Fill::None);
        assert_eq!(styled.font_color, Color::Black);
        assert!(styled.bold);
    }

    #[test]
    fn test_note_anchor_box() {
        let anchor = NoteAnchor::for_cell(2, 4);
        assert_eq!(anchor.last_col, 7);
        assert_eq!(anchor.last_row, 5);
    }
}
