// ==========================================
// Excel 表格数据工具 - 表头布局编译器
// ==========================================
// 职责: 把 "根#...#叶" 层级标签编译为表头行矩阵与最小合并区域集
// 流程: 规整(反转+补齐) → 水平合并 → 垂直合并 → 去重输出
// ==========================================

use crate::grid::types::{self, MergeRect};
use crate::grid::CellGrid;
use std::collections::BTreeMap;

/// 层级标签分隔符
pub const LABEL_DELIMITER: char = '#';

/// 水平合并吸收标记: 被吸收的单元格不再参与垂直成段
const ABSORBED: &str = "*";

/// 编译结果
///
/// rows: R 行 × N 列的标签矩阵，第 0 行为最顶层分类，末行为叶子；
/// merges: 合并区域，行号为表头块内相对行号（0 基），
/// 列号已含空白分隔列偏移（数据列从 1 开始，0 列留白）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub rows: Vec<Vec<String>>,
    pub merges: Vec<MergeRect>,
}

impl HeaderLayout {
    /// 表头块行数
    pub fn depth(&self) -> usize {
        self.rows.len()
    }
}

/// 表头布局编译器（无状态）
pub struct HeaderLayoutCompiler;

impl HeaderLayoutCompiler {
    /// 编译层级标签列表
    ///
    /// 每个标签按 "根#...#叶" 书写，对应一个输出列。
    /// 层级浅于最大深度的列向上重复其末段标签，
    /// 使继承的分类在补齐后参与合并。
    pub fn compile(labels: &[String]) -> HeaderLayout {
        if labels.is_empty() {
            return HeaderLayout {
                rows: Vec::new(),
                merges: Vec::new(),
            };
        }

        let rows = Self::normalize(labels);
        let merges = Self::analyze_merges(&rows);
        HeaderLayout { rows, merges }
    }

    /// 写入网格: 每行先置空白分隔单元格（0 列），再写标签与表头样式，
    /// 最后登记合并区域
    pub fn write_to<G: CellGrid>(grid: &mut G, start_row: usize, layout: &HeaderLayout) {
        for (r, row) in layout.rows.iter().enumerate() {
            let grid_row = start_row + r;
            grid.create_row(grid_row);
            grid.set_cell_text(grid_row, 0, "");
            for (c, label) in row.iter().enumerate() {
                grid.set_cell_text(grid_row, c + 1, label);
                grid.set_style(grid_row, c + 1, types::header());
            }
        }
        for rect in &layout.merges {
            grid.add_merged_region(rect.shifted_down(start_row));
        }
    }

    /// 规整: 分段反转（最顶层分类在前）并向上补齐浅层列
    fn normalize(labels: &[String]) -> Vec<Vec<String>> {
        // 每列的分段，叶子在前（源串最右段）
        let mut columns: Vec<Vec<String>> = labels
            .iter()
            .map(|label| {
                let mut segments: Vec<String> = label
                    .split(LABEL_DELIMITER)
                    .map(|s| s.to_string())
                    .collect();
                segments.reverse();
                segments
            })
            .collect();

        let depth = columns.iter().map(|c| c.len()).max().unwrap_or(1);

        // 补齐: 重复末段，再反转回显示顺序（顶层在前）
        for column in &mut columns {
            while column.len() < depth {
                let last = column.last().cloned().unwrap_or_default();
                column.push(last);
            }
            column.reverse();
        }

        // 转置为行矩阵
        (0..depth)
            .map(|r| columns.iter().map(|c| c[r].clone()).collect())
            .collect()
    }

    /// 水平 + 垂直两趟合并分析
    ///
    /// 合并区域按左上角键去重；长度为 1 的段不合并。
    fn analyze_merges(rows: &[Vec<String>]) -> Vec<MergeRect> {
        let depth = rows.len();
        let cols = rows[0].len();
        // 工作副本承载吸收标记，原矩阵保持真实标签
        let mut work = rows.to_vec();
        // 键 = 矩阵坐标下的左上角 (行, 列)
        let mut merges: BTreeMap<(usize, usize), MergeRect> = BTreeMap::new();

        // 水平趟: 自底向上逐行扫描相同标签的连续段。
        // 若下一行已有首尾列完全相同的区域，则向上吞并该区域
        // （补齐产生的继承标签会整列重复，应当形成一个高区域
        // 而不是等宽区域堆叠）。
        for r in (0..depth).rev() {
            let mut c = 0;
            while c < cols {
                let mut end = c;
                while end + 1 < cols && rows[r][end + 1] == rows[r][c] {
                    end += 1;
                }
                if end > c {
                    for k in c + 1..=end {
                        work[r][k] = ABSORBED.to_string();
                    }
                    let mut last_row = r;
                    if let Some(below) = merges.get(&(r + 1, c)) {
                        if below.last_col == end + 1 {
                            last_row = below.last_row;
                        }
                    }
                    if last_row != r {
                        merges.remove(&(r + 1, c));
                    }
                    merges.insert((r, c), MergeRect::new(r, last_row, c + 1, end + 1));
                }
                c = end + 1;
            }
        }

        // 垂直趟: 逐列扫描相邻行的相同标签；被吸收的单元格不成段。
        // 左上角已有区域且底行一致时复用，不重复登记。
        for c in 0..cols {
            let mut value = work[0][c].clone();
            let mut first = 0usize;
            let mut last = 0usize;
            for r in 1..depth {
                if value != ABSORBED && work[r][c] == value {
                    last = r;
                } else {
                    Self::close_vertical(&mut merges, &value, first, last, c);
                    value = work[r][c].clone();
                    first = r;
                    last = r;
                }
            }
            Self::close_vertical(&mut merges, &value, first, last, c);
        }

        merges.into_values().collect()
    }

    /// 垂直段收尾
    fn close_vertical(
        merges: &mut BTreeMap<(usize, usize), MergeRect>,
        value: &str,
        first: usize,
        last: usize,
        col: usize,
    ) {
        if value == ABSORBED || first == last {
            return;
        }
        match merges.get(&(first, col)) {
            Some(existing) if existing.last_row == last => {}
            _ => {
                merges.insert((first, col), MergeRect::new(first, last, col + 1, col + 1));
            }
        }
    }
}
