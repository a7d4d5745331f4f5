// ==========================================
// Excel 表格数据工具 - 单元格网格抽象
// ==========================================
// 职责: 定义表格协作方接口（不包含文件格式解析）
// 说明: 工作簿二进制读写由外部库承担，本层只暴露可寻址的二维网格
// ==========================================

pub mod memory;
pub mod types;

pub use memory::MemoryGrid;
pub use types::{resolve, CellFlag, CellStyle, Color, Fill, MergeRect, NoteAnchor};

/// 可寻址二维单元格网格
///
/// 表头编译器与行校验管道只通过该接口读写表格:
/// 文本、批注、合并区域、语义样式与校验标记。
/// 行列索引均为 0 基；不存在的行/单元格按需创建。
pub trait CellGrid {
    /// 最后一个有内容的行号（空表返回 0）
    fn last_row(&self) -> usize;

    /// 创建空行（已存在则保持不变）
    fn create_row(&mut self, row: usize);

    /// 读取单元格文本（单元格不存在返回 None）
    fn cell_text(&self, row: usize, col: usize) -> Option<String>;

    /// 写入单元格文本（行与单元格不存在时创建）
    fn set_cell_text(&mut self, row: usize, col: usize, text: &str);

    /// 读取单元格语义样式
    fn style(&self, row: usize, col: usize) -> Option<CellStyle>;

    /// 写入单元格语义样式
    fn set_style(&mut self, row: usize, col: usize, style: CellStyle);

    /// 查询单元格校验标记
    fn flag(&self, row: usize, col: usize) -> CellFlag;

    /// 设置单元格校验标记
    fn set_flag(&mut self, row: usize, col: usize, flag: CellFlag);

    /// 附加批注（已有批注则替换）
    fn add_note(&mut self, row: usize, col: usize, anchor: NoteAnchor, text: &str);

    /// 移除批注（不存在时无副作用）
    fn remove_note(&mut self, row: usize, col: usize);

    /// 添加合并区域
    fn add_merged_region(&mut self, rect: MergeRect);
}
