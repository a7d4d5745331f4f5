// ==========================================
// 表头布局集成测试
// ==========================================
// 测试目标: 层级表头从标签到网格写入的完整链路
// ==========================================

use excel_kit::logging;
use excel_kit::{CellGrid, HeaderLayoutCompiler, MemoryGrid, MergeRect, SheetExporter};
use std::collections::HashMap;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flat_header_block_writes_one_row() {
    logging::init_test();

    let layout = HeaderLayoutCompiler::compile(&labels(&["编号", "名称", "数量"]));
    let mut grid = MemoryGrid::new();
    HeaderLayoutCompiler::write_to(&mut grid, 0, &layout);

    assert_eq!(layout.depth(), 1);
    assert!(grid.merged_regions().is_empty());
    assert_eq!(grid.cell_text(0, 1), Some("编号".to_string()));
    assert_eq!(grid.cell_text(0, 3), Some("数量".to_string()));
    // 0 列留白分隔
    assert_eq!(grid.cell_text(0, 0), Some(String::new()));
}

#[test]
fn test_two_level_category_header() {
    logging::init_test();

    // 期望布局:
    //   | 基本信息 | 基本信息 | 联系方式 |
    //   | 姓名     | 年龄     | 手机号   |
    let layout = HeaderLayoutCompiler::compile(&labels(&[
        "基本信息#姓名",
        "基本信息#年龄",
        "联系方式#手机号",
    ]));
    let mut grid = MemoryGrid::new();
    HeaderLayoutCompiler::write_to(&mut grid, 0, &layout);

    assert_eq!(layout.depth(), 2);
    assert_eq!(grid.cell_text(0, 1), Some("基本信息".to_string()));
    assert_eq!(grid.cell_text(1, 3), Some("手机号".to_string()));
    assert_eq!(grid.merged_regions(), &[MergeRect::new(0, 0, 1, 2)]);
}

#[test]
fn test_three_level_irregular_hierarchy() {
    logging::init_test();

    // 列深 3/3/2/1: 浅层列向上补齐后再做合并分析
    let layout = HeaderLayoutCompiler::compile(&labels(&[
        "年度#一季度#一月",
        "年度#一季度#二月",
        "年度#合计",
        "备注",
    ]));

    assert_eq!(layout.depth(), 3);
    // 浅层列重复其末段标签向上补齐
    assert_eq!(layout.rows[0], vec!["年度", "年度", "年度", "备注"]);
    assert_eq!(layout.rows[1], vec!["一季度", "一季度", "年度", "备注"]);
    assert_eq!(layout.rows[2], vec!["一月", "二月", "合计", "备注"]);

    // 年度横跨 3 列; 一季度横跨 2 列; 备注纵贯 3 行;
    // 第 3 列次行的 年度 顶格已被水平段吸收，不再独立成纵段
    assert!(layout.merges.contains(&MergeRect::new(0, 0, 1, 3)));
    assert!(layout.merges.contains(&MergeRect::new(1, 1, 1, 2)));
    assert!(layout.merges.contains(&MergeRect::new(0, 2, 4, 4)));
    assert_eq!(layout.merges.len(), 3);
}

#[test]
fn test_uniform_prefix_becomes_single_tall_rect() {
    logging::init_test();

    // 两列共享完整前缀: 上两行的水平段首尾列一致，吞并为一个高区域
    let layout =
        HeaderLayoutCompiler::compile(&labels(&["汇总#金额#收入", "汇总#金额#支出"]));
    assert_eq!(layout.merges, vec![MergeRect::new(0, 1, 1, 2)]);
}

#[test]
fn test_export_full_sheet() {
    logging::init_test();

    let mut grid = MemoryGrid::new();
    let mut exporter = SheetExporter::new(&mut grid);

    let mut row1 = HashMap::new();
    row1.insert("name".to_string(), "张三".to_string());
    row1.insert("mobile".to_string(), "13812345678".to_string());
    let mut row2 = HashMap::new();
    row2.insert("name".to_string(), "李四".to_string());

    exporter
        .export_maps(
            "基本信息#姓名,联系方式#手机号",
            "name,mobile",
            &[row1, row2],
        )
        .unwrap();

    // 0 行留白; 表头 1-2 行; 数据 3-4 行
    assert_eq!(grid.cell_text(1, 1), Some("基本信息".to_string()));
    assert_eq!(grid.cell_text(2, 2), Some("手机号".to_string()));
    assert_eq!(grid.cell_text(3, 1), Some("张三".to_string()));
    assert_eq!(grid.cell_text(3, 2), Some("13812345678".to_string()));
    assert_eq!(grid.cell_text(4, 1), Some("李四".to_string()));
    assert_eq!(grid.cell_text(4, 2), None);
    // 两列分类互不相同，无合并区域
    assert!(grid.merged_regions().is_empty());
}
