// ==========================================
// Excel 表格数据工具 - 行校验管道
// ==========================================
// 职责: 按字段模式逐行校验网格数据，失败就地标注
// 流程: 采集(清理旧标记) → 必填 → 唯一 → 格式 → 处理器
// 说明: 会话对象单线程使用；并行导入需各自独立的会话
// ==========================================

use crate::grid::types::{self, CellFlag, NoteAnchor};
use crate::grid::CellGrid;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::handler::{HandlerFactory, HandlerParams, HandlerRegistry, RawRow};
use crate::importer::materializer::{FromRow, Materializer, TypedRow};
use crate::schema::{FieldDescriptor, FieldFormat, Schema};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// 手机号: 1 开头的 11 位固定号段
fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^1[34578][0-9]{9}$").expect("固定模式"))
}

/// 分类标签的固定取值集合
const TAG_LABELS: &[&str] = &["排放点", "污染点", "扩散点"];

/// 内联 JSON 自定义格式: {"regex": "...", "msg": "..."}
#[derive(Debug, Deserialize)]
struct CustomFormat {
    regex: Option<String>,
    msg: Option<String>,
}

/// 行校验状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowStatus {
    /// 尚未校验
    Unchecked,
    /// 全部字段通过
    Valid,
    /// 至少一个字段失败
    Invalid,
    /// 原始值 Map 为空的尾部空行，不校验也不物化
    Skipped,
}

/// 失败单元格标注
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellAnnotation {
    pub col: usize,
    pub message: String,
}

/// 单行校验结果
#[derive(Debug, Clone, Serialize)]
pub struct RowOutcome {
    /// 网格行号
    pub row: usize,
    pub status: RowStatus,
    /// 原始值 Map（字段名 → 非空文本）
    pub values: RawRow,
    pub annotations: Vec<CellAnnotation>,
}

/// 会话汇总
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// 非空数据行数
    pub total_rows: usize,
    pub success_rows: usize,
    pub error_rows: usize,
    pub outcomes: Vec<RowOutcome>,
}

impl ValidationReport {
    /// 所有非空行均通过
    pub fn all_passed(&self) -> bool {
        self.error_rows == 0
    }
}

/// 唯一值追踪器（会话级，不跨会话持久化）
#[derive(Debug, Default)]
pub struct UniqueTracker {
    seen: HashMap<String, HashSet<String>>,
}

impl UniqueTracker {
    /// 记录取值；已出现过返回 false
    pub fn record(&mut self, field_name: &str, value: &str) -> bool {
        self.seen
            .entry(field_name.to_string())
            .or_default()
            .insert(value.to_string())
    }
}

/// 行校验管道（一次导入会话）
///
/// 借用网格直至会话结束；采集、校验与物化共用同一份
/// 原始值快照，网格侧只发生标注副作用。
pub struct SheetImporter<'g, G: CellGrid> {
    grid: &'g mut G,
    schema: Schema,
    /// 数据区首行（默认 1，0 行为表头）
    first_data_row: usize,
    /// 数据区首列（导出带分隔列的表回读时设为 1）
    first_col: usize,
    handlers: HandlerRegistry,
    unique: UniqueTracker,
    /// 自定义正则按字段名缓存编译结果
    regex_cache: HashMap<String, Regex>,
    rows: Vec<RawRow>,
    statuses: Vec<RowStatus>,
}

impl<'g, G: CellGrid> SheetImporter<'g, G> {
    /// 创建会话（默认布局: 数据从第 1 行、第 0 列开始，无共享参数）
    pub fn new(grid: &'g mut G, schema: Schema) -> Self {
        Self::with_options(grid, schema, 1, 0, None, None)
    }

    /// 创建会话并指定数据区布局、处理器工厂与共享参数
    pub fn with_options(
        grid: &'g mut G,
        schema: Schema,
        first_data_row: usize,
        first_col: usize,
        factory: Option<Box<dyn HandlerFactory>>,
        params: Option<HandlerParams>,
    ) -> Self {
        Self {
            grid,
            schema,
            first_data_row,
            first_col,
            handlers: HandlerRegistry::new(factory, params),
            unique: UniqueTracker::default(),
            regex_cache: HashMap::new(),
            rows: Vec::new(),
            statuses: Vec::new(),
        }
    }

    /// 采集数据行
    ///
    /// 逐格读取并去除首尾空白，只保留非空值；同时清理上一轮
    /// 校验遗留的批注与失败标记。空行保留占位（后续跳过）。
    pub fn load(&mut self) -> ImportResult<()> {
        let last_row = self.grid.last_row();
        if last_row < self.first_data_row {
            return Err(ImportError::DataRowOutOfRange {
                data_row: self.first_data_row,
                last_row,
            });
        }

        self.rows.clear();
        self.statuses.clear();
        for row in self.first_data_row..=last_row {
            self.grid.create_row(row);
            let mut values = RawRow::new();
            for (idx, field) in self.schema.fields().iter().enumerate() {
                let col = self.first_col + idx;
                if let Some(text) = self.grid.cell_text(row, col) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        values.insert(field.name.clone(), trimmed.to_string());
                    }
                    Self::clear_cell(self.grid, row, col);
                }
            }
            self.rows.push(values);
            self.statuses.push(RowStatus::Unchecked);
        }
        debug!(rows = self.rows.len(), "数据行采集完成");
        Ok(())
    }

    /// 校验全部数据行
    ///
    /// 空行跳过；其余行逐字段检查并在网格上标注失败单元格。
    /// 返回完整的会话汇总，永不中途抛出。
    pub fn validate(&mut self) -> ValidationReport {
        let rows = std::mem::take(&mut self.rows);
        let fields = self.schema.fields().to_vec();
        let mut outcomes = Vec::with_capacity(rows.len());
        let mut success_rows = 0usize;
        let mut error_rows = 0usize;

        for (i, values) in rows.iter().enumerate() {
            let grid_row = self.first_data_row + i;
            if values.is_empty() {
                self.statuses[i] = RowStatus::Skipped;
                outcomes.push(RowOutcome {
                    row: grid_row,
                    status: RowStatus::Skipped,
                    values: values.clone(),
                    annotations: Vec::new(),
                });
                continue;
            }

            let annotations = self.validate_row(grid_row, values, &fields);
            let status = if annotations.is_empty() {
                success_rows += 1;
                RowStatus::Valid
            } else {
                error_rows += 1;
                RowStatus::Invalid
            };
            self.statuses[i] = status;
            outcomes.push(RowOutcome {
                row: grid_row,
                status,
                values: values.clone(),
                annotations,
            });
        }

        self.rows = rows;
        info!(
            total = success_rows + error_rows,
            success = success_rows,
            error = error_rows,
            "行校验完成"
        );
        ValidationReport {
            total_rows: success_rows + error_rows,
            success_rows,
            error_rows,
            outcomes,
        }
    }

    /// 校验单行，返回失败标注（空集 = 通过）
    fn validate_row(
        &mut self,
        grid_row: usize,
        values: &RawRow,
        fields: &[FieldDescriptor],
    ) -> Vec<CellAnnotation> {
        let mut annotations = Vec::new();

        for (idx, field) in fields.iter().enumerate() {
            let col = self.first_col + idx;

            // 1. 必填检查；缺失的非必填字段跳过其余检查
            let value = match values.get(&field.name) {
                Some(v) => v.clone(),
                None => {
                    if field.required {
                        self.flag_cell(grid_row, col, "不允许空");
                        annotations.push(CellAnnotation {
                            col,
                            message: "不允许空".to_string(),
                        });
                    }
                    continue;
                }
            };

            // 2. 唯一性检查
            if field.unique && !self.unique.record(&field.name, &value) {
                self.flag_cell(grid_row, col, "该列不允许重复");
                annotations.push(CellAnnotation {
                    col,
                    message: "该列不允许重复".to_string(),
                });
                continue;
            }

            // 3. 格式检查
            if let Err(message) = self.check_format(field, &value) {
                self.flag_cell(grid_row, col, &message);
                annotations.push(CellAnnotation { col, message });
                continue;
            }

            // 4. 处理器检查（构造失败时无处理器，视为跳过）
            if let Some(binding) = &field.handler {
                let failure = match self.handlers.get_or_create(field.sort, binding) {
                    Some(handler) => {
                        if handler.validate(&field.name, values) {
                            None
                        } else {
                            Some(handler.message().to_string())
                        }
                    }
                    None => None,
                };
                if let Some(message) = failure {
                    self.flag_cell(grid_row, col, &message);
                    annotations.push(CellAnnotation { col, message });
                }
            }
        }
        annotations
    }

    /// 格式检查；Err 携带提示消息
    fn check_format(&mut self, field: &FieldDescriptor, value: &str) -> Result<(), String> {
        match &field.format {
            FieldFormat::None | FieldFormat::Text => Ok(()),

            FieldFormat::DateTime => crate::util::dates::to_datetime(value)
                .map(|_| ())
                .ok_or_else(|| "格式不正确，需精确到时分秒".to_string()),

            FieldFormat::Date => crate::util::dates::to_date(value)
                .map(|_| ())
                .ok_or_else(|| "格式不正确，需精确到年月日".to_string()),

            FieldFormat::Time => crate::util::dates::to_time(value)
                .map(|_| ())
                .ok_or_else(|| "格式不正确，请输入时间格式".to_string()),

            FieldFormat::Float => value
                .parse::<f64>()
                .map(|_| ())
                .map_err(|_| "格式不正确，请输入数值".to_string()),

            FieldFormat::Money => {
                let numeric = !value.starts_with('-') && value.parse::<f64>().is_ok();
                // 去尾零后小数不超过两位
                let frac_ok = match value.split_once('.') {
                    Some((_, frac)) => frac.trim_end_matches('0').len() <= 2,
                    None => true,
                };
                if numeric && frac_ok {
                    Ok(())
                } else {
                    Err("格式不正确，请输入金额".to_string())
                }
            }

            FieldFormat::Integer => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    Ok(())
                } else {
                    Err("格式不正确，请输入整数".to_string())
                }
            }

            FieldFormat::Mobile => {
                if mobile_pattern().is_match(value) {
                    Ok(())
                } else {
                    Err("格式不正确，请输入手机号".to_string())
                }
            }

            FieldFormat::Tags => {
                let ok = value
                    .split(',')
                    .filter(|tag| !tag.is_empty())
                    .all(|tag| TAG_LABELS.contains(&tag));
                if ok {
                    Ok(())
                } else {
                    Err("格式不正确，请输入正确的分类格式".to_string())
                }
            }

            FieldFormat::Custom(raw) => self.check_custom_format(&field.name, raw, value),
        }
    }

    /// 内联 JSON 自定义格式检查
    ///
    /// 配置损坏（JSON 解析失败 / 正则编译失败）降级为通过，只告警。
    fn check_custom_format(
        &mut self,
        field_name: &str,
        raw: &str,
        value: &str,
    ) -> Result<(), String> {
        // 先把单反斜杠转义，正则里的 \d 等才能通过 JSON 解析
        let json = raw.replace('\\', "\\\\");
        let config: CustomFormat = match serde_json::from_str(&json) {
            Ok(config) => config,
            Err(_) => {
                warn!(format = %raw, "配置 JSON 格式错误");
                return Ok(());
            }
        };

        let Some(pattern) = config.regex.filter(|r| !r.is_empty()) else {
            return Ok(());
        };

        let regex = match self.regex_cache.entry(field_name.to_string()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                match Regex::new(&pattern) {
                    Ok(regex) => entry.insert(regex),
                    Err(_) => {
                        warn!(format = %raw, "配置 JSON 格式错误");
                        return Ok(());
                    }
                }
            }
        };

        if regex.is_match(value) {
            Ok(())
        } else {
            Err(config.msg.unwrap_or_else(|| "格式不正确".to_string()))
        }
    }

    /// 标记失败单元格: 失败标记 + 样式 + 替换批注（幂等）
    fn flag_cell(&mut self, row: usize, col: usize, message: &str) {
        let base = self.grid.style(row, col).unwrap_or_default();
        self.grid
            .set_style(row, col, types::resolve(base, CellFlag::Flagged));
        self.grid.set_flag(row, col, CellFlag::Flagged);
        self.grid.remove_note(row, col);
        self.grid
            .add_note(row, col, NoteAnchor::for_cell(row, col), message);
    }

    /// 清理单元格的历史标记: 去批注、复位标记、还原填充
    fn clear_cell(grid: &mut G, row: usize, col: usize) {
        grid.remove_note(row, col);
        grid.set_flag(row, col, CellFlag::Clear);
        if let Some(style) = grid.style(row, col) {
            grid.set_style(row, col, types::resolve(style, CellFlag::Clear));
        }
    }

    /// 物化为类型化行
    ///
    /// 已校验时只取 Valid 行；未校验（调用方跳过校验）时取全部
    /// 非空行。空行永不参与。
    pub fn typed_rows(&mut self) -> Vec<TypedRow> {
        let mut materializer = Materializer::new(&self.schema, &mut self.handlers);
        self.rows
            .iter()
            .zip(self.statuses.iter())
            .filter(|(values, status)| {
                !values.is_empty()
                    && matches!(status, RowStatus::Valid | RowStatus::Unchecked)
            })
            .map(|(values, _)| materializer.typed_row(values))
            .collect()
    }

    /// 物化为宿主领域对象
    pub fn materialize<T: FromRow>(&mut self) -> Vec<T> {
        self.typed_rows().iter().map(T::from_row).collect()
    }
}
