// ==========================================
// Excel 表格数据工具 - 字段模式
// ==========================================
// 职责: 每列的校验规则与排序的静态描述
// 说明: 字段列表在定义期显式注册，不做运行时反射扫描
// ==========================================

use crate::importer::handler::HandlerBinding;
use thiserror::Error;

/// 字段模式错误（致命，导入/导出会话开始前中止）
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("字段列表为空")]
    Empty,

    #[error("字段名重复: {0}")]
    DuplicateField(String),

    #[error("常规导出时，表头与数据 Key 数量不一致: {columns} 个表头 / {keys} 个 Key")]
    ColumnKeyMismatch { columns: usize, keys: usize },
}

/// 格式校验标签
///
/// Custom 携带内联 JSON 配置: {"regex": "...", "msg": "..."}
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldFormat {
    /// 不做格式校验
    #[default]
    None,
    /// 任意文本，恒通过
    Text,
    /// 精确到年月日
    Date,
    /// 精确到时分秒
    DateTime,
    /// 时刻
    Time,
    /// 有符号实数
    Float,
    /// 金额: 非负、去尾零后小数不超过两位
    Money,
    /// 纯十进制数字（无符号、无小数）
    Integer,
    /// 11 位手机号
    Mobile,
    /// 逗号分隔的分类标签
    Tags,
    /// 内联 JSON 自定义正则
    Custom(String),
}

/// 物化目标类型（替代 Java 侧对目标字段类型的反射）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    Text,
    Date,
    DateTime,
    Time,
    Integer,
    Float,
    Bool,
}

/// 单列的校验与排序规则
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// 行值 Map 的 Key
    pub name: String,
    /// 导出表头标签（可含 # 分隔的层级）
    pub column_name: String,
    /// 是否必填
    pub required: bool,
    /// 是否列内唯一
    pub unique: bool,
    /// 格式校验标签
    pub format: FieldFormat,
    /// 物化目标类型
    pub ty: FieldType,
    /// 自定义处理器
    pub handler: Option<HandlerBinding>,
    /// 显示顺序（升序，相同时保持声明顺序）
    pub sort: i32,
}

impl FieldDescriptor {
    pub fn new(name: &str, column_name: &str, sort: i32) -> Self {
        Self {
            name: name.to_string(),
            column_name: column_name.to_string(),
            required: false,
            unique: false,
            format: FieldFormat::None,
            ty: FieldType::Text,
            handler: None,
            sort,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn typed(mut self, ty: FieldType) -> Self {
        self.ty = ty;
        self
    }

    pub fn handled(mut self, binding: HandlerBinding) -> Self {
        self.handler = Some(binding);
        self
    }
}

/// 有序字段模式
///
/// 构造时完成致命性检查；字段按 sort 稳定升序保存，
/// 之后所有列索引都以该顺序为准。
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(mut fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.clone()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        // 稳定排序: sort 相同保持声明顺序
        fields.sort_by_key(|f| f.sort);
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 导出表头标签（按字段顺序）
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column_name.clone()).collect()
    }
}
