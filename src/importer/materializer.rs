// ==========================================
// Excel 表格数据工具 - 对象物化器
// ==========================================
// 职责: 校验通过行的原始值 Map → 类型化行 → 宿主领域对象
// 说明: 尽力转换——解析失败的字段留空，不构成行级失败
//       （坏行应当已被校验拒绝）
// ==========================================

use crate::importer::handler::{HandlerRegistry, RawRow};
use crate::schema::{FieldType, Schema};
use crate::util::dates;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

/// 类型化字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(d) => f.write_str(&dates::format_date(*d)),
            FieldValue::DateTime(dt) => f.write_str(&dates::format_datetime(*dt)),
            FieldValue::Time(t) => f.write_str(&dates::format_time(*t)),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// 类型化行: 字段名 → 类型化值（转换失败的字段缺席）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRow {
    values: HashMap<String, FieldValue>,
}

impl TypedRow {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name) {
            Some(FieldValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn datetime(&self, name: &str) -> Option<NaiveDateTime> {
        match self.values.get(name) {
            Some(FieldValue::DateTime(dt)) => Some(*dt),
            _ => None,
        }
    }

    pub fn time(&self, name: &str) -> Option<NaiveTime> {
        match self.values.get(name) {
            Some(FieldValue::Time(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FieldValue::Float(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

/// 宿主领域对象的构建接口
///
/// 物化器保证传入的行只包含类型正确的值；缺席字段由实现方
/// 用自身缺省值填补。
pub trait FromRow: Sized {
    fn from_row(row: &TypedRow) -> Self;
}

/// 对象物化器
///
/// 借用会话的处理器注册表: 配置了处理器的字段优先采用
/// translate 的输出，None 视为字段缺席。
pub struct Materializer<'s> {
    schema: &'s Schema,
    handlers: &'s mut HandlerRegistry,
}

impl<'s> Materializer<'s> {
    pub fn new(schema: &'s Schema, handlers: &'s mut HandlerRegistry) -> Self {
        Self { schema, handlers }
    }

    /// 把一行原始值转换为类型化行
    pub fn typed_row(&mut self, values: &RawRow) -> TypedRow {
        let mut typed = TypedRow::default();
        for field in self.schema.fields() {
            let raw = match &field.handler {
                Some(binding) => self
                    .handlers
                    .get_or_create(field.sort, binding)
                    .and_then(|handler| handler.translate(values)),
                None => values.get(&field.name).cloned(),
            };
            let Some(raw) = raw else {
                continue;
            };
            if let Some(value) = Self::coerce(&raw, field.ty) {
                typed.values.insert(field.name.clone(), value);
            }
        }
        typed
    }

    /// 基础类型转换；失败返回 None（字段缺席）
    fn coerce(raw: &str, ty: FieldType) -> Option<FieldValue> {
        match ty {
            FieldType::Text => Some(FieldValue::Text(raw.to_string())),
            FieldType::Date => dates::to_date(raw).map(FieldValue::Date),
            FieldType::DateTime => dates::to_datetime(raw).map(FieldValue::DateTime),
            FieldType::Time => dates::to_time(raw).map(FieldValue::Time),
            FieldType::Integer => raw.parse::<i64>().ok().map(FieldValue::Int),
            FieldType::Float => raw.parse::<f64>().ok().map(FieldValue::Float),
            // 与既有行为一致: 非 true 文本一律为 false
            FieldType::Bool => Some(FieldValue::Bool(raw.eq_ignore_ascii_case("true"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldFormat, Schema};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn test_schema() -> Schema {
        Schema::new(vec![
            FieldDescriptor::new("name", "姓名", 0),
            FieldDescriptor::new("age", "年龄", 1)
                .format(FieldFormat::Integer)
                .typed(FieldType::Integer),
            FieldDescriptor::new("weight", "体重", 2).typed(FieldType::Float),
            FieldDescriptor::new("birthday", "生日", 3)
                .format(FieldFormat::Date)
                .typed(FieldType::Date),
            FieldDescriptor::new("active", "在职", 4).typed(FieldType::Bool),
        ])
        .unwrap()
    }

    #[test]
    fn test_typed_row_coercions() {
        let schema = test_schema();
        let mut handlers = HandlerRegistry::new(None, None);
        let mut materializer = Materializer::new(&schema, &mut handlers);

        let typed = materializer.typed_row(&row(&[
            ("name", "张三"),
            ("age", "30"),
            ("weight", "62.5"),
            ("birthday", "1994-03-05"),
            ("active", "True"),
        ]));

        assert_eq!(typed.text("name"), Some("张三"));
        assert_eq!(typed.integer("age"), Some(30));
        assert_eq!(typed.float("weight"), Some(62.5));
        assert_eq!(
            typed.date("birthday"),
            chrono::NaiveDate::from_ymd_opt(1994, 3, 5)
        );
        assert_eq!(typed.boolean("active"), Some(true));
    }

    #[test]
    fn test_coercion_failure_leaves_field_absent() {
        let schema = test_schema();
        let mut handlers = HandlerRegistry::new(None, None);
        let mut materializer = Materializer::new(&schema, &mut handlers);

        let typed = materializer.typed_row(&row(&[("name", "张三"), ("age", "三十")]));

        assert_eq!(typed.text("name"), Some("张三"));
        // 解析失败不报错，字段缺席
        assert_eq!(typed.integer("age"), None);
        assert!(typed.get("age").is_none());
    }

    #[test]
    fn test_materialization_is_idempotent() {
        let schema = test_schema();
        let mut handlers = HandlerRegistry::new(None, None);
        let mut materializer = Materializer::new(&schema, &mut handlers);
        let values = row(&[("name", "张三"), ("age", "30")]);

        let first = materializer.typed_row(&values);
        let second = materializer.typed_row(&values);
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_row_with_defaults() {
        #[derive(Debug, PartialEq)]
        struct Person {
            name: String,
            age: i64,
        }

        impl FromRow for Person {
            fn from_row(row: &TypedRow) -> Self {
                Person {
                    name: row.text("name").unwrap_or_default().to_string(),
                    age: row.integer("age").unwrap_or_default(),
                }
            }
        }

        let schema = test_schema();
        let mut handlers = HandlerRegistry::new(None, None);
        let mut materializer = Materializer::new(&schema, &mut handlers);
        let typed = materializer.typed_row(&row(&[("name", "张三")]));

        let person = Person::from_row(&typed);
        assert_eq!(
            person,
            Person {
                name: "张三".to_string(),
                age: 0
            }
        );
    }
}
