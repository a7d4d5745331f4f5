// ==========================================
// Excel 表格数据工具 - 字段处理器
// ==========================================
// 职责: 自定义校验/转换处理器接口 + 会话级注册表
// 说明: 注册表归属单个导入会话，不做进程级共享；
//       构造失败降级为"无处理器"而不是中止导入
// ==========================================

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;

/// 处理器共享参数（调用方提供的任意对象，处理器自行向下转型）
pub type HandlerParams = Rc<dyn Any>;

/// 行的原始值 Map: 字段名 → 去除首尾空白后的非空文本
pub type RawRow = HashMap<String, String>;

/// 字段处理器
///
/// 同一 sort 序号的字段共享一个实例；实例持有"最近一次消息"
/// 状态，因此不是线程安全的，只能在单个校验趟内使用。
pub trait FieldHandler {
    /// 注入会话共享参数（首次构造后调用一次）
    fn set_params(&mut self, params: Option<HandlerParams>);

    /// 最近一次 validate 失败的提示消息
    fn message(&self) -> &str;

    /// 校验: 传入字段名与该行完整原始值 Map
    fn validate(&mut self, field_name: &str, row: &RawRow) -> bool;

    /// 转换: 返回值优先于原始文本参与物化；None 表示字段缺省
    fn translate(&mut self, row: &RawRow) -> Option<String>;
}

/// 处理器绑定: 标识 + 直接构造兜底
///
/// 查找顺序: 会话注入的工厂按 name 创建 → 兜底构造函数 →
/// 都失败则告警并视为无处理器。
#[derive(Clone)]
pub struct HandlerBinding {
    pub name: &'static str,
    pub construct: Option<fn() -> Box<dyn FieldHandler>>,
}

impl std::fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("name", &self.name)
            .field("has_construct", &self.construct.is_some())
            .finish()
    }
}

impl HandlerBinding {
    pub fn new(name: &'static str, construct: fn() -> Box<dyn FieldHandler>) -> Self {
        Self {
            name,
            construct: Some(construct),
        }
    }

    /// 只靠工厂创建、没有兜底构造的绑定
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            construct: None,
        }
    }
}

/// 处理器工厂（宿主应用注入，对应依赖容器查找）
pub trait HandlerFactory {
    fn create(&self, name: &str) -> Option<Box<dyn FieldHandler>>;
}

/// 会话级处理器注册表
///
/// 以字段 sort 序号为键缓存实例: 首次取用时构造并注入共享参数，
/// 之后复用；构造失败也会被缓存，避免逐行重试。
pub struct HandlerRegistry {
    factory: Option<Box<dyn HandlerFactory>>,
    params: Option<HandlerParams>,
    cache: HashMap<i32, Option<Box<dyn FieldHandler>>>,
}

impl HandlerRegistry {
    pub fn new(factory: Option<Box<dyn HandlerFactory>>, params: Option<HandlerParams>) -> Self {
        Self {
            factory,
            params,
            cache: HashMap::new(),
        }
    }

    /// 取用处理器；None 表示构造失败，调用方跳过处理器检查
    pub fn get_or_create(
        &mut self,
        sort: i32,
        binding: &HandlerBinding,
    ) -> Option<&mut (dyn FieldHandler + 'static)> {
        let factory = self.factory.as_deref();
        let params = self.params.clone();
        let slot = self.cache.entry(sort).or_insert_with(|| {
            let instance = factory
                .and_then(|f| f.create(binding.name))
                .or_else(|| binding.construct.map(|ctor| ctor()));
            match instance {
                Some(mut handler) => {
                    handler.set_params(params);
                    Some(handler)
                }
                None => {
                    warn!(handler = binding.name, "配置的字段处理器类型错误");
                    None
                }
            }
        });
        slot.as_deref_mut()
    }
}
