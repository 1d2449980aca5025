//! 规则模块：Web模式的数据模型、编译存储与配置文档读写
pub mod model;
pub mod store;
pub mod loader;

// 导出核心接口
pub use self::model::WebModeSpec;
pub use self::store::{WebMode, WebModeStore};
pub use self::loader::ConfigLoader;
