//! 解析模块：注释转URL的核心逻辑
pub mod engine;
pub mod template;
pub mod cookie;

// 导出核心接口
pub use self::engine::{CommentResolver, Resolution};
pub use self::template::TemplateExpander;
pub use self::cookie::{CookieDirective, ScopedCookie};
