//! 注释解析核心：按生效顺序对注释文本执行首个命中的Web模式
//! 解析是 (注释, 有序模式列表) 的纯函数：无IO、无重试、无内部状态

use std::collections::HashMap;

use tracing::debug;

use super::template::TemplateExpander;
use crate::rule::store::WebMode;

/// 单次解析结果：最终URL与命中的模式
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub url: String,
    pub mode: &'a WebMode,
}

/// 注释解析器
/// 自身无状态，不感知「活动模式」；调用方先算好生效顺序再传入
pub struct CommentResolver;

impl CommentResolver {
    /// 按给定顺序解析注释，返回首个产出可用URL的 (URL, 模式)
    ///
    /// 模式做的是子串搜索而非全串锚定：注释里混着别的文字也能命中。
    /// 命中但模板展开失败（缺占位符）或展开为空串的模式视为未命中，
    /// 继续尝试后续模式；全部落空返回 None。
    pub fn resolve<'a, I>(comment: &str, ordered_modes: I) -> Option<Resolution<'a>>
    where
        I: IntoIterator<Item = &'a WebMode>,
    {
        // 1. 空注释/纯空白注释不做任何匹配
        let trimmed = comment.trim();
        if trimmed.is_empty() {
            return None;
        }

        // 2. 依序尝试各模式，首个产出可用URL者胜出
        for mode in ordered_modes {
            let Some(captures) = mode.regex().captures(trimmed) else {
                continue;
            };

            // 3. 构建模板上下文：value=整体匹配（可为空串）；
            //    参与匹配且非空的命名分组按组名加入，同名分组覆盖value
            let mut context = HashMap::new();
            let whole = captures.get(0).map_or("", |m| m.as_str());
            context.insert("value".to_string(), whole.to_string());
            for group_name in mode.regex().capture_names().flatten() {
                if let Some(matched) = captures.name(group_name) {
                    if !matched.as_str().is_empty() {
                        context.insert(group_name.to_string(), matched.as_str().to_string());
                    }
                }
            }

            // 4. 模板留空按 {value} 处理
            let raw_template = mode.template();
            let template = if raw_template.trim().is_empty() {
                "{value}"
            } else {
                raw_template
            };

            // 5. 展开失败或URL为空串 => 本条作废，换下一条模式
            match TemplateExpander::expand(template, &context) {
                Some(url) if !url.is_empty() => {
                    debug!("模式 [{}] 命中，URL：{}", mode.name(), url);
                    return Some(Resolution { url, mode });
                }
                Some(_) => {
                    debug!("模式 [{}] 命中但URL为空，继续尝试后续模式", mode.name());
                }
                None => {
                    debug!("模式 [{}] 命中但模板缺占位符，继续尝试后续模式", mode.name());
                }
            }
        }

        None
    }
}
