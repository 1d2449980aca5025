//! URL模板展开工具模块
//! 负责把模式的URL模板按匹配上下文展开为最终URL
//! 仅支持固定的 {标识符} 占位符文法，不提供通用格式化能力

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// 占位符token：{identifier}，标识符限字母/数字/下划线且不以数字开头
static PLACEHOLDER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap()
});

/// URL模板展开工具类
/// 提供静态方法 `expand` 用于占位符替换
pub struct TemplateExpander;

impl TemplateExpander {
    /// 按上下文展开模板中的 {标识符} 占位符
    ///
    /// # 参数
    /// - `template`: URL模板，占位符形如 {value}、{tid}
    /// - `context`: 占位符名到替换文本的映射
    ///
    /// # 返回值
    /// - `Some(String)`: 全部占位符均有替换值，返回展开结果
    /// - `None`: 模板引用了上下文中不存在的占位符（软失败，调用方换下一条模式）
    ///
    /// # 功能特性
    /// 1. 仅扫描 {标识符} 文法的token，不匹配该文法的花括号原样保留
    /// 2. 同名占位符可出现多次，逐一替换
    /// 3. 不含任何占位符的模板原样返回
    pub fn expand(template: &str, context: &HashMap<String, String>) -> Option<String> {
        let mut result = String::with_capacity(template.len());
        let mut last_end = 0;

        for caps in PLACEHOLDER_TOKEN.captures_iter(template) {
            let (Some(token), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            // token之前的字面文本原样拷贝
            result.push_str(&template[last_end..token.start()]);

            // 占位符缺值即软失败，整条模板作废
            match context.get(key.as_str()) {
                Some(value) => result.push_str(value),
                None => return None,
            }
            last_end = token.end();
        }

        result.push_str(&template[last_end..]);
        Some(result)
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_expand_value_placeholder() {
        // 测试场景：{value} 占位符替换为整体匹配文本
        let ctx = context(&[("value", "https://kamept.com/details.php?id=42")]);
        let url = TemplateExpander::expand("{value}", &ctx);
        assert_eq!(url, Some("https://kamept.com/details.php?id=42".to_string()));
    }

    #[test]
    fn test_expand_named_placeholder_with_literal_text() {
        // 测试场景：命名占位符与字面文本混排
        let ctx = context(&[("tid", "4821")]);
        let url = TemplateExpander::expand("https://kp.m-team.cc/detail/{tid}", &ctx);
        assert_eq!(url, Some("https://kp.m-team.cc/detail/4821".to_string()));
    }

    #[test]
    fn test_expand_missing_placeholder_soft_fails() {
        // 测试场景：引用上下文中不存在的占位符，返回 None
        let ctx = context(&[("tid", "123")]);
        let url = TemplateExpander::expand("{tid}-{extra}", &ctx);
        assert_eq!(url, None);
    }

    #[test]
    fn test_expand_repeated_placeholder() {
        // 测试场景：同名占位符出现多次，逐一替换
        let ctx = context(&[("tid", "7")]);
        let url = TemplateExpander::expand("{tid}/{tid}", &ctx);
        assert_eq!(url, Some("7/7".to_string()));
    }

    #[test]
    fn test_expand_ignores_non_token_braces() {
        // 测试场景：不符合 {标识符} 文法的花括号原样保留
        let ctx = context(&[("value", "X")]);
        let url = TemplateExpander::expand("{123}{-}{value}{", &ctx);
        assert_eq!(url, Some("{123}{-}X{".to_string()));
    }

    #[test]
    fn test_expand_template_without_placeholders() {
        // 测试场景：纯字面模板原样返回
        let ctx = context(&[]);
        let url = TemplateExpander::expand("https://fixed.example.org/page", &ctx);
        assert_eq!(url, Some("https://fixed.example.org/page".to_string()));
    }

    #[test]
    fn test_expand_empty_template() {
        // 测试场景：空模板展开为空串（是否可用由解析器判定）
        let ctx = context(&[("value", "abc")]);
        assert_eq!(TemplateExpander::expand("", &ctx), Some(String::new()));
    }
}
