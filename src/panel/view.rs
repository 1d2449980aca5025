//! 种子记录到页面指令的转换
//! 汇合生效顺序、分类过滤、注释解析与Cookie作用域，产出展示层可直接执行的指令

use tracing::debug;

use super::record::TorrentRecord;
use crate::resolver::{CommentResolver, CookieDirective, ScopedCookie};
use crate::rule::WebModeStore;

/// 打开种子详情时交给展示层执行的指令
#[derive(Debug, Clone, PartialEq)]
pub enum PageDirective {
    /// 解析成功：带作用域Cookie加载该URL
    Navigate {
        url: String,
        cookies: Vec<ScopedCookie>,
    },
    /// 解析失败：展示诊断信息，携带原始注释
    Diagnostic { comment: String },
}

/// 为一条种子记录生成页面指令
///
/// 候选模式取生效顺序，再剔除分类不适用的模式；任一模式命中即产出
/// Navigate，全部落空产出 Diagnostic
pub fn page_directive(store: &WebModeStore, record: &TorrentRecord) -> PageDirective {
    let candidates = store
        .effective_order()
        .into_iter()
        .filter(|mode| mode.applies_to(&record.category));

    match CommentResolver::resolve(&record.comment, candidates) {
        Some(resolution) => {
            let cookies = CookieDirective::for_url(resolution.mode.cookie(), &resolution.url);
            debug!("加载页面：{}", resolution.url);
            PageDirective::Navigate {
                url: resolution.url,
                cookies,
            }
        }
        None => PageDirective::Diagnostic {
            comment: record.comment.clone(),
        },
    }
}

/// 解析落空时的诊断文案
pub fn diagnostic_message(comment: &str) -> String {
    let shown = if comment.trim().is_empty() {
        "无"
    } else {
        comment.trim()
    };
    format!(
        "未匹配到可用的请求模式\n当前注释：{}\n请检查配置文件里的 web_modes 正则规则。",
        shown
    )
}
