//! Web模式编译与存储
//! 构建 Store 时即时编译全部正则，任一条失败则整体失败，不产生半成品 Store

use std::collections::HashSet;
use std::time::Instant;

use regex::Regex;
use tracing::{debug, warn};

use super::model::WebModeSpec;
use crate::config::ConfigDocument;
use crate::error::{QbLookError, QbLookResult};

/// 编译后的Web模式
/// 一经构建，pattern 即为合法正则并在整个生命周期内保持不变
#[derive(Debug, Clone)]
pub struct WebMode {
    name: String,
    regex: Regex,
    template: String,
    description: String,
    cookie: String,
    categories: Vec<String>,
}

impl WebMode {
    /// 编译单条模式定义
    ///
    /// 空白 pattern 与无法编译的 pattern 一律按 `InvalidPattern` 拒绝，
    /// 错误中带上出错模式的名称与编译器原因
    pub fn compile(spec: &WebModeSpec) -> QbLookResult<Self> {
        if spec.pattern.trim().is_empty() {
            return Err(QbLookError::InvalidPattern {
                name: spec.display_name().to_string(),
                reason: "缺少正则表达式".to_string(),
            });
        }

        let regex = Regex::new(&spec.pattern).map_err(|e| QbLookError::InvalidPattern {
            name: spec.display_name().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name: spec.name.clone(),
            regex,
            template: spec.template.clone(),
            description: spec.description.clone(),
            cookie: spec.cookie.clone(),
            categories: spec.categories.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// URL模板原文（留空时解析阶段按 "{value}" 处理）
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// 是否适用于指定分类（空白名单对所有分类生效）
    pub fn applies_to(&self, category: &str) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| c == category)
    }

    /// 还原为可序列化的模式定义
    pub fn to_spec(&self) -> WebModeSpec {
        WebModeSpec {
            name: self.name.clone(),
            pattern: self.regex.as_str().to_string(),
            template: self.template.clone(),
            description: self.description.clone(),
            cookie: self.cookie.clone(),
            categories: self.categories.clone(),
        }
    }
}

/// Web模式存储：有序模式列表 + 活动模式名，二者捆绑为一个不可变值
///
/// 编辑操作（add/remove/replace/set-active）均返回新 Store，旧快照不受影响，
/// 解析方持着旧快照跑完当次解析即可，无需加锁。
/// 允许重名：按名称查找一律取列表序靠前者（重名遮蔽），构建时仅告警不报错。
#[derive(Debug, Clone, Default)]
pub struct WebModeStore {
    modes: Vec<WebMode>,
    active: Option<String>,
}

impl WebModeStore {
    /// 从模式定义构建 Store
    pub fn compile(specs: &[WebModeSpec], active: Option<String>) -> QbLookResult<Self> {
        let start = Instant::now();

        // 1. 即时编译每条模式，首个错误即中止
        let mut modes = Vec::with_capacity(specs.len());
        for spec in specs {
            modes.push(WebMode::compile(spec)?);
        }

        // 2. 重名仅告警，名称查找按列表序取首个
        let mut seen = HashSet::new();
        for mode in &modes {
            if !seen.insert(mode.name()) {
                warn!("Web模式名称重复 [{}]，按名称查找时取列表序靠前者", mode.name());
            }
        }

        debug!("✅ Web模式编译完成，共{}条，耗时{:?}", modes.len(), start.elapsed());

        Ok(Self { modes, active })
    }

    /// 从配置文档构建 Store
    pub fn from_document(doc: &ConfigDocument) -> QbLookResult<Self> {
        Self::compile(&doc.web_modes, doc.active_web_mode.clone())
    }

    pub fn modes(&self) -> &[WebMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// 当前活动模式名（可能悬空：指向已删除的模式时不生效）
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// 按名称查找首个同名模式
    pub fn get(&self, name: &str) -> Option<&WebMode> {
        self.modes.iter().find(|m| m.name() == name)
    }

    /// 生效顺序：活动模式提到最前，其余保持原相对顺序
    pub fn effective_order(&self) -> Vec<&WebMode> {
        self.effective_order_for(self.active.as_deref())
    }

    /// 按指定活动名计算生效顺序（未设置或查无此名时返回原序）
    pub fn effective_order_for(&self, active: Option<&str>) -> Vec<&WebMode> {
        let Some(active_name) = active else {
            return self.modes.iter().collect();
        };
        let Some(idx) = self.modes.iter().position(|m| m.name() == active_name) else {
            return self.modes.iter().collect();
        };

        let mut ordered = Vec::with_capacity(self.modes.len());
        ordered.push(&self.modes[idx]);
        ordered.extend(
            self.modes
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, m)| m),
        );
        ordered
    }

    /// 追加一条模式，返回新 Store
    pub fn with_added(&self, spec: &WebModeSpec) -> QbLookResult<Self> {
        let mode = WebMode::compile(spec)?;
        let mut next = self.clone();
        next.modes.push(mode);
        Ok(next)
    }

    /// 移除首个同名模式，返回新 Store
    /// 活动名指向被删模式时保留原样，生效顺序会自动退回原序
    pub fn with_removed(&self, name: &str) -> Self {
        let mut next = self.clone();
        if let Some(idx) = next.modes.iter().position(|m| m.name() == name) {
            next.modes.remove(idx);
        }
        next
    }

    /// 以新定义替换首个同名模式，返回新 Store；查无此名时追加到末尾
    pub fn with_replaced(&self, name: &str, spec: &WebModeSpec) -> QbLookResult<Self> {
        let mode = WebMode::compile(spec)?;
        let mut next = self.clone();
        match next.modes.iter().position(|m| m.name() == name) {
            Some(idx) => next.modes[idx] = mode,
            None => next.modes.push(mode),
        }
        Ok(next)
    }

    /// 更换活动模式名，返回新 Store
    pub fn with_active(&self, name: Option<String>) -> Self {
        let mut next = self.clone();
        next.active = name;
        next
    }

    /// 还原为配置文档中的模式定义列表
    pub fn to_specs(&self) -> Vec<WebModeSpec> {
        self.modes.iter().map(WebMode::to_spec).collect()
    }
}
