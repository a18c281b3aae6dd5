//! 规则匹配引擎
//!
//! 规则在启动时编译一次，之后以只读方式传入分类器。

use regex::Regex;

use super::error::RuleError;
use super::patterns::{table_for, PatternKind, PatternRule};
use crate::models::Namespace;

#[derive(Debug, Clone)]
enum Matcher {
    /// 原样匹配的子串 (区分大小写)
    Substring(String),
    /// 已转为小写的前缀
    Prefix(String),
    Regex(Regex),
}

impl Matcher {
    fn compile(rule: &PatternRule) -> Result<Self, RuleError> {
        Ok(match rule.kind {
            PatternKind::Substring => Self::Substring(rule.pattern.clone()),
            PatternKind::Prefix => Self::Prefix(rule.pattern.to_ascii_lowercase()),
            PatternKind::Regex => {
                let regex = Regex::new(&rule.pattern).map_err(|source| RuleError::InvalidPattern {
                    name: rule.name.clone(),
                    source,
                })?;
                Self::Regex(regex)
            }
        })
    }

    fn is_match(&self, text: &str, lowered: &str) -> bool {
        match self {
            Self::Substring(needle) => text.contains(needle.as_str()),
            Self::Prefix(prefix) => lowered.trim_start().starts_with(prefix.as_str()),
            Self::Regex(regex) => regex.is_match(text),
        }
    }
}

/// 编译后的规则列表
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    rules: Vec<PatternRule>,
    matchers: Vec<Matcher>,
}

impl RuleMatcher {
    /// 编译规则列表
    ///
    /// # Errors
    /// 任一正则无效时返回 InvalidPattern
    pub fn new(rules: Vec<PatternRule>) -> Result<Self, RuleError> {
        let matchers = rules.iter().map(Matcher::compile).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules, matchers })
    }

    /// 是否有任一规则匹配
    pub fn is_match(&self, text: &str) -> bool {
        let lowered = text.to_ascii_lowercase();
        self.matchers.iter().any(|m| m.is_match(text, &lowered))
    }

    /// 返回所有匹配的规则
    pub fn matching(&self, text: &str) -> Vec<&PatternRule> {
        let lowered = text.to_ascii_lowercase();
        self.rules
            .iter()
            .zip(&self.matchers)
            .filter(|(_, m)| m.is_match(text, &lowered))
            .map(|(rule, _)| rule)
            .collect()
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 某个命名空间编译后的全部规则
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// 规则表名称
    pub table: String,
    /// 规则表版本
    pub version: u32,
    /// 作者白名单
    pub allowlist: RuleMatcher,
    /// 导入告警
    pub alerts: RuleMatcher,
}

impl RuleSet {
    /// 命中的告警名称
    pub fn alerts_for(&self, message: Option<&str>) -> Vec<String> {
        match message {
            Some(message) => self
                .alerts
                .matching(message)
                .into_iter()
                .map(|rule| rule.name.clone())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// 编译命名空间对应的规则表
pub fn rules_for(namespace: &Namespace) -> Result<RuleSet, RuleError> {
    let table = table_for(namespace);
    Ok(RuleSet {
        table: table.name.clone(),
        version: table.version,
        allowlist: RuleMatcher::new(table.allowlist.clone())?,
        alerts: RuleMatcher::new(table.alerts.clone())?,
    })
}
