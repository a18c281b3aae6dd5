//! 内置规则表
//!
//! 按站点命名空间划分的作者白名单和导入告警模式。
//! 规则表是只读的静态数据，带名称和版本号。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Namespace;

/// 模式匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 子串匹配 (区分大小写)
    Substring,
    /// 前缀匹配 (忽略前导空白和 ASCII 大小写)
    Prefix,
    /// 正则表达式
    Regex,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Substring => "substring",
            Self::Prefix => "prefix",
            Self::Regex => "regex",
        };
        f.write_str(name)
    }
}

/// 单条匹配规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// 规则名称
    pub name: String,
    /// 模式文本
    pub pattern: String,
    /// 匹配方式
    pub kind: PatternKind,
}

impl PatternRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, kind: PatternKind) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            kind,
        }
    }

    pub fn substring(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, PatternKind::Substring)
    }

    pub fn prefix(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, PatternKind::Prefix)
    }

    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, PatternKind::Regex)
    }
}

/// 作者白名单规则 (匹配作者邮箱)
pub type AllowlistRule = PatternRule;

/// 导入告警模式 (匹配 Commit 消息)
pub type AlertPattern = PatternRule;

/// 命名空间规则表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTable {
    /// 规则表名称
    pub name: String,
    /// 规则表版本
    pub version: u32,
    /// 内部作者白名单
    pub allowlist: Vec<AllowlistRule>,
    /// 上游导入告警
    pub alerts: Vec<AlertPattern>,
}

/// 所有站点共用的导入告警
fn common_alerts() -> Vec<AlertPattern> {
    vec![
        AlertPattern::substring("SVN import", "git-svn-id:"),
        AlertPattern::regex(
            "Upstream merge",
            r"(?im)^merge (?:remote-tracking )?branch '?(?:aosp|upstream|goog|origin)/",
        ),
        AlertPattern::regex("Upstream mention", r"(?i)\bupstream\b"),
    ]
}

/// Android (AOSP) 规则表
pub static ANDROID_RULES: Lazy<RuleTable> = Lazy::new(|| {
    let mut alerts = vec![
        AlertPattern::prefix("Perforce auto import", "auto import from //"),
        AlertPattern::prefix("Perforce code drop", "Code drop from //"),
        AlertPattern::prefix("Initial contribution", "Initial Contribution"),
        AlertPattern::regex(
            "External project update",
            r"(?i)^(?:import|update|upgrade|rebase)\b.*\b(?:to|from)\b.*\b(?:v?\d+\.\d+|r\d+)",
        ),
    ];
    alerts.extend(common_alerts());

    RuleTable {
        name: Namespace::ANDROID.to_string(),
        version: 2,
        allowlist: vec![
            AllowlistRule::substring("Google", "@google.com"),
            AllowlistRule::substring("Android", "@android.com"),
        ],
        alerts,
    }
});

/// Chromium 规则表
pub static CHROMIUM_RULES: Lazy<RuleTable> = Lazy::new(|| {
    let mut alerts = vec![
        AlertPattern::regex("Third-party roll", r"(?i)^roll (?:src/)?third_party/"),
        AlertPattern::regex("DEPS roll", r"(?i)^roll \S+ [0-9a-f]{7,}\.\.[0-9a-f]{7,}"),
    ];
    alerts.extend(common_alerts());

    RuleTable {
        name: Namespace::CHROMIUM.to_string(),
        version: 1,
        allowlist: vec![
            AllowlistRule::substring("Chromium", "@chromium.org"),
            AllowlistRule::substring("Google", "@google.com"),
            AllowlistRule::regex(
                "Chromium service accounts",
                r"(?i)@chops-service-accounts\.iam\.gserviceaccount\.com$",
            ),
        ],
        alerts,
    }
});

/// 通用规则表 (其他 Gitiles 站点)
pub static GENERIC_RULES: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    name: "generic".to_string(),
    version: 1,
    allowlist: vec![AllowlistRule::substring("Google", "@google.com")],
    alerts: common_alerts(),
});

/// 根据命名空间选择规则表
pub fn table_for(namespace: &Namespace) -> &'static RuleTable {
    match namespace.as_str() {
        Namespace::ANDROID => &ANDROID_RULES,
        Namespace::CHROMIUM => &CHROMIUM_RULES,
        _ => &GENERIC_RULES,
    }
}

#[cfg(test)]
mod pattern_tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_all_regex_patterns_compile() {
        for table in [&*ANDROID_RULES, &*CHROMIUM_RULES, &*GENERIC_RULES] {
            for rule in table.allowlist.iter().chain(table.alerts.iter()) {
                if rule.kind == PatternKind::Regex {
                    let result = Regex::new(&rule.pattern);
                    assert!(
                        result.is_ok(),
                        "Pattern '{}' in table '{}' failed to compile: {:?}",
                        rule.name,
                        table.name,
                        result.err()
                    );
                }
            }
        }
    }

    #[test]
    fn test_table_selection() {
        assert_eq!(table_for(&Namespace::new("android")).name, "android");
        assert_eq!(table_for(&Namespace::new("chromium")).name, "chromium");
        assert_eq!(table_for(&Namespace::new("gerrit")).name, "generic");
    }

    #[test]
    fn test_android_allowlist_matches_original_domains() {
        let patterns: Vec<_> = ANDROID_RULES.allowlist.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["@google.com", "@android.com"]);
    }

    #[test]
    fn test_pattern_kind_serde() {
        let json = serde_json::to_string(&PatternKind::Substring).unwrap();
        assert_eq!(json, "\"substring\"");
    }
}
