//! Rules 模块 - 作者白名单与导入告警
//!
//! 按站点命名空间选择只读规则表，编译后传给分类器和解析器。

mod error;
mod matcher;
mod patterns;

pub use error::RuleError;
pub use matcher::{rules_for, RuleMatcher, RuleSet};
pub use patterns::{
    table_for, AlertPattern, AllowlistRule, PatternKind, PatternRule, RuleTable, ANDROID_RULES,
    CHROMIUM_RULES, GENERIC_RULES,
};
