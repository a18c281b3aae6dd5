//! Classifier 模块 - Commit 分类与高亮
//!
//! 判断页面上的 Commit 是否在参考时间之前，以及是否来自内部作者。

mod engine;

pub use engine::{classify, classify_one, BoundaryPolicy, Classification, MatchStatus};
