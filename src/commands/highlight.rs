//! 高亮命令
//!
//! 对页面上的 Commit 分类，生成包含每个 Commit 状态的报告，
//! 展示层据此添加或清除高亮。

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AppState;
use crate::classifier::{classify, MatchStatus};
use crate::error::AppError;
use crate::gitiles::{records_from_entries, records_from_log_json, LogEntry};
use crate::models::{to_iso_millis, CommitId, CommitRecord};

/// 单个 Commit 的高亮结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitHighlight {
    pub id: CommitId,
    pub status: MatchStatus,
    /// 需要添加的 CSS 类，None 表示清除高亮
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    /// 是否为第一个匹配 (跳转锚点)
    pub is_first: bool,
    /// 命中的导入告警
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<String>,
}

/// 各状态的数量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub exact: usize,
    pub trusted: usize,
    pub lesser: usize,
    pub none: usize,
}

impl StatusCounts {
    fn add(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Exact => self.exact += 1,
            MatchStatus::Trusted => self.trusted += 1,
            MatchStatus::Lesser => self.lesser += 1,
            MatchStatus::None => self.none += 1,
        }
    }

    /// 匹配总数 (非 None)
    pub fn matched(&self) -> usize {
        self.exact + self.trusted + self.lesser
    }
}

/// 高亮报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightReport {
    /// 按页面顺序的全部 Commit
    pub commits: Vec<CommitHighlight>,
    pub first_match: Option<CommitId>,
    pub counts: StatusCounts,
    pub reference_time: DateTime<Utc>,
    /// `"<n> found"`
    pub message: String,
    /// `"(before <ISO 时间>)"`
    pub hint: String,
}

/// 对页面日志条目分类
pub fn light_em_up(state: &AppState, entries: &[LogEntry]) -> Result<HighlightReport, AppError> {
    let records = records_from_entries(entries);
    highlight_records(state, &records)
}

/// 对日志 JSON 响应体分类
pub fn light_em_up_log_json(state: &AppState, body: &str) -> Result<HighlightReport, AppError> {
    let records = records_from_log_json(body)?;
    highlight_records(state, &records)
}

/// 对 Commit 记录分类并生成报告
pub fn highlight_records(
    state: &AppState,
    records: &[CommitRecord],
) -> Result<HighlightReport, AppError> {
    let reference_time = {
        let store = state.lock_store()?;
        store.reference_point(&state.namespace).time()
    };

    let classification = classify(records, reference_time, &state.rules.allowlist, state.boundary());
    let first_match = classification.first_match().cloned();

    let mut counts = StatusCounts::default();
    let mut seen = HashSet::new();
    let mut commits = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            continue;
        }
        let status = classification.status(&record.id);
        counts.add(status);
        commits.push(CommitHighlight {
            id: record.id.clone(),
            status,
            css_class: status.css_class().map(str::to_string),
            is_first: first_match.as_ref() == Some(&record.id),
            alerts: state.rules.alerts_for(record.message.as_deref()),
        });
    }

    let report = HighlightReport {
        commits,
        first_match,
        counts,
        reference_time,
        message: format!("{} found", counts.matched()),
        hint: format!("(before {})", to_iso_millis(&reference_time)),
    };

    info!(
        namespace = %state.namespace,
        total = report.commits.len(),
        found = counts.matched(),
        "commits classified"
    );
    Ok(report)
}
