//! 参考点相关命令
//!
//! 读取、设置参考 tag / 分支 / 时间，以及通过远程 Commit 解析参考时间。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AppState;
use crate::error::AppError;
use crate::gitiles::{RefKind, RefLink};
use crate::models::{to_iso_millis, ReferencePoint};
use crate::resolver::{resolve_from_datetime_string, resolve_from_epoch_string, Resolution};

/// 分支/标签面板上的参考链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLinks {
    pub tag: RefLink,
    pub branch: RefLink,
}

/// 去除空白，空输入返回 None (保持原值)
fn non_empty(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// 获取当前站点的参考点
pub fn get_reference_point(state: &AppState) -> Result<ReferencePoint, AppError> {
    let store = state.lock_store()?;
    Ok(store.reference_point(&state.namespace))
}

/// 设置参考 tag
///
/// # Returns
/// 更新后的参考点；空输入不做修改
pub fn set_reference_tag(state: &AppState, tag: &str) -> Result<ReferencePoint, AppError> {
    let mut store = state.lock_store()?;
    if let Some(tag) = non_empty(tag) {
        store.set_reference_tag(&state.namespace, tag)?;
        info!(namespace = %state.namespace, tag = %tag, "reference tag updated");
    }
    Ok(store.reference_point(&state.namespace))
}

/// 设置参考分支
pub fn set_reference_branch(state: &AppState, branch: &str) -> Result<ReferencePoint, AppError> {
    let mut store = state.lock_store()?;
    if let Some(branch) = non_empty(branch) {
        store.set_reference_branch(&state.namespace, branch)?;
        info!(namespace = %state.namespace, branch = %branch, "reference branch updated");
    }
    Ok(store.reference_point(&state.namespace))
}

/// 通过日期时间文本设置参考时间
///
/// # Errors
/// 无法解析的文本返回 INVALID_INPUT，存储保持不变
pub fn set_reference_time_by_datetime(
    state: &AppState,
    datetime: &str,
) -> Result<ReferencePoint, AppError> {
    let Some(datetime) = non_empty(datetime) else {
        return get_reference_point(state);
    };
    let time = resolve_from_datetime_string(datetime)?;

    let mut store = state.lock_store()?;
    store.set_reference_time(&state.namespace, time)?;
    info!(namespace = %state.namespace, time = %to_iso_millis(&time), "reference time updated");
    Ok(store.reference_point(&state.namespace))
}

/// 通过毫秒时间戳设置参考时间
pub fn set_reference_time_by_timestamp(
    state: &AppState,
    timestamp: &str,
) -> Result<ReferencePoint, AppError> {
    let Some(timestamp) = non_empty(timestamp) else {
        return get_reference_point(state);
    };
    let time = resolve_from_epoch_string(timestamp)?;

    let mut store = state.lock_store()?;
    store.set_reference_time(&state.namespace, time)?;
    info!(namespace = %state.namespace, time = %to_iso_millis(&time), "reference time updated");
    Ok(store.reference_point(&state.namespace))
}

/// 解析远程 Commit，返回待确认的结果 (不写入)
///
/// # Arguments
/// * `hash` - build 仓库中某个 Commit 的完整 SHA
pub async fn resolve_reference_commit(state: &AppState, hash: &str) -> Result<Resolution, AppError> {
    debug!(hash = %hash.trim(), "resolve_reference_commit");
    state.resolver.resolve(hash).await.map_err(AppError::from)
}

/// 用户确认后写入参考时间
///
/// # Arguments
/// * `resolution` - `resolve_reference_commit` 的结果
/// * `apply_adjustment` - 是否采用批量导入调整
pub fn confirm_reference_commit(
    state: &AppState,
    resolution: &Resolution,
    apply_adjustment: bool,
) -> Result<ReferencePoint, AppError> {
    let time = resolution.accepted_time(apply_adjustment);

    let mut store = state.lock_store()?;
    store.set_reference_time(&state.namespace, time)?;
    info!(
        namespace = %state.namespace,
        commit = %resolution.commit.short(),
        time = %to_iso_millis(&time),
        adjusted = apply_adjustment && resolution.adjustment.is_some(),
        "reference time set from commit"
    );
    Ok(store.reference_point(&state.namespace))
}

/// 当前参考 tag 和分支的日志链接
///
/// # Arguments
/// * `pathname` - 当前页面路径
pub fn reference_links(state: &AppState, pathname: &str) -> Result<ReferenceLinks, AppError> {
    let point = get_reference_point(state)?;
    Ok(ReferenceLinks {
        tag: RefLink::new(pathname, RefKind::Tags, &point.tag, "log"),
        branch: RefLink::new(pathname, RefKind::Heads, &point.branch, "log"),
    })
}
