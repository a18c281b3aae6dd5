//! Gitiles 路径工具函数
//!
//! Gitiles 的页面路径形如 `/platform/build/+log/refs/tags/android-4.0.1_r1`，
//! 第一个以 `+` 开头的段之前是仓库路径，之后是视图和 ref。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ref 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// 直接使用 Commit SHA
    Commit,
    /// `refs/tags/...`
    Tags,
    /// `refs/heads/...`
    Heads,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Tags => "tags",
            Self::Heads => "heads",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 提取仓库主页路径
///
/// 去除末尾斜杠以及第一个 `+` 段及其之后的部分。
///
/// # Examples
/// ```
/// use froyocomb_lib::gitiles::repo_home_path;
///
/// assert_eq!(
///     repo_home_path("/platform/build/+log/refs/heads/master"),
///     "/platform/build"
/// );
/// assert_eq!(repo_home_path("/platform/frameworks/base/"), "/platform/frameworks/base");
/// ```
pub fn repo_home_path(pathname: &str) -> String {
    let trimmed = pathname.trim_end_matches('/');
    trimmed
        .split('/')
        .take_while(|segment| !segment.starts_with('+'))
        .collect::<Vec<_>>()
        .join("/")
}

/// 格式化 ref
///
/// `Commit` 直接返回名称，其他类型返回 `refs/<kind>/<name>`。
pub fn format_ref(kind: RefKind, name: &str) -> String {
    match kind {
        RefKind::Commit => name.to_string(),
        _ => format!("refs/{}/{}", kind.as_str(), name),
    }
}

/// 拼接仓库路径、视图和 ref
///
/// `view` 为空表示默认视图 (`/+/`)，`"log"` 表示日志视图 (`/+log/`)。
/// ref 的每一段都会做 URL 编码，`/` 保持不变。
pub fn path_to_ref(home_path: &str, git_ref: &str, view: &str) -> String {
    let encoded = git_ref
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/+{}/{}", home_path.trim_end_matches('/'), view, encoded)
}

/// 面板上展示的 ref 链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefLink {
    pub href: String,
    pub label: String,
}

impl RefLink {
    /// 生成指向某个 ref 视图的链接
    ///
    /// # Arguments
    /// * `pathname` - 当前页面路径
    /// * `kind` - ref 类型
    /// * `name` - ref 名称
    /// * `view` - 视图名 (如 `log`)
    pub fn new(pathname: &str, kind: RefKind, name: &str, view: &str) -> Self {
        let git_ref = format_ref(kind, name);
        Self {
            href: path_to_ref(&repo_home_path(pathname), &git_ref, view),
            label: format!("Go to {} of {}", view, git_ref),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_home_path_plain() {
        assert_eq!(repo_home_path("/platform/build"), "/platform/build");
    }

    #[test]
    fn test_repo_home_path_with_subpage() {
        assert_eq!(
            repo_home_path("/platform/build/+/0123abc/core/build_id.mk"),
            "/platform/build"
        );
        assert_eq!(repo_home_path("/platform/build/+log"), "/platform/build");
    }

    #[test]
    fn test_repo_home_path_trailing_slashes() {
        assert_eq!(repo_home_path("/platform/build///"), "/platform/build");
    }

    #[test]
    fn test_repo_home_path_root() {
        assert_eq!(repo_home_path("/"), "");
    }

    #[test]
    fn test_format_ref() {
        assert_eq!(format_ref(RefKind::Commit, "abc"), "abc");
        assert_eq!(
            format_ref(RefKind::Tags, "android-4.0.1_r1"),
            "refs/tags/android-4.0.1_r1"
        );
        assert_eq!(
            format_ref(RefKind::Heads, "ics-mr0-release"),
            "refs/heads/ics-mr0-release"
        );
    }

    #[test]
    fn test_path_to_ref_default_view() {
        assert_eq!(path_to_ref("/platform/build", "abc", ""), "/platform/build/+/abc");
    }

    #[test]
    fn test_path_to_ref_encodes_segments() {
        assert_eq!(
            path_to_ref("/platform/build", "refs/tags/weird tag", "log"),
            "/platform/build/+log/refs/tags/weird%20tag"
        );
    }

    #[test]
    fn test_ref_link() {
        let link = RefLink::new(
            "/platform/frameworks/base/+log/refs/heads/master",
            RefKind::Tags,
            "android-4.0.1_r1",
            "log",
        );
        assert_eq!(
            link.href,
            "/platform/frameworks/base/+log/refs/tags/android-4.0.1_r1"
        );
        assert_eq!(link.label, "Go to log of refs/tags/android-4.0.1_r1");
    }
}
