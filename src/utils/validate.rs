use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{DashboardError, Result};
use crate::models::activities::entities::{Activity, SubmissionKind};

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://\S+$").expect("Invalid link regex"));

const BYTES_PER_MB: u64 = 1024 * 1024;

/// 文本 / 链接内容去除首尾空白后不能为空，返回去空白后的内容
pub fn validate_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation("Submission content cannot be empty"));
    }
    Ok(trimmed)
}

pub fn validate_link(link: &str) -> Result<()> {
    // 仅接受 http / https
    if !LINK_RE.is_match(link) {
        return Err(DashboardError::validation(
            "Link must be a valid http:// or https:// URL",
        ));
    }
    Ok(())
}

/// 校验文件大小，`limit_mb` 为 MB
pub fn validate_file_size(size_bytes: u64, limit_mb: u64) -> Result<()> {
    if size_bytes == 0 {
        return Err(DashboardError::validation("Uploaded file is empty"));
    }
    if size_bytes > limit_mb.saturating_mul(BYTES_PER_MB) {
        return Err(DashboardError::validation(format!(
            "File exceeds the {limit_mb} MB size limit"
        )));
    }
    Ok(())
}

/// 提交形式必须与活动要求一致
pub fn validate_kind(activity: &Activity, kind: SubmissionKind) -> Result<()> {
    match activity.requirement.kind() {
        Some(expected) if expected == kind => Ok(()),
        Some(expected) => Err(DashboardError::validation(format!(
            "'{}' expects a {} submission, got {}",
            activity.title, expected, kind
        ))),
        None => Err(DashboardError::submission_not_required(format!(
            "'{}' does not accept submissions",
            activity.title
        ))),
    }
}
