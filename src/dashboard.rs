//! 仪表盘模块
//!
//! 仪表盘展示的是固定的示例数据（统计卡片 + 最近生成记录），
//! 只有问候名与相对时间标签是根据当前用户与当前时间计算的。

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tauri::State;

use crate::identity::{SessionState, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecentKind {
    Qr,
    Barcode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentCode {
    pub id: u32,
    pub kind: RecentKind,
    pub name: &'static str,
    pub created_at: DateTime<Utc>,
    /// "Just now" / "N hour(s) ago" / "N day(s) ago"
    pub created_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub greeting_name: String,
    pub photo_url: Option<String>,
    pub stats: Vec<StatCard>,
    pub recent_codes: Vec<RecentCode>,
}

pub fn sample_stats() -> Vec<StatCard> {
    vec![
        StatCard { label: "Total Codes", value: "23" },
        StatCard { label: "Total Scans", value: "1,254" },
        StatCard { label: "Active Codes", value: "18" },
        StatCard { label: "Subscription", value: "Free Plan" },
    ]
}

/// 相对于 `now` 生成的最近记录。
pub fn sample_recent_codes(now: DateTime<Utc>) -> Vec<RecentCode> {
    let samples = [
        (1, RecentKind::Qr, "Company Website", Duration::hours(2)),
        (2, RecentKind::Barcode, "Product Barcode", Duration::hours(24)),
        (3, RecentKind::Qr, "WiFi Network", Duration::hours(48)),
    ];

    samples
        .into_iter()
        .map(|(id, kind, name, age)| {
            let created_at = now - age;
            RecentCode {
                id,
                kind,
                name,
                created_at,
                created_label: relative_label(created_at, now),
            }
        })
        .collect()
}

/// 按整小时向下取整的相对时间标签。
pub fn relative_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        let days = hours / 24;
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    }
}

/// 问候名：昵称 → 邮箱本地部分 → "User"。
pub fn greeting_name(user: Option<&User>) -> String {
    let Some(user) = user else {
        return "User".to_string();
    };

    if let Some(name) = user.display_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    user.email
        .as_deref()
        .and_then(|email| email.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or("User")
        .to_string()
}

pub fn build_view(user: Option<&User>, now: DateTime<Utc>) -> DashboardView {
    DashboardView {
        greeting_name: greeting_name(user),
        photo_url: user.and_then(|u| u.photo_url.clone()),
        stats: sample_stats(),
        recent_codes: sample_recent_codes(now),
    }
}

#[tauri::command]
pub fn get_dashboard(session: State<'_, SessionState>) -> DashboardView {
    let user = session.current();
    build_view(user.as_ref(), Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, email: Option<&str>) -> User {
        User {
            uid: "u".into(),
            email: email.map(str::to_string),
            display_name: display_name.map(str::to_string),
            photo_url: None,
            id_token: None,
        }
    }

    #[test]
    fn labels_follow_hour_and_day_buckets() {
        let now = Utc::now();
        assert_eq!(relative_label(now - Duration::minutes(59), now), "Just now");
        assert_eq!(relative_label(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(relative_label(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_label(now - Duration::hours(24), now), "1 day ago");
        assert_eq!(relative_label(now - Duration::hours(50), now), "2 days ago");
    }

    #[test]
    fn recent_codes_use_fixed_ages() {
        let labels: Vec<_> = sample_recent_codes(Utc::now())
            .into_iter()
            .map(|c| c.created_label)
            .collect();
        assert_eq!(labels, ["2 hours ago", "1 day ago", "2 days ago"]);
    }

    #[test]
    fn greeting_falls_back_through_name_email_user() {
        assert_eq!(greeting_name(Some(&user(Some("Ada"), Some("ada@x.io")))), "Ada");
        assert_eq!(greeting_name(Some(&user(None, Some("grace@x.io")))), "grace");
        assert_eq!(greeting_name(Some(&user(Some(""), None))), "User");
        assert_eq!(greeting_name(None), "User");
    }

    #[test]
    fn stats_are_sample_values() {
        let stats = sample_stats();
        assert_eq!(stats[1], StatCard { label: "Total Scans", value: "1,254" });
        assert_eq!(stats.len(), 4);
    }
}
