/// Business services, one per console module
///
/// Each service owns its store behind a single `tokio::sync::RwLock`, is
/// constructed once (empty with `new`, or with fixtures via `seeded`) and
/// shared through `Arc`. Read-modify-write sequences happen under one write
/// guard so they stay atomic across concurrent requests.
///
/// # Services
///
/// - [`menu::MenuService`]: navigation tree, role views, reordering
/// - [`category::CategoryService`]: category tree with soft deletes
/// - [`board::BoardService`]: boards, posts and comments
/// - [`auth::AuthService`]: login with lockout, sessions
/// - [`common_code::CommonCodeService`]: lookup code groups
/// - [`settings::SettingsService`]: site settings with history
/// - [`notification::NotificationService`]: per-user notifications
use chrono::{DateTime, Utc};

pub mod auth;
pub mod board;
pub mod category;
pub mod common_code;
pub mod menu;
pub mod notification;
pub mod settings;

/// Creation timestamp used by fixture records (2025-01-01T00:00:00Z)
pub(crate) fn seed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
}
