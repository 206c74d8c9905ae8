/// Domain models for SiteAdmin
///
/// Entities serialize in camelCase, which is the console's wire format.
/// Every `Create*`/`Update*` input deserializes with missing fields
/// defaulted; services reject blank required fields with a validation
/// error.
///
/// # Models
///
/// - `menu`: Navigation tree with role allow-lists
/// - `category`: Post category tree
/// - `board`: Boards, posts and comments
/// - `user`: Profiles, roles and login attempts
/// - `code`: Common code groups and codes
/// - `setting`: Site settings and their change history
/// - `notification`: Notifications and templates

pub mod board;
pub mod category;
pub mod code;
pub mod menu;
pub mod notification;
pub mod setting;
pub mod user;
