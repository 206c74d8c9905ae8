/// Boards, posts and comments
///
/// A board owns its posts and carries the policy that governs them
/// (comments, attachments, approval, per-action role allow-lists). Posts
/// own their comments; removing a post removes its comments.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Board kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardType {
    #[default]
    General,
    Notice,
    Qna,
    Gallery,
    Faq,
}

/// Action a board allow-list governs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    Read,
    Write,
    Delete,
    Admin,
}

/// Role allow-lists per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardPermissions {
    pub read: Vec<String>,
    pub write: Vec<String>,
    pub delete: Vec<String>,
    pub admin: Vec<String>,
}

impl Default for BoardPermissions {
    fn default() -> Self {
        let roles = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            read: roles(&["user", "admin"]),
            write: roles(&["user", "admin"]),
            delete: roles(&["admin"]),
            admin: roles(&["admin"]),
        }
    }
}

impl BoardPermissions {
    /// Whether `role` is listed for `action`
    pub fn allows(&self, action: BoardAction, role: &str) -> bool {
        let list = match action {
            BoardAction::Read => &self.read,
            BoardAction::Write => &self.write,
            BoardAction::Delete => &self.delete,
            BoardAction::Admin => &self.admin,
        };
        list.iter().any(|allowed| allowed == role)
    }
}

/// Default upload limit: 10 MiB
pub const DEFAULT_MAX_ATTACHMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Default page size for post listings
pub const DEFAULT_POSTS_PER_PAGE: u32 = 20;

/// Per-board policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub allow_comments: bool,
    pub allow_attachments: bool,

    /// Bytes
    pub max_attachment_size: u64,

    pub allowed_file_types: Vec<String>,
    pub require_approval: bool,
    pub posts_per_page: u32,
    pub permissions: BoardPermissions,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            allow_comments: true,
            allow_attachments: true,
            max_attachment_size: DEFAULT_MAX_ATTACHMENT_SIZE,
            allowed_file_types: ["jpg", "jpeg", "png", "gif", "pdf", "doc", "docx", "xls", "xlsx"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            require_approval: false,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            permissions: BoardPermissions::default(),
        }
    }
}

impl BoardConfig {
    /// Overwrites every field the patch sets
    ///
    /// `permissions` is replaced as a whole when present.
    pub fn apply(&mut self, patch: BoardConfigPatch) {
        if let Some(v) = patch.allow_comments {
            self.allow_comments = v;
        }
        if let Some(v) = patch.allow_attachments {
            self.allow_attachments = v;
        }
        if let Some(v) = patch.max_attachment_size {
            self.max_attachment_size = v;
        }
        if let Some(v) = patch.allowed_file_types {
            self.allowed_file_types = v;
        }
        if let Some(v) = patch.require_approval {
            self.require_approval = v;
        }
        if let Some(v) = patch.posts_per_page {
            self.posts_per_page = v;
        }
        if let Some(v) = patch.permissions {
            self.permissions = v;
        }
    }
}

/// Partial board config as accepted on create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfigPatch {
    pub allow_comments: Option<bool>,
    pub allow_attachments: Option<bool>,
    pub max_attachment_size: Option<u64>,
    pub allowed_file_types: Option<Vec<String>>,
    pub require_approval: Option<bool>,
    pub posts_per_page: Option<u32>,
    pub permissions: Option<BoardPermissions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,

    /// Unique across all boards, active or not
    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub board_type: BoardType,
    pub config: BoardConfig,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBoard {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub board_type: BoardType,
    pub config: Option<BoardConfigPatch>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBoard {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub board_type: Option<BoardType>,
    pub config: Option<BoardConfigPatch>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub board_id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    /// Incremented on every single-post read
    pub view_count: u64,

    pub like_count: u64,

    /// Live (not deleted) comments
    pub comment_count: u64,

    pub is_pinned: bool,
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePost {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePost {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub is_published: Option<bool>,
}

/// Content shown in place of a deleted comment
pub const DELETED_COMMENT_CONTENT: &str = "This comment has been deleted.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,

    /// Comment being replied to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub like_count: u64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateComment {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert!(config.allow_comments);
        assert_eq!(config.max_attachment_size, 10_485_760);
        assert_eq!(config.posts_per_page, 20);
        assert_eq!(config.allowed_file_types.len(), 9);
        assert!(config.permissions.allows(BoardAction::Write, "user"));
        assert!(!config.permissions.allows(BoardAction::Delete, "user"));
        assert!(config.permissions.allows(BoardAction::Admin, "admin"));
    }

    #[test]
    fn test_apply_patch_overrides_only_given_fields() {
        let mut config = BoardConfig::default();
        config.apply(BoardConfigPatch {
            allow_comments: Some(false),
            posts_per_page: Some(5),
            ..Default::default()
        });

        assert!(!config.allow_comments);
        assert_eq!(config.posts_per_page, 5);
        assert!(config.allow_attachments);
        assert_eq!(config.permissions, BoardPermissions::default());
    }

    #[test]
    fn test_board_type_wire_names() {
        let json = serde_json::to_string(&BoardType::Qna).unwrap();
        assert_eq!(json, "\"qna\"");

        let input: CreateBoard =
            serde_json::from_str(r#"{"name":"FAQ","slug":"faq","type":"faq"}"#).unwrap();
        assert_eq!(input.board_type, BoardType::Faq);
        assert!(input.config.is_none());
    }

    #[test]
    fn test_post_and_comment_inputs_require_text() {
        let post = CreatePost {
            title: "Hello".to_string(),
            ..Default::default()
        };
        let errors = post.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("content"));

        assert!(UpdateComment::default().validate().is_err());
        assert!(UpdatePost::default().validate().is_ok());
    }
}
