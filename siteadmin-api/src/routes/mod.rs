/// API route handlers
///
/// Handlers only translate between HTTP and one service call; every rule
/// lives in the services.
///
/// - `health`: Health check endpoint
/// - `auth`: Login, logout, session inspection and refresh
/// - `menus`, `categories`: Tree resources
/// - `boards`, `posts`, `comments`: Boards and their content
/// - `codes`: Common code groups
/// - `settings`: Site settings and history
/// - `notifications`: Per-user notifications

pub mod auth;
pub mod boards;
pub mod categories;
pub mod codes;
pub mod comments;
pub mod health;
pub mod menus;
pub mod notifications;
pub mod posts;
pub mod settings;
