/// Middleware and request extractors
///
/// - `security`: security response headers
/// - `session`: session extraction from cookies or a Bearer header

pub mod security;
pub mod session;
