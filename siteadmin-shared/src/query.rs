//! Post listing engine
//!
//! Turns a board's raw post collection into one page of results:
//!
//! 1. keep posts of the board that are published
//! 2. keep posts whose lower-cased title or content contains the lower-cased
//!    search term (blank terms are ignored)
//! 3. pinned posts first, then newest first (stable)
//! 4. slice out the requested page
//!
//! `page` and `page_size` are clamped to at least 1 before slicing.

use serde::Serialize;

use crate::models::board::{Post, DEFAULT_POSTS_PER_PAGE};

/// Listing parameters as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: i64::from(DEFAULT_POSTS_PER_PAGE),
            search: None,
        }
    }
}

impl PostQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            search: None,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// 1-based page, at least 1
    pub fn page(&self) -> usize {
        usize::try_from(self.page.max(1)).unwrap_or(1)
    }

    /// Page size, at least 1
    pub fn page_size(&self) -> usize {
        usize::try_from(self.page_size.max(1)).unwrap_or(1)
    }

    /// Lower-cased search term, `None` when absent or empty
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Listing parameters before the board's defaults are known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
}

impl PostListParams {
    /// Fills in page 1 and the board's page size where unset
    pub fn into_query(self, default_page_size: u32) -> PostQuery {
        PostQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(i64::from(default_page_size)),
            search: self.search,
        }
    }
}

/// One page of results plus the pre-pagination total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// `ceil(total / page_size)`, 0 for an empty result
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }
}

/// Case-insensitive substring match over title and content
pub fn matches_search(post: &Post, needle_lowercase: &str) -> bool {
    post.title.to_lowercase().contains(needle_lowercase)
        || post.content.to_lowercase().contains(needle_lowercase)
}

/// Runs the filter, search, sort and slice pipeline over `posts`
pub fn find_posts<'a, I>(posts: I, board_id: &str, query: &PostQuery) -> Page<Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let needle = query.needle();

    let mut matching: Vec<&Post> = posts
        .into_iter()
        .filter(|post| post.board_id == board_id && post.is_published)
        .filter(|post| needle.as_deref().map_or(true, |n| matches_search(post, n)))
        .collect();

    matching.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let page = query.page();
    let page_size = query.page_size();
    let start = (page - 1).saturating_mul(page_size);

    Page {
        total: matching.len(),
        items: matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        page,
        page_size,
    }
}
