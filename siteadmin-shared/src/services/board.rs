/// Board service
///
/// Boards, posts and comments share one store so that cross-entity updates
/// (comment counters, cascading post deletes, view counts) happen under a
/// single write guard.
///
/// # Rules
///
/// - Slugs are unique across all boards; boards are only ever deactivated
/// - Posts can only be written to an active board whose `write` list
///   contains the author's role
/// - Only the author may update or delete a post or comment
/// - Deleting a post deletes its comments
/// - Deleting a comment replaces its content with a tombstone and decrements
///   the post's `comment_count`, never below zero
///
/// # Example
///
/// ```no_run
/// use siteadmin_shared::models::board::CreatePost;
/// use siteadmin_shared::query::PostQuery;
/// use siteadmin_shared::services::board::BoardService;
///
/// # async fn example() -> siteadmin_shared::ServiceResult<()> {
/// let boards = BoardService::seeded();
/// let input = CreatePost {
///     title: "Hello".to_string(),
///     content: "First post".to_string(),
///     ..Default::default()
/// };
/// boards.create_post("board-002", input, "user-002", Some("user")).await?;
///
/// let page = boards.find_posts("board-002", &PostQuery::default()).await?;
/// assert_eq!(page.total, 1);
/// # Ok(())
/// # }
/// ```
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::seed_time;
use crate::error::{ServiceError, ServiceResult};
use crate::models::board::{
    Board, BoardAction, BoardConfig, BoardPermissions, BoardType, Comment, CreateBoard,
    CreateComment, CreatePost, Post, UpdateBoard, UpdateComment, UpdatePost,
    DELETED_COMMENT_CONTENT,
};
use crate::query::{self, Page, PostListParams, PostQuery};
use crate::repository::Repository;

#[derive(Debug, Default)]
struct BoardStore {
    boards: Vec<Board>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl BoardStore {
    fn board(&self, id: &str) -> ServiceResult<&Board> {
        self.boards
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| ServiceError::not_found("Board", id))
    }

    fn ensure_slug_free(&self, slug: &str, except_id: Option<&str>) -> ServiceResult<()> {
        let taken = self
            .boards
            .iter()
            .any(|b| b.slug == slug && Some(b.id.as_str()) != except_id);
        if taken {
            return Err(ServiceError::Conflict(format!(
                "Board slug already in use: {}",
                slug
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct BoardService {
    store: RwLock<BoardStore>,
}

impl BoardService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with the notice, free and Q&A boards and no posts
    pub fn seeded() -> Self {
        Self {
            store: RwLock::new(BoardStore {
                boards: seed_boards(),
                ..Default::default()
            }),
        }
    }

    pub async fn find_board_by_slug(&self, slug: &str) -> Option<Board> {
        self.store
            .read()
            .await
            .boards
            .iter()
            .find(|b| b.slug == slug)
            .cloned()
    }

    // ===== Posts =====

    /// One page of a board's published posts
    ///
    /// # Errors
    ///
    /// `NotFound` when the board does not exist
    pub async fn find_posts(&self, board_id: &str, query: &PostQuery) -> ServiceResult<Page<Post>> {
        let store = self.store.read().await;
        store.board(board_id)?;
        Ok(query::find_posts(&store.posts, board_id, query))
    }

    /// Like [`find_posts`](Self::find_posts), using the board's
    /// `posts_per_page` when no page size is given
    pub async fn list_posts(&self, board_id: &str, params: PostListParams) -> ServiceResult<Page<Post>> {
        let store = self.store.read().await;
        let board = store.board(board_id)?;
        let query = params.into_query(board.config.posts_per_page);
        Ok(query::find_posts(&store.posts, board_id, &query))
    }

    /// Fetches a post and counts the read
    ///
    /// Every call increments `view_count` by one.
    pub async fn find_post_by_id(&self, id: &str) -> Option<Post> {
        let mut store = self.store.write().await;
        let post = store.posts.iter_mut().find(|p| p.id == id)?;
        post.view_count += 1;
        Some(post.clone())
    }

    /// Creates a post on an active board
    ///
    /// When `role` is given it must be in the board's `write` list. Boards
    /// that require approval get unpublished posts.
    ///
    /// # Errors
    ///
    /// - `NotFound` for a missing or inactive board
    /// - `Forbidden` when the role may not write
    pub async fn create_post(
        &self,
        board_id: &str,
        input: CreatePost,
        author_id: &str,
        role: Option<&str>,
    ) -> ServiceResult<Post> {
        let mut store = self.store.write().await;
        let board = store.board(board_id)?;
        if !board.is_active {
            return Err(ServiceError::not_found("Board", board_id));
        }
        if let Some(role) = role {
            if !board.config.permissions.allows(BoardAction::Write, role) {
                return Err(ServiceError::Forbidden(format!(
                    "Role '{}' may not write to this board",
                    role
                )));
            }
        }
        let published = !board.config.require_approval;

        let now = Utc::now();
        let post = Post {
            id: crate::new_id(),
            board_id: board_id.to_string(),
            title: input.title,
            content: input.content,
            author_id: author_id.to_string(),
            category: input.category,
            tags: input.tags,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            is_pinned: false,
            is_published: published,
            published_at: published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        store.posts.push(post.clone());

        tracing::info!(post_id = %post.id, board_id, author_id, published, "Post created");
        Ok(post)
    }

    /// Author-only partial update; `Ok(None)` when the post does not exist
    pub async fn update_post(
        &self,
        id: &str,
        input: UpdatePost,
        user_id: &str,
    ) -> ServiceResult<Option<Post>> {
        let mut store = self.store.write().await;
        let Some(post) = store.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if post.author_id != user_id {
            tracing::warn!(post_id = %id, user_id, "Rejected post update by non-author");
            return Err(ServiceError::Forbidden(
                "Only the author can edit this post".to_string(),
            ));
        }

        let now = Utc::now();
        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(category) = input.category {
            post.category = Some(category);
        }
        if let Some(tags) = input.tags {
            post.tags = tags;
        }
        if let Some(pinned) = input.is_pinned {
            post.is_pinned = pinned;
        }
        match input.is_published {
            Some(true) if !post.is_published => {
                post.is_published = true;
                post.published_at = Some(now);
            }
            Some(false) => {
                post.is_published = false;
                post.published_at = None;
            }
            _ => {}
        }
        post.updated_at = now;

        Ok(Some(post.clone()))
    }

    /// Author-only delete that also removes the post's comments
    pub async fn delete_post(&self, id: &str, user_id: &str) -> ServiceResult<bool> {
        let mut store = self.store.write().await;
        let Some(index) = store.posts.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        if store.posts[index].author_id != user_id {
            tracing::warn!(post_id = %id, user_id, "Rejected post delete by non-author");
            return Err(ServiceError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        store.posts.remove(index);
        let before = store.comments.len();
        store.comments.retain(|c| c.post_id != id);
        let removed_comments = before - store.comments.len();

        tracing::info!(post_id = %id, removed_comments, "Post deleted");
        Ok(true)
    }

    // ===== Comments =====

    /// Live comments of a post, oldest first
    pub async fn find_comments(&self, post_id: &str) -> ServiceResult<Vec<Comment>> {
        let store = self.store.read().await;
        if !store.posts.iter().any(|p| p.id == post_id) {
            return Err(ServiceError::not_found("Post", post_id));
        }

        let mut comments: Vec<Comment> = store
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && !c.is_deleted)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    /// Adds a comment and bumps the post's `comment_count`
    ///
    /// # Errors
    ///
    /// - `Validation` for a parent on another post
    /// - `NotFound` for a missing post
    /// - `Forbidden` when the board has comments turned off
    pub async fn create_comment(
        &self,
        post_id: &str,
        input: CreateComment,
        author_id: &str,
    ) -> ServiceResult<Comment> {
        let mut store = self.store.write().await;
        let board_id = store
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.board_id.clone())
            .ok_or_else(|| ServiceError::not_found("Post", post_id))?;
        if !store.board(&board_id)?.config.allow_comments {
            return Err(ServiceError::Forbidden(
                "Comments are disabled on this board".to_string(),
            ));
        }
        if let Some(parent_id) = &input.parent_id {
            let parent_ok = store
                .comments
                .iter()
                .any(|c| &c.id == parent_id && c.post_id == post_id);
            if !parent_ok {
                return Err(ServiceError::Validation(format!(
                    "Parent comment not found on this post: {}",
                    parent_id
                )));
            }
        }

        let now = Utc::now();
        let comment = Comment {
            id: crate::new_id(),
            post_id: post_id.to_string(),
            author_id: author_id.to_string(),
            content: input.content,
            parent_id: input.parent_id,
            like_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        store.comments.push(comment.clone());
        if let Some(post) = store.posts.iter_mut().find(|p| p.id == post_id) {
            post.comment_count += 1;
        }

        tracing::debug!(comment_id = %comment.id, post_id, "Comment created");
        Ok(comment)
    }

    /// Author-only content edit; deleted comments count as missing
    pub async fn update_comment(
        &self,
        id: &str,
        input: UpdateComment,
        user_id: &str,
    ) -> ServiceResult<Option<Comment>> {
        let mut store = self.store.write().await;
        let Some(comment) = store
            .comments
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted)
        else {
            return Ok(None);
        };
        if comment.author_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the author can edit this comment".to_string(),
            ));
        }

        comment.content = input.content;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    /// Author-only soft delete
    ///
    /// Deleting an already deleted comment succeeds without touching the
    /// post's counter again.
    pub async fn delete_comment(&self, id: &str, user_id: &str) -> ServiceResult<bool> {
        let mut store = self.store.write().await;
        let Some(comment) = store.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if comment.author_id != user_id {
            return Err(ServiceError::Forbidden(
                "Only the author can delete this comment".to_string(),
            ));
        }
        if comment.is_deleted {
            return Ok(true);
        }

        comment.is_deleted = true;
        comment.content = DELETED_COMMENT_CONTENT.to_string();
        comment.updated_at = Utc::now();
        let post_id = comment.post_id.clone();

        if let Some(post) = store.posts.iter_mut().find(|p| p.id == post_id) {
            post.comment_count = post.comment_count.saturating_sub(1);
        }

        tracing::debug!(comment_id = %id, post_id = %post_id, "Comment deleted");
        Ok(true)
    }
}

#[async_trait]
impl Repository<Board, CreateBoard, UpdateBoard> for BoardService {
    /// Active boards only
    async fn list(&self) -> ServiceResult<Vec<Board>> {
        Ok(self
            .store
            .read()
            .await
            .boards
            .iter()
            .filter(|b| b.is_active)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> ServiceResult<Option<Board>> {
        Ok(self.store.read().await.board(id).ok().cloned())
    }

    async fn create(&self, input: CreateBoard) -> ServiceResult<Board> {
        let mut store = self.store.write().await;
        store.ensure_slug_free(&input.slug, None)?;

        let mut config = BoardConfig::default();
        if let Some(patch) = input.config {
            config.apply(patch);
        }

        let now = Utc::now();
        let board = Board {
            id: crate::new_id(),
            name: input.name,
            slug: input.slug,
            description: input.description,
            board_type: input.board_type,
            config,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        store.boards.push(board.clone());

        tracing::info!(board_id = %board.id, slug = %board.slug, "Board created");
        Ok(board)
    }

    async fn update(&self, id: &str, input: UpdateBoard) -> ServiceResult<Option<Board>> {
        let mut store = self.store.write().await;
        if store.board(id).is_err() {
            return Ok(None);
        }
        if let Some(slug) = &input.slug {
            store.ensure_slug_free(slug, Some(id))?;
        }

        let Some(board) = store.boards.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            board.name = name;
        }
        if let Some(slug) = input.slug {
            board.slug = slug;
        }
        if let Some(description) = input.description {
            board.description = Some(description);
        }
        if let Some(board_type) = input.board_type {
            board.board_type = board_type;
        }
        if let Some(patch) = input.config {
            board.config.apply(patch);
        }
        if let Some(is_active) = input.is_active {
            board.is_active = is_active;
        }
        board.updated_at = Utc::now();

        Ok(Some(board.clone()))
    }

    /// Deactivates the board; its posts stay in place
    async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let mut store = self.store.write().await;
        let Some(board) = store.boards.iter_mut().find(|b| b.id == id) else {
            return Ok(false);
        };
        board.is_active = false;
        board.updated_at = Utc::now();

        tracing::info!(board_id = %id, "Board deactivated");
        Ok(true)
    }
}

/// Fixture boards: notice (admin-only writes, no comments), free and Q&A
pub fn seed_boards() -> Vec<Board> {
    let board = |id: &str, name: &str, slug: &str, board_type: BoardType| Board {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        board_type,
        config: BoardConfig::default(),
        is_active: true,
        created_at: seed_time(),
        updated_at: seed_time(),
    };

    let mut notice = board("board-001", "Notices", "notice", BoardType::Notice);
    notice.description = Some("Announcements from the administrators".to_string());
    notice.config.allow_comments = false;
    notice.config.permissions = BoardPermissions {
        write: vec!["admin".to_string()],
        ..BoardPermissions::default()
    };

    let mut free = board("board-002", "Free Board", "free", BoardType::General);
    free.description = Some("Open discussion".to_string());

    let mut qna = board("board-003", "Q&A", "qna", BoardType::Qna);
    qna.description = Some("Questions and answers".to_string());

    vec![notice, free, qna]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const AUTHOR: &str = "user-002";
    const OTHER: &str = "user-001";

    fn post_input(title: &str) -> CreatePost {
        CreatePost {
            title: title.to_string(),
            content: format!("{} content", title),
            ..Default::default()
        }
    }

    fn comment_input(content: &str) -> CreateComment {
        CreateComment {
            content: content.to_string(),
            parent_id: None,
        }
    }

    async fn service_with_post() -> (BoardService, Post) {
        let service = BoardService::seeded();
        let post = service
            .create_post("board-002", post_input("Hello"), AUTHOR, Some("user"))
            .await
            .unwrap();
        (service, post)
    }

    #[tokio::test]
    async fn test_view_count_increments_per_read() {
        let (service, post) = service_with_post().await;

        for expected in 1..=5 {
            let read = service.find_post_by_id(&post.id).await.unwrap();
            assert_eq!(read.view_count, expected);
        }
        assert!(service.find_post_by_id("missing").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_count_every_view() {
        let (service, post) = service_with_post().await;
        let service = std::sync::Arc::new(service);

        let readers: Vec<_> = (0..50)
            .map(|_| {
                let service = service.clone();
                let id = post.id.clone();
                tokio::spawn(async move { service.find_post_by_id(&id).await })
            })
            .collect();
        for reader in readers {
            assert!(reader.await.unwrap().is_some());
        }

        let read = service.find_post_by_id(&post.id).await.unwrap();
        assert_eq!(read.view_count, 51);
    }

    #[tokio::test]
    async fn test_find_posts_unknown_board() {
        let service = BoardService::seeded();
        let err = service
            .find_posts("board-404", &PostQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_posts_uses_board_page_size() {
        let service = BoardService::seeded();
        service
            .update(
                "board-002",
                UpdateBoard {
                    config: Some(crate::models::board::BoardConfigPatch {
                        posts_per_page: Some(2),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        for i in 0..5 {
            service
                .create_post("board-002", post_input(&format!("P{}", i)), AUTHOR, None)
                .await
                .unwrap();
        }

        let page = service
            .list_posts("board-002", PostListParams::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_create_post_checks_write_permission() {
        let service = BoardService::seeded();

        let err = service
            .create_post("board-001", post_input("Notice"), AUTHOR, Some("user"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        assert!(service
            .create_post("board-001", post_input("Notice"), OTHER, Some("admin"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_post_on_inactive_board_fails() {
        let service = BoardService::seeded();
        service.delete("board-003").await.unwrap();

        let err = service
            .create_post("board-003", post_input("Q"), AUTHOR, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_require_approval_hides_new_posts() {
        let service = BoardService::seeded();
        let board = service
            .create(CreateBoard {
                name: "Moderated".to_string(),
                slug: "moderated".to_string(),
                config: Some(crate::models::board::BoardConfigPatch {
                    require_approval: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        let post = service
            .create_post(&board.id, post_input("Pending"), AUTHOR, None)
            .await
            .unwrap();
        assert!(!post.is_published);
        assert!(post.published_at.is_none());

        let page = service.find_posts(&board.id, &PostQuery::default()).await.unwrap();
        assert_eq!(page.total, 0);

        let published = service
            .update_post(
                &post.id,
                UpdatePost {
                    is_published: Some(true),
                    ..Default::default()
                },
                AUTHOR,
            )
            .await
            .unwrap()
            .unwrap();
        assert!(published.published_at.is_some());
        let page = service.find_posts(&board.id, &PostQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_only_author_can_update_or_delete_post() {
        let (service, post) = service_with_post().await;
        let edit = || UpdatePost {
            title: Some("Edited".to_string()),
            ..Default::default()
        };

        let err = service.update_post(&post.id, edit(), OTHER).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let err = service.delete_post(&post.id, OTHER).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = service.update_post(&post.id, edit(), AUTHOR).await.unwrap().unwrap();
        assert_eq!(updated.title, "Edited");
        assert!(service.delete_post(&post.id, AUTHOR).await.unwrap());
        assert!(!service.delete_post(&post.id, AUTHOR).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let (service, post) = service_with_post().await;
        for i in 0..3 {
            service
                .create_comment(&post.id, comment_input(&format!("c{}", i)), OTHER)
                .await
                .unwrap();
        }

        service.delete_post(&post.id, AUTHOR).await.unwrap();

        let store = service.store.read().await;
        assert!(store.comments.iter().all(|c| c.post_id != post.id));
    }

    #[tokio::test]
    async fn test_comment_count_tracks_live_comments_and_floors_at_zero() {
        let (service, post) = service_with_post().await;
        let first = service.create_comment(&post.id, comment_input("a"), OTHER).await.unwrap();
        let second = service.create_comment(&post.id, comment_input("b"), OTHER).await.unwrap();
        assert_eq!(service.find_post_by_id(&post.id).await.unwrap().comment_count, 2);

        service.delete_comment(&first.id, OTHER).await.unwrap();
        service.delete_comment(&first.id, OTHER).await.unwrap();
        assert_eq!(service.find_post_by_id(&post.id).await.unwrap().comment_count, 1);

        // Drift the counter below the live total, then delete past it.
        service.store.write().await.posts[0].comment_count = 0;
        service.delete_comment(&second.id, OTHER).await.unwrap();
        assert_eq!(service.find_post_by_id(&post.id).await.unwrap().comment_count, 0);
    }

    #[tokio::test]
    async fn test_deleted_comment_is_tombstoned_and_hidden() {
        let (service, post) = service_with_post().await;
        let comment = service.create_comment(&post.id, comment_input("bye"), OTHER).await.unwrap();

        let err = service.delete_comment(&comment.id, AUTHOR).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        service.delete_comment(&comment.id, OTHER).await.unwrap();
        assert!(service.find_comments(&post.id).await.unwrap().is_empty());

        let store = service.store.read().await;
        let stored = store.comments.iter().find(|c| c.id == comment.id).unwrap();
        assert!(stored.is_deleted);
        assert_eq!(stored.content, DELETED_COMMENT_CONTENT);
    }

    #[tokio::test]
    async fn test_comments_listed_oldest_first() {
        let (service, post) = service_with_post().await;
        let a = service.create_comment(&post.id, comment_input("a"), OTHER).await.unwrap();
        let b = service.create_comment(&post.id, comment_input("b"), OTHER).await.unwrap();
        {
            let mut store = service.store.write().await;
            let stored = store.comments.iter_mut().find(|c| c.id == b.id).unwrap();
            stored.created_at = a.created_at - Duration::seconds(10);
        }

        let listed = service.find_comments(&post.id).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
    }

    #[tokio::test]
    async fn test_comments_disabled_board() {
        let service = BoardService::seeded();
        let notice = service
            .create_post("board-001", post_input("Notice"), OTHER, Some("admin"))
            .await
            .unwrap();

        let err = service
            .create_comment(&notice.id, comment_input("hi"), AUTHOR)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_reply_parent_must_be_on_same_post() {
        let (service, post) = service_with_post().await;
        let root = service.create_comment(&post.id, comment_input("root"), OTHER).await.unwrap();

        let reply = service
            .create_comment(
                &post.id,
                CreateComment {
                    content: "reply".to_string(),
                    parent_id: Some(root.id.clone()),
                },
                AUTHOR,
            )
            .await
            .unwrap();
        assert_eq!(reply.parent_id, Some(root.id));

        let err = service
            .create_comment(
                &post.id,
                CreateComment {
                    content: "reply".to_string(),
                    parent_id: Some("missing".to_string()),
                },
                AUTHOR,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_board_slug_is_unique() {
        let service = BoardService::seeded();
        let err = service
            .create(CreateBoard {
                name: "Another free".to_string(),
                slug: "free".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = service
            .update(
                "board-003",
                UpdateBoard {
                    slug: Some("notice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Keeping its own slug is fine.
        assert!(service
            .update(
                "board-003",
                UpdateBoard {
                    slug: Some("qna".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_board_soft_delete_and_slug_lookup() {
        let service = BoardService::seeded();
        assert!(service.delete("board-002").await.unwrap());

        let active: Vec<String> = service.list().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(active, vec!["board-001", "board-003"]);

        let board = service.find_board_by_slug("free").await.unwrap();
        assert!(!board.is_active);
        assert!(service.get("board-002").await.unwrap().is_some());
        assert!(!service.delete("board-404").await.unwrap());
    }
}
