/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use siteadmin_api::{app::{build_router, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config)?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use siteadmin_shared::{
    services::{
        auth::AuthService, board::BoardService, category::CategoryService,
        common_code::CommonCodeService, menu::MenuService, notification::NotificationService,
        settings::SettingsService,
    },
    ServiceResult,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every service sits
/// behind an `Arc` and owns its own store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    pub auth: Arc<AuthService>,
    pub menus: Arc<MenuService>,
    pub categories: Arc<CategoryService>,
    pub boards: Arc<BoardService>,
    pub codes: Arc<CommonCodeService>,
    pub settings: Arc<SettingsService>,
    pub notifications: Arc<NotificationService>,
}

impl AppState {
    /// Creates state with every service seeded with fixture data
    ///
    /// # Errors
    ///
    /// Fails if the fixture account passwords cannot be hashed
    pub fn new(config: Config) -> ServiceResult<Self> {
        let auth = AuthService::seeded(config.auth_options())?;

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            menus: Arc::new(MenuService::seeded()),
            categories: Arc::new(CategoryService::seeded()),
            boards: Arc::new(BoardService::seeded()),
            codes: Arc::new(CommonCodeService::seeded()),
            settings: Arc::new(SettingsService::seeded()),
            notifications: Arc::new(NotificationService::seeded()),
        })
    }

    /// Whether cookies should carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.is_production()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health
/// ├── /auth/                 login, logout, me, refresh, password-reset
/// ├── /menus/                tree CRUD, ?flat / ?role, PUT /reorder
/// ├── /categories/           tree CRUD, ?flat
/// ├── /boards/               board CRUD, /slug/:slug, /:id/posts
/// ├── /posts/:id             read, update, delete, /comments
/// ├── /comments/:id          update, delete
/// ├── /code-groups/          group CRUD, /:id/codes
/// ├── /codes/:group_code     active codes of a group
/// ├── /settings/             list, site-config, history, /:key
/// └── /notifications/        per-user inbox (session required)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. Compression (gzip, brotli)
/// 3. CORS
/// 4. Security headers
///
/// Session checks happen per handler through the
/// [`Session`](crate::middleware::session::Session) extractor.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/refresh", post(routes::auth::refresh))
        .route("/password-reset", post(routes::auth::password_reset));

    let menu_routes = Router::new()
        .route("/", get(routes::menus::list_menus).post(routes::menus::create_menu))
        .route("/reorder", put(routes::menus::reorder_menus))
        .route(
            "/:id",
            get(routes::menus::get_menu)
                .put(routes::menus::update_menu)
                .delete(routes::menus::delete_menu),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/:id",
            get(routes::categories::get_category)
                .put(routes::categories::update_category)
                .delete(routes::categories::delete_category),
        );

    let board_routes = Router::new()
        .route("/", get(routes::boards::list_boards).post(routes::boards::create_board))
        .route("/slug/:slug", get(routes::boards::get_board_by_slug))
        .route(
            "/:id",
            get(routes::boards::get_board)
                .put(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route(
            "/:id/posts",
            get(routes::posts::list_posts).post(routes::posts::create_post),
        );

    let post_routes = Router::new()
        .route(
            "/:id",
            get(routes::posts::get_post)
                .put(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        )
        .route(
            "/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        );

    let comment_routes = Router::new().route(
        "/:id",
        put(routes::comments::update_comment).delete(routes::comments::delete_comment),
    );

    let code_group_routes = Router::new()
        .route(
            "/",
            get(routes::codes::list_groups).post(routes::codes::create_group),
        )
        .route(
            "/:id",
            get(routes::codes::get_group)
                .put(routes::codes::update_group)
                .delete(routes::codes::delete_group),
        )
        .route("/:id/codes", post(routes::codes::add_code))
        .route("/:id/codes/:code_id", delete(routes::codes::delete_code));

    let settings_routes = Router::new()
        .route("/", get(routes::settings::list_settings))
        .route("/site-config", get(routes::settings::site_config))
        .route("/history", get(routes::settings::history))
        .route(
            "/:key",
            get(routes::settings::get_setting).put(routes::settings::update_setting),
        );

    let notification_routes = Router::new()
        .route(
            "/",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification),
        )
        .route("/unread-count", get(routes::notifications::unread_count))
        .route("/read-all", put(routes::notifications::mark_all_read))
        .route("/templates", get(routes::notifications::list_templates))
        .route("/send-template", post(routes::notifications::send_template))
        .route("/:id", delete(routes::notifications::delete_notification))
        .route("/:id/read", put(routes::notifications::mark_read));

    let cors = cors_layer(&state.config);
    let enable_hsts = state.config.is_production();

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/menus", menu_routes)
        .nest("/categories", category_routes)
        .nest("/boards", board_routes)
        .nest("/posts", post_routes)
        .nest("/comments", comment_routes)
        .nest("/code-groups", code_group_routes)
        .route("/codes/:group_code", get(routes::codes::codes_by_group))
        .nest("/settings", settings_routes)
        .nest("/notifications", notification_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(enable_hsts))
        .with_state(state)
}

/// Permissive CORS for `*`, otherwise the configured origins with credentials
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
