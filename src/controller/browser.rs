use std::sync::Arc;
use std::time::Instant;

use crate::api::error::{ApiError, ApiResult};
use crate::api::movies::CatalogApi;
use crate::controller::debounce::Debouncer;
use crate::controller::query::CatalogQuery;
use crate::controller::speculative::Speculation;
use crate::models::{Genre, Movie, MovieListResponse, Pagination};
use crate::services::{Access, AccessPolicy, SessionStore};

/// 一页已加载的目录内容
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    pub movies: Vec<Movie>,
    pub pagination: Pagination,
}

/// 视图状态机：Idle → Loading → { Loaded | Errored }
///
/// 分类切换、提交搜索、翻页、删除后重查都会重新进入 Loading。
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Loaded(CatalogPage),
    Errored { message: String },
}

/// 渲染层看到的展示状态
///
/// 空结果（NoResults）和网络失败（Error）是两种不同的界面。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    Loading,
    Cards,
    NoResults,
    Error,
}

/// 一次在途列表查询的凭据
///
/// 每次发起查询序号递增，结果回填时校验序号：
/// 已有更新查询发出的过期结果直接丢弃（last-writer-wins）。
#[derive(Debug, Clone)]
pub struct FetchTicket {
    seq: u64,
    query: CatalogQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }
}

/// 一次在途的乐观删除
#[derive(Debug)]
pub struct PendingDelete {
    movie_id: i64,
    speculation: Speculation<DeleteSnapshot>,
    /// 删除的是 >1 页的最后一条，已预先翻回上一页，确认后需要重查
    pub needs_refetch: bool,
}

impl PendingDelete {
    pub fn movie_id(&self) -> i64 {
        self.movie_id
    }
}

#[derive(Debug, Clone)]
struct DeleteSnapshot {
    page: CatalogPage,
    query: CatalogQuery,
}

/// 目录浏览控制器
///
/// 把用户意图（选分类、搜索、翻页、删除）解析成后端查询，
/// 并把结果与可见状态对账：地址栏同步、过期结果丢弃、
/// 乐观删除失败回滚。所有失败都收敛为本地错误状态，
/// 绝不越过自身边界向外抛。
pub struct CatalogBrowser {
    api: Arc<dyn CatalogApi>,
    session: SessionStore,
    policy: AccessPolicy,
    query: CatalogQuery,
    search_input: String,
    debouncer: Debouncer,
    view: ViewState,
    /// 最近一次发出的查询序号
    issued_seq: u64,
    /// 视图代号：每次应用新状态递增，回滚判定依赖它
    generation: u64,
    toast: Option<String>,
}

impl CatalogBrowser {
    /// 挂载：从地址栏查询串播种状态
    pub fn mount(
        api: Arc<dyn CatalogApi>,
        session: SessionStore,
        policy: AccessPolicy,
        url_query: &str,
    ) -> Self {
        let query = CatalogQuery::from_query_string(url_query);
        let search_input = query.search.clone();
        Self {
            api,
            session,
            policy,
            query,
            search_input,
            debouncer: Debouncer::default(),
            view: ViewState::Idle,
            issued_seq: 0,
            generation: 0,
            toast: None,
        }
    }

    /// 替换防抖配置（默认 500ms 窗口）
    pub fn with_debouncer(mut self, debouncer: Debouncer) -> Self {
        self.debouncer = debouncer;
        self
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// 地址栏应当呈现的查询串；状态一变即同步
    pub fn location_query(&self) -> String {
        self.query.to_query_string()
    }

    pub fn display(&self) -> DisplayState {
        match &self.view {
            ViewState::Idle => DisplayState::Idle,
            ViewState::Loading => DisplayState::Loading,
            ViewState::Loaded(page) if page.movies.is_empty() => DisplayState::NoResults,
            ViewState::Loaded(_) => DisplayState::Cards,
            ViewState::Errored { .. } => DisplayState::Error,
        }
    }

    pub fn page(&self) -> Option<&CatalogPage> {
        match &self.view {
            ViewState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.view {
            ViewState::Errored { message } => Some(message),
            _ => None,
        }
    }

    /// 取走一次性的提示消息（toast）
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }

    // ------ 查询生命周期（拆分式接口，异步便捷方法见下） ------

    /// 发起查询：序号递增，视图进入 Loading
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.view = ViewState::Loading;
        FetchTicket {
            seq: self.issued_seq,
            query: self.query.clone(),
        }
    }

    /// 回填查询结果；过期凭据的结果不应用
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ApiResult<MovieListResponse>) {
        if ticket.seq < self.issued_seq {
            tracing::debug!(
                "Discarding stale fetch result (seq {} < {})",
                ticket.seq,
                self.issued_seq
            );
            return;
        }
        self.generation += 1;
        match result {
            Ok(resp) => {
                let pagination = resp.resolve_pagination(ticket.query.page);
                self.view = ViewState::Loaded(CatalogPage {
                    movies: resp.movies,
                    pagination,
                });
            }
            Err(e) => {
                tracing::warn!("Catalog query failed: {}", e);
                self.view = ViewState::Errored {
                    message: e.user_message(),
                };
            }
        }
    }

    async fn refresh(&mut self) {
        let api = Arc::clone(&self.api);
        let ticket = self.begin_fetch();
        let result = api.list_movies(ticket.query()).await;
        self.apply_fetch(ticket, result);
    }

    /// 挂载后的首次查询
    pub async fn load(&mut self) {
        self.refresh().await;
    }

    /// 错误状态下的重试：用当前三元组原样重查
    pub async fn retry(&mut self) {
        self.refresh().await;
    }

    // ------ 用户操作 ------

    /// 选择分类：页码归 1、清掉在途防抖、同步地址栏、立即查询
    pub async fn select_genre(&mut self, genre: Genre) {
        self.debouncer.cancel();
        self.query.genre = genre;
        self.query.page = 1;
        self.refresh().await;
    }

    /// 每次键入：可见文本立即更新，查询按防抖窗口延迟
    pub fn input_search(&mut self, text: &str, now: Instant) {
        self.search_input = text.to_string();
        self.debouncer.press(text, now);
    }

    /// 驱动层在防抖截止时刻调用；窗口未满则什么都不做
    pub async fn tick(&mut self, now: Instant) {
        if let Some(text) = self.debouncer.try_fire(now) {
            self.commit_search(text).await;
        }
    }

    /// 下一次需要唤醒的时刻（无待发查询时为 None）
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// 表单提交（回车/按钮）绕过防抖立即查询
    pub async fn submit_search(&mut self) {
        self.debouncer.cancel();
        let text = self.search_input.clone();
        self.commit_search(text).await;
    }

    async fn commit_search(&mut self, text: String) {
        self.query.search = text;
        self.query.page = 1;
        self.refresh().await;
    }

    /// 翻页：分类和搜索词保持不变
    pub async fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
        self.refresh().await;
    }

    // ------ 乐观删除（主管角色专用） ------

    /// 第一阶段：立即从可见列表移除并预测分页数值
    pub fn stage_delete(&mut self, movie_id: i64) -> ApiResult<PendingDelete> {
        if !self.session.current().role.is_supervisor() {
            return Err(ApiError::Forbidden(
                "Only supervisors can delete catalog entries".to_string(),
            ));
        }
        let page = match &self.view {
            ViewState::Loaded(page) => page.clone(),
            _ => {
                return Err(ApiError::NotFound(
                    "No loaded list to delete from".to_string(),
                ))
            }
        };
        if !page.movies.iter().any(|m| m.id == movie_id) {
            return Err(ApiError::NotFound(format!(
                "Movie {} is not in the current view",
                movie_id
            )));
        }

        let snapshot = DeleteSnapshot {
            page: page.clone(),
            query: self.query.clone(),
        };

        // 乐观移除 + 本地预测的总数/页数
        let mut updated = page;
        updated.movies.retain(|m| m.id != movie_id);
        updated.pagination.total_count = updated.pagination.total_count.saturating_sub(1);
        updated.pagination.recompute_total_pages();

        // >1 页的最后一条被删掉：预先翻回上一页
        let needs_refetch = updated.movies.is_empty() && self.query.page > 1;
        if needs_refetch {
            self.query.page -= 1;
            updated.pagination.current_page = self.query.page;
        }

        self.view = ViewState::Loaded(updated);
        self.generation += 1;
        let speculation = Speculation::capture(&snapshot, self.generation);
        Ok(PendingDelete {
            movie_id,
            speculation,
            needs_refetch,
        })
    }

    /// 第二阶段：远端删除的结果到达
    ///
    /// 失败时仅当视图代号未前进才恢复快照；
    /// 用户已经切到别的状态时只提示错误，不覆盖新状态。
    pub fn resolve_delete(&mut self, pending: PendingDelete, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                tracing::info!("Deleted movie {}", pending.movie_id);
            }
            Err(e) => {
                let message = e.user_message();
                match pending.speculation.restore_if_current(self.generation) {
                    Some(snapshot) => {
                        self.query = snapshot.query;
                        self.view = ViewState::Loaded(snapshot.page);
                        self.generation += 1;
                        tracing::warn!(
                            "Delete of movie {} failed, restored previous list: {}",
                            pending.movie_id,
                            message
                        );
                    }
                    None => {
                        tracing::warn!(
                            "Delete of movie {} failed after view changed, skipping rollback",
                            pending.movie_id
                        );
                    }
                }
                self.toast = Some(message);
            }
        }
    }

    /// 完整删除流程：乐观更新 → 远端请求 → 失败回滚 → 必要时重查
    pub async fn delete_movie(&mut self, movie_id: i64) -> bool {
        let pending = match self.stage_delete(movie_id) {
            Ok(p) => p,
            Err(e) => {
                self.toast = Some(e.user_message());
                return false;
            }
        };
        let needs_refetch = pending.needs_refetch;
        let api = Arc::clone(&self.api);
        let result = api.delete_movie(movie_id).await;
        let deleted = result.is_ok();
        self.resolve_delete(pending, result);
        if deleted && needs_refetch {
            self.refresh().await;
        }
        deleted
    }

    /// 点击条目：按订阅等级决定进详情还是跳升级路径
    pub fn open_movie(&self, movie: &Movie) -> Access {
        self.policy.check(&self.session.current(), movie)
    }
}
