use std::sync::Arc;

use shared::models::{Author, Book, Customer, Order, SalesReport};
use tokio_util::sync::CancellationToken;

use crate::auth::{JwtService, TokenVerifier};
use crate::core::{Config, Result, ServerError};
use crate::reports::ReportStore;
use crate::stores::{
    AuthorStore, BookStore, CustomerStore, JsonFileSnapshot, MemorySnapshot, OrderStore,
    Snapshot, User, UserStore,
};

/// 每个集合的快照后端
pub struct Snapshots {
    pub books: Arc<dyn Snapshot<Book>>,
    pub authors: Arc<dyn Snapshot<Author>>,
    pub customers: Arc<dyn Snapshot<Customer>>,
    pub orders: Arc<dyn Snapshot<Order>>,
    pub users: Arc<dyn Snapshot<User>>,
    pub reports: Arc<dyn Snapshot<SalesReport>>,
}

impl Snapshots {
    /// `<work_dir>/database/*.json`
    pub fn json_files(config: &Config) -> Self {
        Self {
            books: Arc::new(JsonFileSnapshot::new(config.snapshot_path("books"))),
            authors: Arc::new(JsonFileSnapshot::new(config.snapshot_path("authors"))),
            customers: Arc::new(JsonFileSnapshot::new(config.snapshot_path("customers"))),
            orders: Arc::new(JsonFileSnapshot::new(config.snapshot_path("orders"))),
            users: Arc::new(JsonFileSnapshot::new(config.snapshot_path("users"))),
            reports: Arc::new(JsonFileSnapshot::new(config.snapshot_path("sales_reports"))),
        }
    }

    /// 全部保存在进程内存 (测试场景)
    pub fn in_memory() -> Self {
        Self {
            books: Arc::new(MemorySnapshot::<Book>::new()),
            authors: Arc::new(MemorySnapshot::<Author>::new()),
            customers: Arc::new(MemorySnapshot::<Customer>::new()),
            orders: Arc::new(MemorySnapshot::<Order>::new()),
            users: Arc::new(MemorySnapshot::<User>::new()),
            reports: Arc::new(MemorySnapshot::<SalesReport>::new()),
        }
    }
}

/// 服务器状态 - 持有所有 store 的显式句柄
///
/// 进程启动时构造一次，之后只做浅拷贝 (所有字段都是 `Arc` 或廉价克隆)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | books / authors / customers | Arc<*Store> | 实体 store |
/// | orders | Arc<OrderStore> | 订单 store，内部持有 books 句柄 |
/// | users | Arc<UserStore> | 登录账户 |
/// | reports | Arc<ReportStore> | 销售报表历史 |
/// | jwt_service | Arc<JwtService> | 令牌签发 |
/// | token_verifier | Arc<dyn TokenVerifier> | 令牌校验 (认证中间件使用) |
/// | shutdown | CancellationToken | 关闭信号，请求令牌都是它的子令牌 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub books: Arc<BookStore>,
    pub authors: Arc<AuthorStore>,
    pub customers: Arc<CustomerStore>,
    pub orders: Arc<OrderStore>,
    pub users: Arc<UserStore>,
    pub reports: Arc<ReportStore>,
    pub jwt_service: Arc<JwtService>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub shutdown: CancellationToken,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("books", &self.books)
            .field("orders", &self.orders)
            .field("reports", &self.reports)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 用给定的快照后端构造 (不加载快照)
    pub fn new(config: Config, snapshots: Snapshots) -> Self {
        let books = Arc::new(BookStore::new(snapshots.books));
        let orders = Arc::new(OrderStore::new(snapshots.orders, books.clone()));
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            books,
            authors: Arc::new(AuthorStore::new(snapshots.authors)),
            customers: Arc::new(CustomerStore::new(snapshots.customers)),
            orders,
            users: Arc::new(UserStore::new(snapshots.users)),
            reports: Arc::new(ReportStore::new(snapshots.reports)),
            token_verifier: jwt_service.clone(),
            jwt_service,
            shutdown: CancellationToken::new(),
            config,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (work_dir/database)
    /// 2. 所有 store (JSON 文件快照)
    /// 3. 加载快照，文件不存在则为空，解码失败则启动失败
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(config.database_dir()).map_err(ServerError::WorkDir)?;

        let state = Self::new(config.clone(), Snapshots::json_files(config));
        state.load_snapshots()?;
        Ok(state)
    }

    /// 纯内存状态 (测试场景)
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Snapshots::in_memory())
    }

    /// 替换令牌校验实现
    pub fn with_token_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.token_verifier = verifier;
        self
    }

    fn load_snapshots(&self) -> Result<()> {
        let books = self.books.load_snapshot()?;
        let authors = self.authors.load_snapshot()?;
        let customers = self.customers.load_snapshot()?;
        let orders = self.orders.load_snapshot()?;
        let users = self.users.load_snapshot()?;
        let reports = self.reports.load_snapshot()?;

        tracing::info!(
            books,
            authors,
            customers,
            orders,
            users,
            reports,
            "Stores initialized"
        );
        Ok(())
    }
}
