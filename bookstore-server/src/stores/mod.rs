//! 内存存储层
//!
//! 每个实体一个 store，各自持有一把粗粒度 `RwLock` 和一个快照后端：
//!
//! - [`BookStore`] - 图书和库存
//! - [`AuthorStore`] - 作者
//! - [`CustomerStore`] - 客户 (email 唯一)
//! - [`OrderStore`] - 订单，与 BookStore 联动预留库存
//! - [`UserStore`] - 登录账户
//!
//! 所有操作都是同步的，接收一个 [`CancellationToken`](tokio_util::sync::CancellationToken)。

pub mod author;
pub mod book;
pub mod collection;
pub mod customer;
pub mod error;
pub mod order;
pub mod snapshot;
pub mod user;

pub use author::AuthorStore;
pub use book::BookStore;
pub use collection::{Collection, Entity};
pub use customer::CustomerStore;
pub use error::{StoreError, StoreResult};
pub use order::OrderStore;
pub use snapshot::{JsonFileSnapshot, MemorySnapshot, Snapshot, SnapshotError};
pub use user::{User, UserStore};
