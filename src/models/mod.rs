pub mod franchise;
pub mod role;
pub mod user;

pub use franchise::{Franchise, FranchiseId, FranchiseListPage, NewFranchise, NewStore, Store, StoreId};
pub use role::{ObjectId, Role};
pub use user::{User, UserId, UserListPage, has_role};
