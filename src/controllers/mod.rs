//! Admin dashboard state: the two paged lists, the admin gate, and the
//! hand-off to delegated franchise/store flows.

pub mod admin_view;
pub mod franchise_list;
pub mod navigation;
pub mod registry;
pub mod ticket;
pub mod user_list;

pub use admin_view::{Access, AdminView};
pub use franchise_list::{FranchiseListController, FranchiseListView};
pub use navigation::Navigation;
pub use registry::ViewRegistry;
pub use ticket::LoadOutcome;
pub use user_list::{DeleteUserError, UserListController, UserListView};
