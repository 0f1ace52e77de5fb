use askama::Template;

use super::PageContext;
use crate::controllers::user_list::MATCH_ALL;
use crate::controllers::{FranchiseListView, UserListView};
use crate::models::franchise::format_revenue;
use crate::models::{Franchise, FranchiseId, Store, StoreId, User, UserId};

/// One row of the users table.
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub roles: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        UserRow {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            roles: u.role_labels(),
        }
    }
}

pub struct StoreRow {
    pub id: StoreId,
    pub name: String,
    pub revenue: String,
}

impl From<&Store> for StoreRow {
    fn from(s: &Store) -> Self {
        StoreRow {
            id: s.id,
            name: s.name.clone(),
            revenue: format_revenue(s.total_revenue),
        }
    }
}

/// A franchise row with its stores grouped underneath.
pub struct FranchiseRow {
    pub id: FranchiseId,
    pub name: String,
    pub admins: String,
    pub stores: Vec<StoreRow>,
}

impl From<&Franchise> for FranchiseRow {
    fn from(f: &Franchise) -> Self {
        FranchiseRow {
            id: f.id,
            name: f.name.clone(),
            admins: f.admin_names(),
            stores: f.stores.iter().map(StoreRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub users: Vec<UserRow>,
    pub user_filter: String,
    pub user_prev_disabled: bool,
    pub user_next_disabled: bool,
    pub franchises: Vec<FranchiseRow>,
    pub franchise_prev_disabled: bool,
    pub franchise_next_disabled: bool,
}

impl AdminDashboardTemplate {
    pub fn new(ctx: PageContext, users: &UserListView, franchises: &FranchiseListView) -> Self {
        let user_filter = if users.filter == MATCH_ALL {
            String::new()
        } else {
            users.filter.clone()
        };
        Self {
            ctx,
            users: users.list.users.iter().map(UserRow::from).collect(),
            user_filter,
            user_prev_disabled: !users.can_prev(),
            user_next_disabled: !users.can_next(),
            franchises: franchises.list.franchises.iter().map(FranchiseRow::from).collect(),
            franchise_prev_disabled: !franchises.can_prev(),
            franchise_next_disabled: !franchises.can_next(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/create_franchise.html")]
pub struct CreateFranchiseTemplate {
    pub ctx: PageContext,
    pub name: String,
    pub admin_email: String,
}

#[derive(Template)]
#[template(path = "admin/close_franchise.html")]
pub struct CloseFranchiseTemplate {
    pub ctx: PageContext,
    pub franchise_name: String,
}

#[derive(Template)]
#[template(path = "admin/close_store.html")]
pub struct CloseStoreTemplate {
    pub ctx: PageContext,
    pub franchise_name: String,
    pub store_name: String,
}

#[derive(Template)]
#[template(path = "admin/create_store.html")]
pub struct CreateStoreTemplate {
    pub ctx: PageContext,
    pub franchise_name: String,
    pub name: String,
}
