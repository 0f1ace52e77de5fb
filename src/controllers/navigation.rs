use crate::models::{Franchise, Store};

pub const DASHBOARD: &str = "/admin-dashboard";
pub const CREATE_FRANCHISE: &str = "/admin-dashboard/create-franchise";
pub const CLOSE_FRANCHISE: &str = "/admin-dashboard/close-franchise";
pub const CLOSE_STORE: &str = "/admin-dashboard/close-store";
pub const CREATE_STORE: &str = "/admin-dashboard/create-store";

/// Hand-off to a delegated franchise/store flow, carrying the selected entities.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    CreateFranchise,
    CloseFranchise { franchise: Franchise },
    CloseStore { franchise: Franchise, store: Store },
    CreateStore { franchise: Franchise },
}

impl Navigation {
    pub fn location(&self) -> &'static str {
        match self {
            Navigation::CreateFranchise => CREATE_FRANCHISE,
            Navigation::CloseFranchise { .. } => CLOSE_FRANCHISE,
            Navigation::CloseStore { .. } => CLOSE_STORE,
            Navigation::CreateStore { .. } => CREATE_STORE,
        }
    }
}
