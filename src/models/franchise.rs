use serde::{Deserialize, Serialize};

use super::user::User;

pub type FranchiseId = i64;
pub type StoreId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "totalRevenue", default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: FranchiseId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub admins: Vec<User>,
    #[serde(default)]
    pub stores: Vec<Store>,
}

impl Franchise {
    pub fn admin_names(&self) -> String {
        self.admins
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn store(&self, id: StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }
}

/// One page of `GET /api/franchise`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseListPage {
    #[serde(default)]
    pub franchises: Vec<Franchise>,
    #[serde(default)]
    pub more: bool,
}

/// Body of `POST /api/franchise`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFranchise {
    pub name: String,
    pub admins: Vec<AdminRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRef {
    pub email: String,
}

/// Body of `POST /api/franchise/<id>/store`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStore {
    pub name: String,
}

/// Formats a store revenue with `,` thousands separators and up to three
/// fraction digits. Absent revenue renders as an empty string.
pub fn format_revenue(revenue: Option<f64>) -> String {
    match revenue {
        Some(value) => format!("{} ₿", group_thousands(value)),
        None => String::new(),
    }
}

pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
