//! Service-center reference data

use serde::{Deserialize, Serialize};

/// A physical service location. Static, read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub id: String,
    pub city_name: String,
    pub branch_name: String,
    pub branch_code: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ServiceCenter {
    pub fn to_match(&self) -> BranchMatch {
        BranchMatch {
            code: self.branch_code.clone(),
            name: self.branch_name.clone(),
            city: self.city_name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Canonical result of a location match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchMatch {
    pub code: String,
    pub name: String,
    pub city: String,
    pub address: String,
}
