//! School-level settings shown on portal surfaces and receipts.

use serde::{Deserialize, Serialize};

/// Name and contact details of the school running the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolConfig {
    pub school_name: String,
    pub address: String,
    pub phone: String,
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            school_name: "School Fee Portal".to_string(),
            address: String::new(),
            phone: String::new(),
        }
    }
}
