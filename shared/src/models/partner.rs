//! Partner (mitra) directory entry

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Partner {
    pub id: String,
    /// Name as it appears on tickets (e.g. "CV Mitra Sejahtera")
    pub full_name: String,
    pub district: String,
}
