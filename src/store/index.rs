use serde::{Deserialize, Serialize};

/// One row of `comic-index.json`: enough to enumerate the catalog without
/// opening any detail file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: u32,
    pub title: String,
}
