use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct CategoryId(pub i32);

/// Category labels keyed by id, serialized as `{"1": "Science", ...}`.
pub type CategoryMap = BTreeMap<i32, String>;

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id.0, c.kind)).collect()
}
