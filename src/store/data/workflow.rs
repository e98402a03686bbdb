use serde::{Deserialize, Serialize};

use crate::store::{DbCollectionIden, StoreIden};

/// Stored workflow snapshot: `data` carries the full serialized
/// `WorkflowModel` JSON.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Workflow {
    pub id: String,
    pub goal: String,
    pub category: String,
    pub data: String,
    pub create_time: i64,
    pub update_time: i64,
}

impl DbCollectionIden for Workflow {
    fn iden() -> StoreIden {
        StoreIden::Workflows
    }
}
