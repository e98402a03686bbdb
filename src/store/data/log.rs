use serde::{Deserialize, Serialize};

use crate::store::{DbCollectionIden, StoreIden};

/// Log line emitted by a stage during execution.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Log {
    pub id: String,
    pub xid: String,
    pub nid: String,

    pub content: String,
    pub timestamp: i64,
}

impl DbCollectionIden for Log {
    fn iden() -> StoreIden {
        StoreIden::Logs
    }
}
