//! Page-by-page emulation over the store's forward-only cursor primitive.
//!
//! The store can only hand out the "next" bounded batch, so reaching page N
//! means walking batches 1..N from the start of the key range on every
//! request. That O(N x S) re-walk is an accepted cost of offering offset
//! pagination over a cursor-only store.

use crate::error::QueryError;
use crate::store::{KeyCondition, PageCursor, RawRecord, Store};

/// Validated page-size / 1-indexed page-number pair. Both are positive by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    size: u64,
    num: u64,
}

impl PageRequest {
    pub fn new(size: u64, num: u64) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::InvalidParameter(
                "invalid limit value".to_string(),
            ));
        }
        if num == 0 {
            return Err(QueryError::InvalidParameter(
                "invalid page value".to_string(),
            ));
        }
        Ok(Self { size, num })
    }

    /// Parses the externally supplied query-string values. `limit` must be a
    /// positive integer; `page` defaults to 1 when absent and is rejected
    /// when supplied but not a positive integer.
    pub fn from_params(limit: &str, page: Option<&str>) -> Result<Self, QueryError> {
        let size = limit.trim().parse::<u64>().map_err(|_| {
            QueryError::InvalidParameter("invalid limit value".to_string())
        })?;
        let num = match page {
            None => 1,
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                QueryError::InvalidParameter("invalid page value".to_string())
            })?,
        };
        Self::new(size, num)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn num(&self) -> u64 {
        self.num
    }
}

/// Walks bounded fetches from the start of the key range and returns exactly
/// the batch whose ordinal equals the requested page number. A range
/// exhausted before that ordinal yields an empty page, not an error. Fetches
/// are strictly sequential; each depends on the previous cursor.
pub async fn nth_page(
    store: &dyn Store,
    table: &str,
    condition: Option<&KeyCondition>,
    request: PageRequest,
) -> Result<Vec<RawRecord>, QueryError> {
    let mut cursor: Option<PageCursor> = None;
    let mut ordinal = 0u64;

    loop {
        ordinal += 1;
        let fetched = match condition {
            Some(condition) => {
                store
                    .query_page(table, condition, request.size(), cursor)
                    .await?
            }
            None => store.scan_page(table, request.size(), cursor).await?,
        };

        // Stop issuing fetches once the target batch is in hand; batches
        // past it are irrelevant.
        if ordinal == request.num() {
            return Ok(fetched.items);
        }

        match fetched.next {
            Some(next) => cursor = Some(next),
            None => return Ok(Vec::new()),
        }
    }
}
