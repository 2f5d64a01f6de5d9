use crate::store::StoreError;

/// Closed set of failures a query operation can surface. Display strings
/// match the wire-visible `{"error": ...}` messages.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("failed to build expression")]
    QueryBuild(#[source] StoreError),

    #[error("failed to fetch record")]
    Fetch(#[source] StoreError),

    #[error("failed to unmarshal record")]
    Unmarshal(#[source] serde_json::Error),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Condition { .. } => Self::QueryBuild(err),
            StoreError::UnknownTable(_) | StoreError::Unavailable(_) => Self::Fetch(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QueryError;
    use crate::store::StoreError;

    #[test]
    fn condition_rejection_maps_to_query_build() {
        let err = QueryError::from(StoreError::Condition {
            attribute: "MangaTitle".to_string(),
        });
        assert!(matches!(err, QueryError::QueryBuild(_)));
        assert_eq!(err.to_string(), "failed to build expression");
    }

    #[test]
    fn transport_failures_map_to_fetch() {
        let err = QueryError::from(StoreError::Unavailable("timeout".to_string()));
        assert!(matches!(err, QueryError::Fetch(_)));
        assert_eq!(err.to_string(), "failed to fetch record");
    }
}
