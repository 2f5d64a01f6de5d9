use serde::de::DeserializeOwned;

use crate::error::QueryError;
use crate::store::RawRecord;

/// Projects one raw field bag into a target shape. Absent fields take the
/// shape's zero value; absence is never distinguished from explicit
/// emptiness.
pub fn record<T: DeserializeOwned>(record: RawRecord) -> Result<T, QueryError> {
    serde_json::from_value(serde_json::Value::Object(record)).map_err(QueryError::Unmarshal)
}

pub fn records<T: DeserializeOwned>(records: Vec<RawRecord>) -> Result<Vec<T>, QueryError> {
    records.into_iter().map(record).collect()
}
