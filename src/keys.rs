use crate::store::{Key, KeyCondition, PARTITION_ATTR};

/// Chapters rows live under the concatenated `provider_seriesId` partition;
/// the store itself never learns the key is composite.
pub fn chapters_partition(provider: &str, series_id: &str) -> String {
    format!("{provider}_{series_id}")
}

/// Equality condition matching every series row of one provider.
pub fn provider_condition(provider: &str) -> KeyCondition {
    KeyCondition::equals(PARTITION_ATTR, provider)
}

/// Equality condition matching every chapter row of one series.
pub fn series_chapter_condition(provider: &str, series_id: &str) -> KeyCondition {
    KeyCondition::equals(PARTITION_ATTR, chapters_partition(provider, series_id))
}

pub fn series_key(provider: &str, series_id: &str) -> Key {
    Key {
        partition: provider.to_string(),
        sort: series_id.to_string(),
    }
}

pub fn chapter_key(provider: &str, series_id: &str, chapters_id: &str) -> Key {
    Key {
        partition: chapters_partition(provider, series_id),
        sort: chapters_id.to_string(),
    }
}
