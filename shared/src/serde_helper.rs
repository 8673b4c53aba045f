//! 序列化辅助函数

use serde::{Deserialize, Deserializer};

/// 把 JSON `null` 当作缺失字段处理，回退为 `T::default()`
///
/// 配合 `#[serde(default, deserialize_with = "null_default")]` 使用，
/// 同时覆盖键缺失与值为 `null` 两种情况。
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "null_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "null_default")]
        score: f64,
    }

    #[test]
    fn test_null_and_missing_fall_back_to_default() {
        let sample: Sample = serde_json::from_str(r#"{"tags":null}"#).unwrap();
        assert!(sample.tags.is_empty());
        assert_eq!(sample.score, 0.0);

        let sample: Sample = serde_json::from_str(r#"{"tags":["a"],"score":3.5}"#).unwrap();
        assert_eq!(sample.tags, vec!["a".to_string()]);
        assert_eq!(sample.score, 3.5);
    }
}
