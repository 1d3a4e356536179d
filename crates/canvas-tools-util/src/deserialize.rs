//! Utility functions for deserializing data wrapped with serde_path_to_error for better errors.

use crate::JsonError;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub fn json_from_slice<T: DeserializeOwned>(json: &[u8]) -> Result<T, JsonError> {
    let de = &mut serde_json::Deserializer::from_slice(json);
    let res = serde_path_to_error::deserialize(de)?;
    Ok(res)
}

pub fn json_from_value<T: DeserializeOwned>(json: Value) -> Result<T, JsonError> {
    let res = serde_path_to_error::deserialize(json)?;
    Ok(res)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Course {
        id: u64,
        name: String,
    }

    #[test]
    fn reports_path_of_bad_field() {
        let err = json_from_slice::<Vec<Course>>(br#"[{"id": 1, "name": "a"}, {"id": "x", "name": "b"}]"#)
            .unwrap_err();
        assert_eq!(err.path().to_string(), "[1].id");
    }

    #[test]
    fn reads_from_slice_and_value() {
        let json = br#"[{"id": 5, "name": "Calculus"}]"#;
        let from_slice: Vec<Course> = json_from_slice(json).unwrap();
        let from_value: Vec<Course> =
            json_from_value(serde_json::json!([{"id": 6, "name": "Physics"}])).unwrap();
        assert_eq!(from_slice[0].id, 5);
        assert_eq!(from_slice[0].name, "Calculus");
        assert_eq!(from_value[0].id, 6);
    }
}
