use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SchemaTableError};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_parse_error)
}

/// Same as [`from_str_with_path`], for a document that is already parsed.
pub fn from_value_with_path<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(into_parse_error)
}

fn into_parse_error(err: serde_path_to_error::Error<serde_json::Error>) -> SchemaTableError {
    SchemaTableError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;

    #[test]
    fn parse_errors_carry_the_json_path() {
        let err = from_str_with_path::<SchemaNode>(r#"{"type": "object", "required": [1]}"#)
            .unwrap_err();
        match err {
            SchemaTableError::Parse { path, .. } => assert_eq!(path, "required[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let err = from_str_with_path::<SchemaNode>("{").unwrap_err();
        assert_eq!(err.kind(), "Parse");
    }
}
