use serde::{Deserialize, Deserializer};

use crate::errors::ServiceError;

/// Turns a raw request body into its checked form,
/// or answers with HTTP 400 explaining what is wrong.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ServiceError>;
}

/// A field only counts as present when it holds something other than whitespace
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Identifiers are stored as text, but clients are free to send them as numbers
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    let id = Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    });

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<String>,
    }

    impl Validate for Body {
        type Valid = String;

        fn validate(self) -> Result<String, ServiceError> {
            match present(self.id) {
                Some(id) => Ok(id),
                None => bad_request!("id is required"),
            }
        }
    }

    fn parse(json: &str) -> Body {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ids_as_text_or_number() {
        assert_eq!(parse(r#"{"id": "2410123"}"#).id, Some("2410123".to_string()));
        assert_eq!(parse(r#"{"id": 2410123}"#).id, Some("2410123".to_string()));
        assert_eq!(parse(r#"{"id": null}"#).id, None);
        assert_eq!(parse(r#"{}"#).id, None);
    }

    #[test]
    fn ids_of_other_types_are_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"id": true}"#).is_err());
        assert!(serde_json::from_str::<Body>(r#"{"id": [1]}"#).is_err());
    }

    #[test]
    fn blank_values_are_missing() {
        assert!(parse(r#"{"id": ""}"#).validate().is_err());
        assert!(parse(r#"{"id": "   "}"#).validate().is_err());
        assert!(parse(r#"{}"#).validate().is_err());
        assert_eq!(parse(r#"{"id": "abc"}"#).validate(), Ok("abc".to_string()));
    }
}
