use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const ALREADY_EXISTS_MESSAGE: &str = "User already exists";

/// Registration body: an `email` plus any number of profile fields.
///
/// Profile fields are stored as given; only `_id` is dropped so the
/// database always assigns the identifier. Field names, at any depth, may
/// not contain `.` or start with `$`: the upsert would read them as paths
/// or operators.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(flatten)]
    #[validate(custom(function = "validate_field_names"))]
    pub profile: Map<String, Value>,
}

fn validate_field_names(profile: &Map<String, Value>) -> Result<(), ValidationError> {
    fn first_bad_key(fields: &Map<String, Value>) -> Option<&str> {
        fields.iter().find_map(|(key, value)| {
            if key.contains('.') || key.starts_with('$') {
                return Some(key.as_str());
            }
            nested_bad_key(value)
        })
    }

    fn nested_bad_key(value: &Value) -> Option<&str> {
        match value {
            Value::Object(fields) => first_bad_key(fields),
            Value::Array(items) => items.iter().find_map(nested_bad_key),
            _ => None,
        }
    }

    match first_bad_key(profile) {
        None => Ok(()),
        Some(key) => {
            let mut error = ValidationError::new("field_name");
            error.message = Some("field names may not contain '.' or start with '$'".into());
            error.add_param("field".into(), &key);
            Err(error)
        }
    }
}

impl RegisterUser {
    /// Document to insert: the profile fields plus `email`, without `_id`.
    pub fn to_document(&self) -> Result<Document, bson::ser::Error> {
        let mut document = bson::to_document(&self.profile)?;
        document.remove("_id");
        document.insert("email", self.email.as_str());
        Ok(document)
    }
}

/// Response of `POST /users`.
///
/// - duplicate: `{ "message": "User already exists", "insertedId": null }`
/// - created: `{ "acknowledged": true, "insertedId": "<hex id>" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,
    /// Hex ObjectId of the new document, `null` when nothing was inserted
    pub inserted_id: Option<String>,
}

impl RegistrationOutcome {
    pub fn created(inserted_id: impl Into<String>) -> Self {
        Self {
            message: None,
            acknowledged: Some(true),
            inserted_id: Some(inserted_id.into()),
        }
    }

    pub fn already_exists() -> Self {
        Self {
            message: Some(ALREADY_EXISTS_MESSAGE.to_string()),
            acknowledged: None,
            inserted_id: None,
        }
    }

    pub fn is_created(&self) -> bool {
        self.inserted_id.is_some()
    }
}
