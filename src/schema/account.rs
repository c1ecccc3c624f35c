use serde_json::Value;

use super::{as_object, non_empty_string, FieldErrors, ValidationError};

/// Username/password pair from the register and login bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub fn validate_credentials(body: &Value) -> Result<Credentials, ValidationError> {
    let object = as_object(body)?;
    let mut errors = FieldErrors::default();

    let username = errors.field(object, "username", true, non_empty_string);
    let password = errors.field(object, "password", true, non_empty_string);
    errors.finish("Invalid credentials")?;

    match (username, password) {
        (Some(username), Some(password)) => Ok(Credentials { username, password }),
        _ => Err(ValidationError::body("Invalid credentials")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn both_fields_required() {
        let creds = validate_credentials(&json!({ "username": "alice", "password": "secret1" })).unwrap();
        assert_eq!(creds.username, "alice");

        let err = validate_credentials(&json!({ "username": "" })).unwrap_err();
        assert!(err.field_errors.contains_key("username"));
        assert_eq!(err.field_errors["password"], "Required");
    }
}
