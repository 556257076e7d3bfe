use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::UserId,
    validation::{Payload, Validator},
};

/// An employee of the management company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The ID of the user.
    pub id: UserId,
    /// The employee's full name.
    pub user_name: String,
    /// The employee's job title.
    pub user_post: String,
    /// Contact email, if known.
    pub email: Option<String>,
}

/// The validated fields for creating or updating a [User].
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub user_name: String,
    pub user_post: String,
    pub email: Option<String>,
}

impl UserForm {
    /// Validate a request payload. A blank email is stored as `NULL`.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every invalid field.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        let mut validator = Validator::new();

        let user_name = validator.required_text(payload, "user_name");
        let user_post = validator.required_text(payload, "user_post");
        let email = validator.optional_email(payload, "email");

        let errors = validator.into_errors();

        match (user_name, user_post) {
            (Some(user_name), Some(user_post)) if errors.is_empty() => Ok(Self {
                user_name,
                user_post,
                email,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod user_form_tests {
    use serde_json::json;

    use crate::{Error, test_utils::payload};

    use super::UserForm;

    #[test]
    fn blank_email_is_none() {
        let form = UserForm::from_payload(&payload(json!({
            "user_name": "Иванов И. И.",
            "user_post": "Инженер",
            "email": "  ",
        })));

        assert_eq!(
            form,
            Ok(UserForm {
                user_name: "Иванов И. И.".to_owned(),
                user_post: "Инженер".to_owned(),
                email: None,
            })
        );
    }

    #[test]
    fn keeps_valid_email() {
        let form = UserForm::from_payload(&payload(json!({
            "user_name": "Petrov",
            "user_post": "Manager",
            "email": "petrov@example.com",
        })))
        .unwrap();

        assert_eq!(form.email.as_deref(), Some("petrov@example.com"));
    }

    #[test]
    fn rejects_invalid_email_with_missing_fields() {
        let form = UserForm::from_payload(&payload(json!({
            "user_post": "Manager",
            "email": "petrov-at-example",
        })));

        assert_eq!(
            form,
            Err(Error::Validation(vec![
                "user_name is required".to_owned(),
                "email must be valid email address".to_owned(),
            ]))
        );
    }
}
