use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::subscriber::NewSubscriber;

pub type SubscriberFormResult<T> = Result<T, SubscriberFormError>;

#[derive(Debug, Error)]
pub enum SubscriberFormError {
    #[error("invalid e-mail address: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Form payload emitted when an operator adds a subscriber by hand.
#[derive(Debug, Deserialize, Validate)]
pub struct AddSubscriberForm {
    #[validate(email)]
    pub email: String,
}

impl AddSubscriberForm {
    /// Validates the address and stores it lower-cased.
    pub fn into_new_subscriber(self, hub_id: i32) -> SubscriberFormResult<NewSubscriber> {
        let form = AddSubscriberForm {
            email: self.email.trim().to_lowercase(),
        };
        form.validate()?;

        Ok(NewSubscriber::new(hub_id, form.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let form = AddSubscriberForm {
            email: "  Reader@Example.COM ".to_string(),
        };

        let subscriber = form.into_new_subscriber(2).expect("expected success");

        assert_eq!(subscriber.hub_id, 2);
        assert_eq!(subscriber.email, "reader@example.com");
    }

    #[test]
    fn invalid_email_is_rejected() {
        let form = AddSubscriberForm {
            email: "not-an-address".to_string(),
        };

        assert!(matches!(
            form.into_new_subscriber(2),
            Err(SubscriberFormError::Validation(_))
        ));
    }
}
