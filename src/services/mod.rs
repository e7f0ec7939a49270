pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod coupons;
pub mod dashboard;
pub mod newsletter;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use pushkind_common::domain::auth::AuthenticatedUser;

    pub fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user".to_string(),
            email: "user@example.com".to_string(),
            hub_id: 11,
            name: "User".to_string(),
            roles: roles.iter().map(|role| role.to_string()).collect(),
            exp: 0,
        }
    }
}
