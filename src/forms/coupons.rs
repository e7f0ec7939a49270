use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::coupon::{CouponRecord, DiscountType, NewCoupon, ProductScope, UpdateCoupon};

/// Maximum length allowed for a coupon code.
const CODE_MAX_LEN: usize = 64;
const CODE_MAX_LEN_VALIDATOR: u64 = CODE_MAX_LEN as u64;

/// Format of the date inputs rendered by the coupon dialog.
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Result type returned by the coupon form helpers.
pub type CouponFormResult<T> = Result<T, CouponFormError>;

/// Rule violated by a submitted coupon definition.
#[derive(Debug, Error)]
pub enum CouponFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A required field is empty or zero.
    #[error("required field `{0}` is missing")]
    MissingRequiredField(&'static str),
    /// The start date falls after the end date.
    #[error("end date must not be earlier than start date")]
    InvalidDateRange,
    /// A date field could not be parsed.
    #[error("invalid {field} `{value}`")]
    InvalidDate { field: &'static str, value: String },
    /// A numeric field could not be parsed or is out of range.
    #[error("invalid {field} `{value}`")]
    InvalidNumber { field: &'static str, value: String },
    /// The discount type is neither `percentage` nor `fixed`.
    #[error("unknown discount type `{0}`")]
    UnknownDiscountType(String),
    /// The product scope is not one of `all`, `specific` or `category`.
    #[error("unknown product scope `{0}`")]
    UnknownProductScope(String),
}

/// Raw coupon definition as submitted by the coupon dialog.
///
/// Every field arrives as untrusted text. [`CouponForm::normalize`] turns it
/// into a typed [`CouponRecord`] or reports the first rule it violates.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CouponForm {
    #[validate(length(max = CODE_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub code: String,
    /// `percentage` or `fixed`.
    #[serde(default)]
    pub discount_type: String,
    #[serde(default)]
    pub discount_value: String,
    #[serde(default)]
    pub min_order_amount: Option<String>,
    /// Only used by percentage coupons.
    #[serde(default)]
    pub max_discount_amount: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub start_date: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub end_date: String,
    /// Blank means unlimited.
    #[serde(default)]
    pub usage_limit: Option<String>,
    /// Absent means active.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// `all`, `specific` or `category`; absent means `all`.
    #[serde(default)]
    pub applicable_products: Option<String>,
    /// Comma separated identifiers. Repeated IDs collapse into one entry.
    #[serde(default)]
    pub product_ids: Option<String>,
}

impl CouponForm {
    /// Validates the raw input and converts it into a normalized record.
    ///
    /// Required fields are checked first, then the date range, then every
    /// remaining field.
    pub fn normalize(&self) -> CouponFormResult<CouponRecord> {
        let code = required_text(&self.code, "code")?;
        let discount_type = required_text(&self.discount_type, "discountType")?;
        let discount_value = required_text(&self.discount_value, "discountValue")?;
        if matches!(discount_value.parse::<f64>(), Ok(value) if value == 0.0) {
            return Err(CouponFormError::MissingRequiredField("discountValue"));
        }
        let start_date = required_text(&self.start_date, "startDate")?;
        let end_date = required_text(&self.end_date, "endDate")?;

        let start_date = parse_date(start_date, "startDate")?;
        let end_date = parse_date(end_date, "endDate")?;
        if start_date > end_date {
            return Err(CouponFormError::InvalidDateRange);
        }

        self.validate()?;

        let discount_type = DiscountType::from_code(&discount_type.to_ascii_lowercase())
            .ok_or_else(|| CouponFormError::UnknownDiscountType(discount_type.to_string()))?;
        let discount_value = parse_amount(discount_value, "discountValue")?;
        let min_order_amount =
            optional_amount(self.min_order_amount.as_deref(), "minOrderAmount")?.unwrap_or(0.0);
        let max_discount_amount = match discount_type {
            DiscountType::Percentage => {
                optional_amount(self.max_discount_amount.as_deref(), "maxDiscountAmount")?
            }
            DiscountType::Fixed => None,
        };
        let usage_limit = parse_usage_limit(self.usage_limit.as_deref())?;

        let applicable_products = match non_blank(self.applicable_products.as_deref()) {
            None => ProductScope::default(),
            Some(raw) => ProductScope::from_code(&raw.to_ascii_lowercase())
                .ok_or_else(|| CouponFormError::UnknownProductScope(raw.to_string()))?,
        };
        let product_ids = match applicable_products {
            ProductScope::All => Vec::new(),
            ProductScope::Specific | ProductScope::Category => {
                parse_id_list(self.product_ids.as_deref().unwrap_or_default())
            }
        };

        Ok(CouponRecord {
            code: code.to_string(),
            discount_type,
            discount_value,
            min_order_amount,
            max_discount_amount,
            start_date,
            end_date,
            usage_limit,
            is_active: self.is_active.unwrap_or(true),
            applicable_products,
            product_ids,
        })
    }

    /// Validates the payload into a domain `NewCoupon` owned by `hub_id`.
    pub fn into_new_coupon(self, hub_id: i32) -> CouponFormResult<NewCoupon> {
        let record = self.normalize()?;
        Ok(NewCoupon::new(hub_id, record))
    }

    /// Validates the payload into a domain `UpdateCoupon`.
    pub fn into_update_coupon(self) -> CouponFormResult<UpdateCoupon> {
        let record = self.normalize()?;
        Ok(UpdateCoupon::new(record))
    }
}

impl From<&CouponRecord> for CouponForm {
    fn from(record: &CouponRecord) -> Self {
        Self {
            code: record.code.clone(),
            discount_type: record.discount_type.as_str().to_string(),
            discount_value: record.discount_value.to_string(),
            min_order_amount: Some(record.min_order_amount.to_string()),
            max_discount_amount: record.max_discount_amount.map(|value| value.to_string()),
            start_date: record.start_date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            end_date: record.end_date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            usage_limit: record.usage_limit.map(|value| value.to_string()),
            is_active: Some(record.is_active),
            applicable_products: Some(record.applicable_products.as_str().to_string()),
            product_ids: Some(record.product_ids.join(",")),
        }
    }
}

/// Renders a timestamp the way the coupon dialog's date inputs expect it.
pub fn date_input_value(value: &DateTime<Utc>) -> String {
    value.format(DATE_INPUT_FORMAT).to_string()
}

fn required_text<'a>(value: &'a str, field: &'static str) -> CouponFormResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CouponFormError::MissingRequiredField(field))
    } else {
        Ok(trimmed)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date(value: &str, field: &'static str) -> CouponFormResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_INPUT_FORMAT)
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| CouponFormError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_amount(value: &str, field: &'static str) -> CouponFormResult<f64> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Ok(parsed),
        _ => Err(CouponFormError::InvalidNumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}

fn optional_amount(value: Option<&str>, field: &'static str) -> CouponFormResult<Option<f64>> {
    match non_blank(value) {
        Some(raw) => parse_amount(raw, field).map(Some),
        None => Ok(None),
    }
}

fn parse_usage_limit(value: Option<&str>) -> CouponFormResult<Option<i32>> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };

    match raw.parse::<i32>() {
        Ok(limit) if limit > 0 => Ok(Some(limit)),
        _ => Err(CouponFormError::InvalidNumber {
            field: "usageLimit",
            value: raw.to_string(),
        }),
    }
}

/// Splits comma separated identifiers and drops blank entries.
///
/// Repeated IDs collapse into one entry at the position of their first
/// occurrence, so `"456,123,456"` yields `["456", "123"]`.
fn parse_id_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CouponForm {
        CouponForm {
            code: "SAVE10".to_string(),
            discount_type: "percentage".to_string(),
            discount_value: "10".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-31".to_string(),
            ..CouponForm::default()
        }
    }

    fn normalized(form: &CouponForm) -> CouponRecord {
        match form.normalize() {
            Ok(record) => record,
            Err(err) => panic!("expected normalization to succeed, got {err}"),
        }
    }

    #[test]
    fn normalizes_minimal_percentage_coupon() {
        let record = normalized(&valid_form());

        assert_eq!(record.code, "SAVE10");
        assert_eq!(record.discount_type, DiscountType::Percentage);
        assert_eq!(record.discount_value, 10.0);
        assert_eq!(record.min_order_amount, 0.0);
        assert!(record.max_discount_amount.is_none());
        assert!(record.usage_limit.is_none());
        assert!(record.is_active);
        assert_eq!(record.applicable_products, ProductScope::All);
        assert!(record.product_ids.is_empty());
        assert_eq!(
            record.start_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-01-01T00:00:00.000Z"
        );
        assert_eq!(
            record.end_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-01-31T00:00:00.000Z"
        );
    }

    #[test]
    fn reports_each_missing_required_field() {
        let cases: [(&str, fn(&mut CouponForm)); 5] = [
            ("code", |form| form.code = "  ".to_string()),
            ("discountType", |form| form.discount_type.clear()),
            ("discountValue", |form| form.discount_value.clear()),
            ("startDate", |form| form.start_date.clear()),
            ("endDate", |form| form.end_date.clear()),
        ];

        for (expected, blank) in cases {
            let mut form = valid_form();
            blank(&mut form);

            let result = form.normalize();

            assert!(
                matches!(result, Err(CouponFormError::MissingRequiredField(field)) if field == expected),
                "expected missing {expected}, got {result:?}"
            );
        }
    }

    #[test]
    fn zero_discount_counts_as_missing() {
        let mut form = valid_form();
        form.discount_value = "0".to_string();

        let result = form.normalize();

        assert!(matches!(
            result,
            Err(CouponFormError::MissingRequiredField("discountValue"))
        ));
    }

    #[test]
    fn rejects_reversed_date_range() {
        let mut form = valid_form();
        form.start_date = "2024-02-01".to_string();
        form.end_date = "2024-01-01".to_string();

        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidDateRange)
        ));
    }

    #[test]
    fn date_range_is_reported_before_other_field_errors() {
        let mut form = valid_form();
        form.start_date = "2024-02-01".to_string();
        form.end_date = "2024-01-01".to_string();
        form.discount_type = "bogus".to_string();
        form.min_order_amount = Some("lots".to_string());
        form.usage_limit = Some("-3".to_string());
        form.code = "X".repeat(CODE_MAX_LEN + 1);

        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidDateRange)
        ));
    }

    #[test]
    fn same_day_range_is_valid() {
        let mut form = valid_form();
        form.end_date = form.start_date.clone();

        let record = normalized(&form);

        assert_eq!(record.start_date, record.end_date);
    }

    #[test]
    fn rejects_unparseable_date() {
        let mut form = valid_form();
        form.end_date = "31/01/2024".to_string();

        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidDate { field: "endDate", value }) if value == "31/01/2024"
        ));
    }

    #[test]
    fn parses_specific_product_ids() {
        let mut form = valid_form();
        form.applicable_products = Some("specific".to_string());
        form.product_ids = Some("123, 456 ,789".to_string());

        let record = normalized(&form);

        assert_eq!(record.applicable_products, ProductScope::Specific);
        assert_eq!(record.product_ids, vec!["123", "456", "789"]);
    }

    #[test]
    fn product_ids_drop_blank_and_repeated_entries() {
        let mut form = valid_form();
        form.applicable_products = Some("specific".to_string());
        form.product_ids = Some("123,, 456,123,".to_string());

        let record = normalized(&form);

        assert_eq!(record.product_ids, vec!["123", "456"]);
    }

    #[test]
    fn repeated_product_ids_keep_first_position() {
        assert_eq!(parse_id_list("456, 123,456 ,789,123"), vec!["456", "123", "789"]);
    }

    #[test]
    fn product_ids_are_ignored_for_all_products() {
        let mut form = valid_form();
        form.product_ids = Some("123".to_string());

        let record = normalized(&form);

        assert!(record.product_ids.is_empty());
    }

    #[test]
    fn normalizes_optional_numbers() {
        let mut form = valid_form();
        form.min_order_amount = Some(" 250.5 ".to_string());
        form.max_discount_amount = Some("40".to_string());
        form.usage_limit = Some("100".to_string());
        form.is_active = Some(false);

        let record = normalized(&form);

        assert_eq!(record.min_order_amount, 250.5);
        assert_eq!(record.max_discount_amount, Some(40.0));
        assert_eq!(record.usage_limit, Some(100));
        assert!(!record.is_active);
    }

    #[test]
    fn blank_optional_numbers_become_none() {
        let mut form = valid_form();
        form.min_order_amount = Some(String::new());
        form.max_discount_amount = Some("  ".to_string());
        form.usage_limit = Some(String::new());

        let record = normalized(&form);

        assert_eq!(record.min_order_amount, 0.0);
        assert!(record.max_discount_amount.is_none());
        assert!(record.usage_limit.is_none());
    }

    #[test]
    fn fixed_coupons_drop_max_discount() {
        let mut form = valid_form();
        form.discount_type = "fixed".to_string();
        form.discount_value = "150".to_string();
        form.max_discount_amount = Some("40".to_string());

        let record = normalized(&form);

        assert_eq!(record.discount_type, DiscountType::Fixed);
        assert!(record.max_discount_amount.is_none());
    }

    #[test]
    fn rejects_invalid_numbers() {
        let mut form = valid_form();
        form.discount_value = "ten".to_string();
        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidNumber { field: "discountValue", .. })
        ));

        let mut form = valid_form();
        form.min_order_amount = Some("-5".to_string());
        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidNumber { field: "minOrderAmount", .. })
        ));

        let mut form = valid_form();
        form.usage_limit = Some("0".to_string());
        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::InvalidNumber { field: "usageLimit", .. })
        ));
    }

    #[test]
    fn rejects_unknown_enumerations() {
        let mut form = valid_form();
        form.discount_type = "bogo".to_string();
        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::UnknownDiscountType(value)) if value == "bogo"
        ));

        let mut form = valid_form();
        form.applicable_products = Some("everything".to_string());
        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::UnknownProductScope(value)) if value == "everything"
        ));
    }

    #[test]
    fn rejects_overlong_code() {
        let mut form = valid_form();
        form.code = "X".repeat(CODE_MAX_LEN + 1);

        assert!(matches!(
            form.normalize(),
            Err(CouponFormError::Validation(_))
        ));
    }

    #[test]
    fn normalization_is_a_fixed_point() {
        let mut form = valid_form();
        form.min_order_amount = Some("99.99".to_string());
        form.max_discount_amount = Some("12.5".to_string());
        form.usage_limit = Some("7".to_string());
        form.applicable_products = Some("specific".to_string());
        form.product_ids = Some(" a1 , b2 ".to_string());

        let first = normalized(&form);
        let second = normalized(&CouponForm::from(&first));

        assert_eq!(first, second);
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let mut form = valid_form();
        form.start_date = "2024-01-01T00:00:00.000Z".to_string();
        form.end_date = "2024-01-31T05:30:00+05:30".to_string();

        let record = normalized(&form);

        assert_eq!(date_input_value(&record.start_date), "2024-01-01");
        assert_eq!(date_input_value(&record.end_date), "2024-01-31");
    }

    #[test]
    fn deserializes_wire_field_names() {
        let payload = serde_json::json!({
            "code": "SPRING",
            "discountType": "fixed",
            "discountValue": "5",
            "startDate": "2024-03-01",
            "endDate": "2024-03-31",
            "usageLimit": "",
            "isActive": true,
            "applicableProducts": "category",
            "productIds": "shoes, hats",
        });

        let form: CouponForm = match serde_json::from_value(payload) {
            Ok(form) => form,
            Err(err) => panic!("deserialization failed: {err}"),
        };
        let record = normalized(&form);

        assert_eq!(record.discount_type, DiscountType::Fixed);
        assert_eq!(record.applicable_products, ProductScope::Category);
        assert_eq!(record.product_ids, vec!["shoes", "hats"]);
        assert!(record.usage_limit.is_none());
    }
}
