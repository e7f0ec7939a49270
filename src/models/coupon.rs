use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::coupon::{
    Coupon as DomainCoupon, CouponRecord, DiscountType, NewCoupon as DomainNewCoupon,
    ProductScope, UpdateCoupon as DomainUpdateCoupon,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct Coupon {
    pub id: i32,
    pub hub_id: i32,
    pub code: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub min_order_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub usage_limit: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    pub applicable_products: String,
    /// JSON array of identifiers.
    pub product_ids: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct NewCoupon<'a> {
    pub hub_id: i32,
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: f64,
    pub min_order_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    pub applicable_products: &'a str,
    pub product_ids: String,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::coupons)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCoupon<'a> {
    pub code: &'a str,
    pub discount_type: &'a str,
    pub discount_value: f64,
    pub min_order_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub usage_limit: Option<i32>,
    pub is_active: bool,
    pub applicable_products: &'a str,
    pub product_ids: String,
    pub updated_at: NaiveDateTime,
}

fn encode_ids(ids: &[String]) -> String {
    serde_json::json!(ids).to_string()
}

fn decode_ids(coupon_id: i32, raw: &str) -> Vec<String> {
    match serde_json::from_str(raw) {
        Ok(ids) => ids,
        Err(err) => {
            log::warn!("Coupon {coupon_id} has malformed product ids: {err}");
            Vec::new()
        }
    }
}

impl From<Coupon> for DomainCoupon {
    fn from(value: Coupon) -> Self {
        let product_ids = decode_ids(value.id, &value.product_ids);

        Self {
            id: value.id,
            hub_id: value.hub_id,
            record: CouponRecord {
                code: value.code,
                discount_type: DiscountType::from_code(&value.discount_type).unwrap_or_default(),
                discount_value: value.discount_value,
                min_order_amount: value.min_order_amount,
                max_discount_amount: value.max_discount_amount,
                start_date: value.start_date.and_utc(),
                end_date: value.end_date.and_utc(),
                usage_limit: value.usage_limit,
                is_active: value.is_active,
                applicable_products: ProductScope::from_code(&value.applicable_products)
                    .unwrap_or_default(),
                product_ids,
            },
            times_used: value.times_used,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCoupon> for NewCoupon<'a> {
    fn from(value: &'a DomainNewCoupon) -> Self {
        let record = &value.record;
        Self {
            hub_id: value.hub_id,
            code: record.code.as_str(),
            discount_type: record.discount_type.as_str(),
            discount_value: record.discount_value,
            min_order_amount: record.min_order_amount,
            max_discount_amount: record.max_discount_amount,
            start_date: record.start_date.naive_utc(),
            end_date: record.end_date.naive_utc(),
            usage_limit: record.usage_limit,
            is_active: record.is_active,
            applicable_products: record.applicable_products.as_str(),
            product_ids: encode_ids(&record.product_ids),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCoupon> for UpdateCoupon<'a> {
    fn from(value: &'a DomainUpdateCoupon) -> Self {
        let record = &value.record;
        Self {
            code: record.code.as_str(),
            discount_type: record.discount_type.as_str(),
            discount_value: record.discount_value,
            min_order_amount: record.min_order_amount,
            max_discount_amount: record.max_discount_amount,
            start_date: record.start_date.naive_utc(),
            end_date: record.end_date.naive_utc(),
            usage_limit: record.usage_limit,
            is_active: record.is_active,
            applicable_products: record.applicable_products.as_str(),
            product_ids: encode_ids(&record.product_ids),
            updated_at: value.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_ids_are_stored_as_json() {
        let encoded = encode_ids(&["123".to_string(), "a,b".to_string()]);

        assert_eq!(encoded, r#"["123","a,b"]"#);
        assert_eq!(decode_ids(1, &encoded), vec!["123", "a,b"]);
    }

    #[test]
    fn malformed_product_ids_decode_to_empty() {
        assert!(decode_ids(1, "not json").is_empty());
    }
}
