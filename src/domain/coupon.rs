use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// How the discount value of a coupon is interpreted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the order amount.
    #[default]
    Percentage,
    /// `discount_value` is a currency amount.
    Fixed,
}

impl DiscountType {
    /// Parse the wire representation used by forms and the database.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

/// Which products a coupon can be applied to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductScope {
    /// Every product of the hub.
    #[default]
    All,
    /// Only the products listed in `product_ids`.
    Specific,
    /// Products whose category is listed in `product_ids`.
    Category,
}

impl ProductScope {
    /// Parse the wire representation used by forms and the database.
    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "specific" => Some(Self::Specific),
            "category" => Some(Self::Category),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Specific => "specific",
            Self::Category => "category",
        }
    }
}

/// Normalized coupon definition ready to be stored or transmitted.
///
/// Produced by [`crate::forms::coupons::CouponForm::normalize`]; every field is
/// already typed, optional values are `None` rather than zero.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    /// Code customers type at checkout.
    pub code: String,
    /// Interpretation of `discount_value`.
    pub discount_type: DiscountType,
    /// Percentage or currency amount depending on `discount_type`.
    pub discount_value: f64,
    /// Minimum order amount required before the coupon applies.
    pub min_order_amount: f64,
    /// Cap on the discount of percentage coupons.
    pub max_discount_amount: Option<f64>,
    /// First instant the coupon is valid.
    pub start_date: DateTime<Utc>,
    /// Last calendar day the coupon is valid.
    pub end_date: DateTime<Utc>,
    /// Maximum number of redemptions; `None` means unlimited.
    pub usage_limit: Option<i32>,
    /// Whether the coupon can be redeemed at all.
    pub is_active: bool,
    /// Scope of products the coupon applies to.
    pub applicable_products: ProductScope,
    /// Product or category identifiers, depending on `applicable_products`.
    pub product_ids: Vec<String>,
}

/// Domain representation of a coupon stored for a hub.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique identifier of the coupon.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Editable coupon definition.
    #[serde(flatten)]
    pub record: CouponRecord,
    /// Number of times the coupon has been redeemed.
    pub times_used: i32,
    /// Timestamp for when the coupon record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the coupon record.
    pub updated_at: NaiveDateTime,
}

impl Coupon {
    /// Whether the coupon can be redeemed at `now`.
    ///
    /// The end date names the last valid calendar day, so the coupon stays
    /// valid for the whole of that day.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        let record = &self.record;

        if !record.is_active {
            return false;
        }

        if now < record.start_date || now >= record.end_date + Duration::days(1) {
            return false;
        }

        match record.usage_limit {
            Some(limit) => self.times_used < limit,
            None => true,
        }
    }

    /// Discount granted on an order of `order_amount`.
    ///
    /// Non-finite amounts get no discount.
    pub fn discount_for(&self, order_amount: f64) -> f64 {
        let record = &self.record;

        if !order_amount.is_finite() {
            return 0.0;
        }

        if order_amount <= 0.0 || order_amount < record.min_order_amount {
            return 0.0;
        }

        let discount = match record.discount_type {
            DiscountType::Percentage => {
                let raw = order_amount * record.discount_value / 100.0;
                match record.max_discount_amount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            DiscountType::Fixed => record.discount_value,
        };

        discount.clamp(0.0, order_amount)
    }

    /// Whether the coupon covers a product with the given identifiers.
    pub fn applies_to_product(&self, product_id: &str, category_id: Option<&str>) -> bool {
        let record = &self.record;

        match record.applicable_products {
            ProductScope::All => true,
            ProductScope::Specific => record.product_ids.iter().any(|id| id == product_id),
            ProductScope::Category => match category_id {
                Some(category_id) => record.product_ids.iter().any(|id| id == category_id),
                None => false,
            },
        }
    }
}

/// Payload required to insert a new coupon for a hub.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Normalized coupon definition.
    pub record: CouponRecord,
    /// Timestamp captured when the coupon payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCoupon {
    /// Build a new coupon payload for `hub_id` with the current timestamp.
    pub fn new(hub_id: i32, record: CouponRecord) -> Self {
        Self {
            hub_id,
            record,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Replacement of the editable fields of an existing coupon.
#[derive(Debug, Clone)]
pub struct UpdateCoupon {
    /// Normalized coupon definition overwriting the stored one.
    pub record: CouponRecord,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateCoupon {
    pub fn new(record: CouponRecord) -> Self {
        Self {
            record,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list coupons for a hub.
#[derive(Debug, Clone)]
pub struct CouponListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional substring filter applied to coupon codes.
    pub search: Option<String>,
    /// Restrict the results to active coupons.
    pub active_only: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl CouponListQuery {
    /// Construct a query that targets all coupons belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            active_only: false,
            pagination: None,
        }
    }

    /// Filter the results by a substring of the coupon code.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Only return coupons flagged as active.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
