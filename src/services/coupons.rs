use chrono::{DateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::coupon::{Coupon, CouponListQuery};
use crate::forms::coupons::{CouponForm, date_input_value};
use crate::repository::{CouponReader, CouponWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the coupons index page and API.
#[derive(Debug, Default, Deserialize)]
pub struct CouponsQuery {
    /// Substring of the coupon code.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    #[serde(default)]
    pub active_only: bool,
}

/// Data required to render the coupons index template.
pub struct CouponsPageData {
    pub coupons: Paginated<CouponView>,
    /// Drives the pager; zero when nothing matches.
    pub total_pages: usize,
    pub search: Option<String>,
    pub active_only: bool,
}

/// Row of the coupons table, with values pre-rendered for the edit dialog.
#[derive(Debug, Serialize)]
pub struct CouponView {
    pub id: i32,
    pub code: String,
    pub discount_type: &'static str,
    pub discount_value: f64,
    pub min_order_amount: f64,
    pub max_discount_amount: Option<f64>,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub usage_limit: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    /// Whether a customer could apply the coupon right now.
    pub is_redeemable: bool,
    pub applicable_products: &'static str,
    /// Comma separated identifiers, ready for the text input.
    pub product_ids: String,
}

impl CouponView {
    fn from_coupon(coupon: Coupon, now: DateTime<Utc>) -> Self {
        let is_redeemable = coupon.is_redeemable_at(now);
        let Coupon {
            id,
            record,
            times_used,
            ..
        } = coupon;

        Self {
            id,
            discount_type: record.discount_type.as_str(),
            discount_value: record.discount_value,
            min_order_amount: record.min_order_amount,
            max_discount_amount: record.max_discount_amount,
            start_date: date_input_value(&record.start_date),
            end_date: date_input_value(&record.end_date),
            usage_limit: record.usage_limit,
            times_used,
            is_active: record.is_active,
            is_redeemable,
            applicable_products: record.applicable_products.as_str(),
            product_ids: record.product_ids.join(", "),
            code: record.code,
        }
    }
}

fn list_query(hub_id: i32, query: &CouponsQuery) -> CouponListQuery {
    let mut list_query = CouponListQuery::new(hub_id);

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|term| !term.is_empty()) {
        list_query = list_query.search(term);
    }

    if query.active_only {
        list_query = list_query.active_only();
    }

    list_query
}

/// Loads the coupons overview page.
pub fn load_coupons_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CouponsQuery,
) -> ServiceResult<CouponsPageData>
where
    R: CouponReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let list_query = list_query(user.hub_id, &query).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let (total, items) = repo.list_coupons(list_query).map_err(ServiceError::from)?;

    let now = Utc::now();
    let views = items
        .into_iter()
        .map(|coupon| CouponView::from_coupon(coupon, now))
        .collect();

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(CouponsPageData {
        coupons: Paginated::new(views, page, total_pages),
        total_pages,
        search: query.search,
        active_only: query.active_only,
    })
}

/// Returns every coupon of the hub matching `query`, unpaginated.
pub fn list_coupons<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CouponsQuery,
) -> ServiceResult<Vec<Coupon>>
where
    R: CouponReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let (_, coupons) = repo
        .list_coupons(list_query(user.hub_id, &query))
        .map_err(ServiceError::from)?;

    Ok(coupons)
}

/// Validates the submitted definition and stores it as a new coupon.
pub fn create_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponReader + CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_coupon = form
        .into_new_coupon(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_coupon_by_code(&new_coupon.record.code, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_coupon(&new_coupon).map_err(ServiceError::from)
}

/// Validates the submitted definition and overwrites coupon `coupon_id`.
pub fn modify_coupon<R>(
    repo: &R,
    user: &AuthenticatedUser,
    coupon_id: i32,
    form: CouponForm,
) -> ServiceResult<Coupon>
where
    R: CouponReader + CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    if repo
        .get_coupon_by_id(coupon_id, user.hub_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::NotFound);
    }

    let update = form
        .into_update_coupon()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(existing) = repo
        .get_coupon_by_code(&update.record.code, user.hub_id)
        .map_err(ServiceError::from)?
        && existing.id != coupon_id
    {
        return Err(ServiceError::Conflict);
    }

    repo.update_coupon(coupon_id, user.hub_id, &update)
        .map_err(ServiceError::from)
}

/// Deletes a coupon of the authenticated user's hub.
pub fn remove_coupon<R>(repo: &R, user: &AuthenticatedUser, coupon_id: i32) -> ServiceResult<()>
where
    R: CouponWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_coupon(coupon_id, user.hub_id)
        .map_err(ServiceError::from)
}
