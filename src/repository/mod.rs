use chrono::NaiveDateTime;
use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{Category, CategoryListQuery, NewCategory, UpdateCategory};
use crate::domain::coupon::{Coupon, CouponListQuery, NewCoupon, UpdateCoupon};
use crate::domain::sales::PeriodTotals;
use crate::domain::subscriber::{NewSubscriber, Subscriber, SubscriberListQuery};

pub mod category;
pub mod coupon;
pub mod sales;
pub mod subscriber;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Offset and limit for a 1-based page.
fn page_window(page: usize, per_page: usize) -> (i64, i64) {
    let page = page.max(1);
    (((page - 1) * per_page) as i64, per_page as i64)
}

/// Read-only operations over coupon records.
pub trait CouponReader {
    fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
    fn get_coupon_by_code(&self, code: &str, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
    fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
}

/// Write operations over coupon records.
pub trait CouponWriter {
    fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
    fn update_coupon(
        &self,
        coupon_id: i32,
        hub_id: i32,
        updates: &UpdateCoupon,
    ) -> RepositoryResult<Coupon>;
    fn delete_coupon(&self, coupon_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over category records.
pub trait CategoryReader {
    fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
    fn get_category_by_id(&self, category_id: i32, hub_id: i32)
    -> RepositoryResult<Option<Category>>;
    fn get_category_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Category>>;
    /// Whether any category of the hub names `category_id` as its parent.
    fn has_child_categories(&self, category_id: i32, hub_id: i32) -> RepositoryResult<bool>;
}

/// Write operations over category records.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    /// Removes the category and moves its children to the top level.
    fn delete_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over newsletter subscribers.
pub trait SubscriberReader {
    fn list_subscribers(
        &self,
        query: SubscriberListQuery,
    ) -> RepositoryResult<(usize, Vec<Subscriber>)>;
    fn get_subscriber_by_email(
        &self,
        email: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<Subscriber>>;
    fn count_subscribers(&self, hub_id: i32) -> RepositoryResult<usize>;
}

/// Write operations over newsletter subscribers.
pub trait SubscriberWriter {
    fn create_subscriber(&self, new_subscriber: &NewSubscriber) -> RepositoryResult<Subscriber>;
    fn delete_subscriber(&self, subscriber_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Aggregates over orders placed through the storefront.
pub trait SalesReader {
    /// Count and revenue of non-cancelled orders created at or after `since`.
    fn sales_totals(&self, hub_id: i32, since: NaiveDateTime) -> RepositoryResult<PeriodTotals>;
}
