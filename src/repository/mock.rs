use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    CategoryReader, CategoryWriter, CouponReader, CouponWriter, SalesReader, SubscriberReader,
    SubscriberWriter,
};
use crate::domain::{
    category::{Category, CategoryListQuery, NewCategory, UpdateCategory},
    coupon::{Coupon, CouponListQuery, NewCoupon, UpdateCoupon},
    sales::PeriodTotals,
    subscriber::{NewSubscriber, Subscriber, SubscriberListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub CouponReader {}

    impl CouponReader for CouponReader {
        fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
        fn get_coupon_by_code(&self, code: &str, hub_id: i32) -> RepositoryResult<Option<Coupon>>;
        fn list_coupons(&self, query: CouponListQuery) -> RepositoryResult<(usize, Vec<Coupon>)>;
    }
}

mock! {
    pub CouponWriter {}

    impl CouponWriter for CouponWriter {
        fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<Coupon>;
        fn update_coupon(&self, coupon_id: i32, hub_id: i32, updates: &UpdateCoupon) -> RepositoryResult<Coupon>;
        fn delete_coupon(&self, coupon_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<Vec<Category>>;
        fn get_category_by_id(&self, category_id: i32, hub_id: i32) -> RepositoryResult<Option<Category>>;
        fn get_category_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Category>>;
        fn has_child_categories(&self, category_id: i32, hub_id: i32) -> RepositoryResult<bool>;
    }
}

mock! {
    pub CategoryWriter {}

    impl CategoryWriter for CategoryWriter {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(&self, category_id: i32, hub_id: i32, updates: &UpdateCategory) -> RepositoryResult<Category>;
        fn delete_category(&self, category_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SubscriberReader {}

    impl SubscriberReader for SubscriberReader {
        fn list_subscribers(&self, query: SubscriberListQuery) -> RepositoryResult<(usize, Vec<Subscriber>)>;
        fn get_subscriber_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Subscriber>>;
        fn count_subscribers(&self, hub_id: i32) -> RepositoryResult<usize>;
    }
}

mock! {
    pub SubscriberWriter {}

    impl SubscriberWriter for SubscriberWriter {
        fn create_subscriber(&self, new_subscriber: &NewSubscriber) -> RepositoryResult<Subscriber>;
        fn delete_subscriber(&self, subscriber_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub SalesReader {}

    impl SalesReader for SalesReader {
        fn sales_totals(&self, hub_id: i32, since: NaiveDateTime) -> RepositoryResult<PeriodTotals>;
    }
}
