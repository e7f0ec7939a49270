use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::coupon::{
    Coupon as DomainCoupon, CouponListQuery, NewCoupon as DomainNewCoupon,
    UpdateCoupon as DomainUpdateCoupon,
};
use crate::models::coupon::{Coupon as DbCoupon, NewCoupon as DbNewCoupon, UpdateCoupon};
use crate::repository::{CouponReader, CouponWriter, DieselRepository, page_window};

impl CouponReader for DieselRepository {
    fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let coupon = coupons::table
            .filter(coupons::id.eq(id))
            .filter(coupons::hub_id.eq(hub_id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(DomainCoupon::from))
    }

    fn get_coupon_by_code(
        &self,
        code: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let coupon = coupons::table
            .filter(coupons::code.eq(code))
            .filter(coupons::hub_id.eq(hub_id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(DomainCoupon::from))
    }

    fn list_coupons(
        &self,
        query: CouponListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCoupon>)> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let build = || {
            let mut items = coupons::table
                .filter(coupons::hub_id.eq(query.hub_id))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if query.active_only {
                items = items.filter(coupons::is_active.eq(true));
            }

            if let Some(term) = query.search.as_ref() {
                items = items.filter(coupons::code.like(format!("%{term}%")));
            }

            items
        };

        let total = build().count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = build().order((coupons::end_date.desc(), coupons::code.asc()));

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_window(pagination.page, pagination.per_page);
            items_query = items_query.offset(offset).limit(limit);
        }

        let coupons = items_query
            .load::<DbCoupon>(&mut conn)?
            .into_iter()
            .map(DomainCoupon::from)
            .collect();

        Ok((total, coupons))
    }
}

impl CouponWriter for DieselRepository {
    fn create_coupon(&self, new_coupon: &DomainNewCoupon) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let insertable = DbNewCoupon::from(new_coupon);

        let created = diesel::insert_into(coupons::table)
            .values(&insertable)
            .get_result::<DbCoupon>(&mut conn)?;

        Ok(created.into())
    }

    fn update_coupon(
        &self,
        coupon_id: i32,
        hub_id: i32,
        updates: &DomainUpdateCoupon,
    ) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let db_updates = UpdateCoupon::from(updates);

        let target = coupons::table
            .filter(coupons::id.eq(coupon_id))
            .filter(coupons::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCoupon>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn delete_coupon(&self, coupon_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            coupons::table
                .filter(coupons::id.eq(coupon_id))
                .filter(coupons::hub_id.eq(hub_id)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
