use chrono::NaiveDateTime;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::sales::PeriodTotals;
use crate::models::order::{CANCELLED_STATUS, lower};
use crate::repository::{DieselRepository, SalesReader};

impl SalesReader for DieselRepository {
    fn sales_totals(&self, hub_id: i32, since: NaiveDateTime) -> RepositoryResult<PeriodTotals> {
        use crate::schema::orders;

        let mut conn = self.conn()?;

        let (count, total_cents) = orders::table
            .filter(orders::hub_id.eq(hub_id))
            .filter(orders::created_at.ge(since))
            .filter(lower(orders::status).ne(CANCELLED_STATUS))
            .select((count_star(), sum(orders::total_cents)))
            .get_result::<(i64, Option<i64>)>(&mut conn)?;

        Ok(PeriodTotals {
            count,
            total_cents: total_cents.unwrap_or_default(),
        })
    }
}
