use chrono::{NaiveDateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::sales::{ChartPoint, SalesOverview, SalesPeriod};
use crate::repository::{SalesReader, SubscriberReader};
use crate::services::{ServiceError, ServiceResult};

/// Data required to render the dashboard template.
pub struct DashboardData {
    pub overview: SalesOverview,
    pub chart: Vec<ChartPoint>,
    pub subscriber_count: usize,
}

/// Loads the dashboard for the authenticated user's hub.
pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardData>
where
    R: SalesReader + SubscriberReader + ?Sized,
{
    load_dashboard_at(repo, user, Utc::now().naive_utc())
}

fn load_dashboard_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<DashboardData>
where
    R: SalesReader + SubscriberReader + ?Sized,
{
    let overview = sales_overview_at(repo, user, now)?;
    let subscriber_count = repo
        .count_subscribers(user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(DashboardData {
        chart: overview.chart_points(),
        overview,
        subscriber_count,
    })
}

/// Order counts and revenue for every rolling period ending now.
pub fn sales_overview<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SalesOverview>
where
    R: SalesReader + ?Sized,
{
    sales_overview_at(repo, user, Utc::now().naive_utc())
}

fn sales_overview_at<R>(
    repo: &R,
    user: &AuthenticatedUser,
    now: NaiveDateTime,
) -> ServiceResult<SalesOverview>
where
    R: SalesReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let mut overview = SalesOverview::default();
    for period in SalesPeriod::ALL {
        let totals = repo
            .sales_totals(user.hub_id, period.window_start(now))
            .map_err(ServiceError::from)?;
        overview.set_totals(period, totals);
    }

    Ok(overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::domain::sales::PeriodTotals;
    use crate::domain::subscriber::{Subscriber, SubscriberListQuery};
    use crate::repository::mock::{MockSalesReader, MockSubscriberReader};
    use crate::services::test_support::{fixed_datetime, user_with_roles};
    use pushkind_common::repository::errors::RepositoryResult;

    struct MockDashboardRepo {
        sales: MockSalesReader,
        subscribers: MockSubscriberReader,
    }

    impl SalesReader for MockDashboardRepo {
        fn sales_totals(&self, hub_id: i32, since: NaiveDateTime) -> RepositoryResult<PeriodTotals> {
            self.sales.sales_totals(hub_id, since)
        }
    }

    impl SubscriberReader for MockDashboardRepo {
        fn list_subscribers(
            &self,
            query: SubscriberListQuery,
        ) -> RepositoryResult<(usize, Vec<Subscriber>)> {
            self.subscribers.list_subscribers(query)
        }

        fn get_subscriber_by_email(
            &self,
            email: &str,
            hub_id: i32,
        ) -> RepositoryResult<Option<Subscriber>> {
            self.subscribers.get_subscriber_by_email(email, hub_id)
        }

        fn count_subscribers(&self, hub_id: i32) -> RepositoryResult<usize> {
            self.subscribers.count_subscribers(hub_id)
        }
    }

    #[test]
    fn dashboard_queries_every_window() {
        let now = fixed_datetime();
        let mut sales = MockSalesReader::new();
        sales
            .expect_sales_totals()
            .times(4)
            .withf(|hub_id, _| *hub_id == 11)
            .returning(move |_, since| {
                let days = (now - since).num_days();
                Ok(PeriodTotals {
                    count: days,
                    total_cents: days * 1_000,
                })
            });
        let mut subscribers = MockSubscriberReader::new();
        subscribers
            .expect_count_subscribers()
            .returning(|_| Ok(12));
        let repo = MockDashboardRepo { sales, subscribers };
        let user = user_with_roles(&[SERVICE_ACCESS_ROLE]);

        let data = load_dashboard_at(&repo, &user, now).expect("dashboard");

        assert_eq!(data.overview.daily.count, 1);
        assert_eq!(data.overview.weekly.count, 7);
        assert_eq!(data.overview.monthly.total_cents, 30_000);
        assert_eq!(data.overview.yearly.count, 365);
        assert_eq!(data.subscriber_count, 12);
        let values: Vec<f64> = data.chart.iter().map(|point| point.value).collect();
        assert_eq!(values, vec![10.0, 70.0, 300.0, 3650.0]);
    }

    #[test]
    fn sales_overview_requires_role() {
        let repo = MockDashboardRepo {
            sales: MockSalesReader::new(),
            subscribers: MockSubscriberReader::new(),
        };
        let user = user_with_roles(&["viewer"]);

        let result = sales_overview_at(&repo, &user, fixed_datetime() + Duration::hours(1));

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
