use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;

use crate::domain::sales::{ChartPoint, SalesOverview};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::coupons::{CouponsQuery, list_coupons};
use crate::services::dashboard::sales_overview;
use crate::services::newsletter::{NewsletterQuery, list_subscribers};

#[derive(Serialize)]
struct SalesOverviewResponse {
    overview: SalesOverview,
    chart: Vec<ChartPoint>,
}

#[get("/v1/sales-overview")]
/// Sales totals per rolling period together with the chart series.
///
/// Users without the role stored in `crate::SERVICE_ACCESS_ROLE` receive a `401 Unauthorized` response.
pub async fn api_v1_sales_overview(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match sales_overview(repo.get_ref(), &user) {
        Ok(overview) => HttpResponse::Ok().json(SalesOverviewResponse {
            chart: overview.chart_points(),
            overview,
        }),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to compute sales overview: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/coupons")]
/// Return a JSON list of the hub's coupons, optionally filtered by code.
pub async fn api_v1_coupons(
    params: web::Query<CouponsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_coupons(repo.get_ref(), &user, params.into_inner()) {
        Ok(coupons) => HttpResponse::Ok().json(coupons),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list coupons: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/subscribers")]
/// Return a JSON list of newsletter subscribers, optionally filtered by e-mail.
pub async fn api_v1_subscribers(
    params: web::Query<NewsletterQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_subscribers(repo.get_ref(), &user, params.into_inner()) {
        Ok(subscribers) => HttpResponse::Ok().json(subscribers),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list subscribers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
