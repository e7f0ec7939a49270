use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::coupons::CouponForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::coupons::{
    CouponsQuery, create_coupon, load_coupons_page, modify_coupon, remove_coupon,
};

#[get("/coupons")]
pub async fn show_coupons(
    params: web::Query<CouponsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_coupons_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "coupons",
                &server_config.auth_service_url,
            );
            context.insert("coupons", &data.coupons);
            context.insert("total_pages", &data.total_pages);
            context.insert("search", &data.search);
            context.insert("active_only", &data.active_only);
            render_template(&tera, "coupons/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list coupons: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/coupons/add")]
pub async fn add_coupon(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CouponForm>,
) -> impl Responder {
    match create_coupon(repo.get_ref(), &user, form) {
        Ok(coupon) => {
            FlashMessage::success(format!("Купон «{}» добавлен.", coupon.record.code)).send();
            redirect("/coupons")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/coupons")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Купон с таким кодом уже существует.").send();
            redirect("/coupons")
        }
        Err(err) => {
            log::error!("Failed to create coupon: {err}");
            FlashMessage::error("Не удалось создать купон.").send();
            redirect("/coupons")
        }
    }
}

#[post("/coupons/{coupon_id}/edit")]
pub async fn edit_coupon(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CouponForm>,
) -> impl Responder {
    let coupon_id = path.into_inner();

    match modify_coupon(repo.get_ref(), &user, coupon_id, form) {
        Ok(coupon) => {
            FlashMessage::success(format!("Купон «{}» изменён.", coupon.record.code)).send();
            redirect("/coupons")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/coupons")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Купон не найден.").send();
            redirect("/coupons")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Купон с таким кодом уже существует.").send();
            redirect("/coupons")
        }
        Err(err) => {
            log::error!("Failed to update coupon {coupon_id}: {err}");
            FlashMessage::error("Не удалось изменить купон.").send();
            redirect("/coupons")
        }
    }
}

#[post("/coupons/{coupon_id}/delete")]
pub async fn delete_coupon(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let coupon_id = path.into_inner();

    match remove_coupon(repo.get_ref(), &user, coupon_id) {
        Ok(()) => {
            FlashMessage::success("Купон удалён.").send();
            redirect("/coupons")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Купон не найден или уже удалён.").send();
            redirect("/coupons")
        }
        Err(err) => {
            log::error!("Failed to delete coupon {coupon_id}: {err}");
            FlashMessage::error("Не удалось удалить купон.").send();
            redirect("/coupons")
        }
    }
}
