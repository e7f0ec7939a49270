use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::newsletter::AddSubscriberForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::newsletter::{
    NewsletterQuery, add_subscriber, load_newsletter_page, remove_subscriber,
};

#[get("/newsletter")]
pub async fn show_newsletter(
    params: web::Query<NewsletterQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_newsletter_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "newsletter",
                &server_config.auth_service_url,
            );
            context.insert("subscribers", &data.subscribers);
            context.insert("total_pages", &data.total_pages);
            context.insert("search", &data.search);
            context.insert("total_subscribers", &data.total_subscribers);
            render_template(&tera, "newsletter/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list subscribers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/newsletter/add")]
pub async fn add_newsletter_subscriber(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddSubscriberForm>,
) -> impl Responder {
    match add_subscriber(repo.get_ref(), &user, form) {
        Ok(subscriber) => {
            FlashMessage::success(format!("Подписчик {} добавлен.", subscriber.email)).send();
            redirect("/newsletter")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/newsletter")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Этот адрес уже подписан.").send();
            redirect("/newsletter")
        }
        Err(err) => {
            log::error!("Failed to add subscriber: {err}");
            FlashMessage::error("Не удалось добавить подписчика.").send();
            redirect("/newsletter")
        }
    }
}

#[post("/newsletter/{subscriber_id}/delete")]
pub async fn delete_newsletter_subscriber(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let subscriber_id = path.into_inner();

    match remove_subscriber(repo.get_ref(), &user, subscriber_id) {
        Ok(()) => {
            FlashMessage::success("Подписчик удалён.").send();
            redirect("/newsletter")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Подписчик не найден или уже удалён.").send();
            redirect("/newsletter")
        }
        Err(err) => {
            log::error!("Failed to delete subscriber {subscriber_id}: {err}");
            FlashMessage::error("Не удалось удалить подписчика.").send();
            redirect("/newsletter")
        }
    }
}
