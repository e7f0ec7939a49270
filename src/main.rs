use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use pushkind_shop_admin::forms::categories::CategoryImageStore;
use pushkind_shop_admin::repository::DieselRepository;
use pushkind_shop_admin::routes::api::{api_v1_coupons, api_v1_sales_overview, api_v1_subscribers};
use pushkind_shop_admin::routes::categories::{
    add_category, delete_category, edit_category, show_categories,
};
use pushkind_shop_admin::routes::coupons::{add_coupon, delete_coupon, edit_coupon, show_coupons};
use pushkind_shop_admin::routes::main::show_index;
use pushkind_shop_admin::routes::newsletter::{
    add_newsletter_subscriber, delete_newsletter_subscriber, show_newsletter,
};

/// Process settings read from the environment.
struct ServerSettings {
    database_url: String,
    address: String,
    port: u16,
    domain: String,
    secret_key: Key,
    category_images: CategoryImageStore,
    common: CommonServerConfig,
}

impl ServerSettings {
    fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "app.db".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(8080);
        let address = env::var("ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string());
        let domain = env::var("DOMAIN").unwrap_or_else(|_| "localhost".to_string());

        let secret = env::var("SECRET_KEY").ok();
        let secret_key = match &secret {
            Some(key) => Key::from(key.as_bytes()),
            None => {
                log::warn!("SECRET_KEY not set, sessions will not survive a restart");
                Key::generate()
            }
        };

        let category_images = CategoryImageStore::new(
            env::var("CATEGORY_IMAGE_DIR")
                .unwrap_or_else(|_| "./assets/uploads/categories".to_string()),
            "/assets/uploads/categories",
        );

        let auth_service_url = env::var("AUTH_SERVICE_URL")
            .map_err(|_| "AUTH_SERVICE_URL environment variable not set".to_string())?;

        Ok(Self {
            database_url,
            address,
            port,
            domain,
            secret_key,
            category_images,
            common: CommonServerConfig {
                secret: secret.unwrap_or_default(),
                auth_service_url,
            },
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let ServerSettings {
        database_url,
        address,
        port,
        domain,
        secret_key,
        category_images,
        common: common_config,
    } = match ServerSettings::from_env() {
        Ok(settings) => settings,
        Err(message) => {
            log::error!("{message}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("/api")
                    .service(api_v1_sales_overview)
                    .service(api_v1_coupons)
                    .service(api_v1_subscribers),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_coupons)
                    .service(add_coupon)
                    .service(edit_coupon)
                    .service(delete_coupon)
                    .service(show_categories)
                    .service(add_category)
                    .service(edit_category)
                    .service(delete_category)
                    .service(show_newsletter)
                    .service(add_newsletter_subscriber)
                    .service(delete_newsletter_subscriber)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(category_images.clone()))
    })
    .bind((address.as_str(), port))?
    .run()
    .await
}
