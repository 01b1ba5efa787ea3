use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use electronic_store::config::ServerConfig;
use electronic_store::db::establish_connection_pool;
use electronic_store::repository::DieselRepository;
use electronic_store::routes::admin::{
    add_product, delete_product, sell_product, show_product_editor, show_products, update_product,
};
use electronic_store::routes::api::api_v1_product_names;
use electronic_store::routes::storefront::{
    show_category, show_index, show_product, show_search, show_tag,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let secret_key = match &config.secret {
        Some(key) => match Key::try_from(key.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("SECRET_KEY must be at least 64 bytes long: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("SECRET_KEY is not set, flash messages use a random key");
            Key::generate()
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let storefront_config = config.storefront.clone();
    log::info!("Listening on {}:{}", config.address, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(web::scope("/api").service(api_v1_product_names))
            .service(
                web::scope("/admin")
                    .service(show_products)
                    .service(add_product)
                    .service(show_product_editor)
                    .service(update_product)
                    .service(delete_product)
                    .service(sell_product),
            )
            .service(show_index)
            .service(show_category)
            .service(show_search)
            .service(show_product)
            .service(show_tag)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(storefront_config.clone()))
    })
    .bind((config.address, config.port))?
    .run()
    .await
}
