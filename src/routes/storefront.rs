use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::{Context, Tera};

use crate::config::StorefrontConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_not_found, render_template};
use crate::services::ServiceError;
use crate::services::storefront::{self, ListingPageData, ListingQuery, SearchQuery};

#[get("/")]
pub async fn show_index(
    repo: web::Data<DieselRepository>,
    config: web::Data<StorefrontConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match storefront::load_home_page(repo.get_ref(), config.get_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("new_arrivals", &data.new_arrivals);
            context.insert("hot_products", &data.hot_products);
            render_template(&tera, "storefront/index.html", &context)
        }
        Err(err) => failure_response(&tera, &flash_messages, err, "load the home page"),
    }
}

#[get("/categories/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    params: web::Query<ListingQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<StorefrontConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let category_id = category_id.into_inner();

    match storefront::load_category_page(repo.get_ref(), config.get_ref(), category_id, params.0)
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "category");
            context.insert("category_id", &category_id);
            insert_listing(&mut context, &data, &format!("/categories/{category_id}"));
            render_template(&tera, "storefront/category.html", &context)
        }
        Err(err) => failure_response(&tera, &flash_messages, err, "list a category"),
    }
}

#[get("/search")]
pub async fn show_search(
    params: web::Query<SearchQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<StorefrontConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match storefront::load_search_page(repo.get_ref(), config.get_ref(), params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "search");
            context.insert("keyword", &data.keyword);
            insert_listing(&mut context, &data.listing, "/search");
            render_template(&tera, "storefront/search.html", &context)
        }
        Err(err) => failure_response(&tera, &flash_messages, err, "search products"),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    config: web::Data<StorefrontConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match storefront::load_product_page(repo.get_ref(), config.get_ref(), product_id.into_inner())
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "product");
            context.insert("product", &data.product);
            context.insert("tags", &data.tags);
            context.insert("related", &data.related);
            render_template(&tera, "storefront/product.html", &context)
        }
        Err(err) => failure_response(&tera, &flash_messages, err, "load a product"),
    }
}

#[get("/tags/{tag_id}")]
pub async fn show_tag(
    tag_id: web::Path<i32>,
    params: web::Query<ListingQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<StorefrontConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match storefront::load_tag_page(repo.get_ref(), config.get_ref(), tag_id.into_inner(), params.0)
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "tag");
            context.insert("tag", &data.tag);
            insert_listing(&mut context, &data.listing, &format!("/tags/{}", data.tag.id));
            render_template(&tera, "storefront/tag.html", &context)
        }
        Err(err) => failure_response(&tera, &flash_messages, err, "list a tag"),
    }
}

fn insert_listing(context: &mut Context, listing: &ListingPageData, base_url: &str) {
    context.insert("products", &listing.products);
    context.insert("sort", &listing.sort);
    context.insert("base_url", base_url);
}

fn failure_response(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    err: ServiceError,
    action: &str,
) -> HttpResponse {
    match err {
        ServiceError::NotFound => render_not_found(tera, flash_messages),
        ServiceError::Validation(message) => HttpResponse::BadRequest().body(message),
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
