use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::products::{ProductForm, SellProductForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_not_found, render_template};
use crate::services::ServiceError;
use crate::services::admin::{
    AdminProductsQuery, create_product, edit_product, load_admin_products, load_product_editor,
    remove_product, sell_stock,
};

const PRODUCTS_URL: &str = "/admin/products";

#[get("/products")]
pub async fn show_products(
    params: web::Query<AdminProductsQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_admin_products(repo.get_ref(), params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "admin_products");
            context.insert("products", &data.products);
            context.insert("keyword", &data.keyword);
            context.insert("search_action", PRODUCTS_URL);
            render_template(&tera, "admin/products.html", &context)
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/{product_id}")]
pub async fn show_product_editor(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_product_editor(repo.get_ref(), product_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "admin_products");
            context.insert("product", &data.product);
            context.insert("tags", &data.tags);
            render_template(&tera, "admin/product.html", &context)
        }
        Err(ServiceError::NotFound) => render_not_found(&tera, &flash_messages),
        Err(err) => {
            log::error!("Failed to load the product editor: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), form) {
        Ok(product) => {
            FlashMessage::success(format!("Product «{}» added.", product.name)).send();
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to add a product: {err}");
            FlashMessage::error("Error while adding the product.").send();
        }
    }
    redirect(PRODUCTS_URL)
}

#[post("/products/{product_id}/edit")]
pub async fn update_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let editor_url = format!("{PRODUCTS_URL}/{product_id}");

    match edit_product(repo.get_ref(), product_id, form) {
        Ok(product) => {
            FlashMessage::success(format!("Product «{}» updated.", product.name)).send();
            redirect(&editor_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect(PRODUCTS_URL)
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect(&editor_url)
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            FlashMessage::error("Error while updating the product.").send();
            redirect(&editor_url)
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match remove_product(repo.get_ref(), product_id) {
        Ok(product) => {
            FlashMessage::success(format!("Product «{}» deleted.", product.name)).send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Error while deleting the product.").send();
        }
    }
    redirect(PRODUCTS_URL)
}

#[post("/products/{product_id}/sell")]
pub async fn sell_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SellProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match sell_stock(repo.get_ref(), product_id, form) {
        Ok(product) => {
            FlashMessage::success(format!(
                "Sold. «{}» has {} units left.",
                product.name, product.quantity
            ))
            .send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
        }
        Err(ServiceError::InsufficientStock {
            requested,
            available,
            ..
        }) => {
            FlashMessage::error(format!(
                "Only {available} units in stock, {requested} requested."
            ))
            .send();
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::warning("Stock changed meanwhile, please retry.").send();
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to sell product {product_id}: {err}");
            FlashMessage::error("Error while selling the product.").send();
        }
    }
    redirect(PRODUCTS_URL)
}
