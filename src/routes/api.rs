use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::services::storefront::{SuggestionQuery, load_name_suggestions};

#[get("/v1/products/names")]
/// Return a JSON list of published product names containing `term`.
pub async fn api_v1_product_names(
    params: web::Query<SuggestionQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_name_suggestions(repo.get_ref(), params.0) {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(err) => {
            log::error!("Failed to suggest product names: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
