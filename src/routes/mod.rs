use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

pub mod admin;
pub mod api;
pub mod storefront;

#[derive(Serialize)]
struct Alert {
    /// CSS class matching the message level.
    level: &'static str,
    message: String,
}

/// Template context shared by every page: pending flash messages and the
/// navigation entry to highlight.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level(message.level()),
            message: message.content().to_string(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

fn alert_level(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info => "info",
        _ => "secondary",
    }
}

/// Render `template` into an HTML response.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    render_with_status(tera, template, context, HttpResponse::Ok())
}

/// Render the 404 page.
pub fn render_not_found(tera: &Tera, flash_messages: &IncomingFlashMessages) -> HttpResponse {
    let context = base_context(flash_messages, "");
    render_with_status(
        tera,
        "errors/not_found.html",
        &context,
        HttpResponse::NotFound(),
    )
}

fn render_with_status(
    tera: &Tera,
    template: &str,
    context: &Context,
    mut builder: actix_web::HttpResponseBuilder,
) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => builder.content_type("text/html; charset=utf-8").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
