use actix_web::{HttpResponse, Responder, get};

pub(crate) const RUNNING_TEXT: &str = "Discord Role Memory Bot is running!";

#[get("/")]
pub(crate) async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(RUNNING_TEXT)
}
