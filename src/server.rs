use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use actix_web::{App, HttpServer, ResponseError, web};
use anyhow::Context;
use serenity::all::Http;
use tracing::info;

use crate::{AppVarsInner, routes};

#[derive(Clone)]
pub(crate) struct AppData {
    pub(crate) http_action: Arc<Http>,
}
pub(crate) type ExtractedAppData = web::Data<AppData>;

#[repr(transparent)]
#[derive(Debug)]
pub(crate) struct AnyhowBridge(anyhow::Error);

impl Display for AnyhowBridge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<T> for AnyhowBridge
where
    T: Into<anyhow::Error>,
{
    fn from(value: T) -> Self {
        Self(value.into())
    }
}

pub(crate) type Result<T> = std::result::Result<T, AnyhowBridge>;

impl ResponseError for AnyhowBridge {}

pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::health::index).service(
        web::scope("/commands").service(routes::commands::register_guild),
    );
}

pub(crate) async fn run(data: Arc<AppVarsInner>, http_action: Arc<Http>) -> anyhow::Result<()> {
    let port = data.env.app.port;
    let app_data = AppData { http_action };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_data.clone()))
            .configure(configure)
    })
    .bind(("::", port))
    .with_context(|| format!("failed to bind to port {port}"))?;

    info!("Listening on port {port}...");

    Ok(server.run().await?)
}
