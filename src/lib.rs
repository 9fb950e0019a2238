pub mod cache;
pub mod config;
pub mod error;
pub mod field_source;
pub mod models;
pub mod routes;
pub mod upload_pipeline;

use worker::{Context, Env, Request, Response, Result, ScheduleContext, ScheduledEvent, event};

#[event(fetch)]
async fn fetch(req: Request, env: Env, ctx: Context) -> Result<Response> {
    routes::handle(req, env, ctx).await
}

#[event(scheduled)]
async fn scheduled(_event: ScheduledEvent, env: Env, _ctx: ScheduleContext) {
    let config = config::WorkerConfig::from_env(&env);

    if let Err(error) = upload_pipeline::refresh_all_kinds(&config).await {
        worker::console_error!("scheduled field definition refresh failed: {error}");
    }
}
