use std::sync::Arc;

use dotenvy::dotenv;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use timetable_api::router::init_router;
use timetable_api::scheduler::ReminderScheduler;
use timetable_api::state::init_app_state;
use timetable_api::utils::email::EmailService;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    let scheduler = ReminderScheduler::new(
        state.db.clone(),
        Arc::new(EmailService::new(state.email_config.clone())),
        state.scheduler_config.clone(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = scheduler.spawn(shutdown_rx);

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // The listener has drained; stop the reminder loop and let an in-flight
    // tick finish before exiting.
    let _ = shutdown_tx.send(true);
    let _ = scheduler_handle.await;
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
