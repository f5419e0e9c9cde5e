use std::sync::Arc;

use anyhow::Context;
use bookshelf_app::books;
use bookshelf_kernel::settings::{LogFormat, Settings};
use bookshelf_store::BookStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match settings.telemetry.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().try_init().ok(),
        LogFormat::Pretty => tracing_subscriber::fmt().try_init().ok(),
    };

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path,
        "bookshelf bootstrap starting"
    );

    let store = Arc::new(
        BookStore::open(&settings.database.path).context("failed to open book database")?,
    );
    store
        .ensure_schema()
        .context("failed to ensure book schema")?;

    bookshelf_http::start_server(books::router(store), &settings).await
}
