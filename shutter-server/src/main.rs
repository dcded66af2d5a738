use anyhow::Context as _;
use shutter::store::JournalStore;
use shutter::Shutter;
use shutter_server::app::{build_router, AppState};
use shutter_server::model::Database;
use shutter_server::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    colog::init();

    let settings = Settings::new().context("failed to load settings")?;
    let store = JournalStore::open(&settings.storage.data_dir).await?;
    let db = Shutter::builder().with_store(store).open().await?;
    let database = Database::open(&db).await?;

    let state = AppState {
        db: database,
        uploads_dir: settings.storage.uploads_dir.clone().into(),
    };
    let app = build_router(state);

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    log::info!("Listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
