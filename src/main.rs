use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use warden::config::Config;
use warden::server::Listener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr.with_max_level(Level::WARN).or_else(std::io::stdout))
        .init();

    let cfg = Config::load()?;
    let listener = Listener::bind(&cfg).await?;

    tracing::info!("Listening on {}", listener.local_addr()?);
    let root = listener.document_root().path();
    tracing::info!("Document root: {}", root.display());
    if !root.is_dir() {
        tracing::warn!("Document root is not a directory, every request will be answered 404");
    }
    tracing::info!("Press CTRL-C to stop");

    tokio::select! {
        res = listener.serve() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Server closed");
    Ok(())
}
