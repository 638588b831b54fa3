use std::sync::Arc;

use adhesive_converter::HttpStickerConverter;

use adhesive_core::{config::Config, conversion::StickerConverter};

#[tokio::main]
async fn main() -> Result<(), adhesive_core::Error> {
    adhesive_core::logging::init("adhesive")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!(config = %cfg.config_path.display(), "configuration loaded");

    let converter: Arc<dyn StickerConverter> = Arc::new(HttpStickerConverter::new(&cfg)?);

    adhesive_telegram::router::run_polling(cfg, converter)
        .await
        .map_err(|e| adhesive_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
