//! Settings inspection.

use zenzebra_server::appwrite::AppwriteClient;
use zenzebra_server::config::AppwriteConfig;
use zenzebra_server::db::SettingsRepository;

/// Print the settings the server would use, stored values merged over
/// defaults.
pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppwriteConfig::from_env()?;
    let client = AppwriteClient::new(&config)?;

    let settings = SettingsRepository::new(&client, &config.settings_collection_id)
        .load()
        .await?;

    for (key, value) in settings.to_pairs() {
        tracing::info!("{key} = {value}");
    }
    Ok(())
}
