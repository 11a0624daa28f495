use culinai::{GeminiClient, GenAiConfig, OrchestrationController, Phase};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    culinai::logger::init()?;

    let location = env::args().nth(1).unwrap_or_else(|| "Thailand".to_string());
    let config = GenAiConfig::from_env()?;
    let client = GeminiClient::new(&config)?;
    let controller = OrchestrationController::from_client(&client);

    let mut updates = controller.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!(
                "phase={:?} guide_loading={} image_loading={}",
                state.phase, state.guide_loading, state.image_loading
            );
        }
    });

    controller.submit(&location).wait().await;
    watcher.abort();

    let state = controller.state();
    if let Some(guide) = &state.guide {
        println!("{}", serde_json::to_string_pretty(guide)?);
    }
    if let Phase::ImageFailed(err) = &state.phase {
        println!("image unavailable: {}", err);
    }
    if let Some(image) = &state.image {
        let filename = format!("{}.png", location.to_lowercase().replace(' ', "_"));
        image.save(&filename)?;
        println!("image saved to {}", filename);
    }
    Ok(())
}
