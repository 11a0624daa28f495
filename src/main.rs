use clap::Parser;
use colored::*;
use culinai::{
    logger::{self, LogLevel, LoggerConfig},
    ConfigError, CulinaryGuide, GeminiClient, GenAiConfig, OperationState,
    OrchestrationController, Phase,
};
use std::path::PathBuf;

/// Ask for a culinary guide to any country, region or city.
#[derive(Debug, Parser)]
#[command(name = "culinai", version, about)]
struct Args {
    /// Location to explore, e.g. "Thailand" or "Oaxaca, Mexico"
    #[arg(required = true, num_args = 1..)]
    location: Vec<String>,

    /// Write the generated dish image to this file
    #[arg(long, value_name = "PATH")]
    save_image: Option<PathBuf>,

    /// Print the final guide as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let args = Args::parse();

    let mut logger_config = LoggerConfig::from_env();
    if let Some(raw) = &args.log_level {
        logger_config.min_level = LogLevel::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
            key: "--log-level".to_string(),
            value: raw.clone(),
        })?;
    }
    logger::init_with_config(logger_config).map_err(ConfigError::Logger)?;

    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    } else {
        log::debug!("No .env file found, using process environment");
    }

    let config = GenAiConfig::from_env()?;
    logger::log_config_info(&config);

    let client = GeminiClient::new(&config)?;
    let controller = OrchestrationController::from_client(&client);

    let mut updates = controller.subscribe();
    let show_progress = !args.json;
    let progress = tokio::spawn(async move {
        let mut last = Phase::Idle;
        while updates.changed().await.is_ok() {
            let phase = updates.borrow_and_update().phase.clone();
            if show_progress && phase != last {
                print_progress(&phase);
            }
            last = phase;
        }
    });

    let location = args.location.join(" ");
    controller.submit(&location).wait().await;
    let state = controller.state();
    progress.abort();

    if state.phase.is_guide_failure() {
        eprintln!(
            "{}",
            state
                .error
                .as_deref()
                .unwrap_or(culinai::controller::GUIDE_FAILURE_MESSAGE)
                .red()
                .bold()
        );
        std::process::exit(1);
    }

    if let (Some(path), Some(image)) = (&args.save_image, &state.image) {
        match image.save(path) {
            Ok(()) => log::info!("💾 Image saved to {}", path.display()),
            Err(e) => log::error!("Failed to save image to {}: {}", path.display(), e),
        }
    }

    if args.json {
        print_json(&state)?;
    } else if let Some(guide) = &state.guide {
        print_guide(guide, &state);
    }

    Ok(())
}

fn print_progress(phase: &Phase) {
    match phase {
        Phase::GuideLoading => eprintln!("{}", "Cooking up your guide...".dimmed()),
        Phase::ImageLoading => eprintln!("{}", "Plating the signature dish...".dimmed()),
        _ => {}
    }
}

fn print_guide(guide: &CulinaryGuide, state: &OperationState) {
    println!();
    println!("{}", guide.location_name.bold().underline());
    println!();
    println!("{}", "Must-try dishes".yellow().bold());
    for dish in &guide.must_try_dishes {
        println!("  {} {}", "•".yellow(), dish.name.bold());
        println!("    {}", dish.description);
    }
    println!();
    println!("{} {}", "Etiquette:".cyan().bold(), guide.etiquette_tip);
    println!(
        "{} {}",
        "Where to eat:".cyan().bold(),
        guide.restaurant_suggestion
    );

    match (&state.image, &state.phase) {
        (Some(image), _) => println!(
            "\n{} {} ({} bytes)",
            "Dish image:".green().bold(),
            image.mime_type(),
            image.as_bytes().len()
        ),
        (None, Phase::ImageFailed(_)) => {
            println!("\n{}", "No image this time; enjoy the guide.".dimmed())
        }
        _ => {}
    }
}

fn print_json(state: &OperationState) -> Result<(), serde_json::Error> {
    let output = serde_json::json!({
        "query": state.query,
        "guide": state.guide,
        "image": state.image.as_ref().map(|image| image.data_uri()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
