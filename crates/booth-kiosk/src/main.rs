//! Headless kiosk driver.
//!
//! Runs one visitor flow end to end against a running intermediary, with a
//! timer standing in for the presentation video, and prints the revealed
//! pair as JSON.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use booth_core::backend::GenerationBackend;
use booth_core::clock::SystemClock;
use booth_core::config::Tunables;
use booth_core::diagnostics::TracingDiagnostics;
use booth_generation::application::client::GenerationClient;
use booth_generation::application::coordinator::PairCoordinator;
use booth_generation::domain::category::Catalog;
use booth_generation::domain::prompt::StyleAttribute;
use booth_kiosk::capture::read_image_as_data_url;
use booth_kiosk::runtime::KioskRuntime;
use booth_remote::{DEFAULT_ENDPOINT, HttpGenerationBackend};
use booth_session::application::navigator::Navigator;
use clap::Parser;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "booth-kiosk", version, about = "Run one portrait booth flow without a UI")]
struct Args {
    /// Base URL of the generation intermediary.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Still image to submit.
    #[arg(long)]
    image: PathBuf,
    /// Category id, e.g. `aviation`.
    #[arg(long)]
    category: String,
    /// Style attribute: `male` or `female`.
    #[arg(long)]
    attribute: StyleAttribute,
    /// Length of the simulated processing video in seconds.
    #[arg(long, default_value_t = 45)]
    video_secs: u64,
    /// YAML catalog replacing the built-in categories.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let tunables = Tunables::from_env()?;
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    let category = catalog
        .get(&args.category)
        .ok_or_else(|| format!("unknown category {:?}", args.category))?
        .clone();
    let image = read_image_as_data_url(&args.image)?;

    let backend: Arc<dyn GenerationBackend> = Arc::new(HttpGenerationBackend::new(&args.endpoint));
    let coordinator = PairCoordinator::new(
        GenerationClient::from_tunables(backend, &tunables),
        Arc::new(TracingDiagnostics),
        &tunables,
    );
    let navigator = Navigator::new(Arc::new(SystemClock));
    let mut kiosk = KioskRuntime::new(navigator, coordinator, tunables);

    tracing::info!(endpoint = %args.endpoint, category = %category.id, "starting kiosk flow");
    kiosk.start()?;
    kiosk.select_attribute(args.attribute)?;
    kiosk.select_category(category)?;

    let (video, video_end) = oneshot::channel();
    let video_length = Duration::from_secs(args.video_secs);
    tokio::spawn(async move {
        tokio::time::sleep(video_length).await;
        tracing::info!("presentation video ended");
        let _ = video.send(());
    });

    let mut progress = kiosk.capture_photo(image, video_end)?;
    tokio::spawn(async move {
        let mut last_logged = 0;
        while progress.changed().await.is_ok() {
            let snapshot = *progress.borrow_and_update();
            if snapshot.percent >= last_logged + 10 || snapshot.percent == 100 {
                last_logged = snapshot.percent;
                tracing::info!(
                    percent = snapshot.percent,
                    status = snapshot.status_label(),
                    message = snapshot.message,
                    "processing"
                );
            }
        }
    });

    let trigger = kiosk.finish_processing().await?;
    let record = kiosk
        .navigator()
        .record()
        .ok_or("session ended before reveal")?;
    let output = serde_json::json!({
        "sessionId": record.session_id(),
        "screen": kiosk.navigator().screen(),
        "category": record.category().map(|category| category.id.as_str()),
        "trigger": trigger,
        "pair": record.result_pair(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
