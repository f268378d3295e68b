use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use heritage_exhibit_core::{
    AppConfig, Collaborators, Command, ExhibitSession, FsSource, RecordingArRenderer,
    RecordingAudio, RecordingChart, RecordingMap,
};
use tracing_subscriber::EnvFilter;

fn main() -> heritage_exhibit_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.data.as_ref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Inspect => run_inspect(&config).await,
            Commands::Tour { duration_ms } => run_tour(&config, duration_ms).await,
            Commands::Route => run_route(&config).await,
        }
    })
}

fn load_config(
    path: Option<&PathBuf>,
    data_dir: Option<&PathBuf>,
) -> heritage_exhibit_core::Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.datasets.base_dir = dir.clone();
    }
    Ok(config)
}

async fn start_session(config: &AppConfig, map: RecordingMap) -> ExhibitSession {
    let collaborators = Collaborators::new()
        .with_map(map)
        .with_chart(RecordingChart::new())
        .with_ar(RecordingArRenderer::new())
        .with_audio(RecordingAudio::new());
    let source = Arc::new(FsSource::new(config.datasets.base_dir.clone()));

    let session = ExhibitSession::bootstrap(config, source, collaborators).await;
    for notice in session.notices().all() {
        println!("notice: {notice}");
    }
    session
}

async fn run_inspect(config: &AppConfig) -> heritage_exhibit_core::Result<()> {
    tracing::info!(base_dir = ?config.datasets.base_dir, "inspecting datasets");
    let session = start_session(config, RecordingMap::new()).await;
    let index = session.index();

    println!(
        "points: {}  timeline: {}  museum: {}  markers: {}",
        index.points().len(),
        index.timeline().len(),
        index.museum().len(),
        index.markers().len()
    );

    for point in index.points() {
        let item = index
            .museum_item_for_point(point)
            .map_or("-", |item| item.title.as_str());
        println!("point {} ({}) -> museum item: {item}", point.id, point.title);
    }
    for event in index.timeline() {
        let point = index
            .point_for_event(event)
            .map_or("-", |point| point.title.as_str());
        println!("event {} ({}) -> map point: {point}", event.id, event.date_start);
    }
    if let Some(active) = session.ar().and_then(|ar| ar.active()) {
        println!("active AR marker: {}", active.id);
    }
    Ok(())
}

async fn run_tour(config: &AppConfig, duration_ms: u64) -> heritage_exhibit_core::Result<()> {
    let mut session = start_session(config, RecordingMap::new()).await;
    session.dispatch(Command::StartTour);
    if !session.tour().is_running() {
        println!("nothing to tour");
        return Ok(());
    }

    let interval = config.timing.tour_interval_ms.max(1);
    while session.now_ms() + interval <= duration_ms {
        session.advance(interval);
        if let Some(id) = session.tour().highlighted() {
            println!("{:>8} ms  highlight {id}", session.now_ms());
        }
    }
    session.dispatch(Command::StopTour);
    Ok(())
}

async fn run_route(config: &AppConfig) -> heritage_exhibit_core::Result<()> {
    let map = RecordingMap::new();
    let mut session = start_session(config, map.clone()).await;
    session.dispatch(Command::PlayRoute);

    while session.route().is_playing() {
        session.advance(config.timing.route_step_ms.max(1));
    }

    for (step, coords) in map.paths().into_iter().flatten().enumerate() {
        println!("stop {:>2}: {:.5}, {:.5}", step + 1, coords.lat, coords.lng);
    }
    tracing::info!(elapsed_ms = session.now_ms(), "route finished");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Heritage exhibit viewer engine", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Directory the dataset locators are resolved against.
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the datasets and print what resolved.
    Inspect,
    /// Run the gallery tour on the virtual clock.
    Tour {
        /// How long to run the tour, in milliseconds.
        #[arg(long, default_value_t = 16_000)]
        duration_ms: u64,
    },
    /// Play the route animation to completion.
    Route,
}
