use clap::Parser;
use speedgauge::core::config::{AppConfig, Variant};
use speedgauge::core::error::{Result, ResultExt};
use speedgauge::core::logging;
use speedgauge::core::session::SpeedTestSession;
use speedgauge::network::isp_lookup::{spawn_isp_refresh, HttpIspLookup, StaticIspLookup};
use speedgauge::network::speedtest_runner::SpeedSimulator;
use speedgauge::ui::commands::{BusyAction, Command, HELP};
use speedgauge::ui::progress::{render_gauge, GaugeGeometry};
use speedgauge::ui::status;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "speedgauge")]
#[command(about = "Cosmetic internet speed test with session history and insights")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page variant preset
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Seed for reproducible trajectories
    #[arg(long)]
    seed: Option<u64>,

    /// Run N tests and exit instead of reading commands
    #[arg(long)]
    runs: Option<u32>,

    /// Skip the ISP lookup and use the fallback label
    #[arg(long)]
    no_lookup: bool,

    /// Print the history and insight as JSON when batch runs finish
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.debug);

    if let Err(e) = run(args).await {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path).await?,
        None => AppConfig::load().await.log_and_continue(AppConfig::default()),
    };
    if let Some(variant) = args.variant {
        config.apply_variant(variant);
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    info!("Starting SpeedGauge");
    let config = load_config(&args).await?;

    let simulator = match args.seed {
        Some(seed) => SpeedSimulator::seeded(config.simulator.clone(), seed),
        None => SpeedSimulator::new(config.simulator.clone()),
    };
    let session = SpeedTestSession::with_simulator(&config, simulator);

    let fallback = config.isp_lookup.fallback_label.clone();
    let lookup_task = if config.isp_lookup.enabled && !args.no_lookup {
        match HttpIspLookup::new(&config.isp_lookup) {
            Ok(lookup) => Some(spawn_isp_refresh(lookup, session.isp_label_handle(), fallback)),
            Err(e) => {
                warn!("ISP lookup unavailable: {}", e);
                None
            }
        }
    } else {
        Some(spawn_isp_refresh(StaticIspLookup::new(None), session.isp_label_handle(), fallback))
    };

    match args.runs {
        Some(runs) => run_batch(&session, &config, runs, args.json).await?,
        None => run_interactive(&session, &config).await?,
    }

    if let Some(task) = lookup_task {
        task.abort();
    }
    Ok(())
}

fn tick_renderer(config: &AppConfig) -> impl FnMut(f64) {
    let geometry = GaugeGeometry::new(config.simulator.max_speed);
    let width = config.ui.gauge_width;
    let live = config.ui.show_live_gauge;
    move |speed| {
        if live {
            print!("\r{}", render_gauge(speed, &geometry, width));
            let _ = std::io::stdout().flush();
        }
    }
}

async fn run_test_and_print(session: &SpeedTestSession, config: &AppConfig) -> Result<()> {
    let (outcome, _trial) = session.run_test(tick_renderer(config)).await?;
    if config.ui.show_live_gauge {
        let geometry = GaugeGeometry::new(config.simulator.max_speed);
        println!("\r{}", render_gauge(outcome.download_mbps, &geometry, config.ui.gauge_width));
    }
    println!("{}", status::format_result(&outcome));
    Ok(())
}

async fn run_batch(session: &SpeedTestSession, config: &AppConfig, runs: u32, json: bool) -> Result<()> {
    for _ in 0..runs {
        run_test_and_print(session, config).await?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&session.report().await)?);
    } else {
        println!("\n{}", status::format_history(&session.history().await));
        println!("\n{}", status::format_insight(&session.insight().await));
    }
    Ok(())
}

async fn run_interactive(session: &SpeedTestSession, config: &AppConfig) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Start => {
                let test = run_test_and_print(session, config);
                tokio::pin!(test);
                let mut stdin_open = true;
                let mut quit_requested = false;
                loop {
                    tokio::select! {
                        result = &mut test => {
                            result?;
                            break;
                        }
                        next = lines.next_line(), if stdin_open => {
                            let Some(cmd) = next? else {
                                stdin_open = false;
                                continue;
                            };
                            match BusyAction::from(&Command::parse(&cmd)) {
                                BusyAction::Start => {
                                    if let Err(e) = session.run_test(|_| {}).await {
                                        println!("\n{}", e.user_message());
                                    }
                                }
                                BusyAction::QuitAfterRun => {
                                    quit_requested = true;
                                    println!("\nQuitting after the current test...");
                                }
                                BusyAction::Ignore => println!("\nTesting..."),
                            }
                        }
                    }
                }
                if quit_requested || !stdin_open {
                    break;
                }
            }
            Command::History => println!("{}", status::format_history(&session.history().await)),
            Command::Insight => println!("{}", status::format_insight(&session.insight().await)),
            Command::Clear => {
                session.clear_history().await;
                println!("{}", status::format_insight(&session.insight().await));
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(other) => println!("Unknown command '{}'. {}", other, HELP),
        }
    }

    Ok(())
}
