use anyhow::Context;
use clap::Parser;
use nrdp_reporter::{
    actors::reporter::ReporterHandle,
    config::read_config_file,
    nrdp::ReceiverClient,
    source::{HttpStatusSource, StatusSource},
    util::{get_config_path, get_token_override},
    walker::MetricWalker,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (defaults to $NRDP_REPORTER_CONFIG)
    #[arg(short, long)]
    file: Option<String>,

    /// Run a single reporting cycle and exit
    #[arg(long)]
    once: bool,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new()
        .with_targets(vec![
            ("nrdp_reporter", LevelFilter::DEBUG),
            ("reporter", LevelFilter::DEBUG),
        ])
        .with_default(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let path = args
        .file
        .or_else(get_config_path)
        .context("no config file given (use -f or NRDP_REPORTER_CONFIG)")?;

    let mut config = read_config_file(&path)?;
    if let Some(token) = get_token_override() {
        config.receiver.token = token;
    }
    let config = config.validate()?;

    let source_config = config
        .status_source
        .clone()
        .context("config has no status_source")?;
    let source = HttpStatusSource::new(source_config, config.timeout)?;

    if args.once {
        let root = source.fetch().await?;
        let client = ReceiverClient::with_timeout(config.timeout)?;
        let report = MetricWalker::new(&config, &client)
            .run(&root, config.report_all_groups)
            .await;

        info!(
            "{} group(s) submitted, {} failed",
            report.succeeded(),
            report.failed()
        );
        return Ok(());
    }

    info!(
        "reporting to {} every {}s",
        config.receiver_url,
        config.interval.as_secs()
    );
    let handle = ReporterHandle::spawn(config, source)?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutting down");
    handle.shutdown().await?;

    Ok(())
}
