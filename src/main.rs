use anyhow::Context;
use bmshv::cli::Args;
use bmshv::{
    init_logging, run_dashboard, ConsoleSink, ControlLoop, LinkChannels, LinkStatus, LinkWorker,
    MonitorConfig, SerialOpener, StopSignal, BUILD_DATE, VERSION,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    tracing::info!(version = VERSION, build_date = BUILD_DATE, "Starting BMS HV utility");

    let config = MonitorConfig::default();
    config.validate()?;

    let channels = LinkChannels::new(&config.queues);
    let status = LinkStatus::new();
    let worker = LinkWorker::from_config(
        args.port.as_str(),
        &config,
        Box::new(SerialOpener),
        channels.clone(),
        status.clone(),
        StopSignal::new(),
    )?;
    let handle = worker.spawn().context("Failed to start link worker")?;

    let poll_interval = config.display.poll_interval();
    let control = ControlLoop::new(config, channels, status, ConsoleSink::stdout());
    let result = run_dashboard(control, poll_interval).await;

    tokio::task::spawn_blocking(move || handle.shutdown())
        .await?
        .map_err(|_| anyhow::anyhow!("Link worker panicked"))?;

    result.map(|_| ())
}
