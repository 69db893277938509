use anyhow::anyhow;
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, warn};

use trade_dash::command::Command;
use trade_dash::config::CliParams;
use trade_dash::logger;
use trade_dash::metrics::DashboardSummary;
use trade_dash::sample_data::Records;
use trade_dash::tui::TuiApp;
use trade_dash::view::ViewController;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let param = CliParams::parse();
    logger::setup_logger(
        param.log_file.as_deref(),
        param.interactive(),
        &param.log_level,
    )?;

    let records = Records::sample();
    for asset in records.assets.iter().filter(|asset| !asset.is_well_formed()) {
        warn!(
            symbol = %asset.symbol,
            change = asset.change,
            change_percent = asset.change_percent,
            "price change and percent change disagree in sign"
        );
    }

    if param.summary_json {
        let summary =
            DashboardSummary::build(records.assets, records.predictions.len(), records.trades);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let (tx, mut rx) = broadcast::channel::<Command>(16);
    let views = ViewController::new(param.tab, Some(tx));
    let mut app = TuiApp::new(records, views, param.timezone, param.tick_rate());

    if param.snapshot {
        let screen = app
            .render_snapshot(param.width, param.height)
            .map_err(|err| anyhow!(err.to_string()))?;
        print!("{screen}");
        return Ok(());
    }

    info!(tab = %param.tab, timezone = %param.timezone.label(), "starting dashboard");
    let app_result = tokio::select! {
        result = app.run(&mut rx) => result,
        _ = tokio::signal::ctrl_c() => Ok(()),
    };
    app.dispose();
    info!("dashboard closed");
    app_result.map_err(|err| anyhow!(err.to_string()))?;
    Ok(())
}
