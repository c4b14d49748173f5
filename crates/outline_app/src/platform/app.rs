use std::fs;
use std::io::Write as _;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use outline_core::Msg;
use outline_engine::{SessionDriver, VirtualPage};
use outline_logging::{outline_debug, outline_info};

use super::config::load_config;
use super::logging;
use super::render::{build_report, render};
use super::script::Script;
use crate::Cli;

pub fn run_app(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref());
    logging::initialize(cli.log.or(config.log).unwrap_or_default(), cli.verbose);

    let html = fs::read_to_string(&cli.page)
        .with_context(|| format!("failed to read page {:?}", cli.page))?;
    let script = match &cli.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut page = VirtualPage::from_html(&html);
    let mut driver = SessionDriver::new(config.vocabulary(), config.timings.to_timings());
    run_session(&mut driver, &mut page, &script, cli.run_for_ms)?;

    let report = build_report(&driver, Utc::now());
    let output = render(&report, cli.format).context("failed to render the outline")?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("failed to write the outline")?;
    Ok(())
}

/// Activates the companion, replays `script` on the virtual clock and keeps
/// running until `run_for_ms` (or the last step, if later) has elapsed.
pub fn run_session(
    driver: &mut SessionDriver,
    page: &mut VirtualPage,
    script: &Script,
    run_for_ms: u64,
) -> anyhow::Result<()> {
    outline_info!("Activating outline companion");
    driver.dispatch(page, Msg::Activate);

    for step in &script.steps {
        let at = Duration::from_millis(step.at_ms);
        driver.advance(page, at.saturating_sub(driver.now()));
        outline_debug!("Script step at {} ms: {:?}", step.at_ms, step.action);
        if let Some(msg) = step.apply(page)? {
            driver.dispatch(page, msg);
        }
    }

    let until = Duration::from_millis(run_for_ms.max(script.last_at_ms()));
    driver.advance(page, until.saturating_sub(driver.now()));
    outline_info!(
        "Run finished after {:?}: {} entries, {} passes",
        driver.now(),
        driver.outline().len(),
        driver.passes()
    );
    Ok(())
}
