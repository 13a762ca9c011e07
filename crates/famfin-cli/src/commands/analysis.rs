//! Analysis command implementations
//!
//! Collects category totals for a date window and sends them to the
//! configured analysis service.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use famfin_core::analysis::{Action, AnalysisClient};
use famfin_core::config::AnalysisConfig;
use famfin_core::db::Database;
use famfin_core::reports::{advice_window, analysis_window, today, ReportService};

/// Build the client from config, failing with a hint when no token is set
pub fn analysis_client(config: &AnalysisConfig) -> Result<AnalysisClient> {
    AnalysisClient::from_config(config)?.ok_or_else(|| {
        anyhow::anyhow!(
            "Analysis is not configured. Set analysis.token in the config file or FAMFIN_AI_TOKEN."
        )
    })
}

pub async fn cmd_analyze(db: &Database, client: &AnalysisClient) -> Result<String> {
    run_analysis(db, client, Action::Analyze, today()).await
}

pub async fn cmd_advise(db: &Database, client: &AnalysisClient) -> Result<String> {
    run_analysis(db, client, Action::Advice, today()).await
}

/// Send the totals for the window `action` uses around `today` and print the reply
pub async fn run_analysis(
    db: &Database,
    client: &AnalysisClient,
    action: Action,
    today: NaiveDate,
) -> Result<String> {
    let window = match action {
        Action::Analyze => analysis_window(today)?,
        Action::Advice => advice_window(today)?,
    };
    let totals = ReportService::new(db).category_totals_in(&window)?;

    println!("🤖 Sending {} to {} ({})...", action, client.host(), window);

    let reply = match action {
        Action::Analyze => client.analyze(&totals).await,
        Action::Advice => client.advise(&totals).await,
    }
    .context("Analysis request failed")?;

    println!();
    println!("{}", reply);

    Ok(reply)
}
