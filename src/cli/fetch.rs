//! Single merge request fetch operation.

use std::sync::Arc;

use gitlab_mr_fetch::{
    FetchError, GatewayChoice, GlabCliGateway, MergeRequestIid, MergeRequestIntake,
    MergeRequestLocator, MergeRequestReport, MrFetchConfig, RestGateway,
};

use super::output::{OutputMode, write_report};

/// Loads one merge request and writes it to stdout.
///
/// # Errors
///
/// Returns the first fetch, parse, or encoding failure.
pub async fn run(config: &MrFetchConfig, iid: MergeRequestIid) -> Result<(), FetchError> {
    let report = load_report(config, iid).await?;
    write_report(&report, OutputMode::from_summary_flag(config.summary))
}

/// Loads one merge request through whichever gateway the configuration
/// selects.
///
/// # Errors
///
/// Returns [`FetchError::Configuration`] when the REST gateway is selected
/// without a token, and otherwise any error from the intake.
pub async fn load_report(
    config: &MrFetchConfig,
    iid: MergeRequestIid,
) -> Result<MergeRequestReport, FetchError> {
    let locator = MergeRequestLocator::new(config.project_path()?, iid);

    match config.gateway_choice() {
        GatewayChoice::Rest { api_url } => {
            tracing::info!(project = %locator.project(), %iid, api_url, "fetching via REST API");
            let gateway = RestGateway::new(api_url, config.resolve_token()?)?;
            MergeRequestIntake::new(Arc::new(gateway)).load(&locator).await
        }
        GatewayChoice::Glab { command } => {
            tracing::info!(project = %locator.project(), %iid, command, "fetching via glab");
            let gateway = GlabCliGateway::new(command);
            MergeRequestIntake::new(Arc::new(gateway)).load(&locator).await
        }
    }
}
