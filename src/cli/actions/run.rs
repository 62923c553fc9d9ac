use crate::cli::{
    actions::{admin, server, Action},
    telemetry,
};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Server(args) => server::execute(args).await,
        Action::CreateAdmin(args) => admin::execute(args).await,
    };

    telemetry::shutdown_tracer();

    result
}
