//! Command dispatch and handlers.

pub mod detect;
pub mod projects;
pub mod sitemap;
pub mod tokens;

use std::future::Future;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// When `SITESCOPE_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env();
    let (ctx, session) = if let Some(dir) = &settings.record_dir {
        let (ctx, session) = ServiceContext::recording_at(dir, &settings)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings)?, None)
    };

    let result = dispatch_with_context(command, &ctx, &settings);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
pub(crate) fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    match command {
        Command::Detect { project, urls } => detect::run(ctx, settings, project, urls),
        Command::Sitemap(sub) => sitemap::run(ctx, settings, sub),
        Command::Tokens(sub) => tokens::run(ctx, sub),
        Command::Projects => projects::run(ctx, settings),
    }
}

/// Drives a future to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    Ok(runtime.block_on(future))
}

/// Finish a recording session and log the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    log::info!("Recording saved to: {}", output_dir.display());
    Ok(())
}
