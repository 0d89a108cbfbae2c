use console::Term;

/// Exit code used when the user interrupts a command.
pub(crate) const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Resolve once Ctrl+C is pressed.
///
/// Never resolves if the signal handler cannot be installed, so the command
/// it races against simply runs to completion.
pub(crate) async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }

    if Term::stdout().is_term() {
        eprintln!("\n\nInterrupted, nothing was written.");
    } else {
        tracing::warn!("Interrupted, discarding in-flight work");
    }
}
