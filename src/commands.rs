use crate::app::App;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::process::ExitCode;
use time::format_description::well_known::Rfc3339;
use tokio::io::AsyncWriteExt;

/// Exit code for `show` when the page is not stored.
const EXIT_NOT_FOUND: u8 = 2;

pub async fn reconcile(app: &App) -> Result<ExitCode> {
    let summary = app.reconciler()?.run().await.or_raise(|| ErrorKind::Reconcile)?;
    tracing::debug!(?summary, "done");
    Ok(ExitCode::SUCCESS)
}

pub async fn watch(app: &App) -> Result<ExitCode> {
    let reconciler = app.reconciler()?;
    let interval = app.config.reconcile.interval();
    tracing::info!(interval = ?interval, "watching for content changes");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for ctrl-c");
        }
    };
    reconciler.watch(interval, shutdown).await;
    Ok(ExitCode::SUCCESS)
}

pub async fn show(app: &App, id: &str) -> Result<ExitCode> {
    let content = match app.store.load(id).await {
        Ok(content) => content,
        Err(e) if e.is_not_found() => {
            eprintln!("{}", *e);
            return Ok(ExitCode::from(EXIT_NOT_FOUND));
        },
        Err(e) => return Err(e.raise(ErrorKind::Store)),
    };
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&content).await.or_raise(|| ErrorKind::Output)?;
    stdout.flush().await.or_raise(|| ErrorKind::Output)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn versions(app: &App) -> Result<ExitCode> {
    let mut versions: Vec<_> = app.store.versions().await.or_raise(|| ErrorKind::Store)?.into_iter().collect();
    versions.sort();
    let mut out = String::new();
    for (id, version) in versions {
        let version = version.format(&Rfc3339).or_raise(|| ErrorKind::Output)?;
        out.push_str(&format!("{id}\t{version}\n"));
    }
    let mut stdout = tokio::io::stdout();
    stdout.write_all(out.as_bytes()).await.or_raise(|| ErrorKind::Output)?;
    stdout.flush().await.or_raise(|| ErrorKind::Output)?;
    Ok(ExitCode::SUCCESS)
}
