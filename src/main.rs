use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use robodash::kernel::services::adapters::{
    ensure_settings_file, load_settings, workspace_path, FileStorage, PersistenceService,
};
use robodash::kernel::services::ports::{Settings, StorageError, WorkspaceStorage};
use robodash::kernel::services::store_bus;
use robodash::kernel::{Action, Store};
use robodash::schema::{self, DocumentError};
use robodash::widgets::WidgetRegistry;

mod logging;

const HYDRATE_TIMEOUT: Duration = Duration::from_secs(10);

const USAGE: &str = "\
usage: robodash <command>

commands:
  summary          list dashboards, widget counts and bound channels
  export [FILE]    write the workspace document to FILE or stdout
  import FILE      validate FILE and replace the workspace with it
  add-dashboard    append a custom dashboard
  help             show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
enum CliCommand {
    Summary,
    Export(Option<PathBuf>),
    Import(PathBuf),
    AddDashboard,
    Help,
}

fn parse_args<I, S>(args: I) -> Result<CliCommand, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let command = match args.next().as_deref() {
        None | Some("summary") => CliCommand::Summary,
        Some("export") => CliCommand::Export(args.next().map(PathBuf::from)),
        Some("import") => match args.next() {
            Some(path) => CliCommand::Import(PathBuf::from(path)),
            None => return Err("import needs a FILE".to_string()),
        },
        Some("add-dashboard") => CliCommand::AddDashboard,
        Some("help" | "-h" | "--help") => CliCommand::Help,
        Some(other) => return Err(format!("unknown command `{other}`")),
    };

    match args.next() {
        Some(extra) => Err(format!("unexpected argument `{extra}`")),
        None => Ok(command),
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("timed out waiting for the stored workspace")]
    HydrationTimeout,
}

fn main() -> ExitCode {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(CliCommand::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Ok(command) => command,
        Err(msg) => {
            eprintln!("robodash: {msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = ensure_settings_file() {
        eprintln!("robodash: could not create settings file: {e}");
    }
    let settings = load_settings().unwrap_or_default();
    let _logging = logging::init(settings.log_filter.as_deref());

    match run(command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("robodash: {err}");
            if let CliError::Document(doc) = &err {
                for issue in doc.issues() {
                    eprintln!("  {issue}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand, settings: &Settings) -> Result<(), CliError> {
    let path = workspace_path(settings.workspace_file.clone()).ok_or(StorageError::NoLocation)?;
    tracing::info!(path = %path.display(), command = ?command, "starting");

    let storage: Arc<dyn WorkspaceStorage> = Arc::new(FileStorage::new(path));
    let (bus_tx, mut bus_rx) = store_bus();
    let persistence = PersistenceService::new(storage, bus_tx, settings.persist_debounce())?;
    let mut store = Store::new(WidgetRegistry::builtin());

    persistence.hydrate();
    let msg = bus_rx
        .recv_timeout(HYDRATE_TIMEOUT)
        .map_err(|_| CliError::HydrationTimeout)?;
    let hydrated = store.handle_message(msg);
    persistence.handle_effects(&hydrated.effects);

    let result = execute(command, &mut store, &persistence);
    persistence.shutdown();
    result
}

fn execute(
    command: CliCommand,
    store: &mut Store,
    persistence: &PersistenceService,
) -> Result<(), CliError> {
    match command {
        CliCommand::Summary => print_summary(store),
        CliCommand::Export(target) => {
            let text = serde_json::to_string_pretty(&store.workspace_document())
                .map_err(StorageError::from)?;
            match target {
                Some(path) => std::fs::write(path, text)?,
                None => println!("{text}"),
            }
        }
        CliCommand::Import(source) => {
            let text = std::fs::read_to_string(&source)?;
            let candidate = schema::parse(&text)?;
            let result = store.import(&candidate)?;
            persistence.handle_effects(&result.effects);
            println!("imported {}", source.display());
        }
        CliCommand::AddDashboard => {
            let result = store.dispatch(Action::add_dashboard());
            persistence.handle_effects(&result.effects);
            if let Some(dashboard) = store.state().current_dashboard() {
                println!("{}\t{}", dashboard.id, dashboard.name);
            }
        }
        CliCommand::Help => println!("{USAGE}"),
    }
    Ok(())
}

fn print_summary(store: &Store) {
    let state = store.state();
    for dashboard in state.dashboards.iter() {
        let marker = if dashboard.id == state.dashboard_id { '*' } else { ' ' };
        println!(
            "{marker} {:<34} {:<14} {} widget(s)",
            dashboard.id,
            dashboard.name,
            dashboard.widgets.len()
        );
    }

    match &state.slots {
        Some(slots) if slots.is_empty() => println!("no bound channels"),
        Some(slots) => {
            println!("bound channels:");
            for slot in slots {
                println!("  {slot}");
            }
        }
        None => println!("bound channels: all"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/cli_args.rs"]
mod tests;
