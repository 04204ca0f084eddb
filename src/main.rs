//! Lynlocke - terminal roster and matchup tracker
//!
//! Logs go to a file (default `<data dir>/lynlocke.log`) so they never
//! corrupt the terminal UI.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

use lynlocke::action::Action;
use lynlocke::config;
use lynlocke::effect::Effect;
use lynlocke::mode::RuleMode;
use lynlocke::persist;
use lynlocke::reducer::reducer;
use lynlocke::session::Session;
use lynlocke::state::AppState;
use lynlocke::ui;

#[derive(Parser, Debug)]
#[command(name = "lynlocke", version)]
#[command(about = "Track two-player rosters, matchups and contacts")]
struct Args {
    #[command(flatten)]
    debug: DebugCliArgs,

    /// Directory holding teams.json and contacts.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Rule mode to start in
    #[arg(long, value_enum)]
    mode: Option<RuleMode>,

    /// Plain-text roster file to import instead of loading saved teams
    #[arg(long)]
    import: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Debug)]
struct RuntimeConfig {
    teams_path: String,
    contacts_path: String,
    import_path: Option<String>,
    mode: Option<RuleMode>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let data_dir = config::data_dir(args.data_dir.as_deref());
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("lynlocke.log"));
    let _guard = setup_tracing(&log_file, args.verbose)?;

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let runtime = RuntimeConfig {
        teams_path: path_string(&config::teams_path(&data_dir)),
        contacts_path: path_string(&config::contacts_path(&data_dir)),
        import_path: args.import.as_deref().map(path_string),
        mode: args.mode,
    };
    tracing::info!(?runtime, "starting");

    let mut state = debug
        .load_state_or_else_async(|| {
            let runtime = runtime.clone();
            async move {
                Ok::<AppState, io::Error>(AppState::new(
                    Session::new(runtime.mode.unwrap_or_default()),
                    runtime.teams_path,
                    runtime.contacts_path,
                    runtime.import_path,
                ))
            }
        })
        .await
        .map_err(debug_error)?;

    state.teams_path = runtime.teams_path.clone();
    state.contacts_path = runtime.contacts_path.clone();
    state.import_path = runtime.import_path.clone();
    if let Some(mode) = runtime.mode {
        state.session.set_mode(mode);
    }
    state.refresh_view();

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("exiting");
    Ok(())
}

/// File-only tracing; stdout and stderr belong to the terminal UI.
/// The returned guard must live until exit so buffered lines are flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> io::Result<WorkerGuard> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lynlocke={log_level}")));

    let log_dir = log_file.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)?;
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lynlocke.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(200), || Action::Tick);
            },
            |frame, area, state, render_ctx: RenderContext| {
                ui::render(frame, area, state, render_ctx);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::SaveTeams { path, save } => {
            ctx.tasks().spawn(TaskKey::new("save_teams"), async move {
                match persist::save_teams(Path::new(&path), &save).await {
                    Ok(()) => Action::SaveComplete,
                    Err(e) => Action::SaveError(e.to_string()),
                }
            });
        }
        Effect::LoadTeams { path } => {
            ctx.tasks().spawn(TaskKey::new("load_teams"), async move {
                match persist::load_teams(Path::new(&path)).await {
                    Ok(loaded) => Action::LoadComplete(Box::new(loaded)),
                    Err(e) if e.is_not_found() => Action::LoadMissing,
                    Err(e) => Action::LoadError(e.to_string()),
                }
            });
        }
        Effect::ImportRoster { path } => {
            ctx.tasks().spawn(TaskKey::new("load_teams"), async move {
                match persist::import_roster(Path::new(&path)).await {
                    Ok(report) => Action::ImportComplete(Box::new(report)),
                    Err(e) => Action::ImportError(e.to_string()),
                }
            });
        }
        Effect::LoadContacts { path } => {
            ctx.tasks().spawn(TaskKey::new("load_contacts"), async move {
                match persist::load_contacts(Path::new(&path)).await {
                    Ok(book) => Action::ContactsDidLoad(book),
                    Err(e) => Action::ContactsDidError(format!("Failed to load contacts: {e}")),
                }
            });
        }
        Effect::SaveContacts { path, book } => {
            ctx.tasks().spawn(TaskKey::new("save_contacts"), async move {
                match persist::save_contacts(Path::new(&path), &book).await {
                    Ok(()) => Action::ContactsSaved,
                    Err(e) => Action::ContactsDidError(format!("Failed to save contacts: {e}")),
                }
            });
        }
    }
}
