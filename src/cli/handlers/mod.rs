mod init;
pub use init::cmd_init;

use std::error::Error;
use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::session::{self, Session};
use crate::io::{self, StateStore, config_io};
use crate::model::config::{Backend, Config};
use crate::model::state::AppState;
use crate::ops::{import, tab_ops, task_ops};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let data_dir = config_io::data_dir(cli.data_dir.as_deref().map(Path::new));

    let Some(cmd) = cli.command else {
        // No subcommand → the TUI, handled in main.rs
        return Ok(());
    };

    match cmd {
        Commands::Init(args) => cmd_init(args, &data_dir),
        Commands::Config(args) => cmd_config(args, &data_dir, json),

        // Read commands
        Commands::Tabs => cmd_tabs(&data_dir, json),
        Commands::List(args) => cmd_list(args, &data_dir, json),
        Commands::Progress(args) => cmd_progress(args, &data_dir, json),

        // Write commands
        Commands::Tab(args) => cmd_tab(args, &data_dir),
        Commands::Add(args) => cmd_add(args, &data_dir),
        Commands::Done(args) => cmd_toggle(args, &data_dir, true),
        Commands::Undo(args) => cmd_toggle(args, &data_dir, false),
        Commands::Rm(args) => cmd_rm(args, &data_dir),
        Commands::Import(args) => cmd_import(args, &data_dir),

        // Auth (remote backend)
        Commands::Status => cmd_status(&data_dir, json),
        Commands::Login(args) => cmd_login(args, &data_dir),
        Commands::Logout => cmd_logout(&data_dir),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything a command needs: the configured store plus the loaded state
struct AppEnv {
    store: Box<dyn StateStore>,
    state: AppState,
}

fn load_env(data_dir: &Path) -> Result<AppEnv, Box<dyn Error>> {
    let config = config_io::read_config(data_dir)?;
    let mut store = io::open_store(&config, data_dir)?;
    let mut state = store.load()?;
    let active = state.active_tab_id.clone();
    tab_ops::ensure_tab_loaded(&mut state, store.as_mut(), &active)?;
    Ok(AppEnv { store, state })
}

/// Resolve the target tab for a command: an explicit flag or the active tab.
/// Makes sure its tasks are in memory.
fn resolve_tab(env: &mut AppEnv, flag: Option<&str>) -> Result<String, Box<dyn Error>> {
    let tab_id = flag.unwrap_or(&env.state.active_tab_id).to_string();
    if !env.state.has_tab(&tab_id) {
        return Err(format!("tab not found: {}", tab_id).into());
    }
    tab_ops::ensure_tab_loaded(&mut env.state, env.store.as_mut(), &tab_id)?;
    Ok(tab_id)
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn Error>> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Auth commands work against the configured server whatever the backend,
/// so switching to remote after logging in just works.
fn remote_parts(data_dir: &Path) -> Result<(Config, reqwest::blocking::Client, Session), Box<dyn Error>> {
    let config = config_io::read_config(data_dir)?;
    let client = reqwest::blocking::Client::builder().build()?;
    let session = Session::load(data_dir);
    Ok((config, client, session))
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_tabs(data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;

    // Counts need every tab's tasks in memory
    let tab_ids: Vec<String> = env.state.tabs.iter().map(|t| t.id.clone()).collect();
    for tab_id in &tab_ids {
        tab_ops::ensure_tab_loaded(&mut env.state, env.store.as_mut(), tab_id)?;
    }

    if json {
        let tabs: Vec<TabJson> = env
            .state
            .tabs
            .iter()
            .map(|tab| tab_to_json(&env.state, tab))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tabs)?);
    } else {
        for tab in &env.state.tabs {
            println!(
                "{}",
                format_tab_line(
                    tab,
                    env.state.task_count(&tab.id),
                    env.state.progress_percent(&tab.id),
                    env.state.active_tab_id == tab.id,
                )
            );
        }
    }
    Ok(())
}

fn cmd_list(args: ListArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;

    if json {
        let listing = TaskListJson {
            tab: tab_id.clone(),
            tasks: env.state.tasks_for(&tab_id).iter().map(task_to_json).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let tab = env
        .state
        .tab(&tab_id)
        .ok_or_else(|| format!("tab not found: {}", tab_id))?;
    println!("{}", format_tab_header(tab));
    for task in env.state.tasks_for(&tab_id) {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    println!();
    println!(
        "{}, {}% complete",
        format_count(env.state.task_count(&tab_id)),
        env.state.progress_percent(&tab_id)
    );
    Ok(())
}

fn cmd_progress(args: ProgressArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;

    let tasks = env.state.tasks_for(&tab_id);
    let completed = tasks.iter().filter(|t| t.completed).count();
    if json {
        let progress = ProgressJson {
            tab: tab_id.clone(),
            tasks: tasks.len(),
            completed,
            progress: env.state.progress_percent(&tab_id),
        };
        println!("{}", serde_json::to_string_pretty(&progress)?);
    } else {
        println!(
            "{}: {} done of {}, {}%",
            tab_id,
            completed,
            format_count(tasks.len()),
            env.state.progress_percent(&tab_id)
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_tab(args: TabCmd, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    match args.action {
        TabAction::New(args) => {
            let mut env = load_env(data_dir)?;
            let tab = tab_ops::create_tab(&mut env.state, env.store.as_mut(), &args.name)?;
            println!("created tab {} ({})", tab.name, tab.id);
            if args.use_tab {
                tab_ops::set_active_tab(&mut env.state, env.store.as_mut(), &tab.id)?;
                println!("switched to {}", tab.id);
            }
            Ok(())
        }
        TabAction::Delete(args) => {
            let mut env = load_env(data_dir)?;
            if !env.state.has_tab(&args.id) {
                return Err(format!("tab not found: {}", args.id).into());
            }
            let count = if env.state.tab_loaded(&args.id) {
                Some(env.state.task_count(&args.id))
            } else {
                None
            };
            if !args.yes {
                let prompt = match count {
                    Some(n) => format!("delete tab '{}' and its {}?", args.id, format_count(n)),
                    None => format!("delete tab '{}' and all of its tasks?", args.id),
                };
                if !confirm(&prompt)? {
                    println!("cancelled");
                    return Ok(());
                }
            }
            tab_ops::delete_tab(&mut env.state, env.store.as_mut(), &args.id)?;
            println!("deleted tab {}", args.id);
            Ok(())
        }
        TabAction::Use(args) => {
            let mut env = load_env(data_dir)?;
            tab_ops::set_active_tab(&mut env.state, env.store.as_mut(), &args.id)?;
            println!("switched to {}", args.id);
            Ok(())
        }
    }
}

fn cmd_add(args: AddArgs, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;
    let id = task_ops::add_task(
        &mut env.state,
        env.store.as_mut(),
        &tab_id,
        &args.text,
        args.desc.as_deref().unwrap_or(""),
    )?;
    println!("added {} to {}", id, tab_id);
    Ok(())
}

fn cmd_toggle(args: TaskRefArgs, data_dir: &Path, completed: bool) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;
    task_ops::toggle_task(&mut env.state, env.store.as_mut(), &tab_id, &args.id, completed)?;
    println!(
        "{} {} ({}% of {} done)",
        if completed { "completed" } else { "reopened" },
        args.id,
        env.state.progress_percent(&tab_id),
        tab_id
    );
    Ok(())
}

fn cmd_rm(args: RmArgs, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;

    let task = env
        .state
        .task(&tab_id, &args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    if !args.yes && !confirm(&format!("remove '{}'?", task.text))? {
        println!("cancelled");
        return Ok(());
    }

    task_ops::remove_task(&mut env.state, env.store.as_mut(), &tab_id, &args.id)?;
    println!("removed {} from {}", args.id, tab_id);
    Ok(())
}

fn cmd_import(args: ImportArgs, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let raw = fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;

    let mut env = load_env(data_dir)?;
    let tab_id = resolve_tab(&mut env, args.tab.as_deref())?;
    let report = import::import_tasks(
        &mut env.state,
        env.store.as_mut(),
        &tab_id,
        &raw,
        args.completed,
    )?;
    println!(
        "imported {} of {} tasks into {}",
        report.imported, report.attempted, tab_id
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Config and auth handlers
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    match args.action {
        None | Some(ConfigAction::Show) => {
            let config = config_io::read_config(data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("data dir: {}", data_dir.display());
                println!("backend:  {}", config.store.backend.as_str());
                println!("server:   {}", config.remote.base_url);
            }
            Ok(())
        }
        Some(ConfigAction::Backend(args)) => {
            let backend = Backend::parse(&args.backend)?;
            let (_, mut doc) = config_io::read_config_doc(data_dir)?;
            config_io::set_backend(&mut doc, backend);
            config_io::write_config_doc(data_dir, &doc)?;
            println!("backend set to {}", backend.as_str());
            Ok(())
        }
        Some(ConfigAction::Url(args)) => {
            let (_, mut doc) = config_io::read_config_doc(data_dir)?;
            config_io::set_base_url(&mut doc, &args.url);
            config_io::write_config_doc(data_dir, &doc)?;
            println!("server set to {}", args.url);
            Ok(())
        }
    }
}

fn cmd_status(data_dir: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let (config, client, session) = remote_parts(data_dir)?;
    if config.store.backend == Backend::Local {
        println!("local backend (no login required)");
        return Ok(());
    }

    let status = session::auth_status(&client, &config.remote.base_url, &session)?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "isLoggedIn": status.is_logged_in,
                "userId": status.user_id,
                "username": status.username,
            })
        );
    } else if status.is_logged_in {
        println!(
            "logged in as {}",
            status.username.as_deref().unwrap_or("(unknown)")
        );
    } else {
        println!("not logged in");
    }
    Ok(())
}

fn cmd_login(args: LoginArgs, data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let (config, client, mut session) = remote_parts(data_dir)?;
    let username = session::login(
        &client,
        &config.remote.base_url,
        &mut session,
        &args.username,
        &args.password,
    )?;
    println!("logged in as {}", username);
    Ok(())
}

fn cmd_logout(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let (config, client, mut session) = remote_parts(data_dir)?;
    session::logout(&client, &config.remote.base_url, &mut session)?;
    println!("logged out");
    Ok(())
}
