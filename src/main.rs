use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use tasktrack::clock::today;
use tasktrack::domain::{NewTask, Session, TaskEdit};
use tasktrack::policy::{Operation, authorize};
use tasktrack::stats::Statistics;
use tasktrack::store::Workspace;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, SessionCommand};
use cli::menu::Menu;
use cli::prompt::Prompt;
use cli::render::{RULE, task_block};
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasktrack")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tasktrack.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_workspace(config: &Config) -> Result<Workspace> {
    let storage = &config.storage;
    Workspace::open(
        &storage.dir,
        &storage.users_file,
        &storage.tasks_file,
        &config.bootstrap.admin_password,
    )
    .with_context(|| format!("Failed to open data files in {}", storage.dir.display()))
}

fn stdin_prompt() -> Prompt<io::StdinLock<'static>, io::Stdout> {
    Prompt::new(io::stdin().lock(), io::stdout())
}

/// Log in with the credentials from the command line, prompting for missing ones.
fn login<R: BufRead, W: Write>(cli: &Cli, workspace: &Workspace, prompt: &mut Prompt<R, W>) -> Result<Session> {
    let username = match &cli.user {
        Some(user) => user.clone(),
        None => prompt.ask("Username: ")?,
    };
    let password = match &cli.password {
        Some(password) => password.clone(),
        None => prompt.ask("Password: ")?,
    };
    Ok(workspace.users.login(&username, &password)?)
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let workspace = open_workspace(config)?;

    match &cli.command {
        None => run_interactive(&workspace),
        Some(Commands::Init) => handle_init_command(&workspace),
        Some(Commands::Session(command)) => run_session_command(cli, command, &workspace),
    }
}

fn run_session_command(cli: &Cli, command: &SessionCommand, workspace: &Workspace) -> Result<()> {
    let mut prompt = stdin_prompt();
    let session = login(cli, workspace, &mut prompt)?;

    match command {
        SessionCommand::Register { username } => handle_register_command(username, &session, workspace, &mut prompt),
        SessionCommand::Add {
            to,
            title,
            description,
            due,
        } => handle_add_command(to, title, description, *due, &session, workspace),
        SessionCommand::List { mine, json } => handle_list_command(*mine, *json, &session, workspace),
        SessionCommand::Complete { number } => handle_complete_command(*number, &session, workspace),
        SessionCommand::Edit { number, owner, due } => {
            let edit = match (owner, due) {
                (Some(owner), _) => TaskEdit::Owner(owner.trim().to_string()),
                (None, Some(due)) => TaskEdit::DueDate(*due),
                (None, None) => eyre::bail!("Nothing to edit: pass --owner or --due"),
            };
            handle_edit_command(*number, edit, &session, workspace)
        }
        SessionCommand::Stats { json } => handle_stats_command(*json, &session, workspace),
    }
}

fn run_interactive(workspace: &Workspace) -> Result<()> {
    info!("Launching interactive session");
    let mut menu = Menu::new(workspace, stdin_prompt(), today());
    let session = menu.login()?;
    menu.run(&session)
}

fn handle_init_command(workspace: &Workspace) -> Result<()> {
    info!("Initialized data files in {}", workspace.dir.display());
    println!("{} {}", "Users file:".green(), workspace.users.path().display());
    println!("{} {}", "Tasks file:".green(), workspace.tasks.path().display());
    Ok(())
}

fn handle_register_command<R: BufRead, W: Write>(
    username: &str,
    session: &Session,
    workspace: &Workspace,
    prompt: &mut Prompt<R, W>,
) -> Result<()> {
    authorize(session, Operation::RegisterUser)?;
    let password = prompt.ask("Enter new password: ")?;
    let confirm = prompt.ask("Re-enter your password for verification: ")?;
    let record = workspace.users.register(username, &password, &confirm)?;
    println!("{} {}", "Registered:".green(), record.username);
    Ok(())
}

fn handle_add_command(
    owner: &str,
    title: &str,
    description: &str,
    due_date: NaiveDate,
    session: &Session,
    workspace: &Workspace,
) -> Result<()> {
    let new_task = NewTask {
        owner: owner.to_string(),
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        due_date,
    };
    let record = workspace.tasks.add(session, new_task, today())?;
    println!("{} {} -> {}", "Added:".green(), record.title, record.owner);
    Ok(())
}

fn handle_list_command(mine: bool, json: bool, session: &Session, workspace: &Workspace) -> Result<()> {
    info!("Listing tasks (mine: {})", mine);

    // Numbers are positions in the full file, so they work with complete/edit.
    let tasks: Vec<(usize, tasktrack::domain::TaskRecord)> = if mine {
        workspace
            .tasks
            .view_mine(session)?
            .into_iter()
            .map(|t| (t.index, t.record))
            .collect()
    } else {
        workspace.tasks.view_all(session)?.into_iter().enumerate().collect()
    };

    if json {
        let records: Vec<_> = tasks.iter().map(|(_, record)| record).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", "There are no tasks to display.".yellow());
        return Ok(());
    }
    for (index, task) in &tasks {
        println!("{}", task_block(index + 1, task));
        println!("{}", RULE);
    }
    Ok(())
}

fn handle_complete_command(number: usize, session: &Session, workspace: &Workspace) -> Result<()> {
    let record = workspace.tasks.complete(session, number - 1)?;
    println!("{} {}", "Completed:".green(), record.title);
    Ok(())
}

fn handle_edit_command(number: usize, edit: TaskEdit, session: &Session, workspace: &Workspace) -> Result<()> {
    let record = workspace.tasks.update(session, number - 1, edit)?;
    println!("{} {}", "Updated:".green(), record.title);
    Ok(())
}

fn handle_stats_command(json: bool, session: &Session, workspace: &Workspace) -> Result<()> {
    let stats = Statistics::generate(session, &workspace.users, &workspace.tasks, today())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
