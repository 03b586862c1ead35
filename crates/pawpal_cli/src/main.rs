use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use pawpal_cli::cli::{Cli, Command, ListCommand, PetCommand, TaskCommand, collect_config_overrides};
use pawpal_cli::render;
use pawpal_cli::repl::{expand_alias, split_command_line};
use pawpal_cli::session::{NewTask, Session};
use pawpal_core::clock;
use pawpal_core::config::load_config_with_fallback;
use pawpal_core::{AppError, Task};
use serde_json::json;
use std::io::{self, BufRead};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "PAWPAL_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn apply_config_overrides(session: &mut Session, raw: &[String]) -> Result<(), AppError> {
    if raw.is_empty() {
        return Ok(());
    }
    let overrides = collect_config_overrides(raw).map_err(AppError::invalid_input)?;
    session.apply_overrides(&overrides);
    Ok(())
}

fn task_line(task: &Task) -> String {
    format!(
        "{} ({}) at {}",
        task.title,
        task.task_id,
        clock::display_datetime(task.scheduled_time)
    )
}

fn print_task_list(session: &Session, tasks: &[&Task], json: bool) {
    let now = clock::local_now();
    if json {
        println!("{}", render::tasks_json(session, tasks, now));
    } else {
        println!("{}", render::tasks_table(session, tasks, now));
    }
}

fn run_command(session: &mut Session, command: Command, json: bool) -> Result<(), AppError> {
    let palette = session.config().palette();

    match command {
        Command::Owner { name, email, phone } => {
            let owner = session.set_owner(&name, &email, &phone)?;
            if json {
                println!(
                    "{}",
                    json!({
                        "name": owner.name,
                        "email": owner.email,
                        "phone": owner.phone,
                        "pets": owner.get_pets().len(),
                    })
                );
            } else {
                println!("Owner: {}", palette.accentize(&owner.name));
            }
        }
        Command::Pet { pet } => match pet {
            PetCommand::Add {
                name,
                species,
                breed,
                born,
            } => {
                let pet = session.add_pet(&name, &species, &breed, born.as_deref())?;
                if json {
                    println!("{}", render::pet_json(pet, clock::local_today()));
                } else {
                    println!("Added pet: {} ({})", palette.accentize(&pet.name), pet.species);
                }
            }
            PetCommand::Remove { name } => {
                let removed = session.remove_pet(&name)?;
                if json {
                    println!("{}", json!({ "name": name.trim(), "removed": removed }));
                } else {
                    println!("Removed {} pet(s) named {}", removed, name.trim());
                }
            }
            PetCommand::List => {
                let pets = session.owner().get_pets();
                let today = clock::local_today();
                if json {
                    println!("{}", render::pets_json(pets, today));
                } else {
                    println!("{}", render::pets_table(pets, today));
                }
            }
        },
        Command::Task { task } => match task {
            TaskCommand::Add {
                pet,
                title,
                when,
                description,
                category,
                priority,
                every,
            } => {
                let task = session.add_task(&NewTask {
                    pet: &pet,
                    title: &title,
                    when: &when,
                    description: &description,
                    category: &category,
                    priority: &priority,
                    every,
                })?;
                if json {
                    println!("{}", render::task_json(session, &task, clock::local_now()));
                } else {
                    let repeats = if task.is_recurring() {
                        format!(", repeats {}", render::repeat_label(task.recurrence_days))
                    } else {
                        String::new()
                    };
                    println!("Added task: {}{}", task_line(&task), repeats);
                }
            }
            TaskCommand::Remove { id } => {
                let task = session.remove_task(&id)?;
                if json {
                    println!("{}", render::task_json(session, &task, clock::local_now()));
                } else {
                    println!(
                        "Removed task: {} ({})",
                        palette.mutedize(&task.title),
                        task.task_id
                    );
                }
            }
        },
        Command::Done { id } => {
            let completion = session.complete(&id)?;
            let now = clock::local_now();
            if json {
                let successor = completion
                    .successor
                    .as_ref()
                    .map(|task| render::task_json(session, task, now));
                println!(
                    "{}",
                    json!({
                        "completed": render::task_json(session, &completion.completed, now),
                        "next": successor,
                    })
                );
            } else {
                println!(
                    "Completed task: {} ({})",
                    palette.mutedize(&completion.completed.title),
                    completion.completed.task_id
                );
                if let Some(next) = completion.successor.as_ref() {
                    println!("Next occurrence: {}", task_line(next));
                }
            }
        }
        Command::Undo { id } => {
            let task = session.undo(&id)?;
            if json {
                println!("{}", render::task_json(session, &task, clock::local_now()));
            } else {
                println!("Reopened task: {} ({})", task.title, task.task_id);
            }
        }
        Command::List { list } => {
            let tasks = session.list(&list)?;
            print_task_list(session, &tasks, json);
        }
        Command::Conflicts => {
            let conflicts = session.conflicts();
            if json {
                println!("{}", render::conflicts_json(&conflicts));
            } else {
                println!("{}", render::conflicts_plain(&conflicts, &palette));
            }
        }
        Command::Demo => {
            session.load_demo(clock::local_today());
            let now = clock::local_now();
            let by_time = session.list(&ListCommand::Time)?;
            let by_priority = session.list(&ListCommand::Priority)?;
            let conflicts = session.conflicts();

            if json {
                println!(
                    "{}",
                    json!({
                        "owner": session.owner().name,
                        "by_time": render::tasks_json(session, &by_time, now),
                        "by_priority": render::tasks_json(session, &by_priority, now),
                        "conflicts": render::conflicts_json(&conflicts),
                    })
                );
            } else {
                println!("Loaded demo household for {}", session.owner().name);
                println!("\n{}", palette.accentize("---- Sorted by Time ----"));
                println!("{}", render::tasks_table(session, &by_time, now));
                println!("\n{}", palette.accentize("---- Sorted by Priority ----"));
                println!("{}", render::tasks_table(session, &by_priority, now));
                println!("\n{}", palette.accentize("---- Conflict Detection ----"));
                println!("{}", render::conflicts_plain(&conflicts, &palette));
            }
        }
    }

    Ok(())
}

fn run_line(session: &mut Session, line: &str) -> Result<(), AppError> {
    let args = expand_alias(split_command_line(line)?, session.config())?;
    if args.is_empty() {
        return Ok(());
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("pawpal".to_string());
    argv.extend(args);

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => {
            println!("{err}");
            return Ok(());
        }
        Err(err) => return Err(normalize_parse_error(err)),
    };

    apply_config_overrides(session, &cli.config_override)?;
    match cli.command {
        Some(command) => run_command(session, command, cli.json),
        None => {
            print_help();
            Ok(())
        }
    }
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;
        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        if let Err(err) = run_line(session, line) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        warn!(error = %err, "config ignored, using defaults");
    }

    let mut session = Session::new(loaded.config);
    if let Err(err) = apply_config_overrides(&mut session, &cli.config_override) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }

    let result = match cli.command {
        Some(command) => run_command(&mut session, command, cli.json),
        None => run_interactive(&mut session),
    };

    if let Err(err) = result {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
