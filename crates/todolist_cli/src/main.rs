//! `todolist` command-line host.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the configured store.
//! - Load, run exactly one command, and report store failures on stderr.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, StorageArgs};
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use todolist_core::{
    active, archived, everything, init_logging, open_db, CommitOutcome, JsonFileStore, Record,
    RecordId, SqliteTodoStore, StoreBackend, TodoConfig, TodoManager, TodoService, TodoStore,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli.storage) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = cli
        .storage
        .log_dir
        .as_deref()
        .map(absolutize)
        .unwrap_or_else(|| config.log_dir());
    if let Err(err) = init_logging(&config.log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    match config.backend {
        StoreBackend::Json => run(JsonFileStore::new(config.store_path()), cli.command),
        StoreBackend::Sqlite => {
            if let Err(err) = std::fs::create_dir_all(&config.data_dir) {
                eprintln!("error: failed to create {}: {err}", config.data_dir.display());
                return ExitCode::FAILURE;
            }
            open_sqlite_and_run(&config, cli.command)
        }
    }
}

fn open_sqlite_and_run(config: &TodoConfig, command: Commands) -> ExitCode {
    match open_db(config.store_path()) {
        Ok(conn) => run(SqliteTodoStore::new(&conn), command),
        Err(err) => {
            eprintln!("error: failed to open {}: {err}", config.store_path().display());
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(args: &StorageArgs) -> Result<TodoConfig, String> {
    let data_dir = match &args.data_dir {
        Some(dir) => absolutize(dir),
        None => absolutize(Path::new(".todolist")),
    };

    let mut config = TodoConfig::new(data_dir);
    config.backend = args.backend;
    config.file_name = args.file.clone();
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn run<S: TodoStore>(store: S, command: Commands) -> ExitCode {
    let mut service = TodoService::new(TodoManager::new(store));
    service.manager_mut().subscribe_io_failed(|failure| {
        eprintln!("warning: {failure}");
    });
    service.manager_mut().load();

    let ok = execute(&mut service, command);

    if service.manager().has_failed() {
        warn!("event=cli_exit module=cli status=error reason=store_failure");
        return ExitCode::FAILURE;
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn execute<S: TodoStore>(service: &mut TodoService<S>, command: Commands) -> bool {
    match command {
        Commands::Add { title, body } => {
            let draft = service.create_blank();
            report_commit(service.commit_edit(draft, title, body))
        }
        Commands::List { archived: true, .. } => {
            print_records(service.list_filtered(&archived()));
            true
        }
        Commands::List { all: true, .. } => {
            print_records(service.list_filtered(&everything()));
            true
        }
        Commands::List { .. } => {
            print_records(service.list_filtered(&active()));
            true
        }
        Commands::Show { id } => match service.manager().get_by_id(id) {
            Some(record) => {
                print_record_detail(record);
                true
            }
            None => not_found(id),
        },
        Commands::Edit { id, title, body } => {
            let Some(draft) = service.begin_edit(id) else {
                return not_found(id);
            };
            let title = title.unwrap_or_else(|| draft.title.clone());
            let body = body.unwrap_or_else(|| draft.body.clone());
            report_commit(service.commit_edit(draft, title, body))
        }
        Commands::Done { id, undo } => {
            if !service.set_done(id, !undo) {
                return not_found(id);
            }
            println!("{id} marked {}", if undo { "not done" } else { "done" });
            true
        }
        Commands::Archive { id } => match service.toggle_archived(id) {
            Some(true) => {
                println!("{id} archived");
                true
            }
            Some(false) => {
                println!("{id} restored");
                true
            }
            None => not_found(id),
        },
        Commands::Delete { id } => {
            if !service.delete(id) {
                return not_found(id);
            }
            println!("{id} deleted");
            true
        }
        Commands::Digest { include_archived } => {
            match service.export(include_archived) {
                Some(digest) => print!("{digest}"),
                None => eprintln!("(no todos)"),
            }
            true
        }
    }
}

fn report_commit(outcome: CommitOutcome) -> bool {
    match outcome {
        CommitOutcome::Added(id) => println!("added {id}"),
        CommitOutcome::Updated(id) => println!("updated {id}"),
        CommitOutcome::Removed(id) => println!("removed {id} (title and body were empty)"),
        CommitOutcome::Discarded => println!("nothing to add: title and body are empty"),
        CommitOutcome::Missing(id) => return not_found(id),
        CommitOutcome::IdsExhausted => {
            eprintln!("error: no record ids left to assign");
            return false;
        }
    }
    true
}

fn not_found(id: RecordId) -> bool {
    eprintln!("error: no todo with id {id}");
    false
}

fn print_records(records: Vec<&Record>) {
    if records.is_empty() {
        println!("(no todos)");
        return;
    }
    for record in records {
        let marker = if record.is_done() { "[X]" } else { "[ ]" };
        let suffix = if record.is_archived() { " (archived)" } else { "" };
        println!("{:>4} {marker} {}{suffix}", record.id(), record.title());
    }
}

fn print_record_detail(record: &Record) {
    println!("id:       {}", record.id());
    println!("title:    {}", record.title());
    println!("done:     {}", record.is_done());
    println!("archived: {}", record.is_archived());
    println!("created:  {} (epoch ms)", record.created());
    println!();
    println!("{}", record.body());
}
