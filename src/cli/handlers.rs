use std::path::PathBuf;

use chrono::Local;

use crate::ai::client::OpenAiClient;
use crate::ai::pipeline::{Pipeline, PipelineError};
use crate::cli::commands::*;
use crate::cli::output;
use crate::io::config_io;
use crate::io::store::Store;
use crate::model::config::Config;
use crate::model::log::{LogEntry, LogKind};
use crate::model::node::{Forest, Level};
use crate::ops::addressing::{self, MoveDir};
use crate::ops::{lifecycle, resolve};
use crate::parse::when;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = data_dir(cli.data_dir.as_deref());
    let store = Store::new(&dir);
    let config = config_io::read_config(&dir)?;

    match cli.command {
        Commands::List(args) => cmd_list(args, &store, json),
        Commands::Add(args) => cmd_add(args, &store, &config),
        Commands::Delete(args) => cmd_delete(args, &store),
        Commands::Rename(args) => cmd_rename(args, &store),
        Commands::Done(args) => cmd_done(args, &store),
        Commands::Target(args) => cmd_target(args, &store),
        Commands::Promote(args) => cmd_promote(args, &store),
        Commands::Mv(args) => cmd_mv(args, &store),
        Commands::Fold(args) => cmd_fold(args, &store),
        Commands::Ai(args) => cmd_ai(args, &store, &config),
        Commands::Log(cmd) => match cmd.command {
            LogCommands::Add(args) => cmd_log_add(args, &store),
            LogCommands::List => cmd_log_list(&store, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn data_dir(cli_override: Option<&str>) -> PathBuf {
    if let Some(dir) = cli_override {
        return PathBuf::from(dir);
    }
    if let Ok(dir) = std::env::var("BRAID_DATA_DIR") {
        return PathBuf::from(dir);
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".braid"),
        Err(_) => PathBuf::from(".braid"),
    }
}

fn parse_level(name: &str) -> Result<Level, Box<dyn std::error::Error>> {
    Level::parse(name).ok_or_else(|| {
        format!("unknown level '{}' (expected baseline, execution, or creative)", name).into()
    })
}

/// Resolve a title to an address, erroring when nothing matches.
fn locate(
    forest: &Forest,
    title: &str,
) -> Result<(Level, Vec<usize>), Box<dyn std::error::Error>> {
    resolve::find_path_by_title(forest, title)
        .ok_or_else(|| format!("no item titled '{}'", title).into())
}

fn report(changed: bool, verb: &str, title: &str) {
    if changed {
        println!("{} '{}'", verb, title);
    } else {
        println!("no changes");
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let forest = store.load_forest();
    let only = args.level.as_deref().map(parse_level).transpose()?;
    if json {
        output::print_forest_json(&forest)?;
    } else if args.folded {
        let fold = store.load_fold_state();
        output::print_forest(&forest, only, Some(&fold));
    } else {
        output::print_forest(&forest, only, None);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, store: &Store, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let text = args.text.join(" ");
    let level = match args.level.as_deref() {
        Some(name) => parse_level(name)?,
        None => config.edit.default_level,
    };
    let forest = store.load_forest();

    let parent = match args.under.as_deref() {
        Some(title) => Some(locate(&forest, title)?),
        None => None,
    };
    let parent_ref = parent.as_ref().map(|(lvl, path)| (*lvl, path.as_slice()));

    let updated = lifecycle::add_item(
        &forest,
        &text,
        parent_ref,
        level,
        config.edit.insert,
        Local::now(),
    );
    store.save_forest(&updated)?;
    match args.under {
        Some(under) => println!("added '{}' under '{}'", text.trim(), under),
        None => println!("added '{}' to {}", text.trim(), level.as_str()),
    }
    Ok(())
}

fn cmd_delete(args: TitleArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let title = args.title.join(" ");
    let forest = store.load_forest();
    let (updated, changed) = resolve::delete_by_title(&forest, &title);
    if changed {
        store.save_forest(&updated)?;
    }
    report(changed, "deleted", &title);
    Ok(())
}

fn cmd_rename(args: RenameArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let forest = store.load_forest();
    let (updated, changed) = resolve::rename_by_title(&forest, &args.old, &args.new);
    if changed {
        store.save_forest(&updated)?;
        println!("renamed '{}' to '{}'", args.old, args.new);
    } else {
        println!("no changes");
    }
    Ok(())
}

fn cmd_done(args: TitleArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let title = args.title.join(" ");
    let forest = store.load_forest();
    let (level, path) = locate(&forest, &title)?;
    let updated = lifecycle::toggle_completion(&forest, level, &path, Local::now());
    store.save_forest(&updated)?;
    match addressing::get_node(&updated, level, &path) {
        Some(node) if node.repeat.is_some() => println!("rescheduled '{}'", title),
        Some(node) if node.completed => println!("completed '{}'", title),
        _ => println!("reopened '{}'", title),
    }
    Ok(())
}

fn cmd_target(args: TargetArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let forest = store.load_forest();
    let (level, path) = locate(&forest, &args.title)?;

    if args.clear {
        let updated = lifecycle::set_target_date(&forest, level, &path, None, false);
        store.save_forest(&updated)?;
        println!("cleared target on '{}'", args.title);
        return Ok(());
    }

    let phrase = args.when.join(" ");
    let inferred = when::infer_target_date(&phrase, Local::now());
    let Some(ts) = inferred.ts else {
        return Err(format!("could not read a date from '{}'", phrase).into());
    };
    let all_day = inferred.all_day.unwrap_or(false);
    let updated = lifecycle::set_target_date(&forest, level, &path, Some(ts), all_day);
    store.save_forest(&updated)?;
    println!("'{}' targeted for {}", args.title, output::format_target(ts, all_day));
    Ok(())
}

fn cmd_promote(args: TitleArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let title = args.title.join(" ");
    let forest = store.load_forest();
    let (level, path) = locate(&forest, &title)?;
    if path.len() < 2 {
        println!("'{}' is already a thread", title);
        return Ok(());
    }
    let updated = addressing::promote(&forest, level, &path);
    store.save_forest(&updated)?;
    println!("promoted '{}' to a {} thread", title, level.as_str());
    Ok(())
}

fn cmd_mv(args: MvArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let forest = store.load_forest();
    let (level, path) = locate(&forest, &args.title)?;
    let updated = match args.direction.as_str() {
        "up" => addressing::move_by(&forest, level, &path, MoveDir::Up),
        "down" => addressing::move_by(&forest, level, &path, MoveDir::Down),
        "top" => addressing::move_to_top(&forest, level, &path),
        "bottom" => addressing::move_to_bottom(&forest, level, &path),
        other => {
            return Err(format!("unknown direction '{}' (up, down, top, bottom)", other).into());
        }
    };
    let changed = updated != forest;
    if changed {
        store.save_forest(&updated)?;
    }
    report(changed, "moved", &args.title);
    Ok(())
}

fn cmd_fold(args: TitleArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let title = args.title.join(" ");
    let forest = store.load_forest();
    let (level, path) = locate(&forest, &title)?;
    let mut fold = store.load_fold_state();
    let now_hidden = if path.len() == 1 {
        fold.toggle_thread(level, path[0]);
        !fold.is_thread_expanded(level, path[0])
    } else {
        fold.toggle_step(level, &path);
        fold.is_step_collapsed(level, &path)
    };
    store.save_fold_state(&fold)?;
    if now_hidden {
        println!("collapsed '{}'", title);
    } else {
        println!("expanded '{}'", title);
    }
    Ok(())
}

fn cmd_ai(args: AiArgs, store: &Store, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let text = args.text.join(" ");
    let forest = store.load_forest();
    let client = OpenAiClient::from_config(&config.ai);
    let pipeline = Pipeline::new(client, config.edit.default_level, config.edit.insert);
    match pipeline.submit(&forest, &text, Local::now()) {
        Ok(outcome) => {
            if outcome.changed > 0 {
                store.save_forest(&outcome.forest)?;
            }
            println!("{}", outcome.summary());
            Ok(())
        }
        Err(PipelineError::Busy) => Err("another request is already in flight".into()),
    }
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

fn cmd_log_add(args: LogAddArgs, store: &Store) -> Result<(), Box<dyn std::error::Error>> {
    let kind = LogKind::parse(&args.kind)
        .ok_or_else(|| format!("unknown log kind '{}'", args.kind))?;
    let text = args.text.join(" ");
    let mut logs = store.load_logs();
    logs.push(LogEntry::new(kind, &text));
    store.save_logs(&logs)?;
    println!("logged [{}] {}", kind.as_str(), text.trim());
    Ok(())
}

fn cmd_log_list(store: &Store, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let logs = store.load_logs();
    if json {
        output::print_logs_json(&logs)?;
    } else {
        output::print_logs(&logs);
    }
    Ok(())
}
