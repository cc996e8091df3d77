use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use homecfg::api::{
    fields_from_json, fields_from_pairs, CmdMessage, ConfigAction, EntryRef, HomecfgApi,
    HomecfgPaths, MessageLevel,
};
use homecfg::config::{AppConfig, CONFIG_KEYS};
use homecfg::error::{HomecfgError, Result};
use homecfg::logging::{init_logging, resolve_level, LOG_ENV};
use homecfg::model::{Document, Entry};
use homecfg::store::fs::FileStore;
use homecfg::store::DocumentStore;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{CategoryCommands, Cli, Commands};

const HOME_ENV: &str = "HOMECFG_HOME";
const SERVICES_ENV: &str = "HOMECFG_SERVICES";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: HomecfgApi<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { json }) => handle_list(&ctx, json),
        Some(Commands::Categories) => handle_categories(&ctx),
        Some(Commands::Show {
            category,
            name,
            json,
        }) => handle_show(&ctx, &category, &name, json),
        Some(Commands::Add {
            category,
            name,
            fields,
            json_fields,
        }) => {
            let fields = build_fields(&fields, json_fields.as_deref())?;
            let result = ctx.api.add_entry(&category, &name, fields)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Update {
            category,
            name,
            fields,
            json_fields,
        }) => {
            let fields = build_fields(&fields, json_fields.as_deref())?;
            let result = ctx.api.update_entry(&category, &name, fields)?;
            print_messages(&result.messages);
            Ok(())
        }
        Some(Commands::Delete { category, name }) => {
            print_result(ctx.api.delete_entry(&category, &name)?.messages)
        }
        Some(Commands::Rename {
            category,
            old_name,
            new_name,
        }) => print_result(ctx.api.rename_entry(&category, &old_name, &new_name)?.messages),
        Some(Commands::Move { name, from, to }) => {
            print_result(ctx.api.move_entry(&name, &from, &to)?.messages)
        }
        Some(Commands::Reorder { category, names }) => {
            print_result(ctx.api.reorder_entries(&category, &names)?.messages)
        }
        Some(Commands::ReorderCategories { names }) => {
            print_result(ctx.api.reorder_categories(&names)?.messages)
        }
        Some(Commands::Hide { category, name }) => {
            print_result(ctx.api.set_hidden(&category, &name, true)?.messages)
        }
        Some(Commands::Unhide { category, name }) => {
            print_result(ctx.api.set_hidden(&category, &name, false)?.messages)
        }
        Some(Commands::DisableHealth { category, name }) => print_result(
            ctx.api
                .set_health_check_disabled(&category, &name, true)?
                .messages,
        ),
        Some(Commands::EnableHealth { category, name }) => print_result(
            ctx.api
                .set_health_check_disabled(&category, &name, false)?
                .messages,
        ),
        Some(Commands::Category { action }) => handle_category(&mut ctx, action),
        Some(Commands::Import { path }) => {
            let raw = read_input(&path)?;
            print_result(ctx.api.import_document(&raw)?.messages)
        }
        Some(Commands::Export { output }) => handle_export(&ctx, output),
        Some(Commands::Active) => {
            let result = ctx.api.active_document()?;
            print!("{}", result.text.unwrap_or_default());
            Ok(())
        }
        Some(Commands::Validate { path }) => handle_validate(&ctx, &path),
        Some(Commands::Backup) => print_result(ctx.api.backup()?.messages),
        Some(Commands::Example) => {
            print!("{}", ctx.api.example()?.text.unwrap_or_default());
            Ok(())
        }
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, false),
    }
}

fn setup_logging(verbose: bool) {
    let env_level = std::env::var(LOG_ENV).ok();
    let level = match resolve_level(verbose, env_level.as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Warning: {}; using warn", e);
            "warn"
        }
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Warning: {}", e);
    }
}

fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("dev", "homecfg", "homecfg")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| HomecfgError::Config("could not determine a config directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = config_dir()?;
    let config = AppConfig::load(&config_dir)?;

    let services = match (&cli.file, std::env::var_os(SERVICES_ENV)) {
        (Some(path), _) => path.clone(),
        (None, Some(env)) if !env.is_empty() => PathBuf::from(env),
        _ => config.services_path(&config_dir),
    };
    let paths = HomecfgPaths {
        backup_dir: config.backup_path(&config_dir),
        config_dir,
    };

    Ok(AppContext {
        api: HomecfgApi::new(FileStore::new(services), paths),
    })
}

fn build_fields(pairs: &[String], json: Option<&str>) -> Result<Mapping> {
    let mut fields = match json {
        Some(json) => fields_from_json(json)?,
        None => Mapping::new(),
    };
    for (key, value) in fields_from_pairs(pairs)? {
        fields.insert(key, value);
    }
    Ok(fields)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn handle_list(ctx: &AppContext, json: bool) -> Result<()> {
    let result = ctx.api.list_entries()?;
    let document = result.document.unwrap_or_default();
    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }
    print_document(&document, &ctx.api.store().location());
    print_messages(&result.messages);
    Ok(())
}

fn handle_categories(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_categories()?;
    for name in &result.categories {
        println!("{}", name);
    }
    Ok(())
}

fn handle_show(ctx: &AppContext, category: &str, name: &str, json: bool) -> Result<()> {
    let result = ctx.api.get_entry(category, name)?;
    for found in &result.affected_entries {
        if json {
            println!("{}", serde_json::to_string_pretty(found)?);
        } else {
            print_entry_detail(found)?;
        }
    }
    Ok(())
}

fn handle_category(ctx: &mut AppContext, action: CategoryCommands) -> Result<()> {
    let result = match action {
        CategoryCommands::Create { name } => ctx.api.create_category(&name)?,
        CategoryCommands::Rename { old_name, new_name } => {
            ctx.api.rename_category(&old_name, &new_name)?
        }
        CategoryCommands::Delete { name, force } => ctx.api.delete_category(&name, force)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let text = ctx.api.export_document()?.text.unwrap_or_default();
    match output {
        Some(path) => {
            fs::write(&path, &text)?;
            print_messages(&[CmdMessage::success(format!(
                "Exported to {}",
                path.display()
            ))]);
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn handle_validate(ctx: &AppContext, path: &Path) -> Result<()> {
    let raw = read_input(path)?;
    let result = ctx.api.validate_document(&raw)?;
    let report = result.validation.unwrap_or_default();
    for error in &report.errors {
        println!("{} {}", "error:".red().bold(), error);
    }
    for warning in &report.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    print_messages(&result.messages);
    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            for key in CONFIG_KEYS {
                println!("{} = {}", key, config.get(key).unwrap_or_default());
            }
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_result(messages: Vec<CmdMessage>) -> Result<()> {
    print_messages(&messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const HIDDEN_MARKER: &str = "◌";
const VISIBLE_MARKER: &str = "●";

fn print_document(document: &Document, location: &str) {
    if document.is_empty() {
        println!("No services in {}.", location);
        return;
    }

    let name_width = document
        .categories
        .iter()
        .flat_map(|c| &c.entries)
        .map(|e| e.name.width())
        .max()
        .unwrap_or(0);

    for (i, category) in document.categories.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", category.name.bold());
        if category.entries.is_empty() {
            println!("    {}", "(empty)".dimmed());
        }
        for entry in &category.entries {
            print_entry_line(entry, name_width);
        }
    }
}

fn print_entry_line(entry: &Entry, name_width: usize) {
    let marker = if entry.hidden {
        HIDDEN_MARKER.dimmed()
    } else {
        VISIBLE_MARKER.green()
    };
    let padding = name_width.saturating_sub(entry.name.width());
    let name = if entry.hidden {
        entry.name.dimmed()
    } else {
        entry.name.normal()
    };

    let mut tags = Vec::new();
    if entry.hidden {
        tags.push("hidden");
    }
    if entry.health_check_disabled {
        tags.push("health off");
    }
    let tags = if tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", tags.join(", "))
    };

    let href = entry
        .fields
        .get("href")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let fixed = 4 + 2 + name_width + 2 + tags.width();
    let href = truncate_to_width(href, LINE_WIDTH.saturating_sub(fixed));

    println!(
        "  {} {}{}  {}{}",
        marker,
        name,
        " ".repeat(padding),
        href.dimmed(),
        tags.yellow()
    );
}

fn print_entry_detail(found: &EntryRef) -> Result<()> {
    let entry = &found.entry;
    println!("{} / {}", found.category.dimmed(), entry.name.bold());
    println!("--------------------------------");
    if entry.hidden {
        println!("{}", "hidden".yellow());
    }
    if entry.health_check_disabled {
        println!("{}", "health check disabled".yellow());
    }
    if !entry.fields.is_empty() {
        print!("{}", serde_yaml::to_string(&entry.fields)?);
    }
    Ok(())
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
