use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds.
static VERSION: Lazy<String> = Lazy::new(|| {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    if IS_RELEASE == "true" || GIT_HASH.is_empty() {
        VERSION.to_string()
    } else {
        format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
    }
});

fn get_version() -> &'static str {
    VERSION.as_str()
}

#[derive(Parser, Debug)]
#[command(name = "homecfg", version = get_version())]
#[command(about = "Edit a dashboard services.yaml without losing its commented-out entries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Services file to edit (overrides HOMECFG_SERVICES and the config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List categories and their entries
    #[command(alias = "ls")]
    List {
        /// Print the whole document as JSON
        #[arg(long)]
        json: bool,
    },

    /// List category names
    Categories,

    /// Show one entry with its fields and flags
    Show {
        category: String,
        name: String,

        #[arg(long)]
        json: bool,
    },

    /// Add an entry (creates the category if needed)
    Add {
        category: String,
        name: String,

        /// Field as key=value; dotted keys nest (widget.type=emby)
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,

        /// Fields as a JSON object, merged under --field values
        #[arg(long)]
        json_fields: Option<String>,
    },

    /// Replace an entry's fields
    Update {
        category: String,
        name: String,

        /// Field as key=value; dotted keys nest (widget.type=emby)
        #[arg(short = 'F', long = "field")]
        fields: Vec<String>,

        /// Fields as a JSON object, merged under --field values
        #[arg(long)]
        json_fields: Option<String>,
    },

    /// Delete an entry
    #[command(alias = "rm")]
    Delete { category: String, name: String },

    /// Rename an entry, keeping its position
    Rename {
        category: String,
        old_name: String,
        new_name: String,
    },

    /// Move an entry to the end of another category
    #[command(alias = "mv")]
    Move {
        name: String,
        from: String,
        to: String,
    },

    /// Set the order of a category's entries (unlisted entries are dropped)
    Reorder {
        category: String,

        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },

    /// Set the order of categories (unlisted ones follow)
    ReorderCategories {
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },

    /// Comment an entry out
    Hide { category: String, name: String },

    /// Bring a hidden entry back
    Unhide { category: String, name: String },

    /// Comment out an entry's ping/server/container fields
    DisableHealth { category: String, name: String },

    /// Restore an entry's ping/server/container fields
    EnableHealth { category: String, name: String },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },

    /// Replace the document with a file ("-" reads stdin)
    Import { path: PathBuf },

    /// Print the document as it is saved
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the active document (hidden entries left out)
    Active,

    /// Check a file without saving it ("-" reads stdin)
    Validate { path: PathBuf },

    /// Copy the services file to the backup directory
    Backup,

    /// Print an example services file
    Example,

    /// Get or set configuration
    Config {
        /// Configuration key (services-file, backup-dir)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add an empty category at the end
    Create { name: String },

    /// Rename a category, keeping its position
    Rename { old_name: String, new_name: String },

    /// Delete a category
    Delete {
        name: String,

        /// Delete it even if it still has entries
        #[arg(long)]
        force: bool,
    },
}
