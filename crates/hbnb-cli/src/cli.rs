use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hbnb_store::config::DEFAULT_FILE_PATH;

#[derive(Parser)]
#[command(
    name = "hbnb",
    about = "HBNB console — manage stored model instances",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON file the store is loaded from and saved to
    #[arg(short, long, global = true, default_value = DEFAULT_FILE_PATH)]
    pub file: PathBuf,

    /// Indent the saved file
    #[arg(long, global = true)]
    pub pretty: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new instance, save it, and print its id
    Create(ModelArgs),
    /// Print an instance
    Show(InstanceArgs),
    /// Delete an instance
    Destroy(InstanceArgs),
    /// Print all instances, optionally of one model
    All(AllArgs),
    /// Set one attribute of an instance
    Update(UpdateArgs),
    /// Count instances of a model
    Count(ModelArgs),
}

#[derive(Args)]
pub struct ModelArgs {
    pub model: String,
}

#[derive(Args)]
pub struct InstanceArgs {
    pub model: String,
    pub id: String,
}

#[derive(Args)]
pub struct AllArgs {
    pub model: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub model: String,
    pub id: String,
    pub field: String,
    pub value: String,
}
