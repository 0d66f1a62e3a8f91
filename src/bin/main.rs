//! Sift CLI - compile query strings against a repository configuration.
//!
//! Usage:
//!   sift compile <project.toml> --filter "price:between_100,200" --sort "name:desc"
//!   sift validate <project.toml>
//!   sift relations <project.toml>
//!
//! Examples:
//!   sift compile demo.toml --filter "profile.photo:equal_x" --output json
//!   sift compile demo.toml --join profile --sort "profile.photo:asc"

use clap::{Parser, Subcommand, ValueEnum};
use sift::config::Project;
use sift::query::QueryPlan;
use sift::session::Session;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Compile filter/sort query strings into relational query plans")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile filter/sort/search strings into a query plan
    Compile {
        /// Path to the project TOML file
        file: PathBuf,

        /// Filter string, e.g. "price:between_100,200@status:equal_active"
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort string, e.g. "name:desc@id:asc"
        #[arg(short, long)]
        sort: Option<String>,

        /// Search term matched across the searchable columns
        #[arg(long)]
        search: Option<String>,

        /// Relation to join up front (repeatable)
        #[arg(short, long)]
        join: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Validate a project file without compiling
    Validate {
        /// Path to the project TOML file
        file: PathBuf,
    },

    /// List the relations a project file declares
    Relations {
        /// Path to the project TOML file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Compile {
            file,
            filter,
            sort,
            search,
            join,
            output,
        } => {
            let project = Project::from_file(&file).map_err(|e| e.to_string())?;
            let mut session =
                Session::new(&project.repository, &project.schema, QueryPlan::new());

            for name in &join {
                session.join(name).map_err(|e| e.to_string())?;
            }
            if let Some(raw) = &filter {
                session.filter(raw).map_err(|e| e.to_string())?;
            }
            if let Some(raw) = &sort {
                session.sort(raw).map_err(|e| e.to_string())?;
            }
            if let Some(raw) = &search {
                session.search(raw).map_err(|e| e.to_string())?;
            }

            let plan = session.into_query();
            match output {
                OutputFormat::Text => {
                    if plan.is_empty() {
                        println!("(empty plan)");
                    } else {
                        println!("{plan}");
                    }
                }
                OutputFormat::Json => {
                    let rendered =
                        serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())?;
                    println!("{rendered}");
                }
            }
            Ok(())
        }

        Commands::Validate { file } => {
            Project::from_file(&file).map_err(|e| e.to_string())?;
            println!("OK");
            Ok(())
        }

        Commands::Relations { file } => {
            let project = Project::from_file(&file).map_err(|e| e.to_string())?;
            let mut names: Vec<&String> = project.repository.relations.keys().collect();
            names.sort();
            for name in names {
                let relation = &project.repository.relations[name];
                println!(
                    "{name}  ({} hops, {} filterable, {} sortable)",
                    relation.chain.len(),
                    relation.filterable.len(),
                    relation.sortable.len()
                );
            }
            Ok(())
        }
    }
}
