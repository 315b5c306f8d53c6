#![forbid(unsafe_code)]
//! policyforge Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use policyforge::commands::{
    execute_answers, execute_diff, execute_edit, execute_flags, execute_generate, execute_init,
    execute_questions, execute_rollback, execute_show, execute_status, execute_versions,
    open_workspace, AnswersSubcommand, DiffOptions, EditOptions, FlagsSubcommand,
    GenerateOptions, InitOptions, QuestionsOptions, RollbackOptions, ShowOptions, VersionsOptions,
};
use policyforge::config::CONFIG_FILE;
use policyforge::{Config, DiffMode, DocumentType, FileFlags, PolicyError, StoreBackend};

#[derive(Parser)]
#[command(name = "policyforge")]
#[command(about = "Questionnaire-driven legal documents with version history")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new policyforge project
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Author recorded on history entries
        #[arg(long)]
        author: Option<String>,

        /// Site name used when the questionnaire leaves it blank
        #[arg(long)]
        site_name: Option<String>,

        /// Site URL used when the questionnaire leaves it blank
        #[arg(long)]
        site_url: Option<String>,

        /// Storage backend (file, sqlite)
        #[arg(long)]
        backend: Option<StoreBackend>,

        /// Skip interactive prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List questionnaire questions
    Questions {
        /// Include questions hidden by their conditions
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change saved answers
    Answers {
        #[command(subcommand)]
        cmd: AnswersCommands,
    },

    /// Show questionnaire progress and document state
    Status,

    /// Manage jurisdiction compliance flags
    Flags {
        #[command(subcommand)]
        cmd: FlagsCommands,
    },

    /// Generate documents from the saved answers
    Generate {
        /// Document type (e.g. privacy_policy); all types when omitted
        document_type: Option<DocumentType>,

        /// Generate every document type
        #[arg(long, conflicts_with = "document_type")]
        all: bool,
    },

    /// Print a document or one of its versions
    Show {
        document_type: DocumentType,

        /// Version ordinal (1 is the oldest)
        #[arg(long)]
        version: Option<usize>,

        /// Strip markup
        #[arg(long)]
        plain: bool,
    },

    /// Replace a document body with hand-written content
    Edit {
        document_type: DocumentType,

        /// File holding the new body
        #[arg(short, long)]
        file: PathBuf,

        /// Fail if the document changed since this revision
        #[arg(long)]
        expected_revision: Option<u64>,
    },

    /// List the versions of a document
    Versions {
        document_type: DocumentType,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two versions of a document
    Diff {
        document_type: DocumentType,

        /// Older version ordinal
        from: usize,

        /// Newer version ordinal
        to: usize,

        /// Diff algorithm (positional, lcs)
        #[arg(long)]
        mode: Option<DiffMode>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a document to an earlier version
    Rollback {
        document_type: DocumentType,

        /// Version ordinal to restore
        ordinal: usize,

        /// Fail if the document changed since this revision
        #[arg(long)]
        expected_revision: Option<u64>,
    },
}

#[derive(Subcommand)]
enum AnswersCommands {
    /// Print saved answers
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace answers with the contents of a JSON or YAML file
    Import {
        file: PathBuf,

        /// Merge into the saved answers instead of replacing them
        #[arg(long)]
        merge: bool,
    },
    /// Set individual answers (key=value)
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Answer visible questions one at a time
    Interactive,
}

#[derive(Subcommand)]
enum FlagsCommands {
    /// List compliance flags
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set flags (e.g. GDPR=true CCPA=false)
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "policyforge=debug" } else { "policyforge=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("✗").red(), e);
        for cause in e.chain().skip(1) {
            eprintln!("  {}", style(cause).dim());
        }
        let user_error = e
            .downcast_ref::<PolicyError>()
            .is_some_and(PolicyError::is_user_error);
        std::process::exit(if user_error { 2 } else { 1 });
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init { force, author, site_name, site_url, backend, yes } = cli.command {
        let options = InitOptions {
            config_path: cli.config,
            force,
            author,
            site_name,
            site_url,
            backend,
            yes,
        };
        return execute_init(options);
    }

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        tracing::debug!("No config at {:?}; using defaults", cli.config);
        Config::default()
    };

    if let Commands::Flags { cmd } = cli.command {
        let flags = FileFlags::new(&config.compliance_file);
        let subcommand = match cmd {
            FlagsCommands::List { json } => FlagsSubcommand::List { json },
            FlagsCommands::Set { assignments } => FlagsSubcommand::Set { assignments },
        };
        return execute_flags(&flags, subcommand);
    }

    let mut workspace = open_workspace(&config)?;

    match cli.command {
        Commands::Init { .. } | Commands::Flags { .. } => {}

        Commands::Questions { all, json } => {
            execute_questions(&workspace, QuestionsOptions { all, json })?;
        }

        Commands::Answers { cmd } => {
            let subcommand = match cmd {
                AnswersCommands::Show { json } => AnswersSubcommand::Show { json },
                AnswersCommands::Import { file, merge } => AnswersSubcommand::Import { file, merge },
                AnswersCommands::Set { assignments } => AnswersSubcommand::Set { assignments },
                AnswersCommands::Interactive => AnswersSubcommand::Interactive,
            };
            execute_answers(&mut workspace, subcommand)?;
        }

        Commands::Status => execute_status(&workspace)?,

        Commands::Generate { document_type, all } => {
            execute_generate(&mut workspace, GenerateOptions { document_type, all })?;
        }

        Commands::Show { document_type, version, plain } => {
            execute_show(&workspace, ShowOptions { document_type, version, plain })?;
        }

        Commands::Edit { document_type, file, expected_revision } => {
            let options = EditOptions {
                document_type,
                file,
                expected_revision,
            };
            execute_edit(&mut workspace, options)?;
        }

        Commands::Versions { document_type, json } => {
            execute_versions(&workspace, VersionsOptions { document_type, json })?;
        }

        Commands::Diff { document_type, from, to, mode, json } => {
            let options = DiffOptions {
                document_type,
                from,
                to,
                mode,
                json,
            };
            execute_diff(&workspace, options)?;
        }

        Commands::Rollback { document_type, ordinal, expected_revision } => {
            let options = RollbackOptions {
                document_type,
                ordinal,
                expected_revision,
            };
            execute_rollback(&mut workspace, options)?;
        }
    }

    Ok(())
}
