use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rolodex::config::{Config, DEFAULT_LOG_FILTER};
use rolodex::models::Contact;
use rolodex::{render, store};

#[derive(Parser)]
#[command(name = "rdx")]
#[command(about = "Keep track of the people you mean to stay in touch with")]
struct Cli {
    /// Directory holding contact files (overrides ROLODEX_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a contact card from a JSON file ("-" for stdin)
    Show { input: PathBuf },
    /// Print the mounted contact as JSON ("-" for stdin)
    Normalize { input: PathBuf },
    /// Store a contact from a JSON file ("-" for stdin) under a name
    Import { name: String, input: PathBuf },
    /// Print the contact stored under a name
    Get { name: String },
    /// Print every contact in the data directory
    List,
    /// List occasions coming up soon
    Upcoming {
        /// Look-ahead window in days
        #[arg(short, long, default_value = "30")]
        days: i64,
    },
}

/// Initialize tracing on stderr so stdout carries only command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(input: &Path) -> store::Result<Contact> {
    if input == Path::new("-") {
        store::load_reader(std::io::stdin().lock(), "<stdin>")
    } else {
        store::load_path(input)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Show { input } => {
            let contact = read_input(&input)?;
            print!("{}", render::render_contact(&contact));
        }
        Commands::Normalize { input } => {
            let contact = read_input(&input)?;
            println!("{}", serde_json::to_string_pretty(&contact.to_bag())?);
        }
        Commands::Import { name, input } => {
            let contact = read_input(&input)?;
            let config = Config::resolve(cli.data_dir)?;
            let path = store::ContactStore::open(&config.data_dir)?.save(&name, &contact)?;
            tracing::info!("Saved {} to {}", name, path.display());
        }
        Commands::Get { name } => {
            let config = Config::resolve(cli.data_dir)?;
            let contact = store::ContactStore::open(&config.data_dir)?.load(&name)?;
            print!("{}", render::render_contact(&contact));
        }
        Commands::List => {
            let config = Config::resolve(cli.data_dir)?;
            let contacts = store::ContactStore::open(&config.data_dir)?.list()?;
            tracing::info!(
                "Loaded {} contacts from {}",
                contacts.len(),
                config.data_dir.display()
            );
            for (name, contact) in &contacts {
                println!("[{}]", name);
                print!("{}", render::render_contact(contact));
            }
        }
        Commands::Upcoming { days } => {
            let config = Config::resolve(cli.data_dir)?;
            let contacts: Vec<Contact> = store::ContactStore::open(&config.data_dir)?
                .list()?
                .into_iter()
                .map(|(_, contact)| contact)
                .collect();
            let today = chrono::Local::now().date_naive();
            print!("{}", render::render_upcoming(&contacts, today, days));
        }
    }

    Ok(())
}
