use anyhow::Result;
use clap::{Parser, Subcommand};
use storage::Storage;
use tracing_subscriber::EnvFilter;

mod seed;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://./data/storefront.db"
    )]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace all users, products and orders with the seed set.
    Import,
    /// Delete all users, products, reviews and orders.
    Destroy,
    CreateAdmin {
        name: String,
        email: String,
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::Import => {
            let admin = seed::import(&storage).await?;
            println!("data imported, admin user_id={}", admin.0);
        }
        Command::Destroy => {
            storage.destroy_all_data().await?;
            println!("data destroyed");
        }
        Command::CreateAdmin {
            name,
            email,
            password,
        } => {
            let user_id = seed::create_admin(&storage, &name, &email, &password).await?;
            println!("created admin user_id={}", user_id.0);
        }
    }

    Ok(())
}
