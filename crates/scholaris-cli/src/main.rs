use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use scholaris_cli::admin::{NewAdmin, create_admin};
use scholaris_cli::seeder::{self, SeedConfig};
use scholaris_config::DatabaseConfig;
use scholaris_db::{PgPool, init_db_pool};
use scholaris_models::AdminRole;

#[derive(Parser)]
#[command(name = "scholaris-cli")]
#[command(about = "Scholaris CLI - Administrative tools for Scholaris", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// One of super_admin, admin, staff
        #[arg(short = 'r', long, default_value = "super_admin")]
        role: AdminRole,
    },
    /// Seed the database with fake students, teachers and notices
    Seed {
        #[arg(long, default_value = "50")]
        students: usize,

        #[arg(long, default_value = "10")]
        teachers: usize,

        #[arg(long, default_value = "5")]
        notices: usize,
    },
    /// Remove seeded data (real records are kept)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let pool = init_db_pool(&config).await?;

    match cli.command {
        Commands::CreateAdmin {
            name,
            email,
            password,
            role,
        } => handle_create_admin(&pool, name, email, password, role).await,
        Commands::Seed {
            students,
            teachers,
            notices,
        } => {
            let config = SeedConfig::default()
                .with_students(students)
                .with_teachers(teachers)
                .with_notices(notices);
            seeder::seed_all(&pool, config).await
        }
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: AdminRole,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Name")
            .interact_text()
            .context("Failed to read name")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    create_admin(
        pool,
        NewAdmin {
            name: name.clone(),
            email: email.clone(),
            password,
            role,
        },
    )
    .await
    .context("Error creating admin")?;

    println!("\n✅ Admin created successfully!");
    println!("   Email: {}", email.trim().to_lowercase());
    println!("   Name: {}", name.trim());
    println!("   Role: {}", role);

    Ok(())
}
