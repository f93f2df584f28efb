use anyhow::{anyhow, Context};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::models::{Role, User};
use crate::database::DatabaseManager;
use crate::services::user_service;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user and print a bearer token")]
    Create {
        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, help = "Unique email address")]
        email: String,

        #[arg(long, default_value = "user", help = "Role: user or admin")]
        role: Role,
    },

    #[command(about = "Print a fresh bearer token for an existing user")]
    Token {
        #[arg(long, help = "Email address of the user")]
        email: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;

    match cmd {
        UserCommands::Create { name, email, role } => {
            if name.trim().is_empty() || email.trim().is_empty() {
                return Err(anyhow!("name and email must not be empty"));
            }

            let user = user_service::create(&pool, &name, &email, role)
                .await
                .with_context(|| format!("failed to create user {}", email))?;

            let token = issue_token(&user)?;
            output_success(
                output_format,
                &format!("Created {} {}", user.role(), user.email),
                Some(json!({ "id": user.id, "role": user.role(), "token": token })),
            )
        }
        UserCommands::Token { email } => {
            let user = user_service::find_by_email(&pool, &email)
                .await?
                .ok_or_else(|| anyhow!("no user with email {}", email))?;

            let token = issue_token(&user)?;
            output_success(
                output_format,
                &format!("Issued token for {}", user.email),
                Some(json!({ "id": user.id, "role": user.role(), "token": token })),
            )
        }
    }
}

fn issue_token(user: &User) -> anyhow::Result<String> {
    generate_jwt(&Claims::new(user.id, user.role())).map_err(|e| anyhow!("failed to issue token: {}", e))
}
