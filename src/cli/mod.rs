pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "jobfair")]
#[command(about = "Job Fair CLI - operator tasks for the Job Fair API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "User accounts and bearer tokens")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use commands::user::UserCommands;

    #[test]
    fn parses_user_create_with_role() {
        let cli = Cli::try_parse_from([
            "jobfair", "--json", "user", "create", "--name", "Ada", "--email", "ada@example.com", "--role", "admin",
        ])
        .unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::User { cmd: UserCommands::Create { name, email, role } } => {
                assert_eq!(name, "Ada");
                assert_eq!(email, "ada@example.com");
                assert_eq!(role, Role::Admin);
            }
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn role_defaults_to_user() {
        let cli = Cli::try_parse_from(["jobfair", "user", "create", "--name", "Bo", "--email", "bo@example.com"]).unwrap();
        match cli.command {
            Commands::User { cmd: UserCommands::Create { role, .. } } => assert_eq!(role, Role::User),
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn rejects_unknown_roles() {
        assert!(Cli::try_parse_from([
            "jobfair", "user", "create", "--name", "Cy", "--email", "cy@example.com", "--role", "root",
        ])
        .is_err());
    }
}
