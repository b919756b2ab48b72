//! Grant the admin role to an existing account, looked up by email.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin promote-admin -- --email organiser@example.com
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use backend::domain::{EmailAddress, Role, RoleGate};
use backend::domain::ports::UserRepository;
use backend::outbound::persistence::{
    DbPool, DieselAlumniRepository, DieselUserRepository, PoolConfig,
};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;

#[derive(Debug, Parser)]
#[command(name = "promote-admin", about = "Promote an account to admin")]
struct Cli {
    /// Email address of the account to promote.
    #[arg(long)]
    email: String,
    /// PostgreSQL URL; falls back to `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let email = EmailAddress::new(&cli.email).wrap_err("invalid --email")?;
    let database_url = resolve_database_url(cli.database_url, env::var("DATABASE_URL").ok())?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build runtime")?;
    let role = runtime.block_on(promote(&database_url, &email))?;
    println!("{email} is now {role}");
    Ok(())
}

async fn promote(database_url: &str, email: &EmailAddress) -> Result<Role> {
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to connect to database")?;
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let alumni = Arc::new(DieselAlumniRepository::new(pool));

    let user = users
        .find_by_email(email)
        .await
        .wrap_err("user lookup failed")?
        .ok_or_else(|| eyre!("no account registered for {email}"))?;
    let gate = RoleGate::new(users, alumni);
    gate.promote(user.id, Role::Admin)
        .await
        .wrap_err("promotion failed")
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    match (explicit, from_env) {
        (Some(value), _) if value.trim().is_empty() => {
            Err(eyre!("--database-url must not be empty when provided"))
        }
        (Some(value), _) => Ok(value),
        (None, Some(value)) if !value.trim().is_empty() => Ok(value),
        (None, _) => Err(eyre!("database URL missing: set --database-url or DATABASE_URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("postgres://cli"), Some("postgres://env"), "postgres://cli")]
    #[case(None, Some("postgres://env"), "postgres://env")]
    fn explicit_url_wins_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect("url resolves");
        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(Some("  "), Some("postgres://env"))]
    #[case(None, None)]
    #[case(None, Some(""))]
    fn blank_or_missing_urls_are_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        assert!(
            resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
                .is_err()
        );
    }

    #[rstest]
    fn cli_requires_email() {
        assert!(Cli::try_parse_from(["promote-admin"]).is_err());
        let cli = Cli::try_parse_from(["promote-admin", "--email", "a@b.example"]).expect("parse");
        assert_eq!(cli.email, "a@b.example");
        assert!(cli.database_url.is_none());
    }
}
