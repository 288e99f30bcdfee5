// Diagnostic: resolve an access token against the family roster.
//
// Fetches the user behind the token from the auth service, runs one
// reconciliation pass, and prints the resolved session. Useful when a
// family member reports being bounced back to the login page.

use anyhow::{Context, Result};
use catalog_core::domains::auth::SessionReconciler;
use catalog_core::kernel::{GoTrueAuthService, PgMemberStore};
use catalog_core::Config;
use clap::Parser;
use gotrue::{GoTrueOptions, GoTrueService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(about = "Resolve an auth access token against the family roster")]
struct Args {
    /// Access token of the session to check
    #[arg(long)]
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let auth_service = Arc::new(GoTrueService::new(GoTrueOptions {
        base_url: config.auth_base_url,
        anon_key: config.auth_anon_key,
        redirect_url: config.auth_redirect_url,
    }));
    let auth = Arc::new(GoTrueAuthService::with_access_token(
        auth_service,
        args.token,
    ));
    let members = Arc::new(PgMemberStore::new(pool));

    let reconciler = SessionReconciler::new(members, auth);
    reconciler.bootstrap().await;

    let state = reconciler.state();
    match (&state.identity, &state.member) {
        (None, _) => println!("no session behind this token"),
        (Some(identity), None) => println!(
            "identity {} ({}) is not linked to any family member",
            identity.id,
            identity.email.as_deref().unwrap_or("no email")
        ),
        (Some(identity), Some(member)) => println!(
            "identity {} resolves to {} <{}>{}",
            identity.id,
            member.name,
            member.email,
            if member.is_admin { " [admin]" } else { "" }
        ),
    }

    Ok(())
}
