//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `BursarBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (ledger, invoice, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

pub use commands::*;
pub use handlers::*;

/// Whether an error was caused by the request rather than by the system.
///
/// These are shown to the user as-is; everything else gets a generic reply.
#[must_use]
pub const fn is_user_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Validation(_)
            | Error::InvalidStatusTransition { .. }
            | Error::StudentNotFound { .. }
            | Error::ClassLevelNotFound { .. }
            | Error::FeeStructureNotFound { .. }
            | Error::InvoiceNotFound { .. }
            | Error::DuplicateInvoice { .. }
    )
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if is_user_error(&error) {
                warn!("Command `{}` rejected: {error}", ctx.command().name);
                format!("❌ {error}")
            } else {
                error!("Error in command `{}`: {error:?}", ctx.command().name);
                "❌ Something went wrong while talking to the ledger. Please try again later."
                    .to_string()
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Starts the Discord client and blocks until it stops.
///
/// Commands are registered globally once the client is ready.
#[instrument(skip(token, database))]
pub async fn run_bot(token: String, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::record(),
                commands::history(),
                commands::balance(),
                commands::summary(),
                commands::ledger(),
                commands::invoice(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::ValidationErrors;

    #[test]
    fn test_user_errors_are_shown_verbatim() {
        assert!(is_user_error(&Error::Validation(ValidationErrors::single(
            "amount",
            "must be greater than zero"
        ))));
        assert!(is_user_error(&Error::InvoiceNotFound { id: 4 }));
        assert!(is_user_error(&Error::InvalidStatusTransition {
            from: "PAID".to_string(),
            to: "PENDING".to_string(),
        }));
    }

    #[test]
    fn test_system_errors_are_hidden() {
        assert!(!is_user_error(&Error::Database(sea_orm::DbErr::Custom(
            "disk full".to_string()
        ))));
        assert!(!is_user_error(&Error::Config {
            message: "bad toml".to_string()
        }));
    }
}
