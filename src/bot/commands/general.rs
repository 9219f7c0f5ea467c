//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BursarBuddy Help**\n\
        Here is a summary of all available commands for BursarBuddy.\n\n\
        **Ledger Commands**\n\
        • `/record <student> <type> <amount> [status] [date] [desc]` - Records a fee payment, fine, or refund.\n\
        • `/balance <student>` - Shows a student's outstanding balance, recent transactions and open invoices.\n\
        • `/history [student]` - Lists recent transactions for one student or the whole school.\n\
        • `/summary [start] [end]` - Totals collected, pending, and fines for a period.\n\
        • `/ledger <transaction_id>` - Shows a single transaction.\n\n\
        **Invoice Commands**\n\
        • `/invoice create` - Issues one invoice to a student.\n\
        • `/invoice bulk` - Issues a fee structure to every active student of a class level.\n\
        • `/invoice update` - Changes an invoice's amount, due date, or status.\n\
        • `/invoice delete` - Removes an invoice (requires `confirm: true`).\n\
        • `/invoice list [student]` - Lists invoices.\n\
        • `/invoice overdue` - Marks unpaid invoices past their due date as OVERDUE.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Dates are `YYYY-MM-DD`. Amounts are plain numbers such as `1500` or `99.50`.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
