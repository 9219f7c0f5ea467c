//! Ledger Discord commands - `record`, `history`, `balance`, `summary`, and `ledger`.
//!
//! This module contains commands that post transactions to the school ledger
//! and read balances and period totals back through the core modules.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            report, roster,
            summary::get_summary,
            transaction as ledger,
            validation::{self, NewTransaction, ValidationErrors},
        },
        entities::transaction::TransactionStatus,
        errors::{Error, Result},
    };
    use chrono::NaiveDate;
    use std::fmt::Write;

    /// Number of rows shown by `/history`.
    const HISTORY_LIMIT: usize = 15;

    fn optional_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
        raw.map(|r| validation::parse_date(field, r))
            .transpose()
            .map_err(|e| ValidationErrors::single(e.field, e.message).into())
    }

    /// Records a fee payment, fine, or refund for a student.
    ///
    /// The command author is stored as the staff member who recorded the
    /// transaction and must be registered as staff. Status defaults to
    /// `completed` and the payment date to today.
    #[poise::command(slash_command, prefix_command)]
    pub async fn record(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID"]
        #[autocomplete = "autocomplete::autocomplete_student_id"]
        student_id: String,
        #[description = "fee_payment, fine, or refund"]
        #[autocomplete = "autocomplete::autocomplete_transaction_type"]
        transaction_type: String,
        #[description = "Amount (e.g., 1500 or 99.50)"] amount: String,
        #[description = "pending or completed (default: completed)"]
        #[autocomplete = "autocomplete::autocomplete_transaction_status"]
        status: Option<String>,
        #[description = "Payment date as YYYY-MM-DD (default: today)"] payment_date: Option<
            String,
        >,
        #[description = "Optional note, such as a receipt number"] description: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let author_id = ctx.author().id.to_string();

        if roster::get_staff_by_id(db, &author_id).await?.is_none() {
            ctx.say(
                "❌ Only registered staff can record transactions. Ask an administrator to add your Discord ID to the school configuration.",
            )
            .await?;
            return Ok(());
        }

        let input = NewTransaction {
            student_id,
            amount: validation::parse_amount("amount", &amount)?,
            transaction_type,
            status: status.unwrap_or_else(|| TransactionStatus::Completed.as_str().to_string()),
            payment_date,
            description,
            created_by_staff_id: Some(author_id),
        };

        let created = ledger::create_transaction(db, &input).await?;
        let balance = crate::core::balance::get_outstanding_balance(db, &created.student_id).await?;

        ctx.say(format!(
            "✅ Recorded {}\nOutstanding balance for {}: {}",
            report::format_transaction_summary(&created),
            created.student_id,
            report::format_amount(balance)
        ))
        .await?;
        Ok(())
    }

    /// Shows a student's balance, recent transactions and open invoices.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID"]
        #[autocomplete = "autocomplete::autocomplete_student_id"]
        student_id: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let statement = report::generate_student_statement(db, &student_id, Some(5)).await?;

        let mut response = format!(
            "🎓 **{}** ({}, {})\n\n",
            statement.student.full_name(),
            statement.student.id,
            statement.student.class_level_id
        );
        writeln!(
            &mut response,
            "💰 Outstanding balance: {}",
            report::format_amount(statement.outstanding_balance)
        )?;
        writeln!(
            &mut response,
            "🧾 Open invoices: {} totalling {}",
            statement.open_invoices.len(),
            report::format_amount(statement.amount_invoiced_open)
        )?;
        writeln!(&mut response)?;

        if statement.recent_transactions.is_empty() {
            response.push_str("_No transactions yet_\n");
        } else {
            response.push_str("**Recent Transactions:**\n");
            for txn in &statement.recent_transactions {
                writeln!(&mut response, "• {}", report::format_transaction_summary(txn))?;
            }
        }

        if !statement.open_invoices.is_empty() {
            response.push_str("\n**Open Invoices:**\n");
            for inv in &statement.open_invoices {
                writeln!(&mut response, "• {}", report::format_invoice_summary(inv))?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists recent transactions for one student, or for the whole school.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID (omit for every student)"]
        #[autocomplete = "autocomplete::autocomplete_student_id"]
        student_id: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let mut response = String::new();

        if let Some(student_id) = student_id {
            let transactions = ledger::get_transactions_for_student(db, &student_id).await?;
            if transactions.is_empty() {
                ctx.say(format!("📒 No transactions recorded for {student_id}."))
                    .await?;
                return Ok(());
            }
            writeln!(&mut response, "📒 **Transactions for {student_id}**\n")?;
            for txn in transactions.iter().take(HISTORY_LIMIT) {
                writeln!(&mut response, "• {}", report::format_transaction_summary(txn))?;
            }
        } else {
            let transactions = ledger::get_all_transactions(db).await?;
            if transactions.is_empty() {
                ctx.say("📒 The ledger is empty.").await?;
                return Ok(());
            }
            writeln!(&mut response, "📒 **Latest Transactions**\n")?;
            for row in transactions.iter().take(HISTORY_LIMIT) {
                let student = row
                    .student
                    .as_ref()
                    .map_or_else(|| row.transaction.student_id.clone(), |s| s.full_name());
                let staff = row
                    .staff
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), |s| s.name.clone());
                writeln!(
                    &mut response,
                    "• {} | {student} | by {staff}",
                    report::format_transaction_summary(&row.transaction)
                )?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Totals collected fees, pending amounts and fines for a period.
    ///
    /// Both bounds are inclusive and optional.
    #[poise::command(slash_command, prefix_command)]
    pub async fn summary(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First payment date as YYYY-MM-DD (optional)"] start_date: Option<String>,
        #[description = "Last payment date as YYYY-MM-DD (optional)"] end_date: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let start = optional_date("start_date", start_date.as_deref())?;
        let end = optional_date("end_date", end_date.as_deref())?;

        let totals = get_summary(db, start, end).await?;

        let period = match (start, end) {
            (Some(s), Some(e)) => format!("{s} to {e}"),
            (Some(s), None) => format!("from {s}"),
            (None, Some(e)) => format!("up to {e}"),
            (None, None) => "all time".to_string(),
        };
        ctx.say(format!(
            "📊 **Ledger Summary ({period})**\n```\n{}\n```",
            report::format_ledger_summary(&totals)
        ))
        .await?;
        Ok(())
    }

    /// Shows a single transaction by its ID.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ledger(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction ID"] transaction_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(txn) = ledger::get_transaction_by_id(db, transaction_id).await? else {
            ctx.say(format!("❌ Transaction #{transaction_id} not found."))
                .await?;
            return Ok(());
        };

        let mut response = format!("📄 {}\n", report::format_transaction_summary(&txn));
        if let Some(staff_id) = &txn.created_by_staff_id {
            let recorded_by = roster::get_staff_by_id(db, staff_id)
                .await?
                .map_or_else(|| staff_id.clone(), |s| s.name);
            writeln!(&mut response, "Recorded by {recorded_by} at {}", txn.created_at)?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
