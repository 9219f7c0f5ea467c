//! Invoice Discord commands - issuing, editing, listing and deleting invoices.
//!
//! All invoice operations live under the `/invoice` command as subcommands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            invoice as invoices, report,
            validation::{self, BulkInvoiceRequest, InvoiceUpdate, NewInvoice},
        },
        errors::{Error, Result},
    };
    use chrono::Local;
    use std::fmt::Write;

    /// Maximum invoices listed in one reply.
    const LIST_LIMIT: usize = 20;

    /// Manages student invoices.
    ///
    /// This command groups subcommands for creating, bulk generating, updating,
    /// deleting, and listing invoices, plus the overdue sweep.
    #[poise::command(
        slash_command,
        subcommands(
            "invoice_create",
            "invoice_bulk",
            "invoice_update",
            "invoice_delete",
            "invoice_list",
            "invoice_overdue"
        )
    )]
    pub async fn invoice(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Invoice command. Available subcommands:\n\
            `/invoice create` - Issue one invoice\n\
            `/invoice bulk` - Invoice every active student of a class level\n\
            `/invoice update` - Change amount, due date, or status\n\
            `/invoice delete` - Remove an invoice\n\
            `/invoice list` - List invoices\n\
            `/invoice overdue` - Flag unpaid invoices past their due date";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Issues a single invoice to a student.
    ///
    /// With a fee structure and no amount, the fee structure's amount is billed.
    #[poise::command(slash_command, rename = "create")]
    pub async fn invoice_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID"]
        #[autocomplete = "autocomplete::autocomplete_student_id"]
        student_id: String,
        #[description = "Due date as YYYY-MM-DD"] due_date: String,
        #[description = "Fee structure being billed (optional)"]
        #[autocomplete = "autocomplete::autocomplete_fee_structure_id"]
        fee_structure_id: Option<String>,
        #[description = "Amount (defaults to the fee structure amount)"] amount: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let amount = amount
            .as_deref()
            .map(|raw| validation::parse_amount("amount", raw))
            .transpose()?;

        let created = invoices::create_invoice(
            db,
            &NewInvoice {
                student_id,
                fee_structure_id,
                amount,
                due_date,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Created invoice {}",
            report::format_invoice_summary(&created)
        ))
        .await?;
        Ok(())
    }

    /// Invoices every active student in a class level for one fee structure.
    ///
    /// The batch is all-or-nothing: if any student cannot be billed, no
    /// invoice from this run is kept.
    #[poise::command(slash_command, rename = "bulk")]
    pub async fn invoice_bulk(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class level ID"]
        #[autocomplete = "autocomplete::autocomplete_class_level_id"]
        class_level_id: String,
        #[description = "Fee structure ID"]
        #[autocomplete = "autocomplete::autocomplete_fee_structure_id"]
        fee_structure_id: String,
        #[description = "Due date as YYYY-MM-DD"] due_date: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        // Large classes can take longer than the interaction window
        ctx.defer().await?;

        let created = invoices::bulk_generate_invoices(
            db,
            &BulkInvoiceRequest {
                class_level_id: class_level_id.clone(),
                fee_structure_id: fee_structure_id.clone(),
                due_date,
            },
        )
        .await?;

        if created.is_empty() {
            ctx.say(format!(
                "ℹ️ No active students in **{class_level_id}**. Nothing was invoiced."
            ))
            .await?;
            return Ok(());
        }

        let total: rust_decimal::Decimal = created.iter().map(|i| i.amount).sum();
        ctx.say(format!(
            "✅ Issued {} invoice{} for **{fee_structure_id}** to **{class_level_id}** totalling {}.",
            created.len(),
            if created.len() == 1 { "" } else { "s" },
            report::format_amount(total)
        ))
        .await?;
        Ok(())
    }

    /// Updates an invoice's amount, due date, or status.
    #[poise::command(slash_command, rename = "update")]
    pub async fn invoice_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Invoice ID"] invoice_id: i64,
        #[description = "New amount (optional)"] amount: Option<String>,
        #[description = "New due date as YYYY-MM-DD (optional)"] due_date: Option<String>,
        #[description = "New status: PENDING, PARTIAL, PAID, or OVERDUE (optional)"]
        #[autocomplete = "autocomplete::autocomplete_invoice_status"]
        status: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let amount = amount
            .as_deref()
            .map(|raw| validation::parse_amount("amount", raw))
            .transpose()?;

        let updated = invoices::update_invoice(
            db,
            invoice_id,
            &InvoiceUpdate {
                amount,
                due_date,
                status,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Updated invoice {}",
            report::format_invoice_summary(&updated)
        ))
        .await?;
        Ok(())
    }

    /// Permanently deletes an invoice.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn invoice_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Invoice ID"] invoice_id: i64,
        #[description = "Set to true to confirm the deletion"] confirm: bool,
    ) -> Result<()> {
        if !confirm {
            ctx.say(format!(
                "⚠️ Invoice #{invoice_id} was not deleted. Run the command again with `confirm: true` to delete it."
            ))
            .await?;
            return Ok(());
        }

        let db = &ctx.data().database;
        invoices::delete_invoice(db, invoice_id).await?;

        ctx.say(format!("✅ Deleted invoice #{invoice_id}."))
            .await?;
        Ok(())
    }

    /// Lists a student's invoices, or every unpaid invoice.
    #[poise::command(slash_command, rename = "list")]
    pub async fn invoice_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student ID (omit for all unpaid invoices)"]
        #[autocomplete = "autocomplete::autocomplete_student_id"]
        student_id: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let (title, list) = match student_id {
            Some(id) => {
                let list = invoices::get_invoices_for_student(db, &id).await?;
                (format!("Invoices for {id}"), list)
            }
            None => (
                "Unpaid Invoices".to_string(),
                invoices::get_open_invoices(db).await?,
            ),
        };

        if list.is_empty() {
            ctx.say(format!("🧾 {title}: none.")).await?;
            return Ok(());
        }

        let mut response = format!("🧾 **{title}**\n\n");
        for inv in list.iter().take(LIST_LIMIT) {
            writeln!(&mut response, "• {}", report::format_invoice_summary(inv))?;
        }
        if list.len() > LIST_LIMIT {
            writeln!(&mut response, "_...and {} more_", list.len() - LIST_LIMIT)?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Marks every unpaid invoice whose due date has passed as OVERDUE.
    #[poise::command(slash_command, rename = "overdue")]
    pub async fn invoice_overdue(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let today = Local::now().date_naive();

        let marked = invoices::mark_overdue_invoices(db, today).await?;

        if marked == 0 {
            ctx.say("ℹ️ No invoices are past due.").await?;
        } else {
            ctx.say(format!(
                "⏰ Marked {marked} invoice{} as OVERDUE.",
                if marked == 1 { "" } else { "s" }
            ))
            .await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
