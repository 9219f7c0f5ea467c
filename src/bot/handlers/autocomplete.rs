//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module suggests student, class level and fee structure ids, plus the
//! fixed transaction and invoice vocabularies, as the user types.

use crate::{
    bot::BotData,
    core::roster,
    entities::{
        invoice::InvoiceStatus,
        transaction::{TransactionStatus, TransactionType},
    },
    errors::Error,
};

/// Discord shows at most this many suggestions.
const AUTOCOMPLETE_LIMIT: usize = 25;

/// Keeps the candidates whose label contains `partial`, case-insensitively,
/// sorted by label.
fn filter_candidates<I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|c| c.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(AUTOCOMPLETE_LIMIT);
    matching
}

/// Provides autocomplete suggestions for student ids.
///
/// Active students match on their id or full name; the suggestion is always
/// the id so it can be passed straight to the command.
pub async fn autocomplete_student_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(students) = roster::get_all_active_students(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = students
        .into_iter()
        .filter(|s| {
            s.id.to_lowercase().contains(&partial_lower)
                || s.full_name().to_lowercase().contains(&partial_lower)
        })
        .map(|s| s.id)
        .collect();
    matching.sort();
    matching.truncate(AUTOCOMPLETE_LIMIT);
    matching
}

/// Provides autocomplete suggestions for class level ids.
pub async fn autocomplete_class_level_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(levels) = roster::get_class_levels(db).await else {
        return Vec::new();
    };
    filter_candidates(levels.into_iter().map(|l| l.id), partial)
}

/// Provides autocomplete suggestions for fee structure ids.
pub async fn autocomplete_fee_structure_id(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(fees) = roster::get_fee_structures(db).await else {
        return Vec::new();
    };
    filter_candidates(fees.into_iter().map(|f| f.id), partial)
}

/// Suggests `fee_payment`, `fine` and `refund`.
pub async fn autocomplete_transaction_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_candidates(
        TransactionType::ALL.iter().map(|t| t.as_str().to_string()),
        partial,
    )
}

/// Suggests `pending` and `completed`.
pub async fn autocomplete_transaction_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_candidates(
        TransactionStatus::ALL.iter().map(|s| s.as_str().to_string()),
        partial,
    )
}

/// Suggests the four invoice statuses.
pub async fn autocomplete_invoice_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_candidates(
        InvoiceStatus::ALL.iter().map(|s| s.as_str().to_string()),
        partial,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_candidates_is_case_insensitive_and_sorted() {
        let candidates = ["grade-8", "Grade-7", "kindergarten"].map(String::from);
        assert_eq!(
            filter_candidates(candidates, "GRADE"),
            ["Grade-7", "grade-8"]
        );
    }

    #[test]
    fn test_filter_candidates_caps_suggestions() {
        let candidates = (0..40).map(|i| format!("STU-{i:03}"));
        let matching = filter_candidates(candidates, "stu");
        assert_eq!(matching.len(), AUTOCOMPLETE_LIMIT);
        assert_eq!(matching[0], "STU-000");
    }
}
