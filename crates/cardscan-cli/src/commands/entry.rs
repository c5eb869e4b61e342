//! Type command - replay keystrokes into a card form.

use std::sync::{Arc, Mutex};

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::debug;

use cardscan_core::{CardField, CardForm, CardInputModel, EditOutcome, MainQueue};

use super::FieldArg;

/// Arguments for the type command.
#[derive(Args)]
pub struct TypeArgs {
    /// Field to type into
    #[arg(value_enum)]
    field: FieldArg,

    /// Edits in order; each is pasted as one edit, a run of '<' is that many backspaces
    #[arg(required = true)]
    edits: Vec<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Field state after all edits.
#[derive(Debug, Serialize)]
pub struct EntryReport {
    pub display: String,
    pub canonical: String,
    pub complete: bool,
    pub accepted: usize,
    pub truncated: usize,
    pub rejected: usize,
    /// Canonical values published to the form's listener, in order.
    pub published: Vec<String>,
}

pub fn run(args: TypeArgs) -> anyhow::Result<()> {
    let field = CardField::from(args.field);
    let report = replay(field, &args.edits);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.display);
    println!("Canonical: {}", report.canonical);
    println!(
        "Complete: {}",
        if report.complete {
            style("yes").green()
        } else {
            style("no").yellow()
        }
    );
    if report.rejected > 0 || report.truncated > 0 {
        eprintln!(
            "{} {} edits rejected, {} truncated",
            style("!").yellow(),
            report.rejected,
            report.truncated
        );
    }

    Ok(())
}

/// Apply edits to one field of a fresh form and collect what its listener saw.
pub fn replay(field: CardField, edits: &[String]) -> EntryReport {
    let mut queue = MainQueue::new();
    let mut form = CardForm::new(queue.handle());
    let model = CardInputModel::new(queue.handle());

    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = published.clone();
    let target = model.clone();
    let listener = move |value: String| {
        match field {
            CardField::CardNumber => target.set_card_number(value.clone()),
            CardField::ExpiryDate => target.set_expiry_date(value.clone()),
        }
        if let Ok(mut seen) = sink.lock() {
            seen.push(value);
        }
    };
    match field {
        CardField::CardNumber => form.number().bind(listener),
        CardField::ExpiryDate => form.expiry_date().bind(listener),
    }

    let mut report = EntryReport {
        display: String::new(),
        canonical: String::new(),
        complete: false,
        accepted: 0,
        truncated: 0,
        rejected: 0,
        published: Vec::new(),
    };

    for edit in edits {
        let outcomes: Vec<EditOutcome> = if !edit.is_empty() && edit.chars().all(|c| c == '<') {
            edit.chars().map(|_| form.backspace(field)).collect()
        } else {
            vec![form.type_text(field, edit)]
        };

        for outcome in outcomes {
            debug!("edit {:?}: {:?}", edit, outcome);
            match outcome {
                EditOutcome::Accepted => report.accepted += 1,
                EditOutcome::Truncated { .. } => report.truncated += 1,
                EditOutcome::Rejected(_) => report.rejected += 1,
                EditOutcome::Unchanged => {}
            }
        }
    }
    queue.run_pending();

    report.display = form.display(field);
    report.canonical = form.entry(field).canonical().to_string();
    report.complete = form.entry(field).is_complete();
    report.published = published.lock().map(|seen| seen.clone()).unwrap_or_default();
    report
}
