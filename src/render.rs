//! Plain-text rendering of contacts and upcoming occasions.

use chrono::NaiveDate;

use crate::models::{Contact, Objective};

const UNNAMED: &str = "(unnamed)";
const NO_OCCASION: &str = "(no occasion)";
const NO_DATE: &str = "??-??";

/// Render a contact card with its objectives as a tree.
///
/// Example output:
/// ```text
/// Shiva <none>
/// notes: Shiva bit me
/// ├── birthday 02-20 (weekly, remind month)
/// └── (no occasion) ??-??
/// ```
pub fn render_contact(contact: &Contact) -> String {
    let mut output = String::new();

    output.push_str(&display_name(contact));
    output.push_str(" <");
    output.push_str(contact.email_pretty());
    output.push_str(">\n");

    if !contact.notes().is_empty() {
        output.push_str("notes: ");
        output.push_str(&contact.notes().replace('\n', " "));
        output.push('\n');
    }

    for (i, objective) in contact.objectives.iter().enumerate() {
        let is_last = i == contact.objectives.len() - 1;
        output.push_str(if is_last { "└── " } else { "├── " });
        output.push_str(&objective_line(objective));
        output.push('\n');
    }

    output
}

/// One occasion coming up within the requested window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub date: NaiveDate,
    pub days_away: i64,
    pub name: String,
    pub occasion: String,
}

/// Collect objectives whose next occurrence is within `days` of `today`,
/// earliest first. Objectives without a usable date are skipped.
pub fn upcoming(contacts: &[Contact], today: NaiveDate, days: i64) -> Vec<Upcoming> {
    let mut found: Vec<Upcoming> = contacts
        .iter()
        .flat_map(|contact| {
            contact.objectives.iter().filter_map(move |objective| {
                let date = objective.next_occurrence(today).ok()?;
                let days_away = (date - today).num_days();
                (days_away <= days).then(|| Upcoming {
                    date,
                    days_away,
                    name: display_name(contact),
                    occasion: objective
                        .occasion
                        .clone()
                        .unwrap_or_else(|| NO_OCCASION.to_string()),
                })
            })
        })
        .collect();

    found.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    found
}

/// Render [`upcoming`] as one line per occasion.
pub fn render_upcoming(contacts: &[Contact], today: NaiveDate, days: i64) -> String {
    let items = upcoming(contacts, today, days);
    if items.is_empty() {
        return format!("No occasions in the next {} days\n", days);
    }

    let mut output = String::new();
    for item in items {
        let when = match item.days_away {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            n => format!("in {} days", n),
        };
        output.push_str(&format!(
            "{} {}: {} ({})\n",
            item.date.format("%m-%d"),
            item.name,
            item.occasion,
            when
        ));
    }
    output
}

fn display_name(contact: &Contact) -> String {
    let name = contact.name();
    if name.is_empty() {
        UNNAMED.to_string()
    } else {
        name
    }
}

fn objective_line(objective: &Objective) -> String {
    let occasion = objective.occasion.as_deref().unwrap_or(NO_OCCASION);
    let date = objective
        .occasion_date()
        .unwrap_or_else(|_| NO_DATE.to_string());

    let mut details = Vec::new();
    if let Some(periodicity) = objective.periodicity.as_deref() {
        details.push(periodicity.to_string());
    }
    if let Some(reminder) = objective.reminder.as_deref() {
        details.push(format!("remind {}", reminder));
    }

    if details.is_empty() {
        format!("{} {}", occasion, date)
    } else {
        format!("{} {} ({})", occasion, date, details.join(", "))
    }
}
