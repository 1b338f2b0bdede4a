use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::bag::{into_bag, merge_extras, put, take_i64, take_string, Bag};
use crate::ModelError;

/// A recurring occasion to get in touch on, owned by one contact.
///
/// Every field is optional: an objective can be built from an empty or
/// partial bag and absent fields stay absent. Dates are kept exactly as
/// supplied and parsed on demand, so only the month/day of `date_occasion`
/// matters (the stored year is a placeholder such as `1100`).
///
/// `contact_id` is a plain back reference. It is overwritten whenever the
/// owning [`Contact`](super::Contact) mounts its objectives.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Objective {
    pub id: Option<i64>,
    pub contact_id: Option<i64>,
    /// Short label such as `birthday`. Stored as given; at most 25 chars in practice.
    pub occasion: Option<String>,
    pub date_occasion: Option<String>,
    /// Free-form recurrence label, e.g. `weekly`.
    pub periodicity: Option<String>,
    pub date_next_contact: Option<String>,
    pub date_last_contact: Option<String>,
    /// Free-form lead time, e.g. `month`.
    pub reminder: Option<String>,
    /// Unrecognised or ill-typed fields, kept verbatim. On output a present
    /// typed field takes precedence over an extra of the same name.
    pub extras: Bag,
}

impl Objective {
    /// Builds an objective from a bag, copying every field without validation.
    pub fn from_bag(bag: Bag) -> Self {
        let mut objective = Self::default();
        objective.absorb(bag);
        objective
    }

    /// Returns the occasion as `MM-DD`, discarding the year.
    ///
    /// # Errors
    /// [`ModelError::MissingOrInvalidDate`] when `date_occasion` is absent or
    /// cannot be parsed.
    pub fn occasion_date(&self) -> Result<String, ModelError> {
        let date = self.parsed_occasion()?;
        Ok(date.format("%m-%d").to_string())
    }

    /// The first date on or after `today` that falls on the occasion's
    /// month and day. A Feb 29 occasion lands on Feb 28 in common years.
    ///
    /// # Errors
    /// [`ModelError::MissingOrInvalidDate`] as for [`Objective::occasion_date`];
    /// [`ModelError::DateOutOfRange`] when the occurrence falls past the last
    /// representable year.
    pub fn next_occurrence(&self, today: NaiveDate) -> Result<NaiveDate, ModelError> {
        let occasion = self.parsed_occasion()?;
        match anniversary(occasion, today.year()) {
            Some(date) if date >= today => Ok(date),
            _ => {
                let year = today.year() + 1;
                anniversary(occasion, year).ok_or(ModelError::DateOutOfRange { year })
            }
        }
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Sets one field by name. Known names go to their typed slot.
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        let mut bag = Bag::new();
        bag.insert(key.into(), value);
        self.absorb(bag);
    }

    /// The outbound field map: present typed fields plus extras.
    pub fn to_bag(&self) -> Bag {
        let mut bag = Bag::new();
        put(&mut bag, "id", self.id);
        put(&mut bag, "contact_id", self.contact_id);
        put(&mut bag, "occasion", self.occasion.clone());
        put(&mut bag, "date_occasion", self.date_occasion.clone());
        put(&mut bag, "periodicity", self.periodicity.clone());
        put(&mut bag, "date_next_contact", self.date_next_contact.clone());
        put(&mut bag, "date_last_contact", self.date_last_contact.clone());
        put(&mut bag, "reminder", self.reminder.clone());
        merge_extras(&mut bag, &self.extras);
        bag
    }

    /// Overwrites `contact_id`, absent included.
    pub(crate) fn stamp(&mut self, contact_id: Option<i64>) {
        self.contact_id = contact_id;
        self.extras.remove("contact_id");
    }

    fn absorb(&mut self, mut bag: Bag) {
        let extras = &mut self.extras;
        take_i64(&mut bag, "id").apply("id", &mut self.id, extras);
        take_i64(&mut bag, "contact_id").apply("contact_id", &mut self.contact_id, extras);
        take_string(&mut bag, "occasion").apply("occasion", &mut self.occasion, extras);
        take_string(&mut bag, "date_occasion").apply("date_occasion", &mut self.date_occasion, extras);
        take_string(&mut bag, "periodicity").apply("periodicity", &mut self.periodicity, extras);
        take_string(&mut bag, "date_next_contact").apply(
            "date_next_contact",
            &mut self.date_next_contact,
            extras,
        );
        take_string(&mut bag, "date_last_contact").apply(
            "date_last_contact",
            &mut self.date_last_contact,
            extras,
        );
        take_string(&mut bag, "reminder").apply("reminder", &mut self.reminder, extras);
        extras.extend(bag);
    }

    fn parsed_occasion(&self) -> Result<NaiveDate, ModelError> {
        let raw = self.date_occasion.as_deref();
        raw.and_then(parse_date)
            .ok_or_else(|| ModelError::MissingOrInvalidDate {
                field: "date_occasion",
                value: raw.map(str::to_owned),
            })
    }
}

impl Serialize for Objective {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bag().serialize(serializer)
    }
}

impl From<Bag> for Objective {
    fn from(bag: Bag) -> Self {
        Self::from_bag(bag)
    }
}

/// Non-object values produce an empty objective.
impl From<Value> for Objective {
    fn from(value: Value) -> Self {
        Self::from_bag(into_bag(value))
    }
}

/// One element handed to [`Contact::mount_objectives`](super::Contact::mount_objectives):
/// either raw fields still to be wrapped, or an objective kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveInput {
    Raw(Value),
    Mounted(Objective),
}

impl ObjectiveInput {
    pub fn into_objective(self) -> Objective {
        match self {
            Self::Raw(value) => {
                debug!(is_object = value.is_object(), "Wrapping raw objective fields");
                Objective::from(value)
            }
            Self::Mounted(objective) => objective,
        }
    }
}

impl From<Value> for ObjectiveInput {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<Bag> for ObjectiveInput {
    fn from(bag: Bag) -> Self {
        Self::Raw(Value::Object(bag))
    }
}

impl From<Objective> for ObjectiveInput {
    fn from(objective: Objective) -> Self {
        Self::Mounted(objective)
    }
}

/// Parses `YYYY-MM-DD`, `YYYY/MM/DD` or an RFC 3339 timestamp. Timestamps
/// keep the calendar date of their own offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// `None` only when `year` is outside chrono's range.
fn anniversary(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
}
