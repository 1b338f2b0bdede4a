use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use super::bag::{into_bag, merge_extras, put, take_i64, take_string, Bag};
use super::objective::{Objective, ObjectiveInput};
use crate::ModelError;

const OBJECTIVES: &str = "objectives";

/// A person to stay in touch with.
///
/// `id` is assigned by storage and stays absent until the contact has been
/// persisted; it is never generated here.
///
/// # Invariants
/// After construction and after every mount, each objective's `contact_id`
/// equals this contact's `id`. An absent `id` propagates as an absent
/// `contact_id`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Contact {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    /// In input order.
    pub objectives: Vec<Objective>,
    /// Unrecognised or ill-typed fields, kept verbatim. On output a present
    /// typed field, and always `objectives`, take precedence over an extra of
    /// the same name.
    pub extras: Bag,
}

impl Contact {
    /// An empty contact with no objectives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a contact from a bag. An `objectives` array in the bag is
    /// mounted; other keys are copied as-is.
    pub fn from_bag(bag: Bag) -> Self {
        let mut contact = Self::default();
        contact.mount(bag);
        contact
    }

    /// Builds a contact from `contact_data`, then replaces its objectives with
    /// `objective_data` and mounts them.
    ///
    /// Entries may be raw fields or existing objectives, mixed freely.
    pub fn make<I>(contact_data: Bag, objective_data: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ObjectiveInput>,
    {
        let mut contact = Self::from_bag(contact_data);
        contact.mount_objectives(objective_data);
        contact
    }

    /// Parses JSON text and builds a contact from it.
    ///
    /// Only malformed JSON is an error; a well-formed non-object yields an
    /// empty contact.
    pub fn from_json_str(text: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from(value))
    }

    /// Copies every field of `bag` onto this contact, overwriting same-named
    /// fields. `null` clears a field.
    ///
    /// An `objectives` entry replaces the current objectives. Either way the
    /// objectives are re-stamped with the (possibly new) `id` afterwards.
    pub fn mount(&mut self, mut bag: Bag) {
        let extras = &mut self.extras;
        take_i64(&mut bag, "id").apply("id", &mut self.id, extras);
        take_string(&mut bag, "first_name").apply("first_name", &mut self.first_name, extras);
        take_string(&mut bag, "last_name").apply("last_name", &mut self.last_name, extras);
        take_string(&mut bag, "email").apply("email", &mut self.email, extras);
        take_string(&mut bag, "notes").apply("notes", &mut self.notes, extras);
        let objectives = bag.remove(OBJECTIVES);
        extras.extend(bag);

        match objectives {
            Some(Value::Array(items)) => self.mount_objectives(items),
            Some(Value::Null) => self.mount_objectives(Vec::<ObjectiveInput>::new()),
            Some(other) => {
                warn!(
                    contact_id = ?self.id,
                    kind = value_kind(&other),
                    "Ignoring non-array objectives"
                );
                self.mount_objectives(Vec::<ObjectiveInput>::new());
            }
            None => self.remount_objectives(),
        }
    }

    /// Replaces the objectives with `items`, wrapping raw entries and stamping
    /// every objective's `contact_id` with this contact's `id`.
    pub fn mount_objectives<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<ObjectiveInput>,
    {
        let contact_id = self.id;
        self.objectives = items
            .into_iter()
            .map(|item| {
                let mut objective = item.into().into_objective();
                objective.stamp(contact_id);
                objective
            })
            .collect();
    }

    /// Re-mounts the current objectives. Safe to call any number of times.
    pub fn remount_objectives(&mut self) {
        let current = std::mem::take(&mut self.objectives);
        self.mount_objectives(current);
    }

    /// First and last name joined by a space; empty when neither is set.
    pub fn name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    /// The email address, or `"none"` when it is absent or empty.
    pub fn email_pretty(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => "none",
        }
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    /// Sets one field by name, with the same rules as [`Contact::mount`].
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        let mut bag = Bag::new();
        bag.insert(key.into(), value);
        self.mount(bag);
    }

    /// The outbound field map, objectives included.
    pub fn to_bag(&self) -> Bag {
        let mut bag = Bag::new();
        put(&mut bag, "id", self.id);
        put(&mut bag, "first_name", self.first_name.clone());
        put(&mut bag, "last_name", self.last_name.clone());
        put(&mut bag, "email", self.email.clone());
        put(&mut bag, "notes", self.notes.clone());
        let objectives = self
            .objectives
            .iter()
            .map(|objective| Value::Object(objective.to_bag()))
            .collect();
        bag.insert(OBJECTIVES.to_string(), Value::Array(objectives));
        merge_extras(&mut bag, &self.extras);
        bag
    }
}

impl Serialize for Contact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_bag().serialize(serializer)
    }
}

impl From<Bag> for Contact {
    fn from(bag: Bag) -> Self {
        Self::from_bag(bag)
    }
}

/// Non-object values produce an empty contact.
impl From<Value> for Contact {
    fn from(value: Value) -> Self {
        Self::from_bag(into_bag(value))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
