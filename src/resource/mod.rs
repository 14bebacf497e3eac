//! Resource types exposed through the CRUD endpoints.
//!
//! Every resource is a serde struct with `owner`, `name` and `createdTime`; the
//! pair `(owner, name)` identifies a record and is rendered as `"owner/name"`.

mod types;

pub use types::*;

use crate::error::AppError;
use serde::{de::DeserializeOwned, Serialize};

/// Static description of a resource type: storage table and URL stems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceKind {
    pub table: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
}

pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn owner(&self) -> &str;
    fn name(&self) -> &str;
    fn created_time(&self) -> &str;
    fn set_created_time(&mut self, created_time: String);

    fn key(&self) -> ObjectKey {
        ObjectKey {
            owner: self.owner().to_string(),
            name: self.name().to_string(),
        }
    }

    fn id(&self) -> String {
        self.key().to_string()
    }
}

/// Storage key of a record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub owner: String,
    pub name: String,
}

impl ObjectKey {
    /// Splits `"owner/name"` at the first `/`.
    pub fn parse(id: &str) -> Result<Self, AppError> {
        let (owner, name) = id
            .split_once('/')
            .ok_or_else(|| AppError::MalformedInput(format!("invalid id '{}': expected owner/name", id)))?;
        Ok(ObjectKey {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

macro_rules! impl_resource {
    ($ty:ident, $table:literal, $singular:literal, $plural:literal) => {
        impl Resource for $ty {
            const KIND: ResourceKind = ResourceKind {
                table: $table,
                singular: $singular,
                plural: $plural,
            };

            fn owner(&self) -> &str {
                &self.owner
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn created_time(&self) -> &str {
                &self.created_time
            }

            fn set_created_time(&mut self, created_time: String) {
                self.created_time = created_time;
            }
        }
    };
}

impl_resource!(Record, "record", "record", "records");
impl_resource!(Asset, "asset", "asset", "assets");
impl_resource!(Provider, "provider", "provider", "providers");
impl_resource!(Machine, "machine", "machine", "machines");
impl_resource!(Session, "session", "session", "sessions");
impl_resource!(Case, "medical_case", "case", "cases");
impl_resource!(Consultation, "consultation", "consultation", "consultations");
impl_resource!(Doctor, "doctor", "doctor", "doctors");
impl_resource!(FederalLearning, "federal_learning", "fl", "fls");
impl_resource!(Hospital, "hospital", "hospital", "hospitals");
impl_resource!(Patient, "patient", "patient", "patients");

/// All registered resource kinds, in router-table order.
pub const KINDS: &[ResourceKind] = &[
    Record::KIND,
    Asset::KIND,
    Provider::KIND,
    Machine::KIND,
    Session::KIND,
    Case::KIND,
    Consultation::KIND,
    Doctor::KIND,
    FederalLearning::KIND,
    Hospital::KIND,
    Patient::KIND,
];
