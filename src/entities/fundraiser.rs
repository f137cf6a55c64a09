//! Fundraiser record shapes.
//!
//! The same campaign attributes are stored under an NGO partition or an
//! individual organizer's partition. [`Fundraiser`] reads and writes either,
//! addressed by the owner's tagged partition key.

use serde::{Deserialize, Serialize};

use super::TableEntity;
use crate::keys::{EntityKind, EntityRef, OwnerKey, StorageKey};

/// Campaign attributes common to every fundraiser shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundraiserDetails {
    pub fundraiser_title: String,
    pub fundraiser_cause: String,
    pub fundraiser_location: String,
    pub fundraiser_description: String,
    pub fundraiser_photo: String,
    pub fundraiser_target_amount: String,
}

/// Fundraiser run by an NGO.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundraiserNgo {
    /// NGO id.
    pub pk: String,
    /// Fundraiser id.
    pub sk: String,
    #[serde(flatten)]
    pub details: FundraiserDetails,
}

/// Fundraiser run by an individual, keyed by their email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FundraiserIndividual {
    /// Organizer email.
    pub pk: String,
    /// Fundraiser id.
    pub sk: String,
    pub firstname: String,
    pub lastname: String,
    pub phone_no: String,
    #[serde(flatten)]
    pub details: FundraiserDetails,
}

/// Fundraiser under any owner.
///
/// `pk` is always the owner's tagged partition key (`Ngo...` or
/// `Individual...`), in requests as well as in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fundraiser {
    pub pk: String,
    pub sk: String,
    #[serde(flatten)]
    pub details: FundraiserDetails,
}

impl TableEntity for FundraiserNgo {
    const KIND: EntityKind = EntityKind::FundraiserNgo;

    fn reference(&self) -> Option<EntityRef> {
        Some(EntityRef::FundraiserNgo {
            ngo_id: self.pk.clone(),
            fundraiser_id: self.sk.clone(),
        })
    }

    fn sort_key(&self) -> &str {
        &self.sk
    }

    fn assign_key(&mut self, key: StorageKey) {
        self.pk = key.pk;
        self.sk = key.sk;
    }
}

impl TableEntity for FundraiserIndividual {
    const KIND: EntityKind = EntityKind::FundraiserIndividual;

    fn reference(&self) -> Option<EntityRef> {
        Some(EntityRef::FundraiserIndividual {
            email_id: self.pk.clone(),
            fundraiser_id: self.sk.clone(),
        })
    }

    fn sort_key(&self) -> &str {
        &self.sk
    }

    fn assign_key(&mut self, key: StorageKey) {
        self.pk = key.pk;
        self.sk = key.sk;
    }
}

impl TableEntity for Fundraiser {
    const KIND: EntityKind = EntityKind::Fundraiser;

    fn reference(&self) -> Option<EntityRef> {
        Some(EntityRef::Fundraiser {
            owner: OwnerKey::parse(&self.pk)?,
            fundraiser_id: self.sk.clone(),
        })
    }

    fn sort_key(&self) -> &str {
        &self.sk
    }

    fn assign_key(&mut self, key: StorageKey) {
        self.pk = key.pk;
        self.sk = key.sk;
    }
}
