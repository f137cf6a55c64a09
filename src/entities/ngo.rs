use serde::{Deserialize, Serialize};

use super::TableEntity;
use crate::keys::{EntityKind, EntityRef, StorageKey};

/// An NGO profile. Stored under the shared `DetailsNGO` partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ngo {
    pub pk: String,
    /// `Ngo{ngoId}` once stored; the bare NGO id in a request body.
    pub sk: String,
    pub ngo_name: String,
    // Attribute name kept as stored by existing clients.
    #[serde(rename = "ngoAdress")]
    pub ngo_address: String,
    pub ngo_country: String,
    pub ngo_description: String,
    pub ngo_photo: String,
    pub ngo_category: String,
}

impl TableEntity for Ngo {
    const KIND: EntityKind = EntityKind::Ngo;

    fn reference(&self) -> Option<EntityRef> {
        Some(EntityRef::Ngo {
            ngo_id: self.sk.clone(),
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
