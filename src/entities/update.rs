use serde::{Deserialize, Serialize};

use super::TableEntity;
use crate::keys::{EntityKind, EntityRef, StorageKey};

/// A progress update posted to a fundraiser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Update {
    /// Fundraiser id.
    pub pk: String,
    /// Update id.
    pub sk: String,
    pub update_title: String,
    pub update_description: String,
    pub update_photo: String,
}

impl TableEntity for Update {
    const KIND: EntityKind = EntityKind::Update;

    fn reference(&self) -> Option<EntityRef> {
        Some(EntityRef::Update {
            fundraiser_id: self.pk.clone(),
            update_id: self.sk.clone(),
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
