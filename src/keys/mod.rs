//! Key scheme for the shared registry table.
//!
//! Every record lives in one table addressed by a partition key (`pk`) and a
//! sort key (`sk`). Entity kind and the parent/child relationship are encoded
//! by concatenating a fixed tag onto the caller-supplied identifier:
//!
//! | Entity                      | `pk`                 | `sk`                   |
//! |-----------------------------|----------------------|------------------------|
//! | NGO                         | `DetailsNGO`         | `Ngo{ngo_id}`          |
//! | Fundraiser under NGO        | `Ngo{ngo_id}`        | `Fundraiser{id}`       |
//! | Fundraiser under individual | `Individual{email}`  | `Fundraiser{id}`       |
//! | Fundraiser (any owner)      | owner partition key  | `Fundraiser{id}`       |
//! | Update                      | `Fundraiser{id}`     | `Update{update_id}`    |
//!
//! Tags are joined without a delimiter and identifiers are not escaped. An
//! identifier that itself starts with a tag can collide with another kind's
//! key; [`reserved_tag`] detects this so callers can log it.
//!
//! Listings use a partial key: the partition key is bound exactly and the
//! sort key is matched by prefix (see [`KeyPrefix`]).

use std::fmt;

/// Attribute name of the partition key.
pub const PARTITION_KEY_ATTR: &str = "pk";
/// Attribute name of the sort key.
pub const SORT_KEY_ATTR: &str = "sk";

/// Partition shared by every NGO record.
pub const NGO_PARTITION: &str = "DetailsNGO";
/// Tag for NGO identifiers.
pub const NGO_TAG: &str = "Ngo";
/// Tag for fundraiser identifiers.
pub const FUNDRAISER_TAG: &str = "Fundraiser";
/// Tag for individual organizer identifiers (email addresses).
pub const INDIVIDUAL_TAG: &str = "Individual";
/// Tag for fundraiser update identifiers.
pub const UPDATE_TAG: &str = "Update";

/// Leading strings with meaning in the key space, longest first.
const RESERVED_TAGS: [&str; 5] = [
    INDIVIDUAL_TAG,
    FUNDRAISER_TAG,
    NGO_PARTITION,
    UPDATE_TAG,
    NGO_TAG,
];

/// The five record kinds that share the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ngo,
    FundraiserNgo,
    FundraiserIndividual,
    Fundraiser,
    Update,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Ngo => "ngo",
            EntityKind::FundraiserNgo => "fundraiser_ngo",
            EntityKind::FundraiserIndividual => "fundraiser_individual",
            EntityKind::Fundraiser => "fundraiser",
            EntityKind::Update => "update",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully bound storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    pub pk: String,
    pub sk: String,
}

impl StorageKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pk, self.sk)
    }
}

/// Partial key for a "begins with" listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPrefix {
    pub pk: String,
    pub sk_prefix: String,
}

impl KeyPrefix {
    pub fn new(pk: impl Into<String>, sk_prefix: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk_prefix: sk_prefix.into(),
        }
    }

    /// Whether a stored key falls inside this listing.
    pub fn matches(&self, key: &StorageKey) -> bool {
        key.pk == self.pk && key.sk.starts_with(&self.sk_prefix)
    }
}

fn tagged(tag: &str, id: &str) -> String {
    let mut value = String::with_capacity(tag.len() + id.len());
    value.push_str(tag);
    value.push_str(id);
    value
}

/// Owner of a fundraiser partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    Ngo(String),
    Individual(String),
}

impl OwnerKey {
    /// Partition key under which the owner's fundraisers are stored.
    pub fn partition_key(&self) -> String {
        match self {
            OwnerKey::Ngo(ngo_id) => tagged(NGO_TAG, ngo_id),
            OwnerKey::Individual(email_id) => tagged(INDIVIDUAL_TAG, email_id),
        }
    }

    /// Recognise a tagged owner partition key (`Ngo...` or `Individual...`).
    pub fn parse(pk: &str) -> Option<Self> {
        if let Some(email_id) = pk.strip_prefix(INDIVIDUAL_TAG) {
            return Some(OwnerKey::Individual(email_id.to_string()));
        }
        pk.strip_prefix(NGO_TAG)
            .map(|ngo_id| OwnerKey::Ngo(ngo_id.to_string()))
    }
}

/// Logical reference to a single record, built from untagged identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Ngo {
        ngo_id: String,
    },
    FundraiserNgo {
        ngo_id: String,
        fundraiser_id: String,
    },
    FundraiserIndividual {
        email_id: String,
        fundraiser_id: String,
    },
    Fundraiser {
        owner: OwnerKey,
        fundraiser_id: String,
    },
    Update {
        fundraiser_id: String,
        update_id: String,
    },
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Ngo { .. } => EntityKind::Ngo,
            EntityRef::FundraiserNgo { .. } => EntityKind::FundraiserNgo,
            EntityRef::FundraiserIndividual { .. } => EntityKind::FundraiserIndividual,
            EntityRef::Fundraiser { .. } => EntityKind::Fundraiser,
            EntityRef::Update { .. } => EntityKind::Update,
        }
    }

    /// Build the storage key. Total: any identifier, including "", is accepted.
    pub fn key(&self) -> StorageKey {
        match self {
            EntityRef::Ngo { ngo_id } => StorageKey::new(NGO_PARTITION, tagged(NGO_TAG, ngo_id)),
            EntityRef::FundraiserNgo {
                ngo_id,
                fundraiser_id,
            } => StorageKey::new(
                tagged(NGO_TAG, ngo_id),
                tagged(FUNDRAISER_TAG, fundraiser_id),
            ),
            EntityRef::FundraiserIndividual {
                email_id,
                fundraiser_id,
            } => StorageKey::new(
                tagged(INDIVIDUAL_TAG, email_id),
                tagged(FUNDRAISER_TAG, fundraiser_id),
            ),
            EntityRef::Fundraiser {
                owner,
                fundraiser_id,
            } => StorageKey::new(owner.partition_key(), tagged(FUNDRAISER_TAG, fundraiser_id)),
            EntityRef::Update {
                fundraiser_id,
                update_id,
            } => StorageKey::new(
                tagged(FUNDRAISER_TAG, fundraiser_id),
                tagged(UPDATE_TAG, update_id),
            ),
        }
    }

    /// Caller-supplied identifiers, in key order.
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            EntityRef::Ngo { ngo_id } => vec![ngo_id.as_str()],
            EntityRef::FundraiserNgo {
                ngo_id,
                fundraiser_id,
            } => vec![ngo_id.as_str(), fundraiser_id.as_str()],
            EntityRef::FundraiserIndividual {
                email_id,
                fundraiser_id,
            } => vec![email_id.as_str(), fundraiser_id.as_str()],
            EntityRef::Fundraiser {
                owner,
                fundraiser_id,
            } => match owner {
                OwnerKey::Ngo(id) | OwnerKey::Individual(id) => {
                    vec![id.as_str(), fundraiser_id.as_str()]
                }
            },
            EntityRef::Update {
                fundraiser_id,
                update_id,
            } => vec![fundraiser_id.as_str(), update_id.as_str()],
        }
    }

    /// Inverse of [`EntityRef::key`].
    ///
    /// Fundraiser keys resolve to the owner-specific kinds; the owner-agnostic
    /// [`EntityRef::Fundraiser`] is a view over the same records.
    pub fn from_key(key: &StorageKey) -> Option<Self> {
        match classify(key)? {
            EntityKind::Ngo => Some(EntityRef::Ngo {
                ngo_id: key.sk.strip_prefix(NGO_TAG)?.to_string(),
            }),
            EntityKind::FundraiserNgo => Some(EntityRef::FundraiserNgo {
                ngo_id: key.pk.strip_prefix(NGO_TAG)?.to_string(),
                fundraiser_id: key.sk.strip_prefix(FUNDRAISER_TAG)?.to_string(),
            }),
            EntityKind::FundraiserIndividual => Some(EntityRef::FundraiserIndividual {
                email_id: key.pk.strip_prefix(INDIVIDUAL_TAG)?.to_string(),
                fundraiser_id: key.sk.strip_prefix(FUNDRAISER_TAG)?.to_string(),
            }),
            EntityKind::Update => Some(EntityRef::Update {
                fundraiser_id: key.pk.strip_prefix(FUNDRAISER_TAG)?.to_string(),
                update_id: key.sk.strip_prefix(UPDATE_TAG)?.to_string(),
            }),
            EntityKind::Fundraiser => None,
        }
    }
}

/// Prefix listing of one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Ngos,
    FundraisersOfNgo { ngo_id: String },
    FundraisersOfIndividual { email_id: String },
    FundraisersOf { owner: OwnerKey },
    UpdatesOf { fundraiser_id: String },
}

impl Listing {
    /// Kind of record the listing returns.
    pub fn kind(&self) -> EntityKind {
        match self {
            Listing::Ngos => EntityKind::Ngo,
            Listing::FundraisersOfNgo { .. } => EntityKind::FundraiserNgo,
            Listing::FundraisersOfIndividual { .. } => EntityKind::FundraiserIndividual,
            Listing::FundraisersOf { .. } => EntityKind::Fundraiser,
            Listing::UpdatesOf { .. } => EntityKind::Update,
        }
    }

    pub fn prefix(&self) -> KeyPrefix {
        match self {
            Listing::Ngos => KeyPrefix::new(NGO_PARTITION, NGO_TAG),
            Listing::FundraisersOfNgo { ngo_id } => {
                KeyPrefix::new(tagged(NGO_TAG, ngo_id), FUNDRAISER_TAG)
            }
            Listing::FundraisersOfIndividual { email_id } => {
                KeyPrefix::new(tagged(INDIVIDUAL_TAG, email_id), FUNDRAISER_TAG)
            }
            Listing::FundraisersOf { owner } => {
                KeyPrefix::new(owner.partition_key(), FUNDRAISER_TAG)
            }
            Listing::UpdatesOf { fundraiser_id } => {
                KeyPrefix::new(tagged(FUNDRAISER_TAG, fundraiser_id), UPDATE_TAG)
            }
        }
    }
}

/// Determine which kind of record a stored key belongs to.
///
/// Returns `None` for keys outside the scheme. Fundraiser records report the
/// owner-specific kind.
pub fn classify(key: &StorageKey) -> Option<EntityKind> {
    if key.pk == NGO_PARTITION {
        return key.sk.starts_with(NGO_TAG).then_some(EntityKind::Ngo);
    }
    if key.sk.starts_with(FUNDRAISER_TAG) {
        return match OwnerKey::parse(&key.pk)? {
            OwnerKey::Ngo(_) => Some(EntityKind::FundraiserNgo),
            OwnerKey::Individual(_) => Some(EntityKind::FundraiserIndividual),
        };
    }
    if key.pk.starts_with(FUNDRAISER_TAG) && key.sk.starts_with(UPDATE_TAG) {
        return Some(EntityKind::Update);
    }
    None
}

/// Tag an identifier starts with, if any.
///
/// Such identifiers are stored as-is; the result is only used for diagnostics.
pub fn reserved_tag(id: &str) -> Option<&'static str> {
    RESERVED_TAGS.into_iter().find(|tag| id.starts_with(*tag))
}
