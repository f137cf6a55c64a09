//! Query-string parameters naming records and listings.
//!
//! Absent parameters read as empty strings, which the key scheme accepts.

use std::collections::HashMap;

use crate::interfaces::AttributeFilter;
use crate::keys::{EntityRef, Listing, OwnerKey};
use crate::repository::OperationError;

use super::routes::Resource;

pub const NGO_ID: &str = "ngoId";
pub const FUNDRAISER_ID: &str = "fundraiserId";
pub const EMAIL_ID: &str = "emailId";
pub const UPDATE_ID: &str = "updateId";
/// Tagged owner partition key (`Ngo...` / `Individual...`).
pub const OWNER: &str = "owner";
pub const COUNTRY: &str = "country";
pub const CATEGORY: &str = "category";

/// Query parameters of one request.
#[derive(Debug, Clone, Default)]
pub struct RequestParams(HashMap<String, String>);

impl From<HashMap<String, String>> for RequestParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self(params)
    }
}

impl RequestParams {
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    fn owned(&self, name: &str) -> String {
        self.get(name).to_string()
    }

    fn owner(&self) -> Result<OwnerKey, OperationError> {
        OwnerKey::parse(self.get(OWNER)).ok_or(OperationError::InvalidInput)
    }

    /// Record addressed by a Fetch or Delete.
    pub fn entity_ref(&self, resource: Resource) -> Result<EntityRef, OperationError> {
        Ok(match resource {
            Resource::Ngo => EntityRef::Ngo {
                ngo_id: self.owned(NGO_ID),
            },
            Resource::FundraiserNgo => EntityRef::FundraiserNgo {
                ngo_id: self.owned(NGO_ID),
                fundraiser_id: self.owned(FUNDRAISER_ID),
            },
            Resource::FundraiserIndividual => EntityRef::FundraiserIndividual {
                email_id: self.owned(EMAIL_ID),
                fundraiser_id: self.owned(FUNDRAISER_ID),
            },
            Resource::Fundraiser => EntityRef::Fundraiser {
                owner: self.owner()?,
                fundraiser_id: self.owned(FUNDRAISER_ID),
            },
            Resource::Update => EntityRef::Update {
                fundraiser_id: self.owned(FUNDRAISER_ID),
                update_id: self.owned(UPDATE_ID),
            },
        })
    }

    /// Listing addressed by a FetchMany.
    pub fn listing(&self, resource: Resource) -> Result<Listing, OperationError> {
        Ok(match resource {
            Resource::Ngo => Listing::Ngos,
            Resource::FundraiserNgo => Listing::FundraisersOfNgo {
                ngo_id: self.owned(NGO_ID),
            },
            Resource::FundraiserIndividual => Listing::FundraisersOfIndividual {
                email_id: self.owned(EMAIL_ID),
            },
            Resource::Fundraiser => Listing::FundraisersOf {
                owner: self.owner()?,
            },
            Resource::Update => Listing::UpdatesOf {
                fundraiser_id: self.owned(FUNDRAISER_ID),
            },
        })
    }

    /// Attribute filter for a FetchMany. Only NGO listings are filtered.
    pub fn filter(&self, resource: Resource) -> Option<AttributeFilter> {
        match resource {
            Resource::Ngo => {
                let filter = AttributeFilter::new()
                    .contains("ngoCountry", self.get(COUNTRY))
                    .contains("ngoCategory", self.get(CATEGORY));
                (!filter.is_empty()).then_some(filter)
            }
            _ => None,
        }
    }
}
