//! Dispatch table from `(verb, operation name)` to an entity operation.
//!
//! Two naming schemes resolve to the same routes:
//! - operation names: `GET getNgo`, `GET getNgos`, `POST createNgo`,
//!   `PUT updateNgo`, `DELETE deleteNgo` (and likewise per resource)
//! - resource names: `ngo` / `ngos`, where the verb picks the operation

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

/// Entity kind addressed by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Ngo,
    FundraiserNgo,
    FundraiserIndividual,
    Fundraiser,
    Update,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Ngo,
        Resource::FundraiserNgo,
        Resource::FundraiserIndividual,
        Resource::Fundraiser,
        Resource::Update,
    ];

    /// Singular and plural forms used in operation names (`getNgo`, `getNgos`).
    fn operation_stems(&self) -> (&'static str, &'static str) {
        match self {
            Resource::Ngo => ("Ngo", "Ngos"),
            Resource::FundraiserNgo => ("FundraiserNgo", "FundraisersNgo"),
            Resource::FundraiserIndividual => ("FundraiserIndividual", "FundraisersIndividual"),
            Resource::Fundraiser => ("Fundraiser", "Fundraisers"),
            Resource::Update => ("Update", "Updates"),
        }
    }

    /// Singular and plural path names.
    pub fn path_names(&self) -> (&'static str, &'static str) {
        match self {
            Resource::Ngo => ("ngo", "ngos"),
            Resource::FundraiserNgo => ("fundraiser-ngo", "fundraisers-ngo"),
            Resource::FundraiserIndividual => {
                ("fundraiser-individual", "fundraisers-individual")
            }
            Resource::Fundraiser => ("fundraiser", "fundraisers"),
            Resource::Update => ("update", "updates"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_names().0)
    }
}

/// Entity access operation selected by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    FetchMany,
    Create,
    Update,
    Delete,
}

/// Resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub resource: Resource,
    pub operation: Operation,
}

/// Lookup table keyed by `(verb, operation name)`.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    routes: HashMap<(Method, String), Route>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTable {
    /// Table with both naming schemes for every resource.
    pub fn new() -> Self {
        let mut table = Self {
            routes: HashMap::new(),
        };

        for resource in Resource::ALL {
            let (one, many) = resource.operation_stems();
            table.insert(Method::GET, format!("get{}", one), resource, Operation::Fetch);
            table.insert(Method::GET, format!("get{}", many), resource, Operation::FetchMany);
            table.insert(Method::POST, format!("create{}", one), resource, Operation::Create);
            table.insert(Method::PUT, format!("update{}", one), resource, Operation::Update);
            table.insert(Method::DELETE, format!("delete{}", one), resource, Operation::Delete);

            let (one, many) = resource.path_names();
            table.insert(Method::GET, one.to_string(), resource, Operation::Fetch);
            table.insert(Method::GET, many.to_string(), resource, Operation::FetchMany);
            table.insert(Method::POST, one.to_string(), resource, Operation::Create);
            table.insert(Method::PUT, one.to_string(), resource, Operation::Update);
            table.insert(Method::DELETE, one.to_string(), resource, Operation::Delete);
        }

        table
    }

    fn insert(&mut self, method: Method, name: String, resource: Resource, operation: Operation) {
        self.routes.insert(
            (method, name),
            Route {
                resource,
                operation,
            },
        );
    }

    /// Route for a verb and operation name. Names are case-sensitive.
    pub fn resolve(&self, method: &Method, operation: &str) -> Option<Route> {
        self.routes
            .get(&(method.clone(), operation.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
