//! SurrealDB implementations of the registry and tenant store traits.

mod administrator;
mod organization;
mod tenant_store;

pub use administrator::SurrealAdministratorRepository;
pub use organization::SurrealOrganizationRepository;
pub use tenant_store::SurrealTenantStore;
