pub mod factory;
pub mod gate;
pub mod roles;

pub use factory::build_gate;
pub use gate::{AuthorizationGate, AuthzError, GateConfig, Principal, VerificationKey};
pub use roles::RoleSet;
