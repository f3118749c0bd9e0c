pub mod ident;

pub use ident::{
    DEFAULT_SUPERVISOR, IdentError, PackageIdentity, SupervisorIdentity, assemble_identity,
};
