//! Command implementations

pub mod converge;
pub mod ident;
pub mod options;
pub mod phase;
pub mod script;
pub mod version;
