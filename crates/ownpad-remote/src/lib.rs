pub mod bearer;
pub mod provider;

pub use bearer::BearerRemoteStorage;
pub use provider::RemoteStorage;
