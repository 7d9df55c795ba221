pub mod remote_resource;

pub use remote_resource::RemoteResource;
