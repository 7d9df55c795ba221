pub mod entrance;
pub mod remote_resource;
pub mod scratch;
pub mod split_download;
pub mod states;
