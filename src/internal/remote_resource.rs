//! 远程资源：探测 Range 支持与资源长度。

pub mod probe;
pub mod structs;
