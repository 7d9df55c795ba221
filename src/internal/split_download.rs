//! 分片下载
//!
//! 把一个支持 Range 请求的远程资源切成固定数量的连续字节区间，并发拉取后按原顺序合并为一个文件。
//!
//! ## 流程
//!
//! 1. **探测**（[`crate::internal::remote_resource::probe`]）：HEAD 请求，确认 `Accept-Ranges: bytes` 与 `Content-Length`
//! 2. **规划**（[`structs::DownloadPlan`]）：按分片数等分，最后一段吸收余数并止于最后一个字节
//! 3. **拉取**（[`fetch`]）：每个分片一个任务，共享截止时间；任一任务失败、超时或外部中断都会取消全部任务
//! 4. **合并**（[`merge`]）：所有任务退出后，按分片序号依次拼接，写暂存文件再 rename 到目标路径
//!
//! ## 约束
//!
//! - 不重试：任何分片失败都直接结束本次下载
//! - 不续传：临时目录随任务结束删除
//! - 计划构建后只读，每个任务只拿到自己的分片副本

pub mod fetch;
pub mod merge;
pub mod structs;
