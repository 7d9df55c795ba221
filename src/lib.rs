/// 内部导出的模块
mod internal;

#[cfg(test)]
mod tests;

/// 导出核心入口
pub use internal::entrance::remote::*;

pub use internal::split_download::structs::{
    DEFAULT_DIVISION_COUNT, DEFAULT_TIMEOUT_SECS, DownloadError, DownloadErrorKind,
    DownloadProgress, DownloadReport, SplitDownloaderConfig,
};

/// 远程资源探测，可单独用来判断一个 URL 是否支持分片下载
pub mod resource {
    use crate::internal;
    pub use internal::remote_resource::probe::*;
    pub use internal::remote_resource::structs::*;
}

/// 分片规划、拉取与合并的各个阶段，入口之外也可以自行组合
pub mod split_download {
    pub mod structs {
        use crate::internal;
        pub use internal::split_download::structs::*;
    }

    pub mod fetch {
        use crate::internal;
        pub use internal::split_download::fetch::*;
    }

    pub mod merge {
        use crate::internal;
        pub use internal::split_download::merge::*;
    }
}

pub mod states {
    pub mod progress_state {
        use crate::internal;
        pub use internal::states::progress_state::*;
    }
}

pub mod scratch {
    use crate::internal;
    pub use internal::scratch::scratch_dir::*;
}
