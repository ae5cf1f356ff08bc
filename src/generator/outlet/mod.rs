use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;
use crate::session::WorkflowSession;

/// 会话快照文件名
pub const SESSION_FILENAME: &str = "session.json";

pub trait Outlet {
    /// 持久化会话，返回写入的文件路径
    async fn save(&self, session: &WorkflowSession) -> Result<Vec<PathBuf>>;
}

/// 把会话快照与成稿写入输出目录
pub struct DiskOutlet {
    output_dir: PathBuf,
    target_language: TargetLanguage,
}

impl DiskOutlet {
    pub fn new(output_dir: &Path, target_language: TargetLanguage) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            target_language,
        }
    }

    pub fn post_path(&self) -> PathBuf {
        self.output_dir.join(self.target_language.post_filename())
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, session: &WorkflowSession) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).context(format!(
            "Failed to create output directory: {}",
            self.output_dir.display()
        ))?;
        let mut written = Vec::new();

        let session_path = self.output_dir.join(SESSION_FILENAME);
        let snapshot =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&session_path, snapshot)?;
        tracing::info!("💾 已保存会话: {}", session_path.display());
        written.push(session_path);

        // 只有完整跑完创作链才写出帖子
        match session.final_post() {
            Some(post) => {
                let post_path = self.post_path();
                fs::write(&post_path, format!("{}\n", post))?;
                tracing::info!("💾 已保存帖子: {}", post_path.display());
                written.push(post_path);
            }
            None => tracing::debug!("会话中没有可保存的成稿"),
        }

        Ok(written)
    }
}
