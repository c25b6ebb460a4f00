//! services/api/src/adapters/audio.rs
//!
//! Content-addressed on-disk cache for synthesized audio. Files are named by
//! a hash of the source text and served statically under `/audio/`, so the
//! same content is never synthesized twice within a process.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

pub struct FileAudioStore {
    dir: PathBuf,
}

impl FileAudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the audio directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    // The hash is only required to be stable within a build; a stale cache
    // entry after an upgrade just costs one re-synthesis.
    fn file_name(text: &str) -> String {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        format!("{:016x}.mp3", hasher.finish())
    }

    fn file_path(&self, text: &str) -> PathBuf {
        self.dir.join(Self::file_name(text))
    }

    /// The public URL the stored audio for `text` is served under.
    pub fn url_for(&self, text: &str) -> String {
        format!("/audio/{}", Self::file_name(text))
    }

    /// Whether audio for `text` is already cached on disk.
    pub async fn contains(&self, text: &str) -> bool {
        tokio::fs::try_exists(self.file_path(text))
            .await
            .unwrap_or(false)
    }

    /// Writes the synthesized bytes and returns their public URL.
    pub async fn save(&self, text: &str, bytes: &[u8]) -> std::io::Result<String> {
        self.ensure_dir().await?;
        tokio::fs::write(self.file_path(text), bytes).await?;
        Ok(self.url_for(text))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
