use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::info;

/// Audio blob store: one file per recording under the uploads directory,
/// named from the record id. Blobs are written once at creation and never
/// mutated in place, only deleted as a unit.
#[derive(Clone)]
pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create uploads directory {:?}", dir))?;
        info!("Blob store opened at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Write a new blob for `id`; returns the stored filename.
    pub async fn write(&self, id: &str, extension: &str, bytes: &[u8]) -> Result<String> {
        let filename = format!("{id}.{extension}");
        let path = self.path_for(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write audio blob {:?}", path))?;
        Ok(filename)
    }

    /// Total blob length in bytes, or `None` if the blob is missing.
    pub async fn len(&self, filename: &str) -> Option<u64> {
        tokio::fs::metadata(self.path_for(filename))
            .await
            .ok()
            .map(|m| m.len())
    }

    /// Read the whole blob.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_for(filename);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read audio blob {:?}", path))
    }

    /// Read exactly the byte span `[start, end]` (inclusive).
    pub async fn read_span(&self, filename: &str, start: u64, end: u64) -> Result<Vec<u8>> {
        let path = self.path_for(filename);
        let mut file = tokio::fs::File::open(&path)
            .await
            .with_context(|| format!("Failed to open audio blob {:?}", path))?;

        file.seek(SeekFrom::Start(start))
            .await
            .context("Failed to seek in audio blob")?;

        let span_len = (end - start + 1) as usize;
        let mut buf = vec![0u8; span_len];
        file.read_exact(&mut buf)
            .await
            .context("Failed to read audio blob span")?;

        Ok(buf)
    }

    /// Best-effort blob removal; the caller decides whether failure matters.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.path_for(filename);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to remove audio blob {:?}", path))
    }
}

/// Decode a `data:audio/...;base64,...` payload into (extension, bytes).
///
/// The extension is derived from the declared mime type so the blob filename
/// stays self-describing; unknown types fall back to `bin`.
pub fn decode_audio_data_url(data_url: &str) -> Result<(String, Vec<u8>)> {
    let (header, payload) = data_url
        .split_once(',')
        .context("Audio payload is not a data URL")?;

    let mime = header
        .strip_prefix("data:")
        .and_then(|h| h.strip_suffix(";base64"))
        .context("Audio payload is not base64-encoded")?;

    let extension = match mime {
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" => "m4a",
        _ => "bin",
    };

    let bytes = BASE64
        .decode(payload.trim())
        .context("Audio payload is not valid base64")?;

    Ok((extension.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_url(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, BASE64.encode(bytes))
    }

    #[test]
    fn decodes_wav_data_url() {
        let (ext, bytes) = decode_audio_data_url(&data_url("audio/wav", b"RIFF")).unwrap();
        assert_eq!(ext, "wav");
        assert_eq!(bytes, b"RIFF");
    }

    #[test]
    fn unknown_mime_falls_back_to_bin() {
        let (ext, _) = decode_audio_data_url(&data_url("audio/flac", b"fLaC")).unwrap();
        assert_eq!(ext, "bin");
    }

    #[test]
    fn rejects_non_data_url_payloads() {
        assert!(decode_audio_data_url("just some text").is_err());
        assert!(decode_audio_data_url("data:audio/wav;base64,***").is_err());
        // Plain (non-base64) data URLs are not accepted
        assert!(decode_audio_data_url("data:audio/wav,RIFF").is_err());
    }

    #[tokio::test]
    async fn write_read_span_delete() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = BlobStore::open(dir.path())?;

        let bytes: Vec<u8> = (0..=255).collect();
        let filename = store.write("rec-1", "wav", &bytes).await?;
        assert_eq!(filename, "rec-1.wav");
        assert_eq!(store.len(&filename).await, Some(256));

        let span = store.read_span(&filename, 10, 19).await?;
        assert_eq!(span, &bytes[10..20]);

        store.delete(&filename).await?;
        assert_eq!(store.len(&filename).await, None);

        Ok(())
    }
}
