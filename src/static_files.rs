use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Read-only view of a directory of assets.
///
/// Names are resolved relative to the base directory; any name that would
/// escape it (`..`, absolute paths) is rejected as not found.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    fn map_path(&self, name: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(name.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    pub fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" => "text/html",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain",
            "gif" => "image/gif",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "ico" => "image/x-icon",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        }
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        let path = self
            .map_path(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        Ok(path)
    }

    /// Bytes and content type of the asset `name`.
    pub fn load(&self, name: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self.resolve(name)?;
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }

    pub fn read_text(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.resolve(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, StaticFiles) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.txt"), "Hello\n").unwrap();
        fs::write(dir.path().join("doge.gif"), [0x47, 0x49, 0x46, 0x38]).unwrap();
        let files = StaticFiles::new(dir.path());
        (dir, files)
    }

    #[test]
    fn test_map_path_prevents_traversal() {
        let (_dir, sf) = fixture();
        assert!(sf.map_path("../Cargo.toml").is_none());
        assert!(sf.map_path("img/../../secret").is_none());
        assert!(sf.load("../hello.txt").is_err());
    }

    #[test]
    fn test_load_plain_file() {
        let (_dir, sf) = fixture();
        let (bytes, ct) = sf.load("hello.txt").unwrap();
        assert_eq!(ct, "text/plain");
        assert_eq!(String::from_utf8(bytes).unwrap(), "Hello\n");
    }

    #[test]
    fn test_load_binary_file() {
        let (_dir, sf) = fixture();
        let (bytes, ct) = sf.load("/doge.gif").unwrap();
        assert_eq!(ct, "image/gif");
        assert_eq!(bytes, vec![0x47, 0x49, 0x46, 0x38]);
    }

    #[test]
    fn test_missing_file() {
        let (_dir, sf) = fixture();
        let err = sf.load("nope.png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
