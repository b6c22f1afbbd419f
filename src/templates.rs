//! Page template loading.
//!
//! Templates are plain HTML files containing `{{name}}` markers. Loading a
//! template returns its text untouched; substitution is literal string
//! replacement done by the caller (see [`fill`]).

use std::path::PathBuf;

use crate::error::Error;
use crate::static_files::StaticFiles;

/// Loader for the HTML page templates under one directory.
#[derive(Debug, Clone)]
pub struct Templates {
    files: StaticFiles,
}

impl Templates {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            files: StaticFiles::new(dir),
        }
    }

    /// Raw text of the template `name`, e.g. `"login.html"`.
    pub fn template(&self, name: &str) -> Result<String, Error> {
        self.files
            .read_text(name)
            .map_err(|source| Error::asset(name, source))
    }
}

/// Replace every `{{key}}` marker in `body` with `value`.
pub fn fill(body: &str, key: &str, value: &str) -> String {
    body.replace(&format!("{{{{{key}}}}}"), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_marker() {
        let body = "<p>{{username}}</p><i>{{username}}</i>{{other}}";
        assert_eq!(
            fill(body, "username", "gua"),
            "<p>gua</p><i>gua</i>{{other}}"
        );
    }

    #[test]
    fn test_bundled_templates_load() {
        let templates = Templates::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"));
        let login = templates.template("login.html").unwrap();
        assert!(login.contains("{{result}}"));
        assert!(matches!(
            templates.template("../Cargo.toml"),
            Err(Error::Asset { .. })
        ));
    }
}
