use std::collections::HashSet;
use url::Url;

/// A case-insensitive set of target file extensions
///
/// Extensions are stored lowercase and without the leading dot.
#[derive(Debug, Clone, Default)]
pub struct ExtensionSet {
    extensions: HashSet<String>,
}

impl ExtensionSet {
    /// Builds a set from extensions such as `"pdf"`, `".PDF"` or `"zip"`
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.as_ref().trim();
                e.strip_prefix('.').unwrap_or(e).to_lowercase()
            })
            .filter(|e| !e.is_empty())
            .collect();

        Self { extensions }
    }

    /// Returns true if the URL path ends in one of the target extensions
    ///
    /// Only the path takes part; the query string and fragment are ignored,
    /// so `report.zip?x=1` matches `zip`.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use pagewise::url::ExtensionSet;
    ///
    /// let set = ExtensionSet::new(["pdf", "zip"]);
    /// assert!(set.matches(&Url::parse("https://example.com/b.PDF").unwrap()));
    /// assert!(set.matches(&Url::parse("https://example.com/d.zip?x=1").unwrap()));
    /// assert!(!set.matches(&Url::parse("https://example.com/c.html").unwrap()));
    /// ```
    pub fn matches(&self, url: &Url) -> bool {
        path_extension(url.path())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// Returns the extension of the last path segment, without the dot
///
/// A leading dot does not start an extension (`/.hidden` has none) and a
/// trailing dot yields none.
pub fn path_extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or("");
    let stem_len = name.len() - name.trim_start_matches('.').len();
    let (_, rest) = name.split_at(stem_len);
    let dot = rest.rfind('.')?;
    let ext = &rest[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("/files/report.pdf"), Some("pdf"));
        assert_eq!(path_extension("/archive.tar.gz"), Some("gz"));
        assert_eq!(path_extension("/docs/"), None);
        assert_eq!(path_extension("/docs"), None);
        assert_eq!(path_extension("/.hidden"), None);
        assert_eq!(path_extension("/..pdf"), None);
        assert_eq!(path_extension("/file."), None);
        assert_eq!(path_extension("/dir.v2/readme"), None);
    }

    #[test]
    fn test_case_insensitive_match() {
        let set = ExtensionSet::new(["pdf"]);
        assert!(set.matches(&url("https://example.com/a.pdf")));
        assert!(set.matches(&url("https://example.com/b.PDF")));
    }

    #[test]
    fn test_query_ignored() {
        let set = ExtensionSet::new(["zip"]);
        assert!(set.matches(&url("https://example.com/d.zip?x=1")));
        assert!(!set.matches(&url("https://example.com/page?file=d.zip")));
    }

    #[test]
    fn test_non_target_extension() {
        let set = ExtensionSet::new(["pdf", "zip"]);
        assert!(!set.matches(&url("https://example.com/c.html")));
        assert!(!set.matches(&url("https://example.com/")));
    }

    #[test]
    fn test_normalizes_input() {
        let set = ExtensionSet::new([".PDF", " Zip ", ""]);
        assert_eq!(set.len(), 2);
        assert!(set.matches(&url("https://example.com/x.zip")));
    }
}
