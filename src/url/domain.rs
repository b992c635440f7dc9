use std::fmt;
use url::Url;

/// The scheme + host + port triple that decides "internal" vs "external"
///
/// The host is lowercased and a missing port is replaced by the scheme's
/// default, so `https://Example.com` and `https://example.com:443` share an
/// authority while `http://example.com` does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkAuthority {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl NetworkAuthority {
    /// Extracts the network authority from a URL
    ///
    /// Returns `None` for URLs without a host (e.g. `mailto:`, `data:`).
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use pagewise::url::NetworkAuthority;
    ///
    /// let a = NetworkAuthority::from_url(&Url::parse("https://example.com/a").unwrap()).unwrap();
    /// let b = NetworkAuthority::from_url(&Url::parse("https://EXAMPLE.com:443/b").unwrap()).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;
        Some(Self {
            scheme: url.scheme().to_lowercase(),
            host: host.to_lowercase(),
            port: url.port_or_known_default(),
        })
    }

    /// Returns true if `url` lives under this authority
    pub fn contains(&self, url: &Url) -> bool {
        Self::from_url(url).as_ref() == Some(self)
    }
}

impl fmt::Display for NetworkAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}://{}:{}", self.scheme, self.host, port),
            None => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}
