use url::Url;

use crate::Id;

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,
}

impl Urls {
    /// Create a new instance. A trailing slash is added to `base` if
    /// it is missing.
    pub fn new(base: impl AsRef<str>) -> Self {
        let base = base.as_ref();
        let base = if base.ends_with('/') {
            base.to_owned()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&base).unwrap_or_else(|_| panic!("parse {} as URL", base));

        Urls { base }
    }

    pub fn home(&self) -> Url {
        self.base.clone()
    }

    pub fn venues(&self) -> Url {
        self.join("venues")
    }

    pub fn venue(&self, id: Id) -> Url {
        self.join(&format!("venues/{}", id))
    }

    pub fn artists(&self) -> Url {
        self.join("artists")
    }

    pub fn artist(&self, id: Id) -> Url {
        self.join(&format!("artists/{}", id))
    }

    pub fn shows(&self) -> Url {
        self.join("shows")
    }

    fn join(&self, path: &str) -> Url {
        self.base
            .join(path)
            .unwrap_or_else(|_| panic!("get URL for {}", path))
    }
}
