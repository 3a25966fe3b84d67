//! Link type: one hypermedia link inside a `_links` relation.

/// A hypermedia link. Immutable once built; the `with_*` methods consume
/// the link and are meant for construction only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    /// Target URI reference. May be relative or a URI template.
    pub(crate) href: String,
    pub(crate) title: Option<String>,
    pub(crate) media_type: Option<String>,
    /// Secondary key when several links share a relation (e.g. curies).
    pub(crate) name: Option<String>,
    pub(crate) templated: bool,
    pub(crate) deprecation: Option<String>,
    pub(crate) hreflang: Option<String>,
    pub(crate) profile: Option<String>,
}

impl Link {
    /// Create a link with only an `href`.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            media_type: None,
            name: None,
            templated: false,
            deprecation: None,
            hreflang: None,
            profile: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the media type hint (`type` on the wire).
    #[must_use]
    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn templated(mut self, templated: bool) -> Self {
        self.templated = templated;
        self
    }

    /// Mark the link as deprecated, pointing at a URI describing the deprecation.
    #[must_use]
    pub fn with_deprecation(mut self, deprecation: impl Into<String>) -> Self {
        self.deprecation = Some(deprecation.into());
        self
    }

    #[must_use]
    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_templated(&self) -> bool {
        self.templated
    }

    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }

    pub fn hreflang(&self) -> Option<&str> {
        self.hreflang.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

impl From<&str> for Link {
    fn from(href: &str) -> Self {
        Link::new(href)
    }
}

impl From<String> for Link {
    fn from(href: String) -> Self {
        Link::new(href)
    }
}
