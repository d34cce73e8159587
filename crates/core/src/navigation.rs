//! Smooth scrolling for same-page navigation links.

/// Where a navigation link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// In-page fragment; holds the element id without the leading `#`.
    Fragment(String),
    /// Anything else, navigated to in full.
    External(String),
    /// Missing href or a bare `#`.
    Nowhere,
}

impl NavTarget {
    pub fn parse(href: Option<&str>) -> Self {
        let href = href.map(str::trim).unwrap_or_default();
        if href.is_empty() {
            return NavTarget::Nowhere;
        }
        match href.strip_prefix('#') {
            Some("") => NavTarget::Nowhere,
            Some(id) => NavTarget::Fragment(id.to_string()),
            None => NavTarget::External(href.to_string()),
        }
    }
}

/// DOM side of the navigator.
pub trait ScrollSurface {
    /// Smoothly scroll the element with `id` to the top of the viewport.
    /// Returns `false` if no such element exists.
    fn scroll_to_element(&mut self, id: &str) -> bool;
    fn navigate(&mut self, url: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Scrolled(String),
    MissingTarget(String),
    Navigated(String),
    Ignored,
}

/// Handle one link click. The caller always suppresses the default
/// navigation; this decides what happens instead.
pub fn handle_click<S: ScrollSurface + ?Sized>(href: Option<&str>, surface: &mut S) -> NavAction {
    match NavTarget::parse(href) {
        NavTarget::Fragment(id) => {
            if surface.scroll_to_element(&id) {
                NavAction::Scrolled(id)
            } else {
                log::debug!("no element with id {id:?} to scroll to");
                NavAction::MissingTarget(id)
            }
        }
        NavTarget::External(url) => {
            surface.navigate(&url);
            NavAction::Navigated(url)
        }
        NavTarget::Nowhere => NavAction::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_hrefs() {
        assert_eq!(
            NavTarget::parse(Some("#about")),
            NavTarget::Fragment("about".into())
        );
        assert_eq!(
            NavTarget::parse(Some("resume.pdf")),
            NavTarget::External("resume.pdf".into())
        );
        assert_eq!(
            NavTarget::parse(Some("https://example.com/#x")),
            NavTarget::External("https://example.com/#x".into())
        );
        assert_eq!(NavTarget::parse(Some("#")), NavTarget::Nowhere);
        assert_eq!(NavTarget::parse(Some("  ")), NavTarget::Nowhere);
        assert_eq!(NavTarget::parse(None), NavTarget::Nowhere);
    }
}
