use std::fmt;
use std::str::FromStr;

use crate::contract::error::MarketplaceError;

/// Screen the front-end shows. Tokens are the stable string names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Landing,
    Login,
    Signup,
    Dashboard,
    BrowseOffers,
    OfferDetail,
    CreateOffer,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Self::Landing,
        Self::Login,
        Self::Signup,
        Self::Dashboard,
        Self::BrowseOffers,
        Self::OfferDetail,
        Self::CreateOffer,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Dashboard => "dashboard",
            Self::BrowseOffers => "browse-offers",
            Self::OfferDetail => "offer-detail",
            Self::CreateOffer => "create-offer",
        }
    }

    /// Reachable without a signed-in member.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Landing | Self::Login | Self::Signup)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Page {
    type Err = MarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.token() == s)
            .ok_or_else(|| MarketplaceError::validation(format!("Unknown page: '{s}'")))
    }
}

/// Page actually shown for `requested`.
///
/// Signed-out sessions only reach the public pages and land on
/// [`Page::Landing`] otherwise. Signed-in sessions skip the public pages for
/// the dashboard, and the detail page needs a selected offer.
pub fn route(requested: Page, authenticated: bool, has_selection: bool) -> Page {
    match (authenticated, requested) {
        (false, p) if p.is_public() => p,
        (false, _) => Page::Landing,
        (true, p) if p.is_public() => Page::Dashboard,
        (true, Page::OfferDetail) if !has_selection => Page::BrowseOffers,
        (true, p) => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse_back() {
        for page in Page::ALL {
            assert_eq!(page.token().parse::<Page>().unwrap(), page);
        }
        assert!("settings".parse::<Page>().is_err());
    }

    #[test]
    fn signed_out_sessions_stay_public() {
        assert_eq!(route(Page::Login, false, false), Page::Login);
        assert_eq!(route(Page::Dashboard, false, false), Page::Landing);
        assert_eq!(route(Page::OfferDetail, false, true), Page::Landing);
    }

    #[test]
    fn signed_in_sessions_skip_auth_pages() {
        assert_eq!(route(Page::Landing, true, false), Page::Dashboard);
        assert_eq!(route(Page::Signup, true, false), Page::Dashboard);
        assert_eq!(route(Page::CreateOffer, true, false), Page::CreateOffer);
    }

    #[test]
    fn detail_needs_selection() {
        assert_eq!(route(Page::OfferDetail, true, false), Page::BrowseOffers);
        assert_eq!(route(Page::OfferDetail, true, true), Page::OfferDetail);
    }
}
