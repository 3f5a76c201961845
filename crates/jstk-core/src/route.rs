//! Panel routes and the host context injected into the view.
//!
//! The panel never reads browser globals. The host hands in the current
//! location as a `PanelContext`, which decides whether the navigation bar is
//! shown and where the companion popup views live.

/// Views reachable inside the DevTools panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Urls,
    JsFiles,
    Creds,
    ApiKeys,
    UrlsVisited,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Urls,
        Route::JsFiles,
        Route::Creds,
        Route::ApiKeys,
        Route::UrlsVisited,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Urls => "/urls",
            Self::JsFiles => "/js-files",
            Self::Creds => "/creds",
            Self::ApiKeys => "/apikeys",
            Self::UrlsVisited => "/urlsvisited",
        }
    }

    /// Resolve a router path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }
}

const POPUP_PAGE: &str = "/PopUp/popup.html";

/// Location of the page hosting the panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelContext {
    pub pathname: String,
    pub origin: String,
}

impl PanelContext {
    pub fn new(pathname: &str, origin: &str) -> Self {
        Self {
            pathname: pathname.to_string(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// The navigation bar is only rendered inside the DevTools page.
    pub fn show_nav_bar(&self) -> bool {
        self.pathname.to_ascii_lowercase().contains("devtool")
    }

    /// Popup view listing endpoints for the inspected webpage.
    pub fn webpage_panel_link(&self) -> String {
        format!("{}{}#urls", self.origin, POPUP_PAGE)
    }

    /// Popup view with the raw output of the endpoint table.
    pub fn output_link(&self) -> String {
        format!("{}{}#urls/output", self.origin, POPUP_PAGE)
    }
}
