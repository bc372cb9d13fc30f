//! Route table — maps navigation paths to top-level views.
//!
//! The table is composed once at startup. Xtream portals get their full
//! section subtree only inside the desktop shell; plain terminals get a single
//! detail route instead. The Stalker subtree is always mounted.

use std::collections::HashMap;

/// Top-level views a path can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    AuthCallback,
    ManagePlaylists,
    /// Poster-style landing page.
    Home,
    /// Channel grid + player for an M3U playlist.
    Player,
    Settings,
    /// Desktop-only Xtream container; `None` is the container itself.
    Xtream(Option<Section>),
    /// Single-page Xtream view used outside the desktop shell.
    XtreamDetail,
    StalkerPortal,
    Stalker(Option<Section>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Live,
    Vod,
    Series,
    Favorites,
    Recent,
    Search,
}

impl View {
    /// Views that show a browsable channel list.
    pub fn shows_channel_grid(self) -> bool {
        matches!(
            self,
            View::Home
                | View::Player
                | View::Xtream(Some(Section::Live))
                | View::Stalker(Some(Section::Live))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    View(View),
    Redirect(&'static str),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub target: Target,
    /// Requires an authenticated session.
    pub guarded: bool,
    pub children: Vec<Route>,
}

impl Route {
    fn view(path: &'static str, view: View) -> Self {
        Self {
            path,
            target: Target::View(view),
            guarded: false,
            children: Vec::new(),
        }
    }

    fn guarded(mut self) -> Self {
        self.guarded = true;
        self
    }

    fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub view: View,
    pub params: HashMap<String, String>,
    pub guarded: bool,
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the route list for the current platform.
    pub fn compose(desktop_shell: bool) -> Self {
        let mut routes = vec![
            Route::view("auth-callback", View::AuthCallback),
            Route::view("manage-playlist", View::ManagePlaylists).guarded(),
            Route::view("", View::Home).guarded(),
            Route::view("playlists", View::Player).guarded(),
            Route::view("iptv", View::Player).guarded(),
            Route::view("playlists/:id", View::Player).guarded(),
            Route::view("csiptv", View::Home).guarded(),
            Route::view("csiptv/:id", View::Home).guarded(),
            Route::view("settings", View::Settings).guarded(),
        ];
        if desktop_shell {
            routes.extend(xtream_routes());
        } else {
            routes.push(Route::view("xtreams/:id", View::XtreamDetail));
        }
        routes.push(Route::view("portals/:id", View::StalkerPortal));
        routes.extend(stalker_routes());
        routes.push(Route {
            path: "**",
            target: Target::Redirect("/"),
            guarded: false,
            children: Vec::new(),
        });
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `path` to a view, following at most one redirect.
    pub fn resolve(&self, path: &str) -> Option<Resolved> {
        self.resolve_inner(path, 1)
    }

    fn resolve_inner(&self, path: &str, redirects_left: u8) -> Option<Resolved> {
        let segments = split(path);
        for route in &self.routes {
            if let Some((target, guarded, params)) = match_route(route, &segments, false) {
                return match target {
                    Target::View(view) => Some(Resolved {
                        view,
                        params,
                        guarded,
                    }),
                    Target::Redirect(to) if redirects_left > 0 => {
                        self.resolve_inner(to, redirects_left - 1)
                    }
                    Target::Redirect(_) => None,
                };
            }
        }
        None
    }
}

fn xtream_routes() -> Vec<Route> {
    vec![Route::view("xtreams/:id", View::Xtream(None)).with_children(section_routes(View::Xtream))]
}

fn stalker_routes() -> Vec<Route> {
    vec![Route::view("stalker/:id", View::Stalker(None)).with_children(section_routes(View::Stalker))]
}

fn section_routes(make: fn(Option<Section>) -> View) -> Vec<Route> {
    [
        ("live", Section::Live),
        ("vod", Section::Vod),
        ("series", Section::Series),
        ("favorites", Section::Favorites),
        ("recent", Section::Recent),
        ("search", Section::Search),
    ]
    .into_iter()
    .map(|(path, section)| Route::view(path, make(Some(section))))
    .collect()
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Try `route` (and its children) against `segments`. Guards are inherited.
fn match_route(
    route: &Route,
    segments: &[&str],
    parent_guarded: bool,
) -> Option<(Target, bool, HashMap<String, String>)> {
    let guarded = parent_guarded || route.guarded;
    let pattern = split(route.path);

    if pattern.first() == Some(&"**") {
        return Some((route.target.clone(), guarded, HashMap::new()));
    }
    if segments.len() < pattern.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pat, seg) in pattern.iter().zip(segments) {
        if let Some(name) = pat.strip_prefix(':') {
            params.insert(name.to_string(), seg.to_string());
        } else if pat != seg {
            return None;
        }
    }

    let rest = &segments[pattern.len()..];
    if rest.is_empty() {
        return Some((route.target.clone(), guarded, params));
    }
    for child in &route.children {
        if let Some((target, child_guarded, child_params)) = match_route(child, rest, guarded) {
            params.extend(child_params);
            return Some((target, child_guarded, params));
        }
    }
    None
}
