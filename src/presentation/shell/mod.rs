// Navigation shell - page selection state machine served as HTML
pub mod pages;
pub mod source;
pub mod widgets;

use crate::presentation::error::{error_response, NOT_FOUND_MESSAGE};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use source::PageSource;
use std::fmt::Write;
use std::sync::Arc;
use widgets::{escape, Widget};

pub const LOAD_ERROR_MESSAGE: &str = "加载页面时发生错误";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Leasing,
    Operations,
    Consumer,
    Merchant,
    Asset,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Leasing,
        Page::Operations,
        Page::Consumer,
        Page::Merchant,
        Page::Asset,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Leasing => "leasing",
            Page::Operations => "operations",
            Page::Consumer => "consumer",
            Page::Merchant => "merchant",
            Page::Asset => "asset",
        }
    }

    pub fn from_id(id: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.id() == id)
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Page::Home => "首页",
            Page::Leasing => "招商革命",
            Page::Operations => "运营进化",
            Page::Consumer => "消费升维",
            Page::Merchant => "商户赋能",
            Page::Asset => "资产评估",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Page::Home => "fas fa-home",
            Page::Leasing => "fas fa-store",
            Page::Operations => "fas fa-chart-line",
            Page::Consumer => "fas fa-users",
            Page::Merchant => "fas fa-shopping-bag",
            Page::Asset => "fas fa-building",
        }
    }

    /// The API listing the page renders
    pub fn endpoint(self) -> &'static str {
        match self {
            Page::Home => "/api/home",
            Page::Leasing => "/api/leasing/location-analysis",
            Page::Operations => "/api/operations/morning-briefing",
            Page::Consumer => "/api/consumer/recommendations",
            Page::Merchant => "/api/merchant/analysis",
            Page::Asset => "/api/asset/evaluation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Select(Page),
}

/// Selecting a page always lands on it, whatever the current page
pub fn transition(_current: Page, event: NavEvent) -> Page {
    match event {
        NavEvent::Select(page) => page,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Ready(Vec<Widget>),
    Failed(String),
}

pub struct NavigationShell<S> {
    source: S,
    current: Page,
    view: Option<PageView>,
}

impl<S: PageSource> NavigationShell<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: Page::Home,
            view: None,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn view(&self) -> Option<&PageView> {
        self.view.as_ref()
    }

    /// Move to the next page and run its entry effect: one fetch, then render.
    /// A failed fetch still leaves the shell on the new page.
    pub async fn dispatch(&mut self, event: NavEvent) -> &PageView {
        self.current = transition(self.current, event);
        let page = self.current;

        let view = match self.source.fetch(page.endpoint()).await {
            Ok(body) => match pages::render(page, &body) {
                Ok(widgets) => PageView::Ready(widgets),
                Err(e) => {
                    tracing::warn!(page = page.id(), error = %e, "Page data did not decode");
                    PageView::Failed(LOAD_ERROR_MESSAGE.to_string())
                }
            },
            Err(e) => {
                tracing::warn!(page = page.id(), error = %e, "Page fetch failed");
                PageView::Failed(LOAD_ERROR_MESSAGE.to_string())
            }
        };
        self.view.insert(view)
    }

    pub fn render_html(&self) -> String {
        let mut out = String::new();
        out.push_str(
            "<!DOCTYPE html><html lang=\"zh-CN\"><head><meta charset=\"utf-8\">\
             <title>南宁百货AI提质增效平台</title></head><body>",
        );

        out.push_str(r#"<nav id="side-nav">"#);
        for page in Page::ALL {
            let active = if page == self.current { " active" } else { "" };
            let _ = write!(
                out,
                r#"<a class="menu-item{}" data-page="{}" href="/{}"><i class="{}"></i><span>{}</span></a>"#,
                active,
                page.id(),
                page.id(),
                page.icon(),
                page.menu_label()
            );
        }
        out.push_str("</nav>");

        out.push_str(r#"<main id="content">"#);
        match &self.view {
            Some(PageView::Ready(widgets)) => {
                for widget in widgets {
                    widget.render(&mut out);
                }
            }
            Some(PageView::Failed(message)) => {
                let _ = write!(out, r#"<div class="error">{}</div>"#, escape(message));
            }
            None => {}
        }
        out.push_str("</main></body></html>");
        out
    }
}

struct ShellState<S> {
    source: S,
}

async fn render_page<S>(state: Arc<ShellState<S>>, page: Page) -> Html<String>
where
    S: PageSource + Clone,
{
    let mut shell = NavigationShell::new(state.source.clone());
    shell.dispatch(NavEvent::Select(page)).await;
    tracing::debug!(
        page = shell.current().id(),
        ready = matches!(shell.view(), Some(PageView::Ready(_))),
        "Rendered shell page"
    );
    Html(shell.render_html())
}

async fn index<S>(State(state): State<Arc<ShellState<S>>>) -> Html<String>
where
    S: PageSource + Clone + 'static,
{
    render_page(state, Page::Home).await
}

async fn page<S>(State(state): State<Arc<ShellState<S>>>, Path(id): Path<String>) -> Response
where
    S: PageSource + Clone + 'static,
{
    match Page::from_id(&id) {
        Some(page) => render_page(state, page).await.into_response(),
        None => error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE, None),
    }
}

/// `/` and `/:page`
pub fn routes<S>(source: S) -> Router
where
    S: PageSource + Clone + 'static,
{
    Router::new()
        .route("/", get(index::<S>))
        .route("/:page", get(page::<S>))
        .with_state(Arc::new(ShellState { source }))
}

#[cfg(test)]
mod tests {
    use super::source::FetchError;
    use super::*;
    use crate::domain::module::HomeOverview;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves the home listing; every other endpoint fails
    #[derive(Default)]
    struct CountingSource {
        fetches: AtomicUsize,
        paths: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageSource for CountingSource {
        async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.paths.lock().unwrap().push(path.to_string());
            if path == "/api/home" {
                Ok(serde_json::to_vec(&HomeOverview::new()).unwrap())
            } else {
                Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR))
            }
        }
    }

    #[async_trait]
    impl<T: PageSource> PageSource for Arc<T> {
        async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.as_ref().fetch(path).await
        }
    }

    #[test]
    fn test_transition_is_select() {
        for from in Page::ALL {
            for to in Page::ALL {
                assert_eq!(transition(from, NavEvent::Select(to)), to);
            }
        }
    }

    #[tokio::test]
    async fn test_starts_home_and_fetches_once_per_selection() {
        let source = Arc::new(CountingSource::default());
        let mut shell = NavigationShell::new(source.clone());
        assert_eq!(shell.current(), Page::Home);
        assert!(shell.view().is_none());

        let view = shell.dispatch(NavEvent::Select(Page::Home)).await;
        assert!(matches!(view, PageView::Ready(_)));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        shell.dispatch(NavEvent::Select(Page::Merchant)).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
        assert_eq!(
            *source.paths.lock().unwrap(),
            vec!["/api/home", "/api/merchant/analysis"]
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_new_page() {
        let mut shell = NavigationShell::new(Arc::new(CountingSource::default()));
        let view = shell.dispatch(NavEvent::Select(Page::Leasing)).await;
        assert_eq!(view, &PageView::Failed(LOAD_ERROR_MESSAGE.to_string()));
        assert_eq!(shell.current(), Page::Leasing);

        let html = shell.render_html();
        assert!(html.contains(r#"<div class="error">加载页面时发生错误</div>"#));
        assert!(html.contains(r#"class="menu-item active" data-page="leasing""#));
    }
}
