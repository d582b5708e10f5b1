//! Server-side HTML rendering with askama.
//!
//! Every page is a `#[derive(Template)]` struct under [`pages`] holding a
//! [`Layout`] plus its own typed data. Templates live in `templates/` and
//! extend `base.html` (or `printable.html` for print views); askama escapes
//! every interpolation unless a template says otherwise.

pub mod filters;
pub mod pages;

use askama::Template;
use axum::http::StatusCode;
use axum::response::Html;

use bikeshop_core::AppError;
use bikeshop_core::config::business::BusinessConfig;
use bikeshop_entity::user::Role;
use bikeshop_service::context::RequestContext;

use crate::error::HttpResult;

/// Render a page, turning template failures into a rendering error.
pub fn render<T: Template>(page: &T) -> HttpResult<Html<String>> {
    let html = page
        .render()
        .map_err(|e| AppError::rendering(format!("template failed: {e}")))?;
    Ok(Html(html))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// One-off banner shown at the top of a page.
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }
}

/// Context read by `base.html`: title, viewer, banner and shop branding.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub user: Option<RequestContext>,
    pub flash: Option<Flash>,
    pub shop: BusinessConfig,
}

impl Layout {
    pub fn new(
        shop: &BusinessConfig,
        title: impl Into<String>,
        user: Option<RequestContext>,
    ) -> Self {
        Self {
            title: title.into(),
            user,
            flash: None,
            shop: shop.clone(),
        }
    }

    pub fn with_flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash;
        self
    }

    /// Navigation for the viewer's role.
    pub fn nav(&self) -> &'static [(&'static str, &'static str)] {
        match self.user.as_ref().map(|u| u.role) {
            None => &[
                ("/", "Home"),
                ("/services", "Services"),
                ("/tracking", "Track repair"),
                ("/login", "Sign in"),
                ("/register", "Register"),
            ],
            Some(Role::Customer) => &[
                ("/dashboard", "Dashboard"),
                ("/bookings", "Bookings"),
                ("/quotes", "Quotes"),
                ("/profile", "Profile"),
            ],
            Some(Role::Technician) => &[
                ("/workshop", "Workshop"),
                ("/tickets", "Tickets"),
                ("/tickets/new", "Walk-in"),
            ],
            Some(Role::Admin) => &[
                ("/admin", "Admin"),
                ("/workshop", "Workshop"),
                ("/admin/tickets", "Tickets"),
                ("/admin/users", "Users"),
                ("/admin/brands", "Catalog"),
                ("/admin/reports", "Reports"),
                ("/admin/ads", "Ads"),
                ("/admin/settings", "Settings"),
            ],
        }
    }

    /// Contact line for the footer.
    pub fn contact(&self) -> String {
        [&self.shop.contact_email, &self.shop.contact_phone]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Standalone error document, used where no page context is at hand.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub code: u16,
    pub reason: &'a str,
    pub message: &'a str,
}

pub fn error_document(status: StatusCode, message: &str) -> String {
    let page = ErrorPage {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Error"),
        message,
    };
    page.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Error page failed to render");
        format!("{} {}", page.code, page.reason)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_document_escapes_message() {
        let html = error_document(StatusCode::NOT_FOUND, "<script>x</script>");
        assert!(html.contains("404"));
        assert!(html.contains("Not Found"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn test_nav_follows_role() {
        let shop = BusinessConfig::default();
        let anonymous = Layout::new(&shop, "Home", None);
        assert!(anonymous.nav().iter().any(|(href, _)| *href == "/login"));

        let admin = RequestContext::new(1, "ana@shop.test", Role::Admin);
        let layout = Layout::new(&shop, "Admin", Some(admin));
        assert!(layout.nav().iter().any(|(href, _)| *href == "/admin/users"));
        assert!(!layout.nav().iter().any(|(href, _)| *href == "/login"));
    }

    #[test]
    fn test_contact_skips_blank_parts() {
        let shop = BusinessConfig {
            contact_email: "hola@shop.test".into(),
            contact_phone: " ".into(),
            ..BusinessConfig::default()
        };
        assert_eq!(Layout::new(&shop, "x", None).contact(), "hola@shop.test");
    }
}
