//! Route handlers, grouped by page area.
//!
//! Page routes return JSON view models (HTML rendering is the browser's
//! concern); mutating form routes redirect back to the listing page with
//! a status message in the query string.

pub mod api;
pub mod auth;
pub mod billing;
pub mod customers;
pub mod dashboard;
pub mod invoices;
pub mod payments;
pub mod products;

use axum::response::Redirect;

/// Redirects back to a listing page with a user-facing status message.
///
/// The message travels in the query string; spaces become `+` so the
/// URL stays valid without a percent-encoding dependency.
pub(crate) fn flash_redirect(path: &str, status: &str, message: &str) -> Redirect {
    let encoded = message.replace(' ', "+");
    Redirect::to(&format!("{}?status={}&message={}", path, status, encoded))
}

pub(crate) fn flash_success(path: &str, message: &str) -> Redirect {
    flash_redirect(path, "success", message)
}

pub(crate) fn flash_error(path: &str, message: &str) -> Redirect {
    flash_redirect(path, "error", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_flash_redirect_encodes_spaces() {
        let response = flash_success("/products", "Product added successfully").into_response();
        let location = response.headers().get("location").unwrap();
        assert_eq!(
            location,
            "/products?status=success&message=Product+added+successfully"
        );
    }
}
