//! Minimal HTML pages. Rendering is deliberately small; the interesting part
//! of this service is the handoff, not the markup.

use axum::response::Html;

use super::forms::FormError;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{title} - varco</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn flash_block(flash: Option<&str>) -> String {
    flash.map_or_else(String::new, |notice| {
        format!("<p class=\"flash\">{}</p>\n", escape_html(notice))
    })
}

fn error_summary(errors: &[FormError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|error| format!("<li>{}</li>", escape_html(&error.message)))
        .collect();
    format!("<ul class=\"validation-summary\">{items}</ul>\n")
}

pub fn home_page(flash: Option<&str>, signed_in: bool) -> Html<String> {
    let status = if signed_in {
        "<p>You are signed in.</p>\n<form method=\"post\" action=\"/User/LogOut\"><button type=\"submit\">Log out</button></form>"
    } else {
        "<p><a href=\"/User/LogIn\">Log in</a> or <a href=\"/User/Register\">register</a>.</p>"
    };
    let body = format!("{}<h1>varco</h1>\n{status}", flash_block(flash));
    Html(layout("Home", &body))
}

pub fn login_page(email: &str, errors: &[FormError], flash: Option<&str>) -> Html<String> {
    let body = format!(
        concat!(
            "{flash}{errors}<h1>Log in</h1>\n",
            "<form method=\"post\" action=\"/User/LogIn\">\n",
            "<label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n",
            "<label>Password <input type=\"password\" name=\"password\"></label>\n",
            "<label><input type=\"checkbox\" name=\"remember_me\"> Remember me</label>\n",
            "<button type=\"submit\">Log in</button>\n",
            "</form>"
        ),
        flash = flash_block(flash),
        errors = error_summary(errors),
        email = escape_html(email),
    );
    Html(layout("Log in", &body))
}

pub fn register_page(email: &str, errors: &[FormError]) -> Html<String> {
    let body = format!(
        concat!(
            "{errors}<h1>Register</h1>\n",
            "<form method=\"post\" action=\"/User/Register\">\n",
            "<label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n",
            "<label>Password <input type=\"password\" name=\"password\"></label>\n",
            "<label>Confirm password <input type=\"password\" name=\"confirm_password\"></label>\n",
            "<button type=\"submit\">Register</button>\n",
            "</form>"
        ),
        errors = error_summary(errors),
        email = escape_html(email),
    );
    Html(layout("Register", &body))
}

/// Generic failure page; rendered for transport, timeout, and
/// protocol-contract failures so they are never mistaken for validation
/// feedback.
pub fn failure_page() -> Html<String> {
    let body = concat!(
        "<h1>Something went wrong</h1>\n",
        "<p class=\"system-failure\">The sign-in service could not be reached. ",
        "Nothing was changed; please try again.</p>"
    );
    Html(layout("Error", body))
}
