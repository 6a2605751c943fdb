//! Server-rendered HTML
//!
//! Plain `format!` templates. Every interpolated value goes through
//! [`escape`].

use std::fmt::Write as _;

use travelhub_core::models::{ResortInput, ResortType, ReviewInput};
use travelhub_core::time::format_eastern;

use super::routes::assets::{SCRIPT_PATH, STYLESHEET_PATH};
use crate::services::ResortDetail;
use crate::store::{RankedResort, User, UserReview};

/// Minimal HTML escaping for text and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Info,
    Error,
}

/// One message shown above the page content
#[derive(Debug, Clone)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            text: text.into(),
        }
    }
}

/// Text for a `?notice=` key carried across a redirect. Unknown keys are
/// ignored.
pub fn notice_text(key: &str) -> Option<&'static str> {
    match key {
        "registered" => Some("Registration successful. Please log in."),
        "login_required" => Some("Please log in to access this page."),
        _ => None,
    }
}

const PASSWORD_HINT: &str =
    "8 to 13 characters with a lowercase letter, an uppercase letter, a digit and a special character.";

fn opt(value: Option<&str>) -> String {
    escape(value.unwrap_or(""))
}

fn score(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{:.2}", v),
        None => "No ratings yet".to_owned(),
    }
}

pub fn layout(title: &str, user: Option<&User>, flashes: &[Flash], body: &str) -> String {
    let nav = match user {
        Some(u) => format!(
            r#"<span>Signed in as {}</span> <a href="/profile">Profile</a> <a href="/logout">Log out</a>"#,
            escape(&u.nickname)
        ),
        None => r#"<a href="/login">Log in</a> <a href="/signup">Sign up</a>"#.to_owned(),
    };

    let mut flash_html = String::new();
    for flash in flashes {
        let class = match flash.kind {
            FlashKind::Info => "flash info",
            FlashKind::Error => "flash error",
        };
        let _ = write!(flash_html, r#"<p class="{}">{}</p>"#, class, escape(&flash.text));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | TravelHub</title>
<link rel="stylesheet" href="{STYLESHEET_PATH}">
<script src="{SCRIPT_PATH}" defer></script>
</head>
<body>
<header><a href="/"><strong>TravelHub</strong></a> <nav>{nav}</nav></header>
<main>
{flash_html}
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn home(ranked: &[RankedResort]) -> String {
    if ranked.is_empty() {
        return "<h1>Top resorts</h1><p>No resorts yet. Be the first to add one from your profile.</p>"
            .to_owned();
    }

    let mut rows = String::new();
    for (rank, r) in ranked.iter().enumerate() {
        let picture = match &r.resort.picture {
            Some(p) => format!(r#"<img src="/static/{}" alt="" width="80">"#, escape(p)),
            None => String::new(),
        };
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td><a href="/resort/{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            rank + 1,
            picture,
            r.resort.id,
            escape(&r.resort.resort_name),
            escape(&r.resort.country),
            opt(r.resort.city.as_deref()),
            r.resort.resort_type,
            score(r.avg_score),
        );
    }

    format!(
        r#"<h1>Top resorts</h1>
<table>
<thead><tr><th>#</th><th></th><th>Resort</th><th>Country</th><th>City</th><th>Type</th><th>Average</th></tr></thead>
<tbody>{rows}</tbody>
</table>"#
    )
}

pub fn login_form(username: &str) -> String {
    format!(
        r#"<h1>Log in</h1>
<form method="post" action="/login">
<label>Username <input name="username" value="{}" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#,
        escape(username)
    )
}

pub fn signup_form(username: &str, nickname: &str) -> String {
    format!(
        r#"<h1>Sign up</h1>
<form method="post" action="/signup">
<label>Username <input name="username" value="{}" required></label>
<label>Nickname <input name="nickname" value="{}" required></label>
<label>Password <input name="password" type="password" required data-password-policy="{policy}"></label>
<p class="hint">{policy}</p>
<button type="submit">Create account</button>
</form>"#,
        escape(username),
        escape(nickname),
        policy = PASSWORD_HINT,
    )
}

fn type_options(selected: &str) -> String {
    let mut out = String::from(r#"<option value="">Choose a type</option>"#);
    for t in ResortType::all() {
        let sel = if t.as_str().eq_ignore_ascii_case(selected.trim()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(out, r#"<option value="{0}"{1}>{0}</option>"#, t.as_str(), sel);
    }
    out
}

fn review_fields(review: &ReviewInput) -> String {
    format!(
        r#"<label>Recommendation <input name="recommendation" type="number" value="{}"></label>
<label>Expenditure <input name="expenditure" type="number" step="0.01" value="{}"></label>
<label>Comment <textarea name="comment">{}</textarea></label>"#,
        opt(review.recommendation.as_deref()),
        opt(review.expenditure.as_deref()),
        opt(review.comment.as_deref()),
    )
}

pub fn profile(user: &User, reviews: &[UserReview], resort: &ResortInput, review: &ReviewInput) -> String {
    let mut items = String::new();
    for r in reviews {
        let _ = write!(
            items,
            r#"<li><a href="/resort/{}">{}</a>: {} ({})</li>"#,
            r.resort_id,
            escape(&r.resort_name),
            r.recommendation
                .map(|v| v.to_string())
                .unwrap_or_else(|| "no rating".to_owned()),
            format_eastern(r.created_at),
        );
    }
    if items.is_empty() {
        items.push_str("<li>You have not reviewed any resort yet.</li>");
    }

    format!(
        r#"<h1>{nickname}</h1>
<h2>Your reviews</h2>
<ul>{items}</ul>
<h2>Add a resort</h2>
<form method="post" action="/profile" enctype="multipart/form-data">
<label>Country <input name="country" value="{country}" required></label>
<label>State <input name="state" value="{state}"></label>
<label>City <input name="city" value="{city}"></label>
<label>County <input name="county" value="{county}"></label>
<label>Resort name <input name="resort_name" value="{name}" required></label>
<label>Type <select name="resort_type" required>{types}</select></label>
<label>Picture <input name="picture" type="file" accept=".png,.jpg,.jpeg,.gif" data-preview="picture-preview"></label>
<img id="picture-preview" alt="" hidden>
{review}
<button type="submit">Submit</button>
</form>"#,
        nickname = escape(&user.nickname),
        country = escape(&resort.country),
        state = opt(resort.state.as_deref()),
        city = opt(resort.city.as_deref()),
        county = opt(resort.county.as_deref()),
        name = escape(&resort.resort_name),
        types = type_options(&resort.resort_type),
        review = review_fields(review),
    )
}

pub fn resort_detail(detail: &ResortDetail, can_review: bool, draft: &ReviewInput) -> String {
    let resort = &detail.ranked.resort;
    let place: Vec<&str> = [
        resort.city.as_deref(),
        resort.county.as_deref(),
        resort.state.as_deref(),
        Some(resort.country.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let picture = match &resort.picture {
        Some(p) => format!(r#"<img src="/static/{}" alt="{}">"#, escape(p), escape(&resort.resort_name)),
        None => String::new(),
    };

    let mut reviews = String::new();
    for r in &detail.reviews {
        let _ = write!(
            reviews,
            r#"<li><strong>{}</strong> {}<br>Rating: {} | Spent: {}<br>{}</li>"#,
            escape(&r.nickname),
            format_eastern(r.created_at),
            r.recommendation
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_owned()),
            r.expenditure
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "-".to_owned()),
            opt(r.comment.as_deref()),
        );
    }

    let form = if can_review {
        format!(
            r#"<h2>Add your review</h2>
<form method="post" action="/resort/{}">
{}
<button type="submit">Post review</button>
</form>"#,
            resort.id,
            review_fields(draft)
        )
    } else {
        r#"<p><a href="/login">Log in</a> to add a review.</p>"#.to_owned()
    };

    format!(
        r#"<h1>{name}</h1>
<p>{place} | {kind}</p>
{picture}
<p>Average rating: {avg} ({count} rated)</p>
<h2>Reviews</h2>
<ul>{reviews}</ul>
{form}"#,
        name = escape(&resort.resort_name),
        place = escape(&place.join(", ")),
        kind = resort.resort_type,
        avg = score(detail.ranked.avg_score),
        count = detail.ranked.rating_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn layout_links_bundled_assets() {
        let html = layout("Home", None, &[], "");
        assert!(html.contains(r#"href="/assets/style.css""#));
        assert!(html.contains(r#"src="/assets/main.js""#));
    }

    #[test]
    fn known_notices_only() {
        assert!(notice_text("registered").is_some());
        assert!(notice_text("login_required").is_some());
        assert!(notice_text("<b>").is_none());
    }

    #[test]
    fn signup_form_keeps_input_but_never_password() {
        let html = signup_form("bob<", "Bobby");
        assert!(html.contains(r#"value="bob&lt;""#));
        assert!(html.contains(r#"value="Bobby""#));
        assert!(!html.contains(r#"name="password" type="password" value"#));
    }

    #[test]
    fn type_select_marks_previous_choice() {
        let html = type_options("lake");
        assert!(html.contains(r#"<option value="Lake" selected>Lake</option>"#));
        assert_eq!(html.matches("<option").count(), ResortType::all().len() + 1);
    }
}
