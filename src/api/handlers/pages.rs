//! HTML pages.
//!
//! Post fields and the `error` query parameter are substituted into the
//! templates verbatim. Nothing here escapes HTML.

use axum::{extract::Query, response::Html};
use serde::Deserialize;
use std::fmt::Write;
use utoipa::IntoParams;

use super::posts::Post;

const LOGIN_TEMPLATE: &str = include_str!("../../../templates/login.html");
const SIGNUP_TEMPLATE: &str = include_str!("../../../templates/signup.html");
const POSTS_TEMPLATE: &str = include_str!("../../../templates/posts.html");

#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct FormQuery {
    /// Message shown above the form.
    pub error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/users/login",
    params(FormQuery),
    responses((status = 200, description = "Login form", body = String, content_type = "text/html")),
    tag = "users"
)]
pub async fn login_form(Query(query): Query<FormQuery>) -> Html<String> {
    Html(render_form(LOGIN_TEMPLATE, query.error.as_deref()))
}

#[utoipa::path(
    get,
    path = "/users/signup",
    params(FormQuery),
    responses((status = 200, description = "Signup form", body = String, content_type = "text/html")),
    tag = "users"
)]
pub async fn signup_form(Query(query): Query<FormQuery>) -> Html<String> {
    Html(render_form(SIGNUP_TEMPLATE, query.error.as_deref()))
}

fn render_form(template: &str, error: Option<&str>) -> String {
    template.replace("{{error}}", error.unwrap_or_default())
}

/// Post list page, newest first as given.
pub(crate) fn render_posts(posts: &[Post]) -> String {
    let mut items = String::new();
    for post in posts {
        // Writing into a String cannot fail.
        let _ = write!(
            items,
            "<article><h2>{}</h2><p>{}</p><button class=\"delete\" data-id=\"{}\">Delete</button></article>",
            post.title, post.body, post.id
        );
    }
    if items.is_empty() {
        items.push_str("<p>No posts yet.</p>");
    }
    POSTS_TEMPLATE.replace("{{posts}}", &items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_form_reflects_error_verbatim() {
        let page = render_form(LOGIN_TEMPLATE, Some("<script>alert(1)</script>"));
        assert!(page.contains("<p class=\"error\"><script>alert(1)</script></p>"));
        assert!(!page.contains("{{error}}"));
    }

    #[test]
    fn render_form_without_error_leaves_blank() {
        let page = render_form(SIGNUP_TEMPLATE, None);
        assert!(page.contains("<p class=\"error\"></p>"));
    }

    #[test]
    fn render_posts_keeps_markup_in_fields() {
        let posts = vec![
            Post {
                id: 2,
                user_id: 1,
                title: "<b>newer</b>".to_string(),
                body: "<img src=x onerror=alert(1)>".to_string(),
            },
            Post {
                id: 1,
                user_id: 1,
                title: "older".to_string(),
                body: "plain".to_string(),
            },
        ];
        let page = render_posts(&posts);
        assert!(page.contains("<h2><b>newer</b></h2>"));
        assert!(page.contains("<p><img src=x onerror=alert(1)></p>"));
        assert!(page.contains("data-id=\"2\""));
        let newer = page.find("newer").unwrap_or(usize::MAX);
        let older = page.find("older").unwrap_or(0);
        assert!(newer < older);
    }

    #[test]
    fn render_posts_handles_empty_list() {
        let page = render_posts(&[]);
        assert!(page.contains("No posts yet."));
        assert!(!page.contains("{{posts}}"));
    }
}
