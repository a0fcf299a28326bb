use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

/// Path prefix that serves the redirect page.
pub const CALLBACK_PREFIX: &str = "/callback";

macro_rules! custom_scheme_url {
    () => {
        "bruno://app/oauth2/callback"
    };
}

/// Custom scheme target the desktop app registers for.
pub const CUSTOM_SCHEME_URL: &str = custom_scheme_url!();

const CALLBACK_PAGE: &str = concat!(
    r#"<!doctype html>
<html>
  <head>
    <title>Bruno OAuth2 Redirect</title>
    <script>
      (function() {
        var url = '"#,
    custom_scheme_url!(),
    r#"';
        url += window.location.search || '';
        url += window.location.hash || '';
        window.open(url);
      })();
    </script>
  </head>
  <body>
    Redirecting to Bruno...
  </body>
</html>"#
);

/// HTML page that hands the browser's query string and fragment, untouched,
/// to the `bruno://` scheme handler.
pub fn render_callback_page() -> &'static str {
    CALLBACK_PAGE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: &'static str,
}

pub fn route(path: &str) -> CallbackReply {
    if path.starts_with(CALLBACK_PREFIX) {
        CallbackReply {
            status: StatusCode::OK,
            content_type: "text/html",
            body: render_callback_page(),
        }
    } else {
        CallbackReply {
            status: StatusCode::NOT_FOUND,
            content_type: "text/plain",
            body: "Not Found",
        }
    }
}

/// Default service for every method and path.
pub async fn handle_request(req: HttpRequest) -> HttpResponse {
    // Only the path is routed on; the query string may carry an authorization code.
    let reply = route(req.path());
    debug!("{} {}", req.method(), reply.status);

    HttpResponse::build(reply.status)
        .content_type(reply.content_type)
        .body(reply.body)
}
