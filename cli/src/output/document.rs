use eval_viewer::{SessionState, ViewOutcome};

const TITLE: &str = "Eval Viewer";

/// Wraps a view outcome in a standalone HTML page.
///
/// With `state`, the page carries reload/previous/next links for the
/// `/view` route of the local server.
pub fn render_document(outcome: &ViewOutcome, state: Option<SessionState>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{TITLE}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{TITLE}</h1>\n"));

    if let Some(state) = state {
        html.push_str(&navigation(state));
    }

    html.push_str(&format!(
        "<p id=\"status\">{}</p>\n",
        escape_text(&outcome.status)
    ));

    if let Some(markup) = &outcome.markup {
        html.push_str(markup);
        html.push('\n');
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn navigation(state: SessionState) -> String {
    let link = |action: &str, label: &str| {
        format!(
            "<a href=\"/view?action={action}&amp;page={}&amp;page_size={}\">{label}</a>",
            state.page, state.page_size
        )
    };

    format!(
        "<nav>\n{} | {} | {} <span id=\"page\">Page {} ({} rows per page)</span>\n</nav>\n",
        link("prev", "Previous"),
        link("next", "Next"),
        link("load", "Reload"),
        state.page,
        state.page_size
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
