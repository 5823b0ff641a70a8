//! The interactive page: a static shell around the hydrated fragment.
//!
//! Tag toggles carry their next filter state in `data-filter`; the inline
//! script navigates to `/?filter=<that state>`. The search form submits
//! `search` alongside the current encoded filter so active tags survive.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::filter::FilterState;
use crate::render::html::{html_escape, to_html};
use crate::render::hydrator::FILTER_ATTR;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub filter: Option<String>,
    pub search: Option<String>,
}

impl PageQuery {
    /// The filter state the query asks for; `None` is the default view.
    pub fn filter_state(&self) -> Result<Option<FilterState>, AppError> {
        let mut filter = match self.filter.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(FilterState::decode(raw)?),
            _ => None,
        };

        if let Some(search) = &self.search {
            let search = search.trim();
            let state = filter.get_or_insert_with(FilterState::default);
            state.search = (!search.is_empty()).then(|| search.to_string());
            if state.tags.is_empty() && state.search.is_none() {
                filter = None;
            }
        }

        Ok(filter)
    }
}

/// GET /
pub async fn handle_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filter = query.filter_state()?;
    let rendered = state.controller.render(filter.as_ref());
    Ok(Html(page_shell(
        &state.config.page_title,
        filter.as_ref(),
        &to_html(&rendered.tree),
    )))
}

fn page_shell(title: &str, filter: Option<&FilterState>, fragment: &str) -> String {
    let current = filter.map(FilterState::encode).unwrap_or_default();
    let search = filter
        .and_then(|f| f.search.as_deref())
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<form class="search" method="get" action="/">
<input type="hidden" name="filter" value="{current}">
<input type="search" name="search" value="{search}" placeholder="Search">
</form>
{fragment}
<script>
document.addEventListener("click", function (event) {{
  var toggle = event.target.closest("[{attr}]");
  if (!toggle) return;
  window.location.search = "?filter=" + encodeURIComponent(toggle.getAttribute("{attr}"));
}});
</script>
</body>
</html>
"#,
        title = html_escape(title),
        current = html_escape(&current),
        search = html_escape(search),
        fragment = fragment,
        attr = FILTER_ATTR,
    )
}
