use lol_html::{element, rewrite_str, RewriteStrSettings};

use super::HtmlError;

/// Strip executable content from untrusted page HTML
///
/// Removes `<script>` elements, every `on*` event handler attribute and
/// `javascript:` URLs in `href`/`src`. Structure and text are left alone so
/// highlight offsets computed on the sanitized page stay valid.
pub fn sanitize_html(html: &str) -> Result<String, HtmlError> {
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("*", |el| {
                    let handlers: Vec<String> = el
                        .attributes()
                        .iter()
                        .map(|attr| attr.name())
                        .filter(|name| name.starts_with("on"))
                        .collect();
                    for name in handlers {
                        el.remove_attribute(&name);
                    }

                    for attr in ["href", "src"] {
                        if let Some(value) = el.get_attribute(attr) {
                            if is_javascript_url(&value) {
                                el.remove_attribute(attr);
                            }
                        }
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| HtmlError::Rewrite(e.to_string()))?;

    Ok(result)
}

fn is_javascript_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    compact.to_ascii_lowercase().starts_with("javascript:")
}
