//! Label templates
//!
//! A face's `label` attribute may embed component labels as `{key}`.
//! Placeholders do not nest; an unterminated `{` is kept as written.

use super::RenderError;
use crate::domain::Component;

/// Replaces every `{key}` in `template` with the component's label value
pub fn expand_label(template: &str, component: &Component) -> Result<String, RenderError> {
    let mut expanded = String::with_capacity(template.len());
    let mut start: Option<usize> = None;

    for (i, ch) in template.char_indices() {
        match (ch, start) {
            ('{', Some(_)) => {
                return Err(RenderError::NestedPlaceholder(template.to_string()));
            }
            ('{', None) => start = Some(i),
            ('}', None) => {
                return Err(RenderError::MalformedPlaceholder(template.to_string()));
            }
            ('}', Some(open)) => {
                let key = template[open + 1..i].trim();
                let value = component
                    .label(key)
                    .ok_or_else(|| RenderError::UndefinedLabel {
                        key: key.to_string(),
                        component: component.id().clone(),
                    })?;
                expanded.push_str(value);
                start = None;
            }
            (_, Some(_)) => {}
            (_, None) => expanded.push(ch),
        }
    }

    if let Some(open) = start {
        expanded.push_str(&template[open..]);
    }

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentId;

    fn component() -> Component {
        let mut c = Component::new(None, ComponentId::new("api"));
        c.add_label("name", "Orders API");
        c.add_label("team", "core");
        c
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(expand_label("static", &component()).unwrap(), "static");
    }

    #[test]
    fn placeholders_are_replaced() {
        let label = expand_label("{name} ({ team })", &component()).unwrap();
        assert_eq!(label, "Orders API (core)");
    }

    #[test]
    fn repeated_placeholders_are_all_replaced() {
        let label = expand_label("{team}/{team}", &component()).unwrap();
        assert_eq!(label, "core/core");
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        let label = expand_label("{name} {oops", &component()).unwrap();
        assert_eq!(label, "Orders API {oops");
    }

    #[test]
    fn nested_placeholder_is_rejected() {
        let err = expand_label("{a{b}}", &component()).unwrap_err();
        assert!(matches!(err, RenderError::NestedPlaceholder(_)));
    }

    #[test]
    fn stray_closing_brace_is_rejected() {
        let err = expand_label("name}", &component()).unwrap_err();
        assert!(matches!(err, RenderError::MalformedPlaceholder(_)));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = expand_label("{owner}", &component()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::UndefinedLabel { ref key, .. } if key == "owner"
        ));
    }
}
