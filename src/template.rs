// Display templates for rendered log entries
//
// A template is a plain string with `{{name}}` placeholders. Rendering
// substitutes values for placeholders and nothing else: no escaping, no
// errors. Placeholders without a supplied value are left in the output
// verbatim, and every occurrence of a supplied placeholder is replaced,
// including repeats.

use serde::Deserialize;

/// Ordered placeholder-to-value pairs for one render.
pub type RenderValues<'a> = [(&'a str, String)];

/// Substitute `values` into `template`.
///
/// Pure string-to-string: the only inputs are the arguments, the only
/// output is the return value.
pub fn render(template: &str, values: &RenderValues) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        // str::replace covers every occurrence, so a template may repeat a
        // placeholder and still come out fully substituted
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// The three templates the dispatcher selects between, loaded once at
/// startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateSet {
    pub join: String,
    pub part: String,
    pub msg: String,
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self {
            join: "--> {{user}} joined {{chan}}".to_string(),
            part: "<-- {{user}} left {{chan}}".to_string(),
            msg: "<{{user}}> {{msg}}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_values_leaves_template_untouched() {
        let template = "{{user}} joined {{chan}}";
        assert_eq!(render(template, &[]), template);
    }

    #[test]
    fn replaces_every_occurrence_of_a_placeholder() {
        let rendered = render(
            "{{user}} waves; everyone waves back at {{user}}",
            &[("user", "alice".to_string())],
        );

        assert_eq!(rendered, "alice waves; everyone waves back at alice");
        assert!(!rendered.contains("{{user}}"));
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let rendered = render(
            "{{user}} joined {{chan}}",
            &[("user", "bob".to_string())],
        );
        assert_eq!(rendered, "bob joined {{chan}}");
    }

    #[test]
    fn extra_values_are_harmless() {
        let rendered = render(
            "hello {{user}}",
            &[("user", "bob".to_string()), ("chan", "#welcome".to_string())],
        );
        assert_eq!(rendered, "hello bob");
    }

    #[test]
    fn join_scenario_renders_expected_line() {
        let rendered = render(
            "{{user}} joined {{chan}}",
            &[("user", "bob".to_string()), ("chan", "#welcome".to_string())],
        );
        assert_eq!(rendered, "bob joined #welcome");
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        assert_eq!(render("plain text", &[("user", "x".to_string())]), "plain text");
    }
}
