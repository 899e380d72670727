//! Help text arguments and the template renderer boundary.
//!
//! Recognizers never write end-user prose themselves. They build an ordered
//! list of [`HelpArg`]s and hand it, together with a [`TemplateUsage`], to a
//! [`TemplateRenderer`]. [`HandlebarsRenderer`] renders Handlebars templates
//! in which each argument is available by name and `{{#if name}}` guards the
//! optional parts.

use std::collections::BTreeMap;
use std::fmt;

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::error::{RecognizerError, Result};

/// Which help template a recognizer is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateUsage {
    /// Single-choice enumeration with ordinal shortcuts.
    EnumOneNumberHelp,
    /// Multi-choice enumeration with ordinal shortcuts.
    EnumManyNumberHelp,
    /// Single-choice enumeration, words only.
    EnumOneWordHelp,
    /// Multi-choice enumeration, words only.
    EnumManyWordHelp,
    BoolHelp,
    StringHelp,
    IntegerHelp,
    RealHelp,
    DateTimeHelp,
}

impl TemplateUsage {
    /// Registered template name, matching the YAML key.
    pub fn name(self) -> &'static str {
        match self {
            TemplateUsage::EnumOneNumberHelp => "enum_one_number_help",
            TemplateUsage::EnumManyNumberHelp => "enum_many_number_help",
            TemplateUsage::EnumOneWordHelp => "enum_one_word_help",
            TemplateUsage::EnumManyWordHelp => "enum_many_word_help",
            TemplateUsage::BoolHelp => "bool_help",
            TemplateUsage::StringHelp => "string_help",
            TemplateUsage::IntegerHelp => "integer_help",
            TemplateUsage::RealHelp => "real_help",
            TemplateUsage::DateTimeHelp => "date_time_help",
        }
    }

    /// Template variable bound to each positional argument.
    ///
    /// Enumeration templates take `[min, max, choices]`; primitive templates
    /// take `[current, no_preference, min, max]`.
    pub fn arg_names(self) -> &'static [&'static str] {
        match self {
            TemplateUsage::EnumOneNumberHelp
            | TemplateUsage::EnumManyNumberHelp
            | TemplateUsage::EnumOneWordHelp
            | TemplateUsage::EnumManyWordHelp => &["min", "max", "choices"],
            _ => &["current", "no_preference", "min", "max"],
        }
    }

    /// Built-in English template for this usage.
    pub fn default_template(self) -> &'static str {
        match self {
            TemplateUsage::EnumOneNumberHelp => {
                "You can enter a number {{min}}-{{max}} or words from the descriptions. ({{choices}})"
            }
            TemplateUsage::EnumManyNumberHelp => {
                "You can enter one or more selections from {{min}}-{{max}} or words from the descriptions. ({{choices}})"
            }
            TemplateUsage::EnumOneWordHelp => {
                "You can enter any words from the descriptions. ({{choices}})"
            }
            TemplateUsage::EnumManyWordHelp => {
                "You can enter one or more selections from the descriptions. ({{choices}})"
            }
            TemplateUsage::BoolHelp => concat!(
                "Please enter 'yes' or 'no'",
                "{{#if current}}, {{current}} to keep the current value{{/if}}",
                "{{#if no_preference}}, {{no_preference}} to leave it unset{{/if}}."
            ),
            TemplateUsage::StringHelp => concat!(
                "You can enter anything",
                "{{#if current}}, {{current}} to keep the current value{{/if}}",
                "{{#if no_preference}}, {{no_preference}} to leave it unset{{/if}}."
            ),
            TemplateUsage::IntegerHelp => concat!(
                "You can enter a number",
                "{{#if min}} from {{min}}{{/if}}{{#if max}} up to {{max}}{{/if}}",
                "{{#if current}}, {{current}} to keep the current value{{/if}}",
                "{{#if no_preference}}, {{no_preference}} to leave it unset{{/if}}."
            ),
            TemplateUsage::RealHelp => concat!(
                "You can enter a number with a decimal point",
                "{{#if min}} from {{min}}{{/if}}{{#if max}} up to {{max}}{{/if}}",
                "{{#if current}}, {{current}} to keep the current value{{/if}}",
                "{{#if no_preference}}, {{no_preference}} to leave it unset{{/if}}."
            ),
            TemplateUsage::DateTimeHelp => concat!(
                "Please enter a date or time",
                "{{#if current}}, {{current}} to keep the current value{{/if}}",
                "{{#if no_preference}}, {{no_preference}} to leave it unset{{/if}}."
            ),
        }
    }

    /// Binds present arguments to [`arg_names`](Self::arg_names).
    ///
    /// Values are passed as strings, so a bound of `0` still counts as
    /// present inside `{{#if}}`.
    pub fn template_data(self, args: &[HelpArg]) -> Map<String, JsonValue> {
        self.arg_names()
            .iter()
            .zip(args)
            .filter(|(_, arg)| arg.is_present())
            .map(|(name, arg)| (name.to_string(), JsonValue::String(arg.to_string())))
            .collect()
    }
}

/// One positional argument handed to a template renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpArg {
    /// Not applicable for this field or call.
    Missing,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl HelpArg {
    /// Returns `false` for [`HelpArg::Missing`].
    pub fn is_present(&self) -> bool {
        !matches!(self, HelpArg::Missing)
    }
}

impl fmt::Display for HelpArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelpArg::Missing => Ok(()),
            HelpArg::Integer(n) => write!(f, "{n}"),
            HelpArg::Real(x) => write!(f, "{x}"),
            HelpArg::Text(text) => f.write_str(text),
        }
    }
}

/// Turns a template usage and its arguments into the final help string.
///
/// Implementations own localization; recognizers only supply arguments.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, usage: TemplateUsage, args: &[HelpArg]) -> String;
}

impl<F> TemplateRenderer for F
where
    F: Fn(TemplateUsage, &[HelpArg]) -> String + Send + Sync,
{
    fn render(&self, usage: TemplateUsage, args: &[HelpArg]) -> String {
        self(usage, args)
    }
}

/// Handlebars renderer over the built-in templates and configured overrides.
///
/// Overrides are compiled once, at construction, under
/// [`TemplateUsage::name`]. Usages without an override render
/// [`TemplateUsage::default_template`]. Output is not HTML-escaped.
///
/// # Examples
///
/// ```
/// use field_recognizer::{HandlebarsRenderer, HelpArg, TemplateRenderer, TemplateUsage};
///
/// let renderer = HandlebarsRenderer::default();
/// let text = renderer.render(
///     TemplateUsage::IntegerHelp,
///     &[HelpArg::Missing, HelpArg::Missing, HelpArg::Integer(1), HelpArg::Integer(10)],
/// );
/// assert_eq!(text, "You can enter a number from 1 up to 10.");
/// ```
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }
}

impl fmt::Debug for HandlebarsRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<_> = self.registry.get_templates().keys().collect();
        overridden.sort();
        f.debug_struct("HandlebarsRenderer")
            .field("overridden", &overridden)
            .finish()
    }
}

impl HandlebarsRenderer {
    /// Creates a renderer with template overrides.
    ///
    /// # Errors
    ///
    /// Returns [`RecognizerError::InvalidTemplate`] for the first override
    /// that is not valid Handlebars syntax.
    pub fn new(overrides: &BTreeMap<TemplateUsage, String>) -> Result<Self> {
        let mut renderer = Self::default();
        for (usage, template) in overrides {
            renderer
                .registry
                .register_template_string(usage.name(), template)
                .map_err(|source| RecognizerError::InvalidTemplate {
                    usage: *usage,
                    source: Box::new(source),
                })?;
        }
        Ok(renderer)
    }

    /// Returns `true` if `usage` renders a configured override.
    pub fn is_overridden(&self, usage: TemplateUsage) -> bool {
        self.registry.has_template(usage.name())
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, usage: TemplateUsage, args: &[HelpArg]) -> String {
        let data = usage.template_data(args);
        let rendered = if self.is_overridden(usage) {
            self.registry.render(usage.name(), &data)
        } else {
            self.registry.render_template(usage.default_template(), &data)
        };
        rendered.unwrap_or_else(|err| {
            warn!(usage = usage.name(), error = %err, "Help template failed to render");
            String::new()
        })
    }
}

/// Joins items as a human list: `a, b or c`.
///
/// # Examples
///
/// ```
/// use field_recognizer::build_list;
///
/// let items = vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()];
/// assert_eq!(build_list(&items, ", ", " or "), "Red, Green or Blue");
/// assert_eq!(build_list(&items[..1], ", ", " or "), "Red");
/// ```
pub fn build_list(items: &[String], separator: &str, last_separator: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{}{last_separator}{last}", head.join(separator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with(usage: TemplateUsage, template: &str, args: &[HelpArg]) -> String {
        let overrides = BTreeMap::from([(usage, template.to_string())]);
        HandlebarsRenderer::new(&overrides).unwrap().render(usage, args)
    }

    #[test]
    fn test_missing_variable_renders_empty() {
        assert_eq!(render_with(TemplateUsage::StringHelp, "a{{current}}b", &[]), "ab");
    }

    #[test]
    fn test_optional_section_dropped_when_arg_missing() {
        let args = [HelpArg::Text("x".into()), HelpArg::Missing];
        let template = "v{{#if current}}, {{current}}{{/if}}{{#if no_preference}}, {{no_preference}}{{/if}}.";
        assert_eq!(render_with(TemplateUsage::BoolHelp, template, &args), "v, x.");
    }

    #[test]
    fn test_zero_bound_is_present() {
        let renderer = HandlebarsRenderer::default();
        let args = [
            HelpArg::Missing,
            HelpArg::Missing,
            HelpArg::Integer(0),
            HelpArg::Integer(10),
        ];
        assert_eq!(
            renderer.render(TemplateUsage::IntegerHelp, &args),
            "You can enter a number from 0 up to 10."
        );
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let renderer = HandlebarsRenderer::default();
        let args = [HelpArg::Text("Current Choice or 'c'".into()), HelpArg::Missing];
        assert_eq!(
            renderer.render(TemplateUsage::StringHelp, &args),
            "You can enter anything, Current Choice or 'c' to keep the current value."
        );
    }

    #[test]
    fn test_enumeration_args_by_name() {
        let data = TemplateUsage::EnumOneWordHelp.template_data(&[
            HelpArg::Missing,
            HelpArg::Missing,
            HelpArg::Text("Red or Blue".into()),
        ]);
        assert_eq!(data.len(), 1);
        assert_eq!(data["choices"], JsonValue::String("Red or Blue".into()));
    }

    #[test]
    fn test_override_wins() {
        let overrides = BTreeMap::from([(
            TemplateUsage::BoolHelp,
            "oui ou non{{#if current}}, {{current}}{{/if}}".to_string(),
        )]);
        let renderer = HandlebarsRenderer::new(&overrides).unwrap();
        assert_eq!(renderer.render(TemplateUsage::BoolHelp, &[HelpArg::Missing]), "oui ou non");
        assert!(renderer.is_overridden(TemplateUsage::BoolHelp));
        assert!(!renderer.is_overridden(TemplateUsage::StringHelp));
        assert_eq!(
            renderer.render(TemplateUsage::StringHelp, &[]),
            "You can enter anything."
        );
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = BTreeMap::from([(TemplateUsage::RealHelp, "{{#if min}} from {{/each}}".to_string())]);
        let err = HandlebarsRenderer::new(&overrides).unwrap_err();
        assert!(matches!(
            err,
            RecognizerError::InvalidTemplate {
                usage: TemplateUsage::RealHelp,
                ..
            }
        ));
    }

    #[test]
    fn test_names_match_yaml_keys() {
        for usage in [TemplateUsage::EnumManyWordHelp, TemplateUsage::DateTimeHelp] {
            let key = serde_yaml::to_string(&usage).unwrap();
            assert_eq!(key.trim(), usage.name());
        }
    }

    #[test]
    fn test_build_list_two_items() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(build_list(&items, ", ", " or "), "a or b");
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = |usage: TemplateUsage, args: &[HelpArg]| format!("{usage:?}:{}", args.len());
        assert_eq!(renderer.render(TemplateUsage::StringHelp, &[]), "StringHelp:0");
    }
}
