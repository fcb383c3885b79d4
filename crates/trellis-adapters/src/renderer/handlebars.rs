//! Handlebars renderer with the blueprint helpers.
//!
//! | helper | form |
//! |---|---|
//! | `if_or a b` | block; body if either is truthy, else `{{else}}` |
//! | `if_and a b` | block; body if both are truthy, else `{{else}}` |
//! | `template_version` | the version of the blueprint being rendered |
//!
//! The built-in helpers (`if`, `unless`, `eq`, `not`, ...) stay available.
//! Output is not HTML-escaped and missing values render empty.

use std::path::Path;

use chrono::Datelike;
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output,
    RenderContext as HbsContext, RenderError, RenderErrorReason, Renderable,
};
use serde_json::{Map, Value};
use tracing::{instrument, trace};

use trellis_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{AnswerValue, ProjectStructure, RenderContext, TemplateFile},
    error::TrellisResult,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct HandlebarsRenderer;

impl HandlebarsRenderer {
    pub fn new() -> Self {
        Self
    }

    /// A registry for one run. The version is per-blueprint, so nothing is
    /// shared between runs.
    fn registry(template_version: &str) -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(false);
        hbs.register_helper("if_or", Box::new(Either::Or));
        hbs.register_helper("if_and", Box::new(Either::And));
        hbs.register_helper(
            "template_version",
            Box::new(TemplateVersion(template_version.to_string())),
        );
        hbs
    }
}

/// What a template sees: every answer plus the run variables.
pub fn render_data(context: &RenderContext) -> Value {
    let mut data = Map::new();
    for (name, value) in context.answers.iter() {
        data.insert(name.to_string(), to_json(value));
    }
    data.insert("destDirName".into(), Value::String(context.dest_dir_name.clone()));
    data.insert("inPlace".into(), Value::Bool(context.in_place));
    data.insert("isNotTest".into(), Value::Bool(context.is_not_test()));
    data.insert("year".into(), Value::from(chrono::Local::now().year()));
    Value::Object(data)
}

fn to_json(value: &AnswerValue) -> Value {
    match value {
        AnswerValue::Bool(b) => Value::Bool(*b),
        AnswerValue::Text(s) => Value::String(s.clone()),
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip_all, fields(files = files.len(), version = %context.template_version))]
    fn render(
        &self,
        files: &[&TemplateFile],
        context: &RenderContext,
        output_root: &Path,
    ) -> TrellisResult<ProjectStructure> {
        let hbs = Self::registry(&context.template_version);
        let data = render_data(context);

        let mut structure = ProjectStructure::new(output_root);
        for file in files {
            trace!(path = %file.path, "rendering");
            let content = hbs.render_template(&file.content, &data).map_err(|e| {
                ApplicationError::RenderingFailed {
                    path: file.path.to_slash(),
                    reason: e.to_string(),
                }
            })?;
            structure.add_file(file.path.as_path(), content, file.permissions);
        }
        Ok(structure)
    }
}

#[derive(Clone, Copy)]
enum Either {
    Or,
    And,
}

impl HelperDef for Either {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut HbsContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let left = truthy(h, 0)?;
        let right = truthy(h, 1)?;
        let holds = match self {
            Self::Or => left || right,
            Self::And => left && right,
        };
        let branch = if holds { h.template() } else { h.inverse() };
        match branch {
            Some(template) => template.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

fn truthy(h: &Helper<'_>, index: usize) -> Result<bool, RenderError> {
    let param = h
        .param(index)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("if_or/if_and", index))?;
    Ok(param.value().is_truthy(false))
}

struct TemplateVersion(String);

impl HelperDef for TemplateVersion {
    fn call<'reg: 'rc, 'rc>(
        &self,
        _: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut HbsContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        out.write(&self.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{
        domain::{AnswerStore, RelativePath},
        error::TrellisError,
    };

    fn render_one(source: &str, answers: AnswerStore) -> TrellisResult<String> {
        let file = TemplateFile::new(RelativePath::try_new("t.txt").unwrap(), source);
        let context = RenderContext::new(answers, "my-app").template_version("1.4.0");
        let structure = HandlebarsRenderer::new().render(&[&file], &context, Path::new("/out"))?;
        Ok(structure.files().next().unwrap().content.clone())
    }

    #[test]
    fn if_or_renders_either_branch() {
        let t = "{{#if_or a b}}yes{{else}}no{{/if_or}}";
        assert_eq!(render_one(t, AnswerStore::new().with("b", true)).unwrap(), "yes");
        assert_eq!(render_one(t, AnswerStore::new().with("a", false)).unwrap(), "no");
    }

    #[test]
    fn if_and_needs_both() {
        let t = "{{#if_and a b}}yes{{else}}no{{/if_and}}";
        let both = AnswerStore::new().with("a", true).with("b", "x");
        assert_eq!(render_one(t, both).unwrap(), "yes");
        assert_eq!(render_one(t, AnswerStore::new().with("a", true)).unwrap(), "no");
    }

    #[test]
    fn if_or_without_else_renders_nothing() {
        let t = "[{{#if_or a b}}x{{/if_or}}]";
        assert_eq!(render_one(t, AnswerStore::new()).unwrap(), "[]");
    }

    #[test]
    fn template_version_comes_from_the_context() {
        assert_eq!(
            render_one("v{{template_version}}", AnswerStore::new()).unwrap(),
            "v1.4.0"
        );
    }

    #[test]
    fn run_variables_are_exposed() {
        let out = render_one(
            "{{destDirName}} {{inPlace}} {{isNotTest}}",
            AnswerStore::new().with("isNotTest", true),
        )
        .unwrap();
        assert_eq!(out, "my-app false true");
    }

    #[test]
    fn output_is_not_html_escaped() {
        let answers = AnswerStore::new().with("author", "Ann <ann@example.com>");
        assert_eq!(render_one("{{author}}", answers).unwrap(), "Ann <ann@example.com>");
    }

    #[test]
    fn missing_values_render_empty() {
        assert_eq!(render_one("[{{nope}}]", AnswerStore::new()).unwrap(), "[]");
    }

    #[test]
    fn syntax_error_names_the_file() {
        let err = render_one("{{#if_or a b}}open", AnswerStore::new()).unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::RenderingFailed { path, .. }) if path == "t.txt"
        ));
    }

    #[test]
    fn builtin_eq_helper_is_available() {
        let t = r#"{{#if (eq runner "jest")}}jest{{else}}other{{/if}}"#;
        assert_eq!(render_one(t, AnswerStore::new().with("runner", "jest")).unwrap(), "jest");
        assert_eq!(render_one(t, AnswerStore::new()).unwrap(), "other");
    }

    #[test]
    fn block_helpers_take_nested_subexpressions() {
        let t = r#"{{#if_and unit (or (eq runner "jest") (eq runner "karma"))}}run{{else}}skip{{/if_and}}"#;
        let karma = AnswerStore::new().with("unit", true).with("runner", "karma");
        let none = AnswerStore::new().with("unit", true).with("runner", "noTest");
        assert_eq!(render_one(t, karma).unwrap(), "run");
        assert_eq!(render_one(t, none).unwrap(), "skip");
    }
}
