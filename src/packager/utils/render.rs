//! Template rendering for launchers and descriptors.
//!
//! Templates are embedded string constants rendered with Handlebars against
//! a JSON data context built from the current build state. Escaping is
//! disabled: the outputs are scripts and descriptor sources, not HTML.

use crate::packager::context::BuildContext;
use crate::packager::error::{Error, ErrorExt, Result};
use handlebars::Handlebars;
use serde_json::{Value, json};
use std::path::Path;

/// Renders a template to a string.
pub fn render(name: &str, template: &str, data: &Value) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string(name, template)
        .map_err(Error::Template)?;
    handlebars.render(name, data).map_err(Error::Render)
}

/// Renders a template into a file, creating parent directories as needed.
pub async fn render_to_file(name: &str, template: &str, data: &Value, dest: &Path) -> Result<()> {
    let content = render(name, template, data)?;
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    tokio::fs::write(dest, content)
        .await
        .fs_context("writing rendered template", dest)?;
    log::info!("Rendered {} in {}", name, dest.display());
    Ok(())
}

/// Base data context shared by all templates: application identity plus the
/// launcher-relevant task fields.
pub fn base_context(ctx: &BuildContext) -> Value {
    let task = &ctx.task;
    let jar_name = ctx
        .jar_file()
        .ok()
        .and_then(|j| j.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let icon_name = ctx
        .icon_file()
        .ok()
        .and_then(|i| i.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    json!({
        "name": task.name,
        "display_name": task.display_name,
        "version": task.version,
        "description": task.description,
        "url": task.url,
        "organization_name": task.organization_name,
        "organization_url": task.organization_url,
        "organization_email": task.organization_email,
        "main_class": task.main_class,
        "classpath": task.classpath,
        "env_path": task.env_path,
        "vm_args": task.vm_args,
        "jar_name": jar_name,
        "icon_name": icon_name,
        "jre_directory_name": task.jre_directory_name,
        "bundle_jre": task.bundle_jre,
        "administrator_required": task.administrator_required,
        "use_resources_as_working_dir": task.use_resources_as_working_dir,
    })
}

/// Merges extra fields into a JSON object context.
pub fn extend(mut base: Value, extra: Value) -> Value {
    if let (Some(map), Value::Object(additions)) = (base.as_object_mut(), extra) {
        for (key, value) in additions {
            map.insert(key, value);
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_loops_and_conditionals() {
        let out = render(
            "t",
            "{{#if flag}}on{{/if}}{{#each items}} {{this}}{{/each}}",
            &json!({"flag": true, "items": ["a", "b"]}),
        )
        .unwrap();
        assert_eq!(out, "on a b");
    }

    #[test]
    fn does_not_escape_script_content() {
        let out = render("t", "{{cmd}}", &json!({"cmd": "a > b && c"})).unwrap();
        assert_eq!(out, "a > b && c");
    }

    #[test]
    fn extend_overlays_extra_fields() {
        let merged = extend(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }
}
