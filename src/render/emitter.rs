//! Placeholder-aware YAML emitter.
//!
//! Documents are first turned into a `serde_yaml::Value` tree and then
//! written out block style, two-space indent, with sequences under mapping
//! keys left unindented. Strings holding a `{{` placeholder are always
//! quoted so Ludus sees the Jinja expression verbatim: single-quoted when
//! they fit on one line, double-quoted with escapes otherwise. Every other
//! string takes the scalar style serde_yaml picks for it.

use serde_yaml::{Mapping, Value};

const INDENT: usize = 2;

/// Errors that can occur while rendering a range document
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot emit {0}")]
    Unsupported(&'static str),
}

/// Returns true if the value carries a deferred-substitution placeholder
pub fn is_placeholder(value: &str) -> bool {
    value.contains("{{")
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Render a string scalar
pub fn emit_string(value: &str) -> Result<String, RenderError> {
    // Single quotes fold line breaks, and serde_yaml would pick a literal
    // block, which does not nest here
    if value.chars().any(char::is_control) {
        return Ok(serde_json::to_string(value)?);
    }
    if is_placeholder(value) {
        return Ok(single_quoted(value));
    }
    let rendered = serde_yaml::to_string(value)?;
    Ok(rendered.trim_end_matches('\n').to_string())
}

/// Render a value that fits on one line
fn inline(value: &Value) -> Result<String, RenderError> {
    match value {
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => emit_string(s),
        Value::Sequence(seq) if seq.is_empty() => Ok("[]".to_string()),
        Value::Mapping(map) if map.is_empty() => Ok("{}".to_string()),
        Value::Sequence(_) | Value::Mapping(_) => Err(RenderError::Unsupported("nested collection inline")),
        Value::Tagged(_) => Err(RenderError::Unsupported("tagged values")),
    }
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}

/// `continued` means the caller already wrote the `- ` of a sequence item
fn write_mapping(out: &mut String, map: &Mapping, indent: usize, continued: bool) -> Result<(), RenderError> {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 || !continued {
            pad(out, indent);
        }
        match key {
            Value::String(s) => out.push_str(&emit_string(s)?),
            Value::Sequence(_) | Value::Mapping(_) => return Err(RenderError::Unsupported("complex mapping keys")),
            other => out.push_str(&inline(other)?),
        }
        out.push(':');
        match value {
            Value::Mapping(inner) if !inner.is_empty() => {
                out.push('\n');
                write_mapping(out, inner, indent + INDENT, false)?;
            }
            Value::Sequence(items) if !items.is_empty() => {
                out.push('\n');
                write_sequence(out, items, indent, false)?;
            }
            other => {
                out.push(' ');
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

fn write_sequence(out: &mut String, items: &[Value], indent: usize, continued: bool) -> Result<(), RenderError> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 || !continued {
            pad(out, indent);
        }
        out.push_str("- ");
        match item {
            Value::Mapping(inner) if !inner.is_empty() => write_mapping(out, inner, indent + INDENT, true)?,
            Value::Sequence(inner) if !inner.is_empty() => write_sequence(out, inner, indent + INDENT, true)?,
            other => {
                out.push_str(&inline(other)?);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// Write a value tree as a YAML document
pub fn to_yaml_string(value: &Value) -> Result<String, RenderError> {
    let mut out = String::new();
    match value {
        Value::Mapping(map) if !map.is_empty() => write_mapping(&mut out, map, 0, false)?,
        Value::Sequence(items) if !items.is_empty() => write_sequence(&mut out, items, 0, false)?,
        other => {
            out.push_str(&inline(other)?);
            out.push('\n');
        }
    }
    Ok(out)
}
