//! Subcommand implementations. Each returns the text to print on stdout.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use halkit_core::{codec, HalConfig, RelationSlot, Resource};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// One row of `hal links` output.
#[derive(Debug, Serialize)]
pub struct LinkRow<'a> {
    pub rel: &'a str,
    pub name: Option<&'a str>,
    pub href: &'a str,
    pub templated: bool,
}

pub fn fmt(input: &Path, config: &HalConfig) -> Result<String> {
    let resource = load(input, config)?;
    encode(&resource, config)
}

pub fn links(input: &Path, format: OutputFormat, config: &HalConfig) -> Result<String> {
    let resource = load(input, config)?;
    let rows: Vec<LinkRow<'_>> = resource
        .links()
        .iter()
        .flat_map(|(rel, slot)| {
            slot.iter().map(move |link| LinkRow {
                rel,
                name: link.name(),
                href: link.href(),
                templated: link.is_templated(),
            })
        })
        .collect();
    tracing::debug!(count = rows.len(), "collected links");

    match format {
        OutputFormat::Json => to_json(&rows, config.pretty),
        OutputFormat::Table => Ok(format_table(&rows)),
    }
}

pub fn get(input: &Path, property: &str, config: &HalConfig) -> Result<String> {
    let resource = load(input, config)?;
    let value = resource
        .properties()
        .get(property)
        .with_context(|| format!("property '{property}' not found"))?;
    to_json(value, config.pretty)
}

pub fn merge(input: &Path, patch: &Path, config: &HalConfig) -> Result<String> {
    let mut resource = load(input, config)?;
    let text = read_input(patch)?;
    let patch: Value = serde_json::from_str(&text)
        .with_context(|| format!("patch {} is not valid JSON", patch.display()))?;
    if !patch.is_object() {
        bail!("patch must be a JSON object");
    }
    resource.add(&patch)?;
    encode(&resource, config)
}

pub fn curie(input: &Path, rel: &str, config: &HalConfig) -> Result<String> {
    let resource = load(input, config)?;
    resource
        .expand_curie(rel)
        .with_context(|| format!("no templated curie expands '{rel}'"))
}

pub fn embedded(input: &Path, rel: &str, config: &HalConfig) -> Result<String> {
    let resource = load(input, config)?;
    match resource.embedded().get(rel) {
        None => bail!("no embedded resource under '{rel}'"),
        Some(RelationSlot::Single(child)) => encode(child, config),
        Some(RelationSlot::Many(children)) => {
            let values = children
                .iter()
                .map(|child| {
                    let bytes = codec::serialize(child, config)?;
                    Ok(serde_json::from_slice::<Value>(&bytes)?)
                })
                .collect::<Result<Vec<_>>>()?;
            to_json(&values, config.pretty)
        }
    }
}

fn load(input: &Path, config: &HalConfig) -> Result<Resource> {
    let text = read_input(input)?;
    codec::from_str(&text, config).with_context(|| format!("failed to decode {}", input.display()))
}

/// Read a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    tracing::debug!(path = %path.display(), "reading input");
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn encode(resource: &Resource, config: &HalConfig) -> Result<String> {
    Ok(codec::to_string(resource, config)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn format_table(rows: &[LinkRow<'_>]) -> String {
    if rows.is_empty() {
        return "(no links)".to_string();
    }

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.rel.to_string(),
                row.name.unwrap_or("-").to_string(),
                row.href.to_string(),
                row.templated.to_string(),
            ]
        })
        .collect();

    let header = ["REL", "NAME", "HREF", "TEMPLATED"];
    let mut widths = header.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![render_row(header.iter().copied(), &widths)];
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(sep.join("-+-"));
    for row in &cells {
        lines.push(render_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:width$}"))
        .collect();
    padded.join(" | ").trim_end().to_string()
}
