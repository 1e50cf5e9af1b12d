//! Rendering of listings for the command line

use crate::config::OutputFormat;
use crate::manifest::{ElementKind, QueryOutput, QueryRecord};
use crate::Result;
use serde::Serialize;

/// Render query results in the requested format
pub fn render(results: &[QueryOutput], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(results)?),
        OutputFormat::Plain => Ok(results
            .iter()
            .map(|result| match result {
                QueryOutput::Value(value) => format!("{}\n", value),
                QueryOutput::Record(record) => format!("{}\n", plain_record(record)),
            })
            .collect()),
    }
}

fn plain_record(record: &QueryRecord) -> String {
    let mut line = record.element.clone();
    for (key, value) in record.attrs.iter() {
        line.push_str(&format!(" {}=\"{}\"", key, value));
    }
    if let Some(ref text) = record.text {
        line.push_str(&format!(": {}", text.trim()));
    }
    line
}

#[derive(Debug, Serialize)]
struct RegistryEntry {
    element: ElementKind,
    required: &'static [&'static str],
    repeatable: bool,
    key: Option<&'static str>,
    text_only: bool,
}

/// Render the element registry table
pub fn render_registry(format: OutputFormat) -> Result<String> {
    let entries: Vec<RegistryEntry> = ElementKind::ALL
        .into_iter()
        .map(|kind| {
            let rules = kind.rules();
            RegistryEntry {
                element: kind,
                required: rules.required,
                repeatable: rules.repeatable(),
                key: rules.key,
                text_only: rules.text_only,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&entries)?),
        OutputFormat::Plain => Ok(entries
            .iter()
            .map(|entry| {
                let mut line = format!("{:<16} required=[{}]", entry.element, entry.required.join(","));
                if let Some(key) = entry.key {
                    line.push_str(&format!(" key={}", key));
                }
                if entry.text_only {
                    line.push_str(" text-only");
                }
                line + "\n"
            })
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Attributes;

    fn results() -> Vec<QueryOutput> {
        vec![
            QueryOutput::Record(QueryRecord {
                element: "remote".to_string(),
                attrs: Attributes::from([("name", "origin"), ("fetch", "https://x")]),
                text: None,
            }),
            QueryOutput::Record(QueryRecord {
                element: "notice".to_string(),
                attrs: Attributes::new(),
                text: Some("\n  Synced.\n".to_string()),
            }),
        ]
    }

    #[test]
    fn test_render_plain() {
        let out = render(&results(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "remote name=\"origin\" fetch=\"https://x\"\nnotice: Synced.\n");

        let values = vec![QueryOutput::Value("origin".to_string())];
        assert_eq!(render(&values, OutputFormat::Plain).unwrap(), "origin\n");
        assert_eq!(render(&[], OutputFormat::Plain).unwrap(), "");
    }

    #[test]
    fn test_render_json() {
        let out = render(&results(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["attrs"]["fetch"], "https://x");
        assert_eq!(parsed[1]["text"], "\n  Synced.\n");
    }

    #[test]
    fn test_render_yaml() {
        let out = render(&results(), OutputFormat::Yaml).unwrap();
        assert!(out.contains("element: remote"));
        assert!(out.contains("name: origin"));
    }

    #[test]
    fn test_render_registry() {
        let plain = render_registry(OutputFormat::Plain).unwrap();
        assert_eq!(plain.lines().count(), ElementKind::ALL.len());
        assert!(plain.contains("remote           required=[name,fetch] key=name"));

        let json = render_registry(OutputFormat::Json).unwrap();
        assert!(json.contains("\"element\": \"repo-hooks\""));
    }
}
