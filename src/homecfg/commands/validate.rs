use crate::codec::{self, scanner};
use crate::commands::{CmdMessage, CmdResult, ValidationReport};
use crate::error::Result;
use crate::model::key_to_name;
use serde_yaml::Value;
use std::collections::HashSet;

/// Checks `raw` without saving anything. Problems are reported in the
/// returned [`ValidationReport`], never as an `Err`.
pub fn run(raw: &str) -> Result<CmdResult> {
    let report = check(raw);
    let mut result = CmdResult::default();
    if report.valid {
        result.add_message(CmdMessage::success("Document is valid"));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Document is invalid ({} error{})",
            report.errors.len(),
            if report.errors.len() == 1 { "" } else { "s" }
        )));
    }
    Ok(result.with_validation(report))
}

pub fn check(raw: &str) -> ValidationReport {
    let text = codec::normalize(raw);
    let mut report = ValidationReport::default();

    let value: Value = match serde_yaml::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            report.errors.push(format!("YAML parsing error: {}", err));
            return report;
        }
    };

    let categories: Vec<(Value, Value)> = match value {
        Value::Null => {
            report.warnings.push("Document has no categories".to_string());
            Vec::new()
        }
        Value::Sequence(items) => {
            let mut pairs = Vec::new();
            for item in items {
                match item {
                    Value::Mapping(map) => pairs.extend(map),
                    _ => report.errors.push("Each item must be a dictionary".to_string()),
                }
            }
            pairs
        }
        Value::Mapping(map) => {
            report
                .warnings
                .push("Top level is a mapping; it will be saved as a list of categories".to_string());
            map.into_iter().collect()
        }
        _ => {
            report
                .errors
                .push("Configuration must be a list of categories".to_string());
            Vec::new()
        }
    };

    let mut seen_categories = HashSet::new();
    for (key, services) in categories {
        let category = key_to_name(&key);
        if !seen_categories.insert(category.clone()) {
            report.errors.push(format!("Duplicate category '{}'", category));
        }
        check_category(&category, services, &mut report);
    }

    let scan = scanner::scan(&text);
    let visible: HashSet<(&str, &str)> = scan
        .entries
        .iter()
        .filter(|e| !e.is_hidden())
        .map(|e| (e.category.as_str(), e.name.as_str()))
        .collect();
    for hidden in scan.entries.iter().filter(|e| e.is_hidden()) {
        if visible.contains(&(hidden.category.as_str(), hidden.name.as_str())) {
            report.warnings.push(format!(
                "Hidden copy of '{}' in category '{}' is shadowed by a visible entry",
                hidden.name, hidden.category
            ));
        }
    }

    report.valid = report.errors.is_empty();
    report
}

fn check_category(category: &str, services: Value, report: &mut ValidationReport) {
    let services = match services {
        Value::Sequence(services) => services,
        Value::Null => {
            report
                .warnings
                .push(format!("Category '{}' has no entries", category));
            return;
        }
        _ => {
            report
                .errors
                .push(format!("Services in category '{}' must be a list", category));
            return;
        }
    };
    if services.is_empty() {
        report
            .warnings
            .push(format!("Category '{}' has no entries", category));
    }

    let mut seen = HashSet::new();
    for service in services {
        let map = match service {
            Value::Mapping(map) => map,
            _ => {
                report.errors.push(format!(
                    "Service in category '{}' must be a dictionary",
                    category
                ));
                continue;
            }
        };
        if map.is_empty() {
            report
                .warnings
                .push(format!("Empty service in category '{}'", category));
        }
        for (key, fields) in map {
            let name = key_to_name(&key);
            if !seen.insert(name.clone()) {
                report.errors.push(format!(
                    "Duplicate entry '{}' in category '{}'",
                    name, category
                ));
            }
            match fields {
                Value::Mapping(_) => {}
                Value::Null => report.warnings.push(format!(
                    "Entry '{}' in category '{}' has no fields",
                    name, category
                )),
                _ => report.errors.push(format!(
                    "Entry '{}' in category '{}' must be a dictionary",
                    name, category
                )),
            }
        }
    }
}
