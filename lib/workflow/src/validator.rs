//! Workflow validation.
//!
//! Validation runs an explicit ordered list of independent checks over the
//! submitted component list and collects every finding into a
//! [`ViolationSet`]. A submission is never rejected on the first problem;
//! callers always receive the full picture in one pass.
//!
//! The checks are pure functions with no I/O, so validation is safe to run
//! concurrently and yields identical results for identical input.

use crate::component::{Component, ComponentType, SettingValue, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A component as submitted by a caller, before validation.
///
/// The type is still a raw string and settings values are raw JSON; the
/// validator turns these into [`Component`] values or reports why it cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRequest {
    /// The claimed component type.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Raw settings mapping, if one was submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<BTreeMap<String, serde_json::Value>>,
}

/// Validation findings, keyed by dotted field path.
///
/// Per-component findings use paths like `components.2.type`; findings about
/// the list as a whole use the bare `components` path. Each path holds its
/// messages in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ViolationSet {
    violations: BTreeMap<String, Vec<String>>,
}

impl ViolationSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding against a field path.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Absorbs all findings from another set.
    pub fn merge(&mut self, other: Self) {
        for (path, messages) in other.violations {
            self.violations.entry(path).or_default().extend(messages);
        }
    }

    /// Returns whether no findings were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the total number of messages across all paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }

    /// Returns the messages recorded for a path, if any.
    #[must_use]
    pub fn messages(&self, path: &str) -> &[String] {
        match self.violations.get(path) {
            Some(messages) => messages,
            None => &[],
        }
    }

    /// Iterates over `(path, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.violations
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }
}

type ComponentCheck = fn(&[ComponentRequest]) -> ViolationSet;

/// The component-list checks, in the order they run. Each is independent
/// and contributes zero or more findings; none can stop the others.
const COMPONENT_CHECKS: &[ComponentCheck] = &[
    check_component_types,
    check_setting_values,
    check_duplicate_types,
    check_boundary_positions,
    check_settings_presence,
];

/// Validates a submitted workflow.
///
/// On success, returns the parsed components in their submitted order,
/// ready to be wrapped into a [`Workflow`](crate::Workflow). On failure,
/// returns every finding from every check.
///
/// # Errors
///
/// Returns the accumulated [`ViolationSet`] when any check finds a problem.
pub fn validate_workflow(
    name: &str,
    components: &[ComponentRequest],
) -> Result<Vec<Component>, ViolationSet> {
    let mut violations = check_name(name);
    for check in COMPONENT_CHECKS {
        violations.merge(check(components));
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    // Every parse below succeeded during the checks above.
    Ok(components.iter().filter_map(parse_component).collect())
}

fn parse_component(request: &ComponentRequest) -> Option<Component> {
    let component_type = request.component_type.parse().ok()?;
    let settings = match &request.settings {
        None => None,
        Some(raw) => {
            let mut parsed = Settings::new();
            for (key, value) in raw {
                parsed.insert(key.clone(), SettingValue::from_json(value)?);
            }
            Some(parsed)
        }
    };

    Some(Component {
        component_type,
        settings,
    })
}

fn check_name(name: &str) -> ViolationSet {
    let mut violations = ViolationSet::new();
    if name.is_empty() {
        violations.push("name", "must not be empty");
    }
    violations
}

fn check_component_types(components: &[ComponentRequest]) -> ViolationSet {
    let mut violations = ViolationSet::new();
    for (index, component) in components.iter().enumerate() {
        if component.component_type.parse::<ComponentType>().is_err() {
            let allowed = ComponentType::ALL.map(|ty| ty.as_str()).join(", ");
            violations.push(
                format!("components.{index}.type"),
                format!("must be one of: {allowed}"),
            );
        }
    }
    violations
}

fn check_setting_values(components: &[ComponentRequest]) -> ViolationSet {
    let mut violations = ViolationSet::new();
    for (index, component) in components.iter().enumerate() {
        let Some(settings) = &component.settings else {
            continue;
        };
        for (key, value) in settings {
            if SettingValue::from_json(value).is_none() {
                // The value matched none of the scalar kinds, so report
                // all four rather than guessing which one was intended.
                let path = format!("components.{index}.settings.{key}");
                for kind in ["integer", "float", "string", "boolean"] {
                    violations.push(path.clone(), format!("value is not a valid {kind}"));
                }
            }
        }
    }
    violations
}

fn check_duplicate_types(components: &[ComponentRequest]) -> ViolationSet {
    let mut violations = ViolationSet::new();
    let mut seen: Vec<ComponentType> = Vec::new();
    let mut duplicated: Vec<ComponentType> = Vec::new();

    for component in components {
        let Ok(ty) = component.component_type.parse::<ComponentType>() else {
            continue;
        };
        if seen.contains(&ty) {
            if !duplicated.contains(&ty) {
                duplicated.push(ty);
            }
        } else {
            seen.push(ty);
        }
    }

    if !duplicated.is_empty() {
        let names = duplicated
            .iter()
            .map(ComponentType::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        violations.push("components", format!("duplicated component types: {names}"));
    }
    violations
}

fn check_boundary_positions(components: &[ComponentRequest]) -> ViolationSet {
    let mut violations = ViolationSet::new();

    let position_of = |target: ComponentType| {
        components
            .iter()
            .position(|c| c.component_type.parse::<ComponentType>().ok() == Some(target))
    };
    let import_index = position_of(ComponentType::Import);
    let export_index = position_of(ComponentType::Export);

    if import_index.is_none() && export_index.is_none() {
        return violations;
    }

    let last = components.len() - 1;
    let import_misplaced = import_index.is_some_and(|index| index != 0);
    let export_misplaced = export_index.is_some_and(|index| index != last);

    // Exactly one message for this check: the combined form takes
    // precedence when both boundaries are misplaced.
    if export_misplaced && import_misplaced {
        violations.push("components", "import must be first and export must be last");
    } else if export_misplaced {
        violations.push("components", "export must be last");
    } else if import_misplaced {
        violations.push("components", "import must be first");
    }
    violations
}

fn check_settings_presence(components: &[ComponentRequest]) -> ViolationSet {
    let mut violations = ViolationSet::new();

    // An empty mapping counts as present; only omission counts as absent.
    let any_present = components.iter().any(|c| c.settings.is_some());
    let all_present = components.iter().all(|c| c.settings.is_some());

    if any_present && !all_present {
        violations.push(
            "components",
            "settings must be present on all components or absent on all components",
        );
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(ty: &str) -> ComponentRequest {
        ComponentRequest {
            component_type: ty.to_string(),
            settings: None,
        }
    }

    fn component_with_settings(ty: &str, settings: serde_json::Value) -> ComponentRequest {
        let map = match settings {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            other => panic!("settings must be a JSON object, got {other}"),
        };
        ComponentRequest {
            component_type: ty.to_string(),
            settings: Some(map),
        }
    }

    #[test]
    fn empty_component_list_is_valid() {
        let result = validate_workflow("t", &[]);
        assert_eq!(result, Ok(Vec::new()));
    }

    #[test]
    fn single_boundary_component_is_valid() {
        assert!(validate_workflow("t", &[component("import")]).is_ok());
        assert!(validate_workflow("t", &[component("export")]).is_ok());
    }

    #[test]
    fn full_pipeline_is_valid() {
        let components = [
            component("import"),
            component("shadow"),
            component("crop"),
            component("export"),
        ];
        let accepted = validate_workflow("t", &components).expect("should validate");
        let types: Vec<_> = accepted.iter().map(|c| c.component_type).collect();
        assert_eq!(
            types,
            vec![
                ComponentType::Import,
                ComponentType::Shadow,
                ComponentType::Crop,
                ComponentType::Export,
            ]
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let violations = validate_workflow("", &[]).expect_err("should reject");
        assert_eq!(violations.messages("name"), ["must not be empty"]);
    }

    #[test]
    fn unknown_type_reports_path_and_allowed_set() {
        let violations =
            validate_workflow("t", &[component("rotate")]).expect_err("should reject");
        assert_eq!(
            violations.messages("components.0.type"),
            ["must be one of: import, shadow, crop, export"]
        );
    }

    #[test]
    fn duplicate_types_are_rejected() {
        let components = [component("import"), component("import")];
        let violations = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(
            violations.messages("components"),
            ["duplicated component types: import"]
        );
    }

    #[test]
    fn duplicate_message_lists_types_in_first_duplicated_order() {
        let components = [
            component("crop"),
            component("shadow"),
            component("shadow"),
            component("crop"),
            component("shadow"),
        ];
        let violations = check_duplicate_types(&components);
        assert_eq!(
            violations.messages("components"),
            ["duplicated component types: shadow, crop"]
        );
    }

    #[test]
    fn import_not_first_is_rejected() {
        let components = [component("shadow"), component("import")];
        let violations = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(violations.messages("components"), ["import must be first"]);
    }

    #[test]
    fn export_not_last_is_rejected() {
        let components = [component("export"), component("shadow")];
        let violations = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(violations.messages("components"), ["export must be last"]);
    }

    #[test]
    fn both_boundaries_misplaced_yields_single_combined_message() {
        let components = [component("export"), component("shadow"), component("import")];
        let violations = check_boundary_positions(&components);
        assert_eq!(
            violations.messages("components"),
            ["import must be first and export must be last"]
        );
    }

    #[test]
    fn boundary_check_is_vacuous_without_boundary_components() {
        let components = [component("shadow"), component("crop")];
        assert!(check_boundary_positions(&components).is_empty());
    }

    #[test]
    fn mixed_settings_presence_is_rejected_once() {
        let components = [
            component_with_settings("crop", serde_json::json!({"k": 1})),
            component("export"),
        ];
        let violations = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(
            violations.messages("components"),
            ["settings must be present on all components or absent on all components"]
        );
    }

    #[test]
    fn uniform_settings_presence_is_accepted() {
        let all_absent = [component("shadow"), component("crop")];
        assert!(validate_workflow("t", &all_absent).is_ok());

        // An empty mapping counts as present, so this is uniform too.
        let all_present = [
            component_with_settings("shadow", serde_json::json!({})),
            component_with_settings("crop", serde_json::json!({"zoom": 2})),
        ];
        let accepted = validate_workflow("t", &all_present).expect("should validate");
        assert_eq!(accepted[0].settings, Some(Settings::new()));
    }

    #[test]
    fn invalid_setting_value_reports_all_four_kinds() {
        let components = [component_with_settings(
            "crop",
            serde_json::json!({"zoom": [1, 2]}),
        )];
        let violations = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(
            violations.messages("components.0.settings.zoom"),
            [
                "value is not a valid integer",
                "value is not a valid float",
                "value is not a valid string",
                "value is not a valid boolean",
            ]
        );
    }

    #[test]
    fn accepted_settings_are_parsed_as_scalars() {
        let components = [component_with_settings(
            "crop",
            serde_json::json!({"zoom": 2, "render": false}),
        )];
        let accepted = validate_workflow("t", &components).expect("should validate");
        let settings = accepted[0].settings.as_ref().expect("settings present");
        assert_eq!(settings["zoom"], SettingValue::Integer(2));
        assert_eq!(settings["render"], SettingValue::Bool(false));
    }

    #[test]
    fn all_checks_contribute_to_one_violation_set() {
        let components = [
            component_with_settings("export", serde_json::json!({"k": serde_json::Value::Null})),
            component("export"),
            component("rotate"),
        ];
        let violations = validate_workflow("", &components).expect_err("should reject");

        assert_eq!(violations.messages("name"), ["must not be empty"]);
        assert_eq!(violations.messages("components.1.settings.k"), &[] as &[String]);
        assert_eq!(violations.messages("components.0.settings.k").len(), 4);
        assert_eq!(
            violations.messages("components.2.type"),
            ["must be one of: import, shadow, crop, export"]
        );
        // duplicated export, export not last, mixed settings presence
        assert_eq!(
            violations.messages("components"),
            [
                "duplicated component types: export",
                "export must be last",
                "settings must be present on all components or absent on all components",
            ]
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let components = [component("export"), component("import")];
        let first = validate_workflow("t", &components).expect_err("should reject");
        let second = validate_workflow("t", &components).expect_err("should reject");
        assert_eq!(first, second);
    }

    #[test]
    fn violation_set_serializes_as_path_keyed_map() {
        let mut violations = ViolationSet::new();
        violations.push("components", "export must be last");
        violations.push("name", "must not be empty");

        let json = serde_json::to_value(&violations).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "components": ["export must be last"],
                "name": ["must not be empty"],
            })
        );
    }

    #[test]
    fn violation_set_len_counts_messages() {
        let mut violations = ViolationSet::new();
        violations.push("components", "a");
        violations.push("components", "b");
        violations.push("name", "c");
        assert_eq!(violations.len(), 3);
        assert!(!violations.is_empty());
    }
}
