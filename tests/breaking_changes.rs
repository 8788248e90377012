//! Breaking-change scenarios over in-memory modules.
//!
//! Each scenario starts from the same set of blocks, swaps or removes one
//! of them, and checks what the classifier reports. Ordering is only
//! asserted when a scenario yields a single change.

use pretty_assertions::assert_eq;
use test_case::test_case;
use tfbreak::parser::{ModuleLoader, SourceFile};
use tfbreak::{
    breaking_changes, Attribute, Change, ChangeCategory, ChangeType, Config, Detector, Module,
};

const BASIC_OPTIONAL_VARIABLE: &str = r#"
variable "address_space" {
  type        = list(string)
  description = "The address space that is used by the virtual network."
  default     = ["10.0.0.0/16"]
}
"#;

const BASIC_REQUIRED_VARIABLE: &str = r#"
variable "vnet_name" {
  description = "Name of the vnet to create"
  type        = string
  nullable    = false
}
"#;

const UNTYPED_VARIABLE: &str = r#"
variable "subnet_service_endpoints" {
  description = "A map of subnet name to service endpoints to add to the subnet."
  default     = {}
}
"#;

const VARIABLE_WITH_VALIDATION: &str = r#"
variable "identity_type" {
  type        = string
  description = "this is a description."
  default     = "SystemAssigned"

  validation {
    condition     = var.identity_type == "SystemAssigned" || var.identity_type == "UserAssigned" || var.identity_type == "SystemAssigned, UserAssigned"
    error_message = "this is an error message."
  }
}"#;

const BASIC_OUTPUT: &str = r#"
output "vnet_subnets_name_id" {
  description = "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)"
  value       = local.azurerm_subnets
}
"#;

const BASIC_RESOURCE: &str = r#"
resource "azurerm_virtual_network" "vnet" {
  address_space       = var.address_space
  location            = var.vnet_location
  name                = var.vnet_name
  resource_group_name = var.resource_group_name
  dns_servers         = var.dns_servers
  tags                = var.tags
}
"#;

const BASIC_SENSITIVE_VARIABLE: &str = r#"
variable "db_username" {
  description = "Database administrator username"
  type        = string
  sensitive   = true
}"#;

const JSON_CODE: &str = r#"
{
    "output": {
        "vnet_subnets_name_id": [
            {
                "description": "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)",
                "value": "${local.azurerm_subnets}"
            }
        ]
    },
    "variable": {
        "vnet_name": [
            {
                "description": "Name of the vnet to create",
                "nullable": false,
                "type": "string"
            }
        ]
    }
}
"#;

const BASIC_BLOCKS: [&str; 7] = [
    BASIC_REQUIRED_VARIABLE,
    BASIC_OPTIONAL_VARIABLE,
    BASIC_SENSITIVE_VARIABLE,
    VARIABLE_WITH_VALIDATION,
    UNTYPED_VARIABLE,
    BASIC_OUTPUT,
    BASIC_RESOURCE,
];

fn template() -> String {
    join(&BASIC_BLOCKS)
}

fn join(blocks: &[&str]) -> String {
    let mut code = blocks.join("\n");
    code.push('\n');
    code
}

/// The basic blocks with `old` swapped for `new`.
fn replace_block(old: &str, new: &str) -> String {
    let mut blocks: Vec<&str> = BASIC_BLOCKS.iter().copied().filter(|b| *b != old).collect();
    blocks.push(new);
    join(&blocks)
}

/// The basic blocks without `removed`.
fn remove_blocks(removed: &[&str]) -> String {
    let blocks: Vec<&str> = BASIC_BLOCKS
        .iter()
        .copied()
        .filter(|b| !removed.contains(b))
        .collect();
    join(&blocks)
}

fn with_extra_block(extra: &str) -> String {
    let mut blocks = BASIC_BLOCKS.to_vec();
    blocks.push(extra);
    join(&blocks)
}

fn load(file_name: &str, code: &str) -> Module {
    ModuleLoader::new(&Config::default())
        .load_sources(&[SourceFile::new(file_name, code)])
        .unwrap()
}

fn changes_between(old_code: &str, new_code: &str) -> Vec<Change> {
    breaking_changes(&load("main.tf", old_code), &load("main.tf", new_code))
}

fn has_change(
    changes: &[Change],
    name: &str,
    change_type: ChangeType,
    attribute: Attribute,
) -> bool {
    changes.iter().any(|c| {
        c.name.as_deref() == Some(name) && c.change_type == change_type && c.attribute == Some(attribute)
    })
}

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_module_has_no_changes() {
        let module = load("main.tf", &template());
        assert!(breaking_changes(&module, &module).is_empty());
        assert!(tfbreak::diff::diff(&module, &module).is_empty());
    }

    #[test]
    fn test_reordered_blocks_have_no_changes() {
        let reordered = join(&[
            UNTYPED_VARIABLE,
            BASIC_OPTIONAL_VARIABLE,
            BASIC_REQUIRED_VARIABLE,
            VARIABLE_WITH_VALIDATION,
            BASIC_OUTPUT,
            BASIC_RESOURCE,
            BASIC_SENSITIVE_VARIABLE,
        ]);
        assert!(changes_between(&template(), &reordered).is_empty());
    }

    #[test]
    fn test_blocks_split_across_files_have_no_changes() {
        let old = load("main.tf", &template());
        let sources: Vec<SourceFile> = BASIC_BLOCKS
            .iter()
            .enumerate()
            .map(|(i, block)| SourceFile::new(format!("file{i}.tf"), *block))
            .collect();
        let new = ModuleLoader::new(&Config::default())
            .load_sources(&sources)
            .unwrap();
        assert!(breaking_changes(&old, &new).is_empty());
    }

    #[test]
    fn test_classification_is_deterministic() {
        let new_code = remove_blocks(&[BASIC_REQUIRED_VARIABLE, BASIC_OUTPUT]);
        assert_eq!(
            changes_between(&template(), &new_code),
            changes_between(&template(), &new_code)
        );
    }
}

mod variable_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_new_required_variable_is_breaking() {
        let new_variable = r#"
variable "vnet_location" {
  description = "The location of the vnet to create."
  type        = string
  nullable    = false
}
"#;
        let changes = changes_between(&template(), &with_extra_block(new_variable));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Create);
        assert_eq!(changes[0].category, ChangeCategory::Variables);
        assert_eq!(changes[0].name.as_deref(), Some("vnet_location"));
        assert_eq!(changes[0].attribute, Some(Attribute::Name));
    }

    #[test_case(r#"
variable "vnet_location" {
  description = "The location of the vnet to create."
  type        = string
  nullable    = false
  default	  = "eastus"
}
"# ; "with nullable argument")]
    #[test_case(r#"
variable "vnet_location2" {
  description = "The location of the vnet to create."
  type        = string
  default	  = "eastus"
}
"# ; "without nullable argument")]
    fn test_new_optional_variable_is_not_breaking(code: &str) {
        assert!(changes_between(&template(), &with_extra_block(code)).is_empty());
    }

    #[test]
    fn test_removed_variables_are_breaking() {
        let new_code = remove_blocks(&[BASIC_OPTIONAL_VARIABLE, BASIC_REQUIRED_VARIABLE]);
        let changes = changes_between(&template(), &new_code);

        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.is(ChangeType::Delete, Attribute::Name)));
        assert!(has_change(&changes, "vnet_name", ChangeType::Delete, Attribute::Name));
        assert!(has_change(&changes, "address_space", ChangeType::Delete, Attribute::Name));
    }

    #[test]
    fn test_renamed_required_variable_is_delete_and_create() {
        let renamed = r#"variable "renamed_name" {
  description = "Name of the vnet to create"
  type        = string
}"#;
        let changes = changes_between(&template(), &replace_block(BASIC_REQUIRED_VARIABLE, renamed));

        assert_eq!(changes.len(), 2);
        assert!(has_change(&changes, "vnet_name", ChangeType::Delete, Attribute::Name));
        assert!(has_change(&changes, "renamed_name", ChangeType::Create, Attribute::Name));
    }

    #[test]
    fn test_renamed_optional_variable_is_delete_only() {
        let renamed = r#"
variable "renamed_variable" {
  type        = list(string)
  description = "The address space that is used by the virtual network."
  default     = ["10.0.0.0/16"]
}"#;
        let changes = changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, renamed));

        assert_eq!(changes.len(), 1);
        assert!(has_change(&changes, "address_space", ChangeType::Delete, Attribute::Name));
    }

    #[test_case(r#"
variable "address_space" {
  type        = list(string)
  description = "The address space that is used by the virtual network."
}"# ; "default removed")]
    #[test_case(r#"
variable "address_space" {
  type        = list(string)
  description = "The address space that is used by the virtual network."
  default     = ["192.168.0.0/16"]
}"# ; "default changed")]
    fn test_default_change_is_breaking(changed: &str) {
        let changes = changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, changed));

        assert_eq!(changes.len(), 1);
        assert!(has_change(&changes, "address_space", ChangeType::Update, Attribute::Default));
    }

    #[test]
    fn test_added_default_is_not_breaking() {
        let changed = r#"
variable "vnet_name" {
  description = "Name of the vnet to create"
  type        = string
  nullable    = false
  default     = "vnet"
}
"#;
        assert!(changes_between(&template(), &replace_block(BASIC_REQUIRED_VARIABLE, changed)).is_empty());
    }

    #[test_case(true ; "sensitive true")]
    #[test_case(false ; "sensitive false")]
    fn test_added_variable_sensitivity_is_not_breaking(sensitive: bool) {
        let changed = format!(
            r#"
variable "address_space" {{
  type        = list(string)
  description = "The address space that is used by the virtual network."
  default     = ["10.0.0.0/16"]
  sensitive   = {sensitive}
}}
"#
        );
        assert!(changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, &changed)).is_empty());
    }

    #[test_case(r#"
variable "db_username" {
  description = "Database administrator username"
  type        = string
  sensitive   = false
}"# ; "flipped to false")]
    #[test_case(r#"
variable "db_username" {
  description = "Database administrator username"
  type        = string
}"# ; "attribute removed")]
    fn test_relaxed_variable_sensitivity_follows_policy(changed: &str) {
        let old = load("main.tf", &template());
        let new = load("main.tf", &replace_block(BASIC_SENSITIVE_VARIABLE, changed));

        assert!(breaking_changes(&old, &new).is_empty());

        let mut config = Config::default();
        config.policy.variable_sensitivity_breaking = true;
        let comparison = Detector::new(config).compare_modules(&old, &new);

        assert_eq!(comparison.breaking.len(), 1);
        assert!(has_change(&comparison.breaking, "db_username", ChangeType::Update, Attribute::Sensitive));
    }

    #[test]
    fn test_nullable_change_is_breaking() {
        let changed = r#"
variable "vnet_name" {
  description = "Name of the vnet to create"
  type        = string
  nullable    = true
}"#;
        let changes = changes_between(&template(), &replace_block(BASIC_REQUIRED_VARIABLE, changed));

        assert_eq!(changes.len(), 1);
        assert!(has_change(&changes, "vnet_name", ChangeType::Update, Attribute::Nullable));
    }

    #[test]
    fn test_added_type_is_breaking() {
        let changed = r#"
variable "subnet_service_endpoints" {
  description = "A map of subnet name to service endpoints to add to the subnet."
  type        = map(string)
  default     = {}
}
"#;
        let changes = changes_between(&template(), &replace_block(UNTYPED_VARIABLE, changed));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name.as_deref(), Some("subnet_service_endpoints"));
        assert_eq!(changes[0].change_type, ChangeType::Update);
        assert_eq!(changes[0].attribute, Some(Attribute::Type));
        assert_eq!(changes[0].from, None);
        assert_eq!(changes[0].to.as_deref(), Some("map(string)"));
    }

    #[test]
    fn test_removed_type_is_not_breaking() {
        let changed = r#"
variable "address_space" {
  description = "The address space that is used by the virtual network."
  default     = ["10.0.0.0/16"]
}
"#;
        assert!(changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, changed)).is_empty());
    }

    #[test]
    fn test_changed_type_is_breaking() {
        let changed = r#"
variable "address_space" {
  type        = set(string)
  description = "The address space that is used by the virtual network."
  default     = ["10.0.0.0/16"]
}"#;
        let changes = changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, changed));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path(), vec!["Variables", "address_space", "Type"]);
        assert_eq!(changes[0].from.as_deref(), Some("list(string)"));
        assert_eq!(changes[0].to.as_deref(), Some("set(string)"));
    }

    #[test_case(r#"
variable "address_space" {
  type        = list(string)
  default     = ["10.0.0.0/16"]
}"# ; "description removed")]
    #[test_case(r#"
variable "address_space" {
  type        = list(string)
  description = "Changed description"
  default     = ["10.0.0.0/16"]
}"# ; "description changed")]
    fn test_description_change_is_not_breaking(changed: &str) {
        assert!(changes_between(&template(), &replace_block(BASIC_OPTIONAL_VARIABLE, changed)).is_empty());
    }
}

mod output_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_new_output_is_not_breaking() {
        let new_output = r#"
output "vnet_id" {
  description = "The id of the newly created vNet"
  value       = azurerm_virtual_network.vnet.id
}"#;
        assert!(changes_between(&template(), &with_extra_block(new_output)).is_empty());
    }

    #[test]
    fn test_removed_output_is_breaking() {
        let changes = changes_between(&template(), &remove_blocks(&[BASIC_OUTPUT]));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Delete);
        assert_eq!(changes[0].category, ChangeCategory::Outputs);
        assert_eq!(changes[0].name.as_deref(), Some("vnet_subnets_name_id"));
        assert_eq!(changes[0].attribute, Some(Attribute::Name));
    }

    #[test]
    fn test_renamed_output_is_breaking() {
        let renamed = r#"
output "renamed_output" {
  description = "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)"
  value       = local.azurerm_subnets
}
"#;
        let changes = changes_between(&template(), &replace_block(BASIC_OUTPUT, renamed));

        assert_eq!(changes.len(), 1);
        assert!(has_change(&changes, "vnet_subnets_name_id", ChangeType::Delete, Attribute::Name));
    }

    #[test_case(r#"
output "vnet_subnets_name_id" {
  description = "changed description"
  value       = local.azurerm_subnets
}
"# ; "description changed")]
    #[test_case(r#"
output "vnet_subnets_name_id" {
  value       = local.azurerm_subnets
}
"# ; "description removed")]
    fn test_output_description_is_not_breaking(changed: &str) {
        assert!(changes_between(&template(), &replace_block(BASIC_OUTPUT, changed)).is_empty());
    }

    #[test]
    fn test_changed_value_is_breaking() {
        let changed = r#"
output "vnet_subnets_name_id" {
  description = "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)"
  value       = azurerm_subnet.main.id
}
"#;
        let changes = changes_between(&template(), &replace_block(BASIC_OUTPUT, changed));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Update);
        assert_eq!(changes[0].name.as_deref(), Some("vnet_subnets_name_id"));
        assert_eq!(changes[0].attribute, Some(Attribute::Value));
    }

    #[test]
    fn test_added_sensitive_true_is_breaking() {
        let changed = r#"
output "vnet_subnets_name_id" {
  description = "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)"
  value       = local.azurerm_subnets
  sensitive   = true
}
"#;
        let changes = changes_between(&template(), &replace_block(BASIC_OUTPUT, changed));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Update);
        assert_eq!(changes[0].category, ChangeCategory::Outputs);
        assert_eq!(changes[0].attribute, Some(Attribute::Sensitive));
    }

    #[test]
    fn test_added_sensitive_false_is_not_breaking() {
        let changed = r#"
output "vnet_subnets_name_id" {
  description = "Can be queried subnet-id by subnet name by using lookup(module.vnet.vnet_subnets_name_id, subnet1)"
  value       = local.azurerm_subnets
  sensitive   = false
}
"#;
        assert!(changes_between(&template(), &replace_block(BASIC_OUTPUT, changed)).is_empty());
    }

    fn sensitive_output(sensitive: Option<bool>) -> String {
        let sensitive_line = sensitive
            .map(|v| format!("  sensitive   = {v}\n"))
            .unwrap_or_default();
        format!(
            "\noutput \"kube_admin_config_raw\" {{\n  description = \"A sensitive output\"\n{sensitive_line}  value       = azurerm_kubernetes_cluster.main.kube_admin_config_raw\n}}\n"
        )
    }

    #[test]
    fn test_sensitive_true_to_false_is_not_breaking() {
        let old = with_extra_block(&sensitive_output(Some(true)));
        let new = with_extra_block(&sensitive_output(Some(false)));
        assert!(changes_between(&old, &new).is_empty());
    }

    #[test]
    fn test_sensitive_false_to_true_is_breaking() {
        let old = with_extra_block(&sensitive_output(Some(false)));
        let new = with_extra_block(&sensitive_output(Some(true)));
        let changes = changes_between(&old, &new);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name.as_deref(), Some("kube_admin_config_raw"));
        assert_eq!(changes[0].change_type, ChangeType::Update);
        assert_eq!(changes[0].attribute, Some(Attribute::Sensitive));
    }

    #[test_case(true ; "was true")]
    #[test_case(false ; "was false")]
    fn test_removed_sensitive_is_not_breaking(previous: bool) {
        let old = with_extra_block(&sensitive_output(Some(previous)));
        let new = with_extra_block(&sensitive_output(None));
        assert!(changes_between(&old, &new).is_empty());
    }
}

mod json_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_type_and_value_changes() {
        let new_json = JSON_CODE
            .replace("string", "number")
            .replace("local.azurerm_subnets", "local.azurerm_subnet_names");

        let old = load("main.tf.json", JSON_CODE);
        let new = load("main.tf.json", &new_json);
        let changes = breaking_changes(&old, &new);

        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| c.change_type == ChangeType::Update
            && c.category == ChangeCategory::Variables
            && c.attribute == Some(Attribute::Type)));
        assert!(changes.iter().any(|c| c.change_type == ChangeType::Update
            && c.category == ChangeCategory::Outputs
            && c.attribute == Some(Attribute::Value)));
    }

    #[test]
    fn test_json_and_native_modules_load_the_same_names() {
        let json = load("main.tf.json", JSON_CODE);
        assert!(json.variables["vnet_name"].is_required());
        assert_eq!(json.variables["vnet_name"].nullable.as_deref(), Some("false"));
        assert!(json.outputs.contains_key("vnet_subnets_name_id"));
    }
}
