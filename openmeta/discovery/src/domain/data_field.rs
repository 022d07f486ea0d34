// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataItemSortOrder {
    #[default]
    Unknown,
    Ascending,
    Descending,
    Unsorted,
}

/// A field discovered in the asset's data, e.g. a column or a JSON member.
/// Fields nest: a structured field has child fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    /// Assigned by the report store when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default)]
    pub data_field_position: i32,
    pub data_field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_field_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_field_aliases: Vec<String>,
    #[serde(default)]
    pub data_field_sort_order: DataItemSortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

impl DataField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            guid: None,
            data_field_position: 0,
            data_field_name: name.into(),
            data_field_type: None,
            data_field_description: None,
            data_field_aliases: Vec::new(),
            data_field_sort_order: DataItemSortOrder::Unknown,
            default_value: None,
            additional_properties: BTreeMap::new(),
        }
    }

    pub fn with_type(mut self, data_field_type: impl Into<String>) -> Self {
        self.data_field_type = Some(data_field_type.into());
        self
    }

    pub fn at_position(mut self, position: i32) -> Self {
        self.data_field_position = position;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_field_parses() {
        let field: DataField = serde_json::from_str(r#"{"dataFieldName":"customer_id"}"#).unwrap();
        assert_eq!(field, DataField::new("customer_id"));
    }
}
