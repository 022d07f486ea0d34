// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Type Definitions
//!
//! Schema-level descriptions recognised by a metadata repository. Attribute
//! types (primitive, collection, enum) describe property values; type
//! definitions (entity, relationship, classification) describe instances.
//!
//! Every definition is identified by a unique `name` and carries a `guid`
//! and a `version`. Both families are tagged unions serialised with a
//! `category` discriminator.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDefStatus {
    #[default]
    ActiveTypeDef,
    RenamedTypeDef,
    DeprecatedTypeDef,
}

/// Reference to another type definition by guid and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefLink {
    pub guid: String,
    pub name: String,
}

impl TypeDefLink {
    pub fn new(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeCardinality {
    #[default]
    AtMostOne,
    ExactlyOne,
    AnyNumberUnordered,
    AnyNumberOrdered,
    AtLeastOneUnordered,
    AtLeastOneOrdered,
}

/// A property definition within a type definition or patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefAttribute {
    pub attribute_name: String,
    /// Link to the attribute type (primitive, collection or enum)
    pub attribute_type: TypeDefLink,
    #[serde(default)]
    pub cardinality: AttributeCardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_description: Option<String>,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default = "default_true")]
    pub is_indexable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimitiveDefCategory {
    Unknown,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    String,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveDef {
    pub guid: String,
    pub name: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub primitive_def_category: PrimitiveDefCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionDefCategory {
    Map,
    Array,
    Struct,
}

impl CollectionDefCategory {
    /// Number of element types a collection of this category takes.
    pub fn argument_count(&self) -> usize {
        match self {
            Self::Map => 2,
            Self::Array => 1,
            Self::Struct => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDef {
    pub guid: String,
    pub name: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub collection_def_category: CollectionDefCategory,
    #[serde(default)]
    pub argument_types: Vec<PrimitiveDefCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumElementDef {
    pub ordinal: i32,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDef {
    pub guid: String,
    pub name: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub element_defs: Vec<EnumElementDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<EnumElementDef>,
}

impl EnumDef {
    pub fn element_by_ordinal(&self, ordinal: i32) -> Option<&EnumElementDef> {
        self.element_defs.iter().find(|e| e.ordinal == ordinal)
    }
}

/// Attribute type definitions (`category` discriminated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeTypeDef {
    Primitive(PrimitiveDef),
    Collection(CollectionDef),
    EnumDef(EnumDef),
}

impl AttributeTypeDef {
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(def) => &def.name,
            Self::Collection(def) => &def.name,
            Self::EnumDef(def) => &def.name,
        }
    }

    pub fn guid(&self) -> &str {
        match self {
            Self::Primitive(def) => &def.guid,
            Self::Collection(def) => &def.guid,
            Self::EnumDef(def) => &def.guid,
        }
    }

    pub fn category_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive definition",
            Self::Collection(_) => "collection definition",
            Self::EnumDef(_) => "enum definition",
        }
    }
}

/// Fields shared by entity, relationship and classification definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefHeader {
    pub guid: String,
    pub name: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_type: Option<TypeDefLink>,
    #[serde(default)]
    pub property_definitions: Vec<TypeDefAttribute>,
    #[serde(default)]
    pub status: TypeDefStatus,
}

impl TypeDefHeader {
    pub fn new(guid: impl Into<String>, name: impl Into<String>, version: i64) -> Self {
        Self {
            guid: guid.into(),
            name: name.into(),
            version,
            version_name: None,
            description: None,
            super_type: None,
            property_definitions: Vec::new(),
            status: TypeDefStatus::default(),
        }
    }

    pub fn link(&self) -> TypeDefLink {
        TypeDefLink::new(self.guid.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDef {
    #[serde(flatten)]
    pub header: TypeDefHeader,
}

impl EntityDef {
    pub fn new(guid: impl Into<String>, name: impl Into<String>, version: i64) -> Self {
        Self {
            header: TypeDefHeader::new(guid, name, version),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationPropagationRule {
    #[default]
    None,
    OneToTwo,
    TwoToOne,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEndDef {
    pub entity_type: TypeDefLink,
    pub attribute_name: String,
    #[serde(default)]
    pub attribute_cardinality: AttributeCardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDef {
    #[serde(flatten)]
    pub header: TypeDefHeader,
    pub end_def1: RelationshipEndDef,
    pub end_def2: RelationshipEndDef,
    #[serde(default)]
    pub propagation_rule: ClassificationPropagationRule,
    #[serde(default)]
    pub multi_link: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationDef {
    #[serde(flatten)]
    pub header: TypeDefHeader,
    #[serde(default)]
    pub valid_entity_defs: Vec<TypeDefLink>,
    #[serde(default)]
    pub propagatable: bool,
}

/// Instance type definitions (`category` discriminated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeDef {
    EntityDef(EntityDef),
    RelationshipDef(RelationshipDef),
    ClassificationDef(ClassificationDef),
}

impl TypeDef {
    pub fn header(&self) -> &TypeDefHeader {
        match self {
            Self::EntityDef(def) => &def.header,
            Self::RelationshipDef(def) => &def.header,
            Self::ClassificationDef(def) => &def.header,
        }
    }

    pub fn name(&self) -> &str {
        &self.header().name
    }

    pub fn guid(&self) -> &str {
        &self.header().guid
    }

    pub fn category_name(&self) -> &'static str {
        match self {
            Self::EntityDef(_) => "entity definition",
            Self::RelationshipDef(_) => "relationship definition",
            Self::ClassificationDef(_) => "classification definition",
        }
    }
}

/// Delta applied to an existing type definition. Keyed by `type_def_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefPatch {
    pub type_def_guid: String,
    pub type_def_name: String,
    pub apply_to_version: i64,
    pub update_to_version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub property_definitions: Vec<TypeDefAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_def_status: Option<TypeDefStatus>,
}
