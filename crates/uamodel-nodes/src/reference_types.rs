// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Standard reference types and their subtype hierarchy.
//!
//! ```text
//! References (31)
//! ├── HierarchicalReferences (33)
//! │   ├── HasChild (34)
//! │   │   ├── Aggregates (44)
//! │   │   │   ├── HasComponent (47)
//! │   │   │   │   └── HasOrderedComponent (49)
//! │   │   │   └── HasProperty (46)
//! │   │   └── HasSubtype (45)
//! │   ├── Organizes (35)
//! │   └── HasEventSource (36)
//! │       └── HasNotifier (48)
//! └── NonHierarchicalReferences (32)
//!     ├── HasModellingRule (37)
//!     ├── HasTypeDefinition (40)
//!     └── GeneratesEvent (41)
//! ```

use uamodel_core::NodeId;

/// References (abstract root).
pub const REFERENCES: NodeId = NodeId::numeric(0, 31);
/// NonHierarchicalReferences.
pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 32);
/// HierarchicalReferences.
pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::numeric(0, 33);
/// HasChild.
pub const HAS_CHILD: NodeId = NodeId::numeric(0, 34);
/// Organizes.
pub const ORGANIZES: NodeId = NodeId::numeric(0, 35);
/// HasEventSource.
pub const HAS_EVENT_SOURCE: NodeId = NodeId::numeric(0, 36);
/// HasModellingRule.
pub const HAS_MODELLING_RULE: NodeId = NodeId::numeric(0, 37);
/// HasTypeDefinition.
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::numeric(0, 40);
/// GeneratesEvent.
pub const GENERATES_EVENT: NodeId = NodeId::numeric(0, 41);
/// Aggregates.
pub const AGGREGATES: NodeId = NodeId::numeric(0, 44);
/// HasSubtype.
pub const HAS_SUBTYPE: NodeId = NodeId::numeric(0, 45);
/// HasProperty.
pub const HAS_PROPERTY: NodeId = NodeId::numeric(0, 46);
/// HasComponent.
pub const HAS_COMPONENT: NodeId = NodeId::numeric(0, 47);
/// HasNotifier.
pub const HAS_NOTIFIER: NodeId = NodeId::numeric(0, 48);
/// HasOrderedComponent.
pub const HAS_ORDERED_COMPONENT: NodeId = NodeId::numeric(0, 49);

/// (subtype, supertype) pairs, by numeric ns0 id.
const SUPERTYPES: &[(u32, u32)] = &[
    (32, 31),
    (33, 31),
    (34, 33),
    (35, 33),
    (36, 33),
    (37, 32),
    (40, 32),
    (41, 32),
    (44, 34),
    (45, 34),
    (46, 44),
    (47, 44),
    (48, 36),
    (49, 47),
];

fn supertype_of(id: u32) -> Option<u32> {
    SUPERTYPES
        .iter()
        .find(|(subtype, _)| *subtype == id)
        .map(|(_, supertype)| *supertype)
}

/// Returns `true` if `reference_type` is `super_type` or one of its subtypes.
///
/// Reference types outside namespace 0 only match themselves.
pub fn is_subtype_of(reference_type: &NodeId, super_type: &NodeId) -> bool {
    if reference_type == super_type {
        return true;
    }
    let (Some(mut current), Some(target)) = (reference_type.ns0_numeric(), super_type.ns0_numeric())
    else {
        return false;
    };
    while let Some(parent) = supertype_of(current) {
        if parent == target {
            return true;
        }
        current = parent;
    }
    false
}

/// Matches `HasProperty`.
pub fn is_has_property(reference_type: &NodeId) -> bool {
    is_subtype_of(reference_type, &HAS_PROPERTY)
}

/// Matches `HasComponent` and its subtypes.
pub fn is_has_component(reference_type: &NodeId) -> bool {
    is_subtype_of(reference_type, &HAS_COMPONENT)
}

/// Matches every hierarchical reference.
pub fn is_hierarchical(reference_type: &NodeId) -> bool {
    is_subtype_of(reference_type, &HIERARCHICAL_REFERENCES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtype_hierarchy() {
        assert!(is_has_component(&HAS_COMPONENT));
        assert!(is_has_component(&HAS_ORDERED_COMPONENT));
        assert!(!is_has_component(&HAS_PROPERTY));
        assert!(is_has_property(&HAS_PROPERTY));
        assert!(is_subtype_of(&HAS_PROPERTY, &AGGREGATES));
        assert!(is_hierarchical(&HAS_NOTIFIER));
        assert!(!is_hierarchical(&HAS_TYPE_DEFINITION));
        assert!(is_subtype_of(&HAS_TYPE_DEFINITION, &REFERENCES));
    }

    #[test]
    fn test_non_standard_reference_type() {
        let custom = NodeId::numeric(2, 47);
        assert!(!is_has_component(&custom));
        assert!(is_subtype_of(&custom, &custom));
    }
}
