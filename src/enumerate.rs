//! Field enumeration over a struct's static shape.
//!
//! All three policies share one depth-first walk in declaration order. They
//! differ only in what an embedded struct field contributes:
//!
//! | policy       | embedded field itself | its inner fields |
//! |--------------|-----------------------|------------------|
//! | `TopLevel`   | yes                   | no               |
//! | `Flattened`  | no                    | yes, in place    |
//! | `Exhaustive` | yes                   | yes, right after |

use std::collections::HashMap;

use crate::types::{FieldDef, Kind, MethodDef, TypeInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    TopLevel,
    Flattened,
    Exhaustive,
}

/// A field reachable from a root struct type.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub def: &'static FieldDef,
    /// Declared field indices from the root type down to this field.
    pub path: Vec<usize>,
}

impl FieldEntry {
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Nesting depth; 0 for fields declared on the root type.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }
}

/// List the fields of `ty` under `policy`. Non-struct types have none.
pub fn enumerate(ty: &'static TypeInfo, policy: Policy) -> Vec<FieldEntry> {
    let mut out = Vec::new();
    if ty.kind == Kind::Struct {
        walk(ty, policy, &mut Vec::new(), &mut out);
    }
    out
}

fn walk(ty: &'static TypeInfo, policy: Policy, path: &mut Vec<usize>, out: &mut Vec<FieldEntry>) {
    for (index, def) in ty.fields.iter().enumerate() {
        path.push(index);

        let inner = def.type_info();
        let promotes = def.anonymous && inner.kind == Kind::Struct;

        if !promotes || policy != Policy::Flattened {
            out.push(FieldEntry {
                def,
                path: path.clone(),
            });
        }
        if promotes && policy != Policy::TopLevel {
            walk(inner, policy, path, out);
        }

        path.pop();
    }
}

/// Names that occur more than once in the exhaustive listing, each reported
/// once, ordered by where the name first appears.
pub fn duplicates(ty: &'static TypeInfo) -> Vec<&'static str> {
    let mut order = Vec::new();
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for entry in enumerate(ty, Policy::Exhaustive) {
        let count = counts.entry(entry.name()).or_insert(0);
        if *count == 0 {
            order.push(entry.name());
        }
        *count += 1;
    }
    order.retain(|name| counts[name] > 1);
    order
}

/// Resolve a field by exact name.
///
/// Searches the exhaustive listing, so promoted fields and embedded struct
/// fields both resolve. A shallower field shadows deeper ones of the same
/// name; at equal depth the first in declaration order wins.
pub fn find(ty: &'static TypeInfo, name: &str) -> Option<FieldEntry> {
    enumerate(ty, Policy::Exhaustive)
        .into_iter()
        .filter(|entry| entry.name() == name)
        .min_by_key(FieldEntry::depth)
}

/// A method reachable from a root type, possibly through embedded fields.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub def: &'static MethodDef,
    /// Field indices from the root value down to the method's receiver.
    /// Empty for methods declared on the root type.
    pub path: Vec<usize>,
}

/// The method set of `ty`: its own methods, then those promoted from
/// embedded structs, depth first. A name already present shadows any
/// later method of the same name.
pub fn methods(ty: &'static TypeInfo) -> Vec<MethodEntry> {
    let mut out = Vec::new();
    collect_methods(ty, &mut Vec::new(), &mut out);
    out
}

fn collect_methods(ty: &'static TypeInfo, path: &mut Vec<usize>, out: &mut Vec<MethodEntry>) {
    for def in ty.methods() {
        if !out.iter().any(|entry| entry.def.name == def.name) {
            out.push(MethodEntry {
                def,
                path: path.clone(),
            });
        }
    }

    for entry in enumerate(ty, Policy::TopLevel) {
        let inner = entry.def.type_info();
        if entry.def.anonymous && inner.kind == Kind::Struct {
            path.extend_from_slice(&entry.path);
            collect_methods(inner, path, out);
            path.truncate(path.len() - entry.path.len());
        }
    }
}
