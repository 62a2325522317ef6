//! Field-role resolution over static variant schemas.
//!
//! These are pure functions: given a [`VariantSchema`] they pick the declared
//! field that plays a role, comparing names ASCII case-insensitively.

use ambients_system::catalog::VariantSchema;

/// Canonical name of the resource-group reference field.
pub const RESOURCE_GROUP_FIELD: &str = "ResourceGroupName";

/// Canonical name of the location field.
pub const LOCATION_FIELD: &str = "Location";

const NAME_SUFFIX: &str = "Name";
const ARGS_SUFFIX: &str = "Args";

/// Returns the declared field matching `wanted`, ignoring ASCII case.
#[must_use]
pub fn find_field(schema: &VariantSchema, wanted: &str) -> Option<&'static str> {
    schema
        .fields
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(wanted))
}

/// Picks the field that holds the resource's own name, if any.
///
/// Candidates are the declared fields ending in `Name`, except the
/// resource-group reference. The first rule that yields a unique field wins:
///
/// 1. the only candidate;
/// 2. the candidate named `<Base>Name`, where `<Base>` is the tag without
///    its `Args` suffix (`StorageAccountArgs` → `StorageAccountName`);
/// 3. the candidate named exactly `Name`;
/// 4. the candidate `<Stem>Name` (other than `Name`) whose `<Stem>Args` ends
///    the tag (`BlobContainerArgs` → `ContainerName`).
#[must_use]
pub fn resolve_name_field(schema: &VariantSchema) -> Option<&'static str> {
    let candidates: Vec<&'static str> = schema
        .fields
        .iter()
        .copied()
        .filter(|field| !field.eq_ignore_ascii_case(RESOURCE_GROUP_FIELD))
        .filter(|field| ends_with_ignore_case(field, NAME_SUFFIX))
        .collect();

    if let [only] = candidates.as_slice() {
        return Some(*only);
    }

    let own_name = format!("{}{}", schema.base_name(), NAME_SUFFIX);
    if let Some(field) = single(&candidates, |field| field.eq_ignore_ascii_case(&own_name)) {
        return Some(field);
    }

    if let Some(field) = single(&candidates, |field| field.eq_ignore_ascii_case(NAME_SUFFIX)) {
        return Some(field);
    }

    single(&candidates, |field| {
        if field.eq_ignore_ascii_case(NAME_SUFFIX) {
            return false;
        }
        let stem = &field[..field.len() - NAME_SUFFIX.len()];
        let stem_args = format!("{stem}{ARGS_SUFFIX}");
        ends_with_ignore_case(schema.tag, &stem_args)
    })
}

/// Picks the location field, if any.
#[must_use]
pub fn resolve_location_field(schema: &VariantSchema) -> Option<&'static str> {
    find_field(schema, LOCATION_FIELD)
}

/// Picks the resource-group reference field, if any.
#[must_use]
pub fn resolve_resource_group_field(schema: &VariantSchema) -> Option<&'static str> {
    find_field(schema, RESOURCE_GROUP_FIELD)
}

/// Returns the only candidate matching `predicate`; ambiguity counts as none.
fn single(
    candidates: &[&'static str],
    predicate: impl Fn(&str) -> bool,
) -> Option<&'static str> {
    let mut matches = candidates.iter().copied().filter(|field| predicate(field));
    match (matches.next(), matches.next()) {
        (Some(field), None) => Some(field),
        _ => None,
    }
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
