//! Entity search.
//!
//! Handlers turn a captured parameter into an object by testing it against
//! the identifier patterns of every object in a set of scopes. Scopes are
//! searched in the order given and the first object whose identifiers match
//! wins, so a handler decides precedence simply by how it lists its scopes.

use regex::Regex;

use crate::error::EngineError;
use crate::world::{ObjectRef, World, WorldObject};

/// Where a handler looks for the object a parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Items lying in the player's current location.
    LocationItems,
    /// Inventory items the player carries.
    Inventory,
    /// Persons in the player's current location.
    LocationPersons,
    /// Ways leading out of the player's current location.
    WaysOut,
}

/// Object refs in the given scopes, in scope order then membership order.
///
/// # Errors
/// - if the player's location does not resolve
pub fn scope_refs(world: &World, scopes: &[SearchScope]) -> Result<Vec<ObjectRef>, EngineError> {
    let location = world.player_location()?;
    let mut refs = Vec::new();
    for scope in scopes {
        match scope {
            SearchScope::LocationItems => refs.extend(location.items.iter().map(|id| ObjectRef::Item(*id))),
            SearchScope::Inventory => refs.extend(world.player.inventory.iter().map(|id| ObjectRef::InventoryItem(*id))),
            SearchScope::LocationPersons => refs.extend(location.persons.iter().map(|id| ObjectRef::Person(*id))),
            SearchScope::WaysOut => refs.extend(location.ways_out.iter().map(|id| ObjectRef::Way(*id))),
        }
    }
    Ok(refs)
}

/// Compile an object's identifiers into one anchored, case-insensitive pattern.
///
/// Returns `None` for an object without identifiers; such an object can never
/// be addressed by the player.
///
/// # Errors
/// - [`EngineError::InvalidIdentifier`] if an identifier is not a valid regex fragment
pub fn identifier_regex(identifiers: &[String]) -> Result<Option<Regex>, EngineError> {
    if identifiers.is_empty() {
        return Ok(None);
    }
    for identifier in identifiers {
        Regex::new(&format!("^(?:{identifier})$")).map_err(|source| EngineError::InvalidIdentifier {
            identifier: identifier.clone(),
            source,
        })?;
    }
    let joined = identifiers.join("|");
    Regex::new(&format!("(?i)^(?:{joined})$"))
        .map(Some)
        .map_err(|source| EngineError::InvalidIdentifier {
            identifier: joined,
            source,
        })
}

/// Does `token` name the object?
///
/// # Errors
/// See [`identifier_regex`].
pub fn identifier_matches(object: &dyn WorldObject, token: &str) -> Result<bool, EngineError> {
    Ok(identifier_regex(object.identifiers())?.is_some_and(|re| re.is_match(token)))
}

/// First object among `candidates` whose identifiers match `token`.
///
/// # Errors
/// - on candidates that do not resolve or carry malformed identifiers
pub fn find_by_identifier(world: &World, candidates: &[ObjectRef], token: &str) -> Result<Option<ObjectRef>, EngineError> {
    for candidate in candidates {
        if identifier_matches(world.object(*candidate)?, token)? {
            return Ok(Some(*candidate));
        }
    }
    Ok(None)
}

/// Resolve `token` within `scopes` of the player's surroundings.
///
/// # Errors
/// See [`scope_refs`] and [`find_by_identifier`].
pub fn find_in_scopes(world: &World, scopes: &[SearchScope], token: &str) -> Result<Option<ObjectRef>, EngineError> {
    find_by_identifier(world, &scope_refs(world, scopes)?, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idgen::{NAMESPACE_INVENTORY_ITEM, NAMESPACE_ITEM, NAMESPACE_PERSON, NAMESPACE_WAY};
    use crate::testutil::{cellar_world, id};

    #[test]
    fn identifiers_match_whole_token_case_insensitively() {
        let re = identifier_regex(&["lamp".into(), "lantern".into()]).unwrap().unwrap();
        assert!(re.is_match("Lantern"));
        assert!(!re.is_match("lamps"));
        assert!(identifier_regex(&[]).unwrap().is_none());
    }

    #[test]
    fn malformed_identifier_is_reported() {
        let err = identifier_regex(&["lamp(".into()]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidIdentifier { ref identifier, .. } if identifier == "lamp("));
    }

    #[test]
    fn scope_order_decides_precedence() {
        let mut world = cellar_world();
        world.player.inventory.push(id(&NAMESPACE_INVENTORY_ITEM, "lamp_lit"));

        let found = find_in_scopes(&world, &[SearchScope::LocationItems, SearchScope::Inventory], "lamp").unwrap();
        assert_eq!(found, Some(ObjectRef::Item(id(&NAMESPACE_ITEM, "lamp"))));

        let found = find_in_scopes(&world, &[SearchScope::Inventory, SearchScope::LocationItems], "lamp").unwrap();
        assert_eq!(found, Some(ObjectRef::InventoryItem(id(&NAMESPACE_INVENTORY_ITEM, "lamp_lit"))));
    }

    #[test]
    fn persons_and_ways_are_searched_in_their_scopes() {
        let world = cellar_world();
        assert_eq!(
            find_in_scopes(&world, &[SearchScope::LocationPersons], "guard").unwrap(),
            Some(ObjectRef::Person(id(&NAMESPACE_PERSON, "guard")))
        );
        assert_eq!(
            find_in_scopes(&world, &[SearchScope::WaysOut], "hatch").unwrap(),
            Some(ObjectRef::Way(id(&NAMESPACE_WAY, "trapdoor")))
        );
        assert_eq!(find_in_scopes(&world, &[SearchScope::WaysOut], "ladder").unwrap(), None);
        assert_eq!(find_in_scopes(&world, &[SearchScope::LocationItems], "guard").unwrap(), None);
    }
}
