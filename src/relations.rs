//! Per-user relationship edge sets (favorites, cart, subscriptions). All
//! three share one add/remove state machine over (user, target) pairs, and
//! all read-time membership projections live here.

use crate::error::ApiError;
use crate::schema::{cart_items, favorites, subscriptions};
use diesel::prelude::*;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Favorite,
    Cart,
    Subscription,
}

impl Relation {
    fn already_exists(self) -> &'static str {
        match self {
            Relation::Favorite => "This recipe is already in favorites",
            Relation::Cart => "This recipe is already in the shopping cart",
            Relation::Subscription => "You are already subscribed to this author",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            Relation::Favorite => "This recipe is not in favorites",
            Relation::Cart => "This recipe is not in the shopping cart",
            Relation::Subscription => "You are not subscribed to this author",
        }
    }
}

/// Maps the insert's rows-affected count to the toggle outcome: zero rows
/// means the edge already existed.
fn add_outcome(inserted: usize, relation: Relation) -> Result<(), ApiError> {
    if inserted == 0 {
        return Err(ApiError::Conflict(relation.already_exists().to_string()));
    }
    Ok(())
}

/// Maps the delete's rows-affected count to the toggle outcome: zero rows
/// means there was no edge to remove.
fn remove_outcome(deleted: usize, relation: Relation) -> Result<(), ApiError> {
    if deleted == 0 {
        return Err(ApiError::Conflict(relation.not_present().to_string()));
    }
    Ok(())
}

/// Adds the (user, target) edge. The composite primary key plus
/// ON CONFLICT DO NOTHING keep concurrent duplicate adds safe: the losing
/// insert affects zero rows and surfaces as a conflict, never a double row.
pub fn add(
    conn: &mut PgConnection,
    relation: Relation,
    user_id: Uuid,
    target_id: Uuid,
) -> Result<(), ApiError> {
    if relation == Relation::Subscription && user_id == target_id {
        return Err(ApiError::Conflict(
            "Cannot subscribe to yourself".to_string(),
        ));
    }

    let inserted = match relation {
        Relation::Favorite => diesel::insert_into(favorites::table)
            .values((
                favorites::user_id.eq(user_id),
                favorites::recipe_id.eq(target_id),
            ))
            .on_conflict_do_nothing()
            .execute(conn)?,
        Relation::Cart => diesel::insert_into(cart_items::table)
            .values((
                cart_items::user_id.eq(user_id),
                cart_items::recipe_id.eq(target_id),
            ))
            .on_conflict_do_nothing()
            .execute(conn)?,
        Relation::Subscription => diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::subscriber_id.eq(user_id),
                subscriptions::author_id.eq(target_id),
            ))
            .on_conflict_do_nothing()
            .execute(conn)?,
    };

    add_outcome(inserted, relation)
}

/// Removes the (user, target) edge; removing an absent edge is a conflict.
pub fn remove(
    conn: &mut PgConnection,
    relation: Relation,
    user_id: Uuid,
    target_id: Uuid,
) -> Result<(), ApiError> {
    let deleted = match relation {
        Relation::Favorite => diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::recipe_id.eq(target_id)),
        )
        .execute(conn)?,
        Relation::Cart => diesel::delete(
            cart_items::table
                .filter(cart_items::user_id.eq(user_id))
                .filter(cart_items::recipe_id.eq(target_id)),
        )
        .execute(conn)?,
        Relation::Subscription => diesel::delete(
            subscriptions::table
                .filter(subscriptions::subscriber_id.eq(user_id))
                .filter(subscriptions::author_id.eq(target_id)),
        )
        .execute(conn)?,
    };

    remove_outcome(deleted, relation)
}

/// Which of `recipe_ids` the user has favorited.
pub fn favorited_ids(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_ids: &[Uuid],
) -> Result<HashSet<Uuid>, ApiError> {
    let ids = favorites::table
        .filter(favorites::user_id.eq(user_id))
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .select(favorites::recipe_id)
        .load::<Uuid>(conn)?;
    Ok(ids.into_iter().collect())
}

/// Which of `recipe_ids` are in the user's cart.
pub fn cart_ids(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_ids: &[Uuid],
) -> Result<HashSet<Uuid>, ApiError> {
    let ids = cart_items::table
        .filter(cart_items::user_id.eq(user_id))
        .filter(cart_items::recipe_id.eq_any(recipe_ids))
        .select(cart_items::recipe_id)
        .load::<Uuid>(conn)?;
    Ok(ids.into_iter().collect())
}

/// Which of `author_ids` the user subscribes to.
pub fn subscribed_ids(
    conn: &mut PgConnection,
    subscriber_id: Uuid,
    author_ids: &[Uuid],
) -> Result<HashSet<Uuid>, ApiError> {
    let ids = subscriptions::table
        .filter(subscriptions::subscriber_id.eq(subscriber_id))
        .filter(subscriptions::author_id.eq_any(author_ids))
        .select(subscriptions::author_id)
        .load::<Uuid>(conn)?;
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Relation; 3] = [Relation::Favorite, Relation::Cart, Relation::Subscription];

    #[test]
    fn duplicate_add_is_a_conflict() {
        for relation in ALL {
            // First insert lands one row, the duplicate lands zero.
            assert!(add_outcome(1, relation).is_ok());
            let err = add_outcome(0, relation).unwrap_err();
            match err {
                ApiError::Conflict(message) => assert_eq!(message, relation.already_exists()),
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn remove_of_absent_edge_is_a_conflict() {
        for relation in ALL {
            assert!(remove_outcome(1, relation).is_ok());
            let err = remove_outcome(0, relation).unwrap_err();
            match err {
                ApiError::Conflict(message) => assert_eq!(message, relation.not_present()),
                other => panic!("expected conflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn add_remove_add_cycle_succeeds() {
        // The remove frees the composite key, so the re-add lands a row again.
        assert!(add_outcome(1, Relation::Favorite).is_ok());
        assert!(remove_outcome(1, Relation::Favorite).is_ok());
        assert!(add_outcome(1, Relation::Favorite).is_ok());
    }
}
