//! Member business logic.
//!
//! CRUD over the member entity plus the two element collections
//! (`favorite_food`, `address_history`). Collection updates use
//! replace-on-write semantics: every row for the owner is deleted and the
//! current values are reinserted in one transaction, because value rows have
//! no identity to diff against.

use crate::{
    entities::{AddressHistory, FavoriteFood, Member, address_history, favorite_food, member},
    errors::{Error, Result},
    models::{Address, Period},
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::debug;

/// Creates a member with a validated name and optional embedded values.
pub async fn create_member(
    db: &DatabaseConnection,
    name: String,
    age: Option<i32>,
    role: member::RoleType,
    address: Option<Address>,
    period: Option<Period>,
) -> Result<member::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Member name cannot be empty".to_string(),
        });
    }
    if let Some(age) = age
        && age < 0
    {
        return Err(Error::Config {
            message: format!("Member age cannot be negative: {age}"),
        });
    }

    let (city, street, zipcode) = match address {
        Some(a) => (Some(a.city), Some(a.street), Some(a.zipcode)),
        None => (None, None, None),
    };
    let period = period.unwrap_or(Period {
        started_at: None,
        ended_at: None,
    });

    let model = member::ActiveModel {
        name: Set(name.trim().to_string()),
        age: Set(age),
        role: Set(role),
        city: Set(city),
        street: Set(street),
        zipcode: Set(zipcode),
        started_at: Set(period.started_at),
        ended_at: Set(period.ended_at),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

pub async fn get_member_by_id(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<member::Model>> {
    Member::find_by_id(member_id)
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn get_member_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<member::Model>> {
    Member::find()
        .filter(member::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Substring search with paging, the query-builder equivalent of the classic
/// `like '%...%'` + offset/limit lookup.
pub async fn find_members_by_name_like(
    db: &DatabaseConnection,
    fragment: &str,
    offset: u64,
    limit: u64,
) -> Result<Vec<member::Model>> {
    Member::find()
        .filter(member::Column::Name.contains(fragment))
        .order_by_asc(member::Column::Name)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the embedded address and touches the audit column.
pub async fn update_member_address(
    db: &DatabaseConnection,
    member_id: i64,
    address: Address,
) -> Result<member::Model> {
    let model = Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let mut active: member::ActiveModel = model.into();
    active.city = Set(Some(address.city));
    active.street = Set(Some(address.street));
    active.zipcode = Set(Some(address.zipcode));
    active.updated_at = Set(Some(chrono::Utc::now()));
    active.update(db).await.map_err(Into::into)
}

/// Closes the membership period and touches the audit column.
pub async fn end_membership(db: &DatabaseConnection, member_id: i64) -> Result<member::Model> {
    let model = Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let mut active: member::ActiveModel = model.into();
    active.ended_at = Set(Some(chrono::Utc::now()));
    active.updated_at = Set(Some(chrono::Utc::now()));
    active.update(db).await.map_err(Into::into)
}

pub async fn get_favorite_foods(db: &DatabaseConnection, member_id: i64) -> Result<Vec<String>> {
    let rows = FavoriteFood::find()
        .filter(favorite_food::Column::MemberId.eq(member_id))
        .order_by_asc(favorite_food::Column::FoodName)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.food_name).collect())
}

/// Replaces the favorite-food collection: delete everything for the member,
/// reinsert the distinct current values. An empty slice clears the table.
pub async fn set_favorite_foods(
    db: &DatabaseConnection,
    member_id: i64,
    foods: &[String],
) -> Result<()> {
    ensure_member_exists(db, member_id).await?;

    let txn = db.begin().await?;
    FavoriteFood::delete_many()
        .filter(favorite_food::Column::MemberId.eq(member_id))
        .exec(&txn)
        .await?;

    let mut seen = std::collections::BTreeSet::new();
    for food in foods {
        // The whole row is the primary key; duplicates cannot be stored.
        if !seen.insert(food.as_str()) {
            continue;
        }
        let row = favorite_food::ActiveModel {
            member_id: Set(member_id),
            food_name: Set(food.clone()),
        };
        row.insert(&txn).await?;
    }
    txn.commit().await?;
    debug!(member_id, count = seen.len(), "favorite foods replaced");
    Ok(())
}

pub async fn get_address_history(db: &DatabaseConnection, member_id: i64) -> Result<Vec<Address>> {
    let rows = AddressHistory::find()
        .filter(address_history::Column::MemberId.eq(member_id))
        .order_by_asc(address_history::Column::City)
        .all(db)
        .await?;
    Ok(rows.iter().map(address_history::Model::address).collect())
}

/// Replaces the address-history collection, same contract as
/// [`set_favorite_foods`].
pub async fn set_address_history(
    db: &DatabaseConnection,
    member_id: i64,
    history: &[Address],
) -> Result<()> {
    ensure_member_exists(db, member_id).await?;

    let txn = db.begin().await?;
    AddressHistory::delete_many()
        .filter(address_history::Column::MemberId.eq(member_id))
        .exec(&txn)
        .await?;

    let mut seen = std::collections::BTreeSet::new();
    for address in history {
        if !seen.insert((&address.city, &address.street, &address.zipcode)) {
            continue;
        }
        let row: address_history::ActiveModel =
            address_history::Model::from_address(member_id, address).into();
        row.insert(&txn).await?;
    }
    txn.commit().await?;
    debug!(member_id, count = seen.len(), "address history replaced");
    Ok(())
}

async fn ensure_member_exists(db: &DatabaseConnection, member_id: i64) -> Result<()> {
    Member::find_by_id(member_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or(Error::MemberNotFound { id: member_id })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::RoleType;
    use crate::test_utils::{create_test_member, setup_test_db};

    #[tokio::test]
    async fn test_create_member_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_member(&db, String::new(), None, RoleType::User, None, None).await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));

        let result = create_member(
            &db,
            "kim".to_string(),
            Some(-3),
            RoleType::User,
            None,
            None,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Config { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_member_with_embedded_values() -> Result<()> {
        let db = setup_test_db().await?;
        let address = Address::new("seoul", "teheran-ro", "06234");
        let member = create_member(
            &db,
            "  kim  ".to_string(),
            Some(31),
            RoleType::Admin,
            Some(address.clone()),
            Some(Period::starting(chrono::Utc::now())),
        )
        .await?;

        assert_eq!(member.name, "kim", "name must be trimmed");
        assert_eq!(member.address(), Some(address));
        assert!(member.period().is_open());
        assert!(member.updated_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_members_by_name_like_pages() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["kim one", "kim two", "kim three", "park"] {
            create_test_member(&db, name).await?;
        }

        let all = find_members_by_name_like(&db, "kim", 0, 10).await?;
        assert_eq!(all.len(), 3);

        let page = find_members_by_name_like(&db, "kim", 1, 1).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, all[1].name);

        let none = find_members_by_name_like(&db, "choi", 0, 10).await?;
        assert!(none.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_member_address_touches_audit_column() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        assert!(member.updated_at.is_none());

        let updated =
            update_member_address(&db, member.id, Address::new("busan", "haeundae", "48094"))
                .await?;
        assert_eq!(updated.city.as_deref(), Some("busan"));
        assert!(updated.updated_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_favorite_foods_replace_on_write() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;

        set_favorite_foods(
            &db,
            member.id,
            &["kimchi".to_string(), "bulgogi".to_string()],
        )
        .await?;
        assert_eq!(get_favorite_foods(&db, member.id).await?.len(), 2);

        // Replacement, not merge; duplicates collapse.
        set_favorite_foods(
            &db,
            member.id,
            &["ramen".to_string(), "ramen".to_string()],
        )
        .await?;
        assert_eq!(get_favorite_foods(&db, member.id).await?, vec!["ramen"]);

        // Empty set clears the collection table.
        set_favorite_foods(&db, member.id, &[]).await?;
        assert!(get_favorite_foods(&db, member.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_collection_write_requires_existing_member() -> Result<()> {
        let db = setup_test_db().await?;
        let result = set_favorite_foods(&db, 999, &["kimchi".to_string()]).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MemberNotFound { id: 999 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_address_history_replace_on_write() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;

        let history = vec![
            Address::new("busan", "haeundae", "48094"),
            Address::new("seoul", "teheran-ro", "06234"),
        ];
        set_address_history(&db, member.id, &history).await?;
        assert_eq!(get_address_history(&db, member.id).await?, history);

        set_address_history(&db, member.id, &history[..1]).await?;
        assert_eq!(get_address_history(&db, member.id).await?, history[..1]);
        Ok(())
    }
}
