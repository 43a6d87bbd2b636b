//! Order business logic.
//!
//! Placing an order is one transaction: validate the member and every
//! requested line, decrement stock atomically, create the delivery record,
//! the order row, and the order lines. Failure anywhere rolls the whole
//! thing back, so there are no partial orders.

use crate::{
    core::item::adjust_stock,
    entities::{
        Item, Member, Order, OrderItem, OrderStatus, delivery, item, order, order_item,
    },
    errors::{Error, Result},
    models::Address,
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// One requested order line.
#[derive(Clone, Copy, Debug)]
pub struct OrderLine {
    pub item_id: i64,
    pub count: i32,
}

/// A placed order with its lines, as returned by [`place_order`].
#[derive(Clone, Debug)]
pub struct PlacedOrder {
    pub order: order::Model,
    pub delivery: delivery::Model,
    pub lines: Vec<order_item::Model>,
}

impl PlacedOrder {
    /// Total over all lines at purchase-time prices.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(order_item::Model::line_total).sum()
    }
}

/// Places an order for a member, shipping to `ship_to`.
#[instrument(skip(db, lines, ship_to))]
pub async fn place_order(
    db: &DatabaseConnection,
    member_id: i64,
    lines: &[OrderLine],
    ship_to: Address,
) -> Result<PlacedOrder> {
    if lines.is_empty() {
        return Err(Error::Config {
            message: "An order needs at least one line".to_string(),
        });
    }
    for line in lines {
        if line.count <= 0 {
            return Err(Error::InvalidQuantity { count: line.count });
        }
    }

    let txn = db.begin().await?;

    Member::find_by_id(member_id)
        .one(&txn)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let delivery_model = delivery::ActiveModel {
        city: Set(ship_to.city),
        street: Set(ship_to.street),
        zipcode: Set(ship_to.zipcode),
        status: Set(delivery::DeliveryStatus::Ready),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let order_model = order::ActiveModel {
        member_id: Set(member_id),
        delivery_id: Set(Some(delivery_model.id)),
        order_date: Set(chrono::Utc::now()),
        status: Set(OrderStatus::Order),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut order_lines = Vec::with_capacity(lines.len());
    for line in lines {
        let item_model = Item::find_by_id(line.item_id)
            .one(&txn)
            .await?
            .ok_or(Error::ItemNotFound {
                name: line.item_id.to_string(),
            })?;

        // Stock check + decrement; fails the whole transaction when short.
        adjust_stock(&txn, item_model.id, -line.count).await?;

        let order_line = order_item::ActiveModel {
            order_id: Set(order_model.id),
            item_id: Set(item_model.id),
            order_price: Set(item_model.price),
            count: Set(line.count),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        order_lines.push(order_line);
    }

    txn.commit().await?;
    info!(
        order_id = order_model.id,
        member_id,
        lines = order_lines.len(),
        "order placed"
    );

    Ok(PlacedOrder {
        order: order_model,
        delivery: delivery_model,
        lines: order_lines,
    })
}

/// Cancels an order: restores the stock of every line and flips the status.
/// Cancelling twice is refused.
#[instrument(skip(db))]
pub async fn cancel_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order_model = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;
    if order_model.status == OrderStatus::Cancel {
        return Err(Error::Config {
            message: format!("Order {order_id} is already cancelled"),
        });
    }

    let order_lines = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(&txn)
        .await?;
    for line in &order_lines {
        adjust_stock(&txn, line.item_id, line.count).await?;
    }

    let mut active: order::ActiveModel = order_model.into();
    active.status = Set(OrderStatus::Cancel);
    let cancelled = active.update(&txn).await?;

    txn.commit().await?;
    info!(order_id, restored_lines = order_lines.len(), "order cancelled");
    Ok(cancelled)
}

/// Order history for a member, newest first, with offset/limit paging.
pub async fn get_orders_for_member(
    db: &DatabaseConnection,
    member_id: i64,
    offset: u64,
    limit: u64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::MemberId.eq(member_id))
        .order_by_desc(order::Column::OrderDate)
        .order_by_desc(order::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn get_order_lines(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_item::Model>> {
    OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(db)
        .await
        .map_err(Into::into)
}

/// The items on an order, resolved through the order-line association.
pub async fn get_ordered_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<item::Model>> {
    let order_model = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let lines = order_model.find_related(OrderItem).all(db).await?;
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(i) = Item::find_by_id(line.item_id).one(db).await? {
            items.push(i);
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::item::{create_album, create_book, get_item_by_id};
    use crate::entities::DeliveryStatus;
    use crate::test_utils::{create_test_member, setup_test_db, test_address};

    #[tokio::test]
    async fn test_place_order_creates_delivery_order_and_lines() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 25000, 5, None).await?;
        let book = create_book(&db, "b".to_string(), 30000, 3, None).await?;

        let placed = place_order(
            &db,
            member.id,
            &[
                OrderLine { item_id: album.id, count: 2 },
                OrderLine { item_id: book.id, count: 1 },
            ],
            test_address(),
        )
        .await?;

        assert_eq!(placed.order.status, OrderStatus::Order);
        assert_eq!(placed.order.delivery_id, Some(placed.delivery.id));
        assert_eq!(placed.delivery.status, DeliveryStatus::Ready);
        assert_eq!(placed.lines.len(), 2);
        assert_eq!(placed.total(), 2 * 25000 + 30000);

        // Purchase-time prices are frozen on the line.
        assert!(placed.lines.iter().any(|l| l.order_price == 25000 && l.count == 2));

        // Stock was decremented.
        assert_eq!(get_item_by_id(&db, album.id).await?.unwrap().stock_quantity, 3);
        assert_eq!(get_item_by_id(&db, book.id).await?.unwrap().stock_quantity, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 25000, 5, None).await?;

        let err = place_order(&db, member.id, &[], test_address()).await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = place_order(
            &db,
            member.id,
            &[OrderLine { item_id: album.id, count: 0 }],
            test_address(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { count: 0 }));

        let err = place_order(
            &db,
            999,
            &[OrderLine { item_id: album.id, count: 1 }],
            test_address(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::MemberNotFound { id: 999 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_insufficient_stock_rolls_back() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 25000, 5, None).await?;
        let book = create_book(&db, "b".to_string(), 30000, 1, None).await?;

        let err = place_order(
            &db,
            member.id,
            &[
                OrderLine { item_id: album.id, count: 2 },
                OrderLine { item_id: book.id, count: 5 },
            ],
            test_address(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InsufficientStock { .. }));

        // Nothing stuck: the first line's decrement was rolled back too.
        assert_eq!(get_item_by_id(&db, album.id).await?.unwrap().stock_quantity, 5);
        assert!(Order::find().all(&db).await?.is_empty());
        assert!(OrderItem::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_order_restores_stock_once() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 25000, 5, None).await?;

        let placed = place_order(
            &db,
            member.id,
            &[OrderLine { item_id: album.id, count: 3 }],
            test_address(),
        )
        .await?;
        assert_eq!(get_item_by_id(&db, album.id).await?.unwrap().stock_quantity, 2);

        let cancelled = cancel_order(&db, placed.order.id).await?;
        assert_eq!(cancelled.status, OrderStatus::Cancel);
        assert_eq!(get_item_by_id(&db, album.id).await?.unwrap().stock_quantity, 5);

        let err = cancel_order(&db, placed.order.id).await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(get_item_by_id(&db, album.id).await?.unwrap().stock_quantity, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_order_history_pages_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 1000, 100, None).await?;

        for _ in 0..3 {
            place_order(
                &db,
                member.id,
                &[OrderLine { item_id: album.id, count: 1 }],
                test_address(),
            )
            .await?;
        }

        let all = get_orders_for_member(&db, member.id, 0, 10).await?;
        assert_eq!(all.len(), 3);
        assert!(all[0].order_date >= all[2].order_date);

        let page = get_orders_for_member(&db, member.id, 1, 1).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, all[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_ordered_items_resolves_association() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "kim").await?;
        let album = create_album(&db, "a".to_string(), 1000, 10, None).await?;
        let book = create_book(&db, "b".to_string(), 2000, 10, None).await?;

        let placed = place_order(
            &db,
            member.id,
            &[
                OrderLine { item_id: album.id, count: 1 },
                OrderLine { item_id: book.id, count: 1 },
            ],
            test_address(),
        )
        .await?;

        let items = get_ordered_items(&db, placed.order.id).await?;
        let mut names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);
        Ok(())
    }
}
