//! Lifecycle walkthroughs runnable from the binary.
//!
//! One function per topic, each opening its own session or transaction and
//! narrating what happens through `tracing`. `run_all` chains them in order
//! on a shared connection.

use crate::{
    core::{self, order::OrderLine},
    entities::{child, parent, team},
    errors::{Error, Result},
    models::{Address, Period},
    session::Session,
};
use sea_orm::DatabaseConnection;
use tracing::info;

/// Runs every walkthrough in sequence.
pub async fn run_all(db: &DatabaseConnection) -> Result<()> {
    run_entity_lifecycle(db).await?;
    run_lazy_loading(db).await?;
    run_cascade_and_orphans(db).await?;
    run_shop_scenario(db).await?;
    Ok(())
}

/// Persist, cached reads, dirty checking, and write-behind removal, all
/// inside one session.
pub async fn run_entity_lifecycle(db: &DatabaseConnection) -> Result<()> {
    info!("--- entity lifecycle ---");
    let mut session = Session::begin(db).await?;

    // Persist issues the INSERT right away so the generated key is usable.
    let stored = session
        .persist(team::Model {
            id: 0,
            name: "platform".to_string(),
        })
        .await?;
    info!(id = stored.id, "team persisted, key available immediately");

    // Both reads come out of the session cache; only the miss would SELECT.
    let first = session.get::<team::Model>(stored.id).await?;
    let second = session.get::<team::Model>(stored.id).await?;
    info!(
        same = first == second,
        cache_hits = session.stats().cache_hits,
        "repeated get served from the session cache"
    );

    // No explicit update call anywhere: the snapshot comparison at flush
    // notices the change and issues the UPDATE.
    session.modify::<team::Model>(stored.id, |t| {
        t.name = "platform-renamed".to_string();
    })?;
    info!(
        dirty = session.is_dirty::<team::Model>(stored.id),
        "rename recorded, UPDATE deferred until flush"
    );
    session.flush().await?;

    // Removal is queued; the row is gone from the session at once but the
    // DELETE runs at the next flush.
    session.remove::<team::Model>(stored.id)?;
    info!(
        visible = session.get::<team::Model>(stored.id).await?.is_some(),
        pending = session.pending_removals(),
        "removed entity is invisible before the DELETE runs"
    );

    let stats = session.commit().await?;
    info!(?stats, "lifecycle session committed");
    Ok(())
}

/// A developer's team resolved through a lazy reference on first access.
pub async fn run_lazy_loading(db: &DatabaseConnection) -> Result<()> {
    info!("--- lazy loading ---");
    let team = core::team::create_team(db, "backend".to_string()).await?;
    let dev = core::team::create_developer(db, "kim".to_string(), Some(team.id)).await?;

    let lazy = core::team::team_ref(&dev).ok_or(Error::TeamNotFound { id: team.id })?;
    info!(
        initialized = lazy.is_initialized(),
        id = lazy.id(),
        "reference holds only the key so far"
    );

    let mut session = Session::begin(db).await?;
    let loaded = lazy.get(&mut session).await?;
    info!(name = %loaded.name, "first access loaded the team");

    // Second access touches neither the database nor the session.
    let again = lazy.get(&mut session).await?;
    info!(initialized = lazy.is_initialized(), same = loaded == again, "now initialized");
    session.rollback().await?;
    Ok(())
}

/// Cascaded persist/remove on the parent/child pair, plus orphan removal.
pub async fn run_cascade_and_orphans(db: &DatabaseConnection) -> Result<()> {
    info!("--- cascade and orphan removal ---");
    let mut session = Session::begin(db).await?;

    let children = vec![
        child::Model {
            id: 0,
            name: "first".to_string(),
            parent_id: None,
        },
        child::Model {
            id: 0,
            name: "second".to_string(),
            parent_id: None,
        },
    ];
    let (owner, children) = session
        .persist_with_children(
            parent::Model {
                id: 0,
                name: "owner".to_string(),
            },
            children,
        )
        .await?;
    info!(
        parent = owner.id,
        children = children.len(),
        "one persist call stored the whole family"
    );

    // Dropping a child from its parent deletes the orphaned row.
    session
        .remove_orphan::<parent::Model>(owner.id, children[0].id)
        .await?;
    session.flush().await?;
    info!(
        gone = session.get::<child::Model>(children[0].id).await?.is_none(),
        "orphaned child deleted"
    );

    // Removing the parent takes the surviving child with it.
    session.remove_cascading::<parent::Model>(owner.id).await?;
    let stats = session.commit().await?;
    info!(deletes = stats.deletes, "cascade remove committed");
    Ok(())
}

/// The shop end to end: member, categories, order placement, cancellation.
pub async fn run_shop_scenario(db: &DatabaseConnection) -> Result<()> {
    info!("--- shop scenario ---");
    let member = core::member::create_member(
        db,
        "demo-member".to_string(),
        Some(28),
        crate::entities::RoleType::User,
        Some(Address::new("seoul", "teheran-ro", "06234")),
        Some(Period::starting(chrono::Utc::now())),
    )
    .await?;
    core::member::set_favorite_foods(
        db,
        member.id,
        &["kimchi".to_string(), "bulgogi".to_string()],
    )
    .await?;

    let album = match core::item::get_item_by_name(db, "demo-album").await? {
        Some(item) => item,
        None => {
            core::item::create_album(
                db,
                "demo-album".to_string(),
                18_000,
                10,
                Some("demo artist".to_string()),
            )
            .await?
        }
    };
    let book = match core::item::get_item_by_name(db, "demo-book").await? {
        Some(item) => item,
        None => {
            core::item::create_book(
                db,
                "demo-book".to_string(),
                24_000,
                5,
                Some("demo author".to_string()),
            )
            .await?
        }
    };

    // A small category tree with both items filed under the child node.
    let root = core::category::create_category(db, "media".to_string(), None).await?;
    let sale = core::category::create_category(db, "on-sale".to_string(), Some(root.id)).await?;
    core::category::attach_item(db, sale.id, album.id).await?;
    core::category::attach_item(db, sale.id, book.id).await?;
    info!(
        in_category = core::category::get_items_in_category(db, sale.id).await?.len(),
        "category tree built"
    );

    let placed = core::order::place_order(
        db,
        member.id,
        &[
            OrderLine {
                item_id: album.id,
                count: 2,
            },
            OrderLine {
                item_id: book.id,
                count: 1,
            },
        ],
        Address::new("busan", "haeundae", "48094"),
    )
    .await?;
    info!(
        order = placed.order.id,
        total = placed.total(),
        "order placed, stock decremented"
    );

    let cancelled = core::order::cancel_order(db, placed.order.id).await?;
    let restored = core::item::get_item_by_id(db, album.id)
        .await?
        .ok_or(Error::ItemNotFound {
            name: album.name.clone(),
        })?;
    info!(
        status = ?cancelled.status,
        album_stock = restored.stock_quantity,
        "order cancelled, stock restored"
    );
    Ok(())
}
