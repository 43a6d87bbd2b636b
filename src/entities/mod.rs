//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod address_history;
pub mod category;
pub mod category_item;
pub mod child;
pub mod delivery;
pub mod developer;
pub mod favorite_food;
pub mod item;
pub mod member;
pub mod order;
pub mod order_item;
pub mod parent;
pub mod team;

// Re-export specific types to avoid conflicts
pub use address_history::{Entity as AddressHistory, Model as AddressHistoryModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use category_item::{
    Column as CategoryItemColumn, Entity as CategoryItem, Model as CategoryItemModel,
};
pub use child::{Column as ChildColumn, Entity as Child, Model as ChildModel};
pub use delivery::{
    Column as DeliveryColumn, DeliveryStatus, Entity as Delivery, Model as DeliveryModel,
};
pub use developer::{Column as DeveloperColumn, Entity as Developer, Model as DeveloperModel};
pub use favorite_food::{Entity as FavoriteFood, Model as FavoriteFoodModel};
pub use item::{Column as ItemColumn, Entity as Item, ItemDetails, ItemType, Model as ItemModel};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel, RoleType};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel, OrderStatus};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use parent::{Column as ParentColumn, Entity as Parent, Model as ParentModel};
pub use team::{Column as TeamColumn, Entity as Team, Model as TeamModel};
