//! Team/developer business logic - the plain one-to-many association with the
//! foreign key on the developer side.

use crate::{
    entities::{Developer, Team, developer, team},
    errors::{Error, Result},
    session::LazyRef,
};
use sea_orm::{QueryOrder, Set, prelude::*};

pub async fn create_team(db: &DatabaseConnection, name: String) -> Result<team::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Team name cannot be empty".to_string(),
        });
    }
    team::ActiveModel {
        name: Set(name.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a developer, optionally already on a team.
pub async fn create_developer(
    db: &DatabaseConnection,
    name: String,
    team_id: Option<i64>,
) -> Result<developer::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Developer name cannot be empty".to_string(),
        });
    }
    if let Some(tid) = team_id {
        Team::find_by_id(tid)
            .one(db)
            .await?
            .ok_or(Error::TeamNotFound { id: tid })?;
    }
    developer::ActiveModel {
        name: Set(name.trim().to_string()),
        team_id: Set(team_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Moves a developer onto a team. Setting the foreign key here is the only
/// write the association needs; the team side just reads it back.
pub async fn assign_team(
    db: &DatabaseConnection,
    developer_id: i64,
    team_id: i64,
) -> Result<developer::Model> {
    Team::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or(Error::TeamNotFound { id: team_id })?;
    let model = Developer::find_by_id(developer_id)
        .one(db)
        .await?
        .ok_or(Error::DeveloperNotFound { id: developer_id })?;

    let mut active: developer::ActiveModel = model.into();
    active.team_id = Set(Some(team_id));
    active.update(db).await.map_err(Into::into)
}

/// The roster of a team, read through the relation from the inverse side.
pub async fn get_developers_of_team(
    db: &DatabaseConnection,
    team_id: i64,
) -> Result<Vec<developer::Model>> {
    let model = Team::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or(Error::TeamNotFound { id: team_id })?;
    model
        .find_related(Developer)
        .order_by_asc(developer::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// An uninitialized reference to a developer's team, resolved on first use
/// through a session.
pub fn team_ref(dev: &developer::Model) -> Option<LazyRef<team::Model>> {
    dev.team_id.map(LazyRef::new)
}
