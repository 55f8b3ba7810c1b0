//! Team lifecycle and membership tests against the in-memory store

use pms_core::domain::{CreateTeamInput, EntityId, UpdateTeamInput, UpdateTeamMembersInput};
use pms_core::{AppError, HasServices};
use pretty_assertions::assert_eq;

mod common;

use common::{project_input, world};

#[tokio::test]
async fn test_owner_survives_membership_replacement() {
    let w = world().await;
    let teams = w.state.team_service();

    let updated = teams
        .update_members(
            &w.lead,
            w.team.id,
            UpdateTeamMembersInput {
                member_ids: Some(vec![w.lead.id]),
            },
        )
        .await
        .unwrap();

    let mut expected = vec![w.owner.id, w.lead.id];
    expected.sort();
    assert_eq!(updated.member_ids.into_iter().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_unknown_member_ids_are_ignored() {
    let w = world().await;
    let updated = w
        .state
        .team_service()
        .update_members(
            &w.admin,
            w.team.id,
            UpdateTeamMembersInput {
                member_ids: Some(vec![w.member.id, EntityId::new_v4()]),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.member_ids.len(), 2);
    assert!(updated.member_ids.contains(&w.member.id));
}

#[tokio::test]
async fn test_membership_changes_require_affiliated_team_lead() {
    let w = world().await;
    let teams = w.state.team_service();
    let input = UpdateTeamMembersInput {
        member_ids: Some(vec![]),
    };

    for actor in [&w.owner, &w.member, &w.guest, &w.outsider] {
        let result = teams.update_members(actor, w.team.id, input.clone()).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }

    // Nothing was persisted by the denied attempts
    let team = teams.get(&w.admin, w.team.id).await.unwrap();
    assert_eq!(team.member_ids.len(), 4);
}

#[tokio::test]
async fn test_removed_member_loses_access_to_team_project() {
    let w = world().await;
    let projects = w.state.project_service();
    assert!(projects.get(&w.member, w.team_project.id).await.is_ok());

    w.state
        .team_service()
        .update_members(
            &w.lead,
            w.team.id,
            UpdateTeamMembersInput {
                member_ids: Some(vec![w.lead.id, w.guest.id]),
            },
        )
        .await
        .unwrap();

    let result = projects.get(&w.member, w.team_project.id).await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    assert!(projects.list(&w.member).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_team_names_are_unique_ignoring_case() {
    let w = world().await;
    let teams = w.state.team_service();

    assert!(teams.check_name_exists(" core ").await.unwrap());
    assert!(!teams.check_name_exists("").await.unwrap());

    let result = teams
        .create(
            &w.lead,
            CreateTeamInput {
                name: "CORE".to_string(),
                description: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let other = teams
        .create(
            &w.lead,
            CreateTeamInput {
                name: "Platform".to_string(),
                description: Some("Infra".to_string()),
            },
        )
        .await
        .unwrap();
    let result = teams
        .update(
            &w.lead,
            other.id,
            UpdateTeamInput {
                name: Some("core".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_my_teams_lists_owned_and_joined() {
    let w = world().await;
    let teams = w.state.team_service();

    assert_eq!(teams.my_teams(&w.guest).await.unwrap().len(), 1);
    assert!(teams.my_teams(&w.outsider).await.unwrap().is_empty());

    teams
        .create(
            &w.outsider,
            CreateTeamInput {
                name: "Solo".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let mine = teams.my_teams(&w.outsider).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].owner_id, w.outsider.id);
}

#[tokio::test]
async fn test_only_owner_or_admin_deletes_team() {
    let w = world().await;
    let teams = w.state.team_service();

    let result = teams.delete(&w.lead, w.team.id).await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));

    teams.delete(&w.owner, w.team.id).await.unwrap();
    let result = teams.get(&w.admin, w.team.id).await;
    assert!(matches!(result, Err(AppError::PreconditionMissing(_))));
}

#[tokio::test]
async fn test_deleting_team_detaches_its_projects() {
    let w = world().await;
    let owned = w
        .state
        .project_service()
        .create(&w.member, project_input("Member's team project", Some(&w.team)))
        .await
        .unwrap();

    w.state
        .team_service()
        .delete(&w.admin, w.team.id)
        .await
        .unwrap();

    let projects = w.state.project_service();
    let reloaded = projects.get(&w.member, owned.id).await.unwrap();
    assert!(reloaded.team.is_none());

    // The ownerless project is now reachable by admins only
    let result = projects.get(&w.lead, w.team_project.id).await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    assert!(projects.get(&w.admin, w.team_project.id).await.is_ok());
}

#[tokio::test]
async fn test_project_cannot_join_foreign_team() {
    let w = world().await;
    let result = w
        .state
        .project_service()
        .create(&w.outsider, project_input("Hijack", Some(&w.team)))
        .await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}

#[tokio::test]
async fn test_team_details_visible_to_affiliates_only() {
    let w = world().await;
    let teams = w.state.team_service();

    for actor in [&w.owner, &w.member, &w.lead, &w.guest, &w.admin] {
        let team = teams.get(actor, w.team.id).await.unwrap();
        assert_eq!(team.member_ids.len(), 4);
    }

    let result = teams.get(&w.outsider, w.team.id).await;
    assert!(matches!(result, Err(AppError::PermissionDenied(_))));
}

#[tokio::test]
async fn test_blank_rename_keeps_current_name() {
    let w = world().await;
    let updated = w
        .state
        .team_service()
        .update(
            &w.owner,
            w.team.id,
            UpdateTeamInput {
                name: Some("   ".to_string()),
                description: Some("Core services".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Core");
    assert_eq!(updated.description.as_deref(), Some("Core services"));
}
