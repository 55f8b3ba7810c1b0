//! Common test utilities

#![allow(dead_code)]

use pms_core::domain::{
    Actor, CreateProjectInput, CreateTaskInput, CreateTeamInput, Project, Role, Task, Team,
    UpdateTeamMembersInput, User,
};
use pms_core::repository::{ProjectRepository, UserRepository};
use pms_core::{AppState, Config, HasServices};

/// A populated store shared by the integration tests.
///
/// Team "Core" is owned by `owner` (MEMBER) and has `member` (MEMBER),
/// `lead` (TEAM_LEAD) and `guest` (GUEST) as members. `outsider` is a
/// TEAM_LEAD with no affiliation. Project `team_project` has no owner and
/// belongs to the team.
pub struct World {
    pub state: AppState,
    pub admin: Actor,
    pub owner: Actor,
    pub member: Actor,
    pub lead: Actor,
    pub guest: Actor,
    pub outsider: Actor,
    pub team: Team,
    pub team_project: Project,
}

pub async fn add_user(state: &AppState, username: &str, role: Role) -> Actor {
    state
        .user_repo()
        .insert(&User {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            role,
            ..Default::default()
        })
        .await
        .unwrap()
        .actor()
}

pub fn project_input(name: &str, team: Option<&Team>) -> CreateProjectInput {
    CreateProjectInput {
        name: name.to_string(),
        description: None,
        status: None,
        start_date: None,
        end_date: None,
        team_id: team.map(|t| t.id),
    }
}

pub fn task_input(title: &str, project: Option<&Project>) -> CreateTaskInput {
    CreateTaskInput {
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        due_date: None,
        project_id: project.map(|p| p.id),
        assignee_id: None,
        tags: None,
    }
}

pub async fn world() -> World {
    let state = AppState::in_memory(Config::default());
    let admin = add_user(&state, "admin", Role::Admin).await;
    let owner = add_user(&state, "owner", Role::Member).await;
    let member = add_user(&state, "member", Role::Member).await;
    let lead = add_user(&state, "lead", Role::TeamLead).await;
    let guest = add_user(&state, "guest", Role::Guest).await;
    let outsider = add_user(&state, "outsider", Role::TeamLead).await;

    let team = state
        .team_service()
        .create(
            &owner,
            CreateTeamInput {
                name: "Core".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    let team = state
        .team_service()
        .update_members(
            &admin,
            team.id,
            UpdateTeamMembersInput {
                member_ids: Some(vec![member.id, lead.id, guest.id]),
            },
        )
        .await
        .unwrap();

    // Ownerless project: only team rules apply
    let mut team_project = state
        .project_service()
        .create(&admin, project_input("Team project", Some(&team)))
        .await
        .unwrap();
    team_project.owner_id = None;
    let team_project = ProjectRepository::update(&state.store, &team_project)
        .await
        .unwrap();

    World {
        state,
        admin,
        owner,
        member,
        lead,
        guest,
        outsider,
        team,
        team_project,
    }
}

/// A task in the team project, created by `member` and assigned to `assignee`
pub async fn team_task(world: &World, assignee: &Actor) -> Task {
    world
        .state
        .task_service()
        .create(
            &world.member,
            CreateTaskInput {
                assignee_id: Some(assignee.id),
                ..task_input("Team task", Some(&world.team_project))
            },
        )
        .await
        .unwrap()
}
