//! Accessible-set filtering for list and count operations.
//!
//! The bulk predicate here must agree item-for-item with the single-resource
//! evaluator; a project is listed exactly when [`can_use_project`] allows it.

use super::can_use_project;
use super::membership::is_affiliated_id;
use crate::domain::{Actor, EntityId, Project, Task, TaskStatus};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Listing predicate handed to repositories.
///
/// Carries only what the visibility rules read: the caller's id and whether
/// the caller is an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFilter {
    pub user_id: EntityId,
    pub admin: bool,
}

impl AccessFilter {
    pub fn for_actor(actor: &Actor) -> Self {
        Self {
            user_id: actor.id,
            admin: actor.is_admin(),
        }
    }

    /// Admin, owner, or affiliated with the project's team
    pub fn matches_project(&self, project: &Project) -> bool {
        self.admin
            || project.owner_id == Some(self.user_id)
            || is_affiliated_id(self.user_id, project.team.as_ref())
    }

    /// Admin, assignee, project owner, or affiliated with the project's team
    pub fn matches_task(&self, task: &Task) -> bool {
        if self.admin || task.assignee_id == Some(self.user_id) {
            return true;
        }
        task.project
            .as_ref()
            .is_some_and(|project| self.matches_project(project))
    }
}

/// Whether `project` appears in the actor's project listing
pub fn is_project_visible(actor: &Actor, project: &Project) -> bool {
    can_use_project(actor, project)
}

/// Whether `task` appears in the actor's task listing
pub fn is_task_visible(actor: &Actor, task: &Task) -> bool {
    AccessFilter::for_actor(actor).matches_task(task)
}

/// Projects `filter` admits, most recent first
pub fn accessible_projects<I>(filter: &AccessFilter, candidates: I) -> Vec<Project>
where
    I: IntoIterator<Item = Project>,
{
    let mut seen = HashSet::new();
    let mut projects: Vec<Project> = candidates
        .into_iter()
        .filter(|p| filter.matches_project(p) && seen.insert(p.id))
        .collect();
    projects.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));
    projects
}

/// Tasks `filter` admits, most recent first
pub fn accessible_tasks<I>(filter: &AccessFilter, candidates: I) -> Vec<Task>
where
    I: IntoIterator<Item = Task>,
{
    let mut seen = HashSet::new();
    let mut tasks: Vec<Task> = candidates
        .into_iter()
        .filter(|t| filter.matches_task(t) && seen.insert(t.id))
        .collect();
    tasks.sort_by(|a, b| newest_first(a.created_at, a.id, b.created_at, b.id));
    tasks
}

/// Number of distinct admitted tasks in `status`
pub fn count_accessible_tasks_by_status<'a, I>(
    filter: &AccessFilter,
    candidates: I,
    status: TaskStatus,
) -> u64
where
    I: IntoIterator<Item = &'a Task>,
{
    candidates
        .into_iter()
        .filter(|t| t.status == status && filter.matches_task(t))
        .map(|t| t.id)
        .collect::<HashSet<_>>()
        .len() as u64
}

/// `created_at` descending, then id ascending
pub(crate) fn newest_first<T: Ord>(
    a_time: T,
    a_id: EntityId,
    b_time: T,
    b_id: EntityId,
) -> Ordering {
    b_time.cmp(&a_time).then_with(|| a_id.cmp(&b_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Team};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn id(n: u128) -> EntityId {
        EntityId::from_u128(n)
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn team_t() -> Team {
        Team::new("T", id(2)).with_members([id(1), id(3)])
    }

    fn project(n: u128, owner: Option<u128>, team: Option<Team>, minutes: i64) -> Project {
        let mut p = Project::new(format!("P{}", n), owner.map(id));
        p.id = id(n);
        p.team = team;
        p.created_at = epoch() + Duration::minutes(minutes);
        p
    }

    fn task(n: u128, assignee: Option<u128>, project: Option<Project>, minutes: i64) -> Task {
        let mut t = Task::new(format!("T{}", n), assignee.map(id));
        t.id = id(n);
        t.project = project;
        t.created_at = epoch() + Duration::minutes(minutes);
        t
    }

    fn projects() -> Vec<Project> {
        vec![
            project(10, Some(1), None, 0),
            project(11, None, Some(team_t()), 5),
            project(12, Some(9), None, 10),
            project(13, None, None, 15),
            project(14, Some(9), Some(team_t()), 5),
        ]
    }

    fn tasks() -> Vec<Task> {
        let ps = projects();
        vec![
            task(20, Some(1), None, 0),
            task(21, None, Some(ps[1].clone()), 1),
            task(22, Some(9), Some(ps[2].clone()), 2),
            task(23, None, Some(ps[0].clone()), 3),
            task(24, None, None, 4),
        ]
    }

    #[test]
    fn test_bulk_filter_matches_single_item_evaluator() {
        for n in [1, 2, 3, 4, 9, 42] {
            for role in Role::ALL {
                let actor = Actor::new(id(n), role);
                let filter = AccessFilter::for_actor(&actor);
                for p in projects() {
                    assert_eq!(filter.matches_project(&p), can_use_project(&actor, &p));
                    assert_eq!(filter.matches_project(&p), is_project_visible(&actor, &p));
                }
            }
        }
    }

    #[test]
    fn test_admin_sees_everything() {
        let admin = AccessFilter::for_actor(&Actor::new(id(100), Role::Admin));
        assert_eq!(accessible_projects(&admin, projects()).len(), 5);
        assert_eq!(accessible_tasks(&admin, tasks()).len(), 5);
    }

    #[test]
    fn test_accessible_projects_for_member() {
        let actor = Actor::new(id(1), Role::Member);
        let ids: Vec<EntityId> = accessible_projects(&AccessFilter::for_actor(&actor), projects())
            .into_iter()
            .map(|p| p.id)
            .collect();
        // 11 and 14 tie at minute 5 and are ordered by id
        assert_eq!(ids, vec![id(11), id(14), id(10)]);
    }

    #[test]
    fn test_accessible_projects_excludes_foreign_teamless_projects() {
        let actor = Actor::new(id(3), Role::TeamLead);
        let visible = accessible_projects(&AccessFilter::for_actor(&actor), projects());
        assert!(visible.iter().all(|p| p.team.is_some() || p.owner_id == Some(id(3))));
        assert!(!visible.iter().any(|p| p.id == id(13)));
    }

    #[test]
    fn test_accessible_projects_dedups_by_id() {
        let actor = Actor::new(id(1), Role::Member);
        let mut candidates = projects();
        candidates.push(projects()[0].clone());
        assert_eq!(accessible_projects(&AccessFilter::for_actor(&actor), candidates).len(), 3);
    }

    #[test]
    fn test_accessible_tasks_union() {
        // Actor 9 is assignee of 22 and owner of project 12
        let actor = Actor::new(id(9), Role::Member);
        let ids: Vec<EntityId> = accessible_tasks(&AccessFilter::for_actor(&actor), tasks())
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![id(22)]);

        // Actor 1: assigned 20, affiliated with T (21), owner of project 10 (23)
        let actor = Actor::new(id(1), Role::Member);
        let ids: Vec<EntityId> = accessible_tasks(&AccessFilter::for_actor(&actor), tasks())
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![id(23), id(21), id(20)]);
    }

    #[test]
    fn test_guest_affiliate_sees_team_tasks() {
        let guest = Actor::new(id(3), Role::Guest);
        let visible = accessible_tasks(&AccessFilter::for_actor(&guest), tasks());
        assert_eq!(visible.len(), 1);
        assert!(is_task_visible(&guest, &visible[0]));
    }

    #[test]
    fn test_count_accessible_tasks_by_status() {
        let mut all = tasks();
        all[0].status = TaskStatus::Done;
        all[1].status = TaskStatus::Done;
        all[2].status = TaskStatus::Done;

        let member = AccessFilter::for_actor(&Actor::new(id(1), Role::Member));
        assert_eq!(count_accessible_tasks_by_status(&member, &all, TaskStatus::Done), 2);
        assert_eq!(count_accessible_tasks_by_status(&member, &all, TaskStatus::Todo), 1);

        let admin = AccessFilter::for_actor(&Actor::new(id(100), Role::Admin));
        assert_eq!(count_accessible_tasks_by_status(&admin, &all, TaskStatus::Done), 3);
    }
}
