//! Derived statistics over already-fetched, project-scoped records.
//!
//! Everything here is recomputed from scratch on every call: there is no
//! incremental path and input order carries no meaning except for the order
//! of `sprint_progress` and the board columns, which follow their inputs.

use serde::Serialize;

use crate::models::project::{Project, ProjectStatus};
use crate::models::sprint::{Sprint, SprintStatus};
use crate::models::task::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
    pub by_priority: PriorityCounts,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub total_estimated: f64,
    pub total_actual: f64,
    /// Percent over (positive) or under (negative) the estimate.
    pub variance: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintProgress {
    pub sprint_id: String,
    pub name: String,
    pub status: SprintStatus,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub progress: u32,
}

/// One bar of a distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub task_stats: TaskStats,
    pub status_shares: Vec<Share<TaskStatus>>,
    pub priority_shares: Vec<Share<TaskPriority>>,
    pub time_stats: TimeStats,
    pub sprint_progress: Vec<SprintProgress>,
    pub sprint_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub on_hold: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskBoard {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub review: Vec<Task>,
    pub done: Vec<Task>,
}

/// `part / whole` as a whole-number percentage, 0 for an empty whole.
fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Review => stats.review += 1,
                TaskStatus::Done => stats.done += 1,
            }
            match task.priority {
                TaskPriority::Low => stats.by_priority.low += 1,
                TaskPriority::Medium => stats.by_priority.medium += 1,
                TaskPriority::High => stats.by_priority.high += 1,
                TaskPriority::Critical => stats.by_priority.critical += 1,
            }
        }

        stats.completion_rate = rounded_percent(stats.done, stats.total);
        stats
    }

    /// Unrounded share of `count` in the total, for distribution bars.
    pub fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }

    pub fn status_count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Review => self.review,
            TaskStatus::Done => self.done,
        }
    }

    pub fn priority_count(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::Low => self.by_priority.low,
            TaskPriority::Medium => self.by_priority.medium,
            TaskPriority::High => self.by_priority.high,
            TaskPriority::Critical => self.by_priority.critical,
        }
    }

    pub fn status_shares(&self) -> Vec<Share<TaskStatus>> {
        TaskStatus::ALL
            .iter()
            .map(|&key| {
                let count = self.status_count(key);
                Share {
                    key,
                    count,
                    percent: self.share(count),
                }
            })
            .collect()
    }

    /// Most urgent first, the order the priority chart reads in.
    pub fn priority_shares(&self) -> Vec<Share<TaskPriority>> {
        TaskPriority::ALL
            .iter()
            .rev()
            .map(|&key| {
                let count = self.priority_count(key);
                Share {
                    key,
                    count,
                    percent: self.share(count),
                }
            })
            .collect()
    }
}

impl TimeStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total_estimated: f64 = tasks.iter().map(|t| t.estimated_hours).sum();
        let total_actual: f64 = tasks.iter().map(|t| t.actual_hours).sum();

        let variance = if total_estimated > 0.0 {
            (total_actual - total_estimated) / total_estimated * 100.0
        } else {
            0.0
        };
        let efficiency = if total_actual > 0.0 {
            total_estimated / total_actual * 100.0
        } else {
            100.0
        };

        // Overflowed sums would serialize as null.
        let finite_or = |value: f64, fallback: f64| if value.is_finite() { value } else { fallback };
        let total_estimated = finite_or(total_estimated, f64::MAX);
        let total_actual = finite_or(total_actual, f64::MAX);
        let variance = finite_or(variance, 0.0);
        let efficiency = finite_or(efficiency, 100.0);

        TimeStats {
            total_estimated,
            total_actual,
            variance,
            efficiency,
        }
    }
}

impl SprintProgress {
    pub fn for_sprint(sprint: &Sprint, tasks: &[Task]) -> Self {
        let (completed_tasks, total_tasks) = tasks
            .iter()
            .filter(|t| t.sprint_id.as_deref() == Some(sprint.id.as_str()))
            .fold((0, 0), |(done, total), t| {
                (done + usize::from(t.status == TaskStatus::Done), total + 1)
            });

        SprintProgress {
            sprint_id: sprint.id.clone(),
            name: sprint.name.clone(),
            status: sprint.status,
            completed_tasks,
            total_tasks,
            progress: rounded_percent(completed_tasks, total_tasks),
        }
    }
}

impl TaskBoard {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = TaskBoard::default();
        for task in tasks {
            let column = match task.status {
                TaskStatus::Todo => &mut board.todo,
                TaskStatus::InProgress => &mut board.in_progress,
                TaskStatus::Review => &mut board.review,
                TaskStatus::Done => &mut board.done,
            };
            column.push(task);
        }
        board
    }
}

pub fn aggregate(tasks: &[Task], sprints: &[Sprint]) -> ProjectReport {
    let task_stats = TaskStats::from_tasks(tasks);
    ProjectReport {
        status_shares: task_stats.status_shares(),
        priority_shares: task_stats.priority_shares(),
        task_stats,
        time_stats: TimeStats::from_tasks(tasks),
        sprint_progress: sprints
            .iter()
            .map(|sprint| SprintProgress::for_sprint(sprint, tasks))
            .collect(),
        sprint_count: sprints.len(),
    }
}

pub fn summarize_projects(projects: &[Project]) -> PortfolioStats {
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();
    PortfolioStats {
        total: projects.len(),
        active: count(ProjectStatus::Active),
        completed: count(ProjectStatus::Completed),
        on_hold: count(ProjectStatus::OnHold),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{project, sprint, task};
    use super::*;
    use proptest::prelude::*;

    fn in_sprint(mut t: Task, sprint_id: &str) -> Task {
        t.sprint_id = Some(sprint_id.to_string());
        t
    }

    #[test]
    fn test_empty_input_is_zeroed() {
        let report = aggregate(&[], &[]);
        assert_eq!(report.task_stats, TaskStats::default());
        assert_eq!(report.task_stats.completion_rate, 0);
        assert_eq!(report.time_stats.total_estimated, 0.0);
        assert_eq!(report.time_stats.total_actual, 0.0);
        assert_eq!(report.time_stats.variance, 0.0);
        assert_eq!(report.time_stats.efficiency, 100.0);
        assert!(report.sprint_progress.is_empty());
        assert_eq!(report.sprint_count, 0);
        assert!(report.status_shares.iter().all(|s| s.count == 0 && s.percent == 0.0));
    }

    #[test]
    fn test_time_figures() {
        let tasks = vec![
            task("a", TaskStatus::Done, 4.0, 5.0),
            task("b", TaskStatus::Todo, 2.0, 0.0),
        ];
        let report = aggregate(&tasks, &[]);

        assert_eq!(report.task_stats.total, 2);
        assert_eq!(report.task_stats.done, 1);
        assert_eq!(report.task_stats.todo, 1);
        assert_eq!(report.task_stats.completion_rate, 50);
        assert_eq!(report.time_stats.total_estimated, 6.0);
        assert_eq!(report.time_stats.total_actual, 5.0);
        assert!((report.time_stats.variance - (-16.666_666)).abs() < 1e-3);
        assert!((report.time_stats.efficiency - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_actual_hours_means_full_efficiency() {
        let tasks = vec![task("a", TaskStatus::Todo, 8.0, 0.0)];
        let time = TimeStats::from_tasks(&tasks);
        assert_eq!(time.efficiency, 100.0);
        assert_eq!(time.variance, -100.0);
    }

    #[test]
    fn test_overflowing_hours_stay_finite() {
        let tasks = vec![
            task("a", TaskStatus::Done, 1e308, 1e308),
            task("b", TaskStatus::Todo, 1e308, 1e308),
        ];
        let time = TimeStats::from_tasks(&tasks);
        assert!(time.total_estimated.is_finite());
        assert!(time.total_actual.is_finite());
        assert_eq!(time.variance, 0.0);
        assert_eq!(time.efficiency, 100.0);

        let json = serde_json::to_value(&aggregate(&tasks, &[])).unwrap();
        assert!(json["time_stats"]["variance"].is_number());
        assert!(json["time_stats"]["efficiency"].is_number());
    }

    #[test]
    fn test_sprint_progress_rounds() {
        let s = sprint("s1");
        let tasks = vec![
            in_sprint(task("a", TaskStatus::Done, 1.0, 1.0), "s1"),
            in_sprint(task("b", TaskStatus::Review, 1.0, 1.0), "s1"),
            in_sprint(task("c", TaskStatus::Todo, 1.0, 1.0), "s1"),
            task("d", TaskStatus::Done, 1.0, 1.0),
        ];

        let progress = SprintProgress::for_sprint(&s, &tasks);
        assert_eq!(progress.completed_tasks, 1);
        assert_eq!(progress.total_tasks, 3);
        assert_eq!(progress.progress, 33);
    }

    #[test]
    fn test_sprint_without_tasks_has_zero_progress() {
        let report = aggregate(&[task("a", TaskStatus::Done, 0.0, 0.0)], &[sprint("s1")]);
        assert_eq!(report.sprint_count, 1);
        assert_eq!(report.sprint_progress[0].total_tasks, 0);
        assert_eq!(report.sprint_progress[0].progress, 0);
    }

    #[test]
    fn test_two_thirds_rounds_up() {
        let tasks = vec![
            task("a", TaskStatus::Done, 0.0, 0.0),
            task("b", TaskStatus::Done, 0.0, 0.0),
            task("c", TaskStatus::Todo, 0.0, 0.0),
        ];
        assert_eq!(TaskStats::from_tasks(&tasks).completion_rate, 67);
    }

    #[test]
    fn test_share() {
        let tasks = vec![
            task("a", TaskStatus::Review, 0.0, 0.0),
            task("b", TaskStatus::Todo, 0.0, 0.0),
            task("c", TaskStatus::Todo, 0.0, 0.0),
            task("d", TaskStatus::Todo, 0.0, 0.0),
        ];
        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.share(stats.review), 25.0);
        assert_eq!(TaskStats::default().share(0), 0.0);

        let shares = stats.status_shares();
        assert_eq!(shares[0].key, TaskStatus::Todo);
        assert_eq!(shares[0].count, 3);
        assert_eq!(shares[0].percent, 75.0);
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);

        let priorities = stats.priority_shares();
        assert_eq!(priorities[0].key, TaskPriority::Critical);
        assert_eq!(priorities[2].count, 4);
    }

    #[test]
    fn test_board_columns_keep_order() {
        let tasks = vec![
            task("a", TaskStatus::Done, 0.0, 0.0),
            task("b", TaskStatus::Todo, 0.0, 0.0),
            task("c", TaskStatus::Done, 0.0, 0.0),
        ];
        let board = TaskBoard::from_tasks(tasks);
        let done: Vec<&str> = board.done.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(done, vec!["a", "c"]);
        assert_eq!(board.todo.len(), 1);
        assert!(board.in_progress.is_empty());
        assert!(board.review.is_empty());
    }

    #[test]
    fn test_summarize_projects() {
        let projects = vec![
            project("a", ProjectStatus::Active),
            project("b", ProjectStatus::Active),
            project("c", ProjectStatus::OnHold),
            project("d", ProjectStatus::Planning),
        ];
        let stats = summarize_projects(&projects);
        assert_eq!(
            stats,
            PortfolioStats {
                total: 4,
                active: 2,
                completed: 0,
                on_hold: 1,
            }
        );
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (
            proptest::sample::select(TaskStatus::ALL.to_vec()),
            proptest::sample::select(TaskPriority::ALL.to_vec()),
            0.0..100.0f64,
            0.0..100.0f64,
        )
            .prop_map(|(status, priority, est, act)| {
                let mut t = task("x", status, est, act);
                t.priority = priority;
                t
            })
    }

    proptest! {
        #[test]
        fn prop_status_buckets_sum_to_total(tasks in proptest::collection::vec(arb_task(), 0..60)) {
            let stats = TaskStats::from_tasks(&tasks);
            prop_assert_eq!(stats.todo + stats.in_progress + stats.review + stats.done, stats.total);
            prop_assert_eq!(stats.total, tasks.len());
        }

        #[test]
        fn prop_priority_buckets_sum_to_total(tasks in proptest::collection::vec(arb_task(), 0..60)) {
            let stats = TaskStats::from_tasks(&tasks);
            let p = &stats.by_priority;
            prop_assert_eq!(p.low + p.medium + p.high + p.critical, stats.total);
        }

        #[test]
        fn prop_completion_rate_never_drops_as_tasks_finish(
            tasks in proptest::collection::vec(arb_task(), 1..40)
        ) {
            let mut tasks = tasks;
            let mut last = TaskStats::from_tasks(&tasks).completion_rate;
            for i in 0..tasks.len() {
                tasks[i].status = TaskStatus::Done;
                let rate = TaskStats::from_tasks(&tasks).completion_rate;
                prop_assert!(rate >= last);
                prop_assert!(rate <= 100);
                last = rate;
            }
            prop_assert_eq!(last, 100);
        }

        #[test]
        fn prop_sprint_totals_bounded_by_task_count(
            tasks in proptest::collection::vec(arb_task(), 0..40),
            assignment in proptest::collection::vec(0..3usize, 40)
        ) {
            let sprints = vec![sprint("s0"), sprint("s1")];
            let tasks: Vec<Task> = tasks
                .into_iter()
                .zip(assignment)
                .map(|(t, slot)| if slot < 2 { in_sprint(t, &format!("s{}", slot)) } else { t })
                .collect();

            let report = aggregate(&tasks, &sprints);
            let assigned: usize = report.sprint_progress.iter().map(|p| p.total_tasks).sum();
            prop_assert!(assigned <= tasks.len());
            for p in &report.sprint_progress {
                prop_assert!(p.completed_tasks <= p.total_tasks);
                prop_assert!(p.progress <= 100);
            }
        }
    }
}
