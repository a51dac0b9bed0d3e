//! Client-side task ordering.

use std::cmp::Ordering;

use crate::fields::SortField;
use crate::settings::Settings;
use crate::task::Task;

/// Return a new vector with the tasks ordered per the settings, leaving the
/// input untouched.
///
/// The comparator has no secondary key; `slice::sort_by` is stable, so
/// equal-key tasks retain their relative order. An unrecognised sort field
/// (already coerced to `Unsorted` at the settings boundary) preserves the
/// input order outright.
pub fn sort_tasks(tasks: &[Task], settings: &Settings) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    let cmp: fn(&Task, &Task) -> Ordering = match settings.layout_order {
        SortField::Az => |a, b| a.title.cmp(&b.title),
        SortField::Date => |a, b| a.created_at_utc.cmp(&b.created_at_utc),
        SortField::Priority => |a, b| a.priority.rank().cmp(&b.priority.rank()),
        SortField::Unsorted => return sorted,
    };
    if settings.layout_asc {
        sorted.sort_by(cmp);
    } else {
        sorted.sort_by(|a, b| cmp(b, a));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{LayoutStyle, Priority, Status};
    use crate::task::Schedule;

    fn task(id: u64, title: &str, priority: Priority, created_at_utc: i64) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            status: Status::Pending,
            priority,
            schedule: Schedule::default(),
            category: None,
            assignee: None,
            created_at_utc,
            updated_at_utc: created_at_utc,
            completed_at_utc: None,
        }
    }

    fn settings(order: SortField, asc: bool) -> Settings {
        Settings {
            layout_style: LayoutStyle::Grid,
            layout_order: order,
            layout_asc: asc,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "cherry", Priority::High, 300),
            task(2, "apple", Priority::Low, 100),
            task(3, "banana", Priority::Medium, 200),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn priority_sorts_numerically_both_directions() {
        let sorted = sort_tasks(&sample(), &settings(SortField::Priority, true));
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
        let sorted = sort_tasks(&sample(), &settings(SortField::Priority, false));
        assert_eq!(ids(&sorted), vec![1, 3, 2]);
    }

    #[test]
    fn az_reversing_direction_reverses_order() {
        let asc = sort_tasks(&sample(), &settings(SortField::Az, true));
        let desc = sort_tasks(&sample(), &settings(SortField::Az, false));
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(ids(&desc), ids(&reversed));
        assert_eq!(ids(&asc), vec![2, 3, 1]);
    }

    #[test]
    fn date_sorts_on_creation_time() {
        let sorted = sort_tasks(&sample(), &settings(SortField::Date, true));
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn unsorted_preserves_input_order() {
        let sorted = sort_tasks(&sample(), &settings(SortField::Unsorted, true));
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
        let sorted = sort_tasks(&sample(), &settings(SortField::Unsorted, false));
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let cfg = settings(SortField::Az, true);
        let once = sort_tasks(&sample(), &cfg);
        let twice = sort_tasks(&once, &cfg);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn sorting_preserves_the_id_multiset() {
        let input = sample();
        for order in [
            SortField::Az,
            SortField::Date,
            SortField::Priority,
            SortField::Unsorted,
        ] {
            let sorted = sort_tasks(&input, &settings(order, false));
            let mut before = ids(&input);
            let mut after = ids(&sorted);
            before.sort_unstable();
            after.sort_unstable();
            assert_eq!(before, after);
        }
        // Input is untouched.
        assert_eq!(ids(&input), vec![1, 2, 3]);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let tasks = vec![
            task(1, "same", Priority::Medium, 50),
            task(2, "same", Priority::Medium, 50),
            task(3, "same", Priority::Medium, 50),
        ];
        for order in [SortField::Az, SortField::Date, SortField::Priority] {
            let sorted = sort_tasks(&tasks, &settings(order, false));
            assert_eq!(ids(&sorted), vec![1, 2, 3]);
        }
    }

    #[test]
    fn title_comparison_is_case_sensitive() {
        let tasks = vec![
            task(1, "apple", Priority::Low, 0),
            task(2, "Banana", Priority::Low, 0),
        ];
        // Uppercase sorts before lowercase in a byte-wise comparison.
        let sorted = sort_tasks(&tasks, &settings(SortField::Az, true));
        assert_eq!(ids(&sorted), vec![2, 1]);
    }
}
