//! Calendar bucketing by due date

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::models::Task;

/// A displayed calendar month, identified by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor(NaiveDate);

impl MonthCursor {
    /// Returns `None` for a month outside `1..=12` or an unrepresentable year
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    /// The month containing `now` in the viewer's time zone
    pub fn current<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        Self::containing(now.with_timezone(tz).date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.days().last().unwrap_or(self.0)
    }

    /// Every day of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.0.month();
        self.0.iter_days().take_while(move |d| d.month() == month)
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.0 - Duration::days(1))
    }

    pub fn next(&self) -> Self {
        Self(self.last_day() + Duration::days(1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

/// One calendar cell: a day and the tasks due on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub tasks: Vec<&'a Task>,
}

/// Local calendar day on which a task is due
pub fn due_day<Tz: TimeZone>(task: &Task, tz: &Tz) -> NaiveDate {
    task.due_date.with_timezone(tz).date_naive()
}

/// Tasks due on `date` in the viewer's time zone, time of day ignored
pub fn tasks_on_day<'a, Tz: TimeZone>(tasks: &'a [Task], date: NaiveDate, tz: &Tz) -> Vec<&'a Task> {
    tasks.iter().filter(|t| due_day(t, tz) == date).collect()
}

/// Every day of `month` with the tasks due that day, in collection order
pub fn calendar_month<'a, Tz: TimeZone>(
    tasks: &'a [Task],
    month: MonthCursor,
    tz: &Tz,
) -> Vec<CalendarDay<'a>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        let day = due_day(task, tz);
        if month.contains(day) {
            buckets.entry(day).or_default().push(task);
        }
    }

    month
        .days()
        .map(|date| CalendarDay {
            date,
            tasks: buckets.remove(&date).unwrap_or_default(),
        })
        .collect()
}

/// Open tasks due within the next seven days, soonest first
pub fn upcoming_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks.iter().filter(|t| t.is_upcoming(now)).collect();
    upcoming.sort_by_key(|t| t.due_date);
    upcoming
}

/// Open tasks past their due date, in collection order
pub fn overdue_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_overdue(now)).collect()
}

/// Open tasks due within the next 24 hours
pub fn due_soon_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_due_soon(now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberId, TaskId};
    use chrono::FixedOffset;

    fn task_due(due_date: DateTime<Utc>, completed: bool) -> Task {
        Task {
            id: TaskId::new(),
            title: "Task".to_string(),
            description: None,
            assigned_to: MemberId::new(),
            assigned_by: "Team Lead".to_string(),
            due_date,
            progress: if completed { 100 } else { 0 },
            completed,
            created_at: due_date,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_month_navigation() {
        let jan = MonthCursor::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthCursor::new(2023, 12).unwrap());
        assert_eq!(jan.next(), MonthCursor::new(2024, 2).unwrap());
        assert_eq!(jan.next().days().count(), 29);
        assert_eq!(MonthCursor::new(2023, 12).unwrap().next(), jan);
        assert!(MonthCursor::new(2024, 13).is_none());
    }

    #[test]
    fn test_containing_and_current() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let cursor = MonthCursor::containing(date);
        assert_eq!(cursor.first_day(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(cursor.last_day(), NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());

        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let current = MonthCursor::current(utc(2024, 5, 31, 22), &tz);
        assert_eq!((current.year(), current.month()), (2024, 6));
    }

    #[test]
    fn test_month_buckets_use_local_day() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let tasks = vec![
            task_due(utc(2024, 3, 10, 2), false),
            task_due(utc(2024, 3, 10, 18), false),
            task_due(utc(2024, 4, 1, 3), true),
            task_due(utc(2024, 2, 29, 12), false),
        ];

        let days = calendar_month(&tasks, MonthCursor::new(2024, 3).unwrap(), &tz);
        assert_eq!(days.len(), 31);
        assert_eq!(days[8].date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(days[8].tasks.len(), 1);
        assert_eq!(days[9].tasks.len(), 1);
        assert_eq!(days[30].tasks.len(), 1);
        assert_eq!(days.iter().map(|d| d.tasks.len()).sum::<usize>(), 3);
    }

    #[test]
    fn test_tasks_on_day() {
        let tasks = vec![
            task_due(utc(2024, 3, 10, 0), false),
            task_due(utc(2024, 3, 10, 23), true),
            task_due(utc(2024, 3, 11, 0), false),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(tasks_on_day(&tasks, day, &Utc).len(), 2);
    }

    #[test]
    fn test_upcoming_sorted_and_bounded() {
        let now = utc(2024, 3, 10, 12);
        let tasks = vec![
            task_due(now + Duration::days(5), false),
            task_due(now + Duration::days(1), false),
            task_due(now + Duration::days(2), true),
            task_due(now + Duration::days(7), false),
            task_due(now - Duration::hours(1), false),
            task_due(now, false),
        ];
        let upcoming = upcoming_tasks(&tasks, now);
        let due: Vec<_> = upcoming.iter().map(|t| t.due_date).collect();
        assert_eq!(due, vec![now, now + Duration::days(1), now + Duration::days(5)]);
    }

    #[test]
    fn test_overdue_and_due_soon() {
        let now = utc(2024, 3, 10, 12);
        let tasks = vec![
            task_due(now - Duration::days(1), false),
            task_due(now - Duration::days(1), true),
            task_due(now + Duration::hours(3), false),
            task_due(now + Duration::hours(30), false),
        ];
        assert_eq!(overdue_tasks(&tasks, now).len(), 1);
        let soon = due_soon_tasks(&tasks, now);
        assert_eq!(soon.len(), 1);
        assert_eq!(soon[0].due_date, now + Duration::hours(3));
    }
}
