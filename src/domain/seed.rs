use chrono::NaiveDate;

use crate::domain::session::{Session, SessionDuration};
use crate::domain::training::Training;

const SEED_YEAR: i32 = 2026;

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(SEED_YEAR, month, day).expect("seed dates are valid")
}

fn seeded(id: &str, slots: &[(u32, u32, &str, u32)]) -> Vec<Session> {
    slots
        .iter()
        .enumerate()
        .map(|(index, (month, dom, time, hours))| {
            Session::new(
                format!("{id}-s{index}"),
                day(*month, *dom),
                *time,
                SessionDuration::from_hours(*hours),
            )
        })
        .collect()
}

/// A small two-quarter workload exercising rates, extras and multi-month courses.
pub fn demo_trainings() -> Vec<Training> {
    let mut evening = Training::new("Evening Rendering Course", "Marta", 35.0)
        .with_id("evening-rendering")
        .with_color("emerald")
        .with_sessions(seeded(
            "evening-rendering",
            &[
                (2, 2, "15:00 - 17:00", 2),
                (2, 4, "15:00 - 17:00", 2),
                (2, 9, "15:00 - 17:00", 2),
                (2, 11, "15:00 - 17:00", 2),
                (3, 2, "15:00 - 17:00", 2),
                (3, 4, "15:00 - 17:00", 2),
            ],
        ));
    evening.schedule = "Mon and Wed 15:00-17:00".into();

    let mut workshop = Training::new("Studio Lighting Workshop", "Rui", 65.0)
        .with_id("studio-lighting")
        .with_color("orange")
        .with_extra(400.0)
        .with_sessions(seeded(
            "studio-lighting",
            &[
                (2, 3, "13:30 - 17:30", 4),
                (2, 5, "13:30 - 17:30", 4),
                (2, 10, "13:30 - 17:30", 4),
                (3, 3, "13:30 - 17:30", 4),
            ],
        ));
    workshop.schedule = "Tue and Thu 13:30-17:30".into();

    let mut late_payment = Training::new("Archive Project (late payment)", "Client", 0.0)
        .with_id("archive-project")
        .with_color("red")
        .with_extra(500.0)
        .with_sessions(seeded("archive-project", &[(2, 1, "09:00 - 10:00", 1)]));
    late_payment.schedule = "One-off payment".into();

    let mut modules = Training::new("3D Visualisation Modules", "Various", 50.0)
        .with_id("viz-modules")
        .with_color("pink")
        .with_sessions(seeded(
            "viz-modules",
            &[
                (3, 10, "10:00 - 12:00", 2),
                (3, 12, "10:00 - 12:00", 2),
                (4, 7, "10:00 - 12:00", 2),
                (4, 9, "10:00 - 12:00", 2),
                (5, 5, "10:00 - 13:00", 3),
            ],
        ));
    modules.schedule = "Tue and Thu 10:00-12:00".into();

    vec![evening, workshop, late_payment, modules]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let trainings = demo_trainings();
        let mut ids: Vec<&str> = trainings
            .iter()
            .flat_map(|t| t.sessions.iter().map(|s| s.id.as_str()))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert!(trainings.iter().all(|t| t.total_sessions as usize == t.sessions.len()));
    }
}
