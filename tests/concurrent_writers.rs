//! Separate connections racing on the same database file.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use gymcoach::db::SessionStore;
use gymcoach::workout::{NewSet, PlanInput};
use gymcoach::{Database, Scheduler, Tracker};
use uuid::Uuid;

fn week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
}

#[test]
fn test_concurrent_plan_saves_leave_one_plan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coach.db");
    Database::open(&path).unwrap().seed_catalog().unwrap();

    let user = Uuid::new_v4();
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["Push", "Pull"]
        .into_iter()
        .map(|title| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let plan: PlanInput = serde_json::from_str(&format!(
                    r#"{{"sessions": [
                        {{"day": "Monday", "title": "{title}", "exercises": [{{"name": "bench", "sets": 3, "reps": 5}}]}},
                        {{"day": "Thursday", "title": "{title}"}}
                    ]}}"#
                ))
                .unwrap();
                let mut db = Database::open(&path).unwrap();
                barrier.wait();
                Scheduler::new(&mut db).save_plan(user, week(), &plan).unwrap()
            })
        })
        .collect();

    let saved: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(saved.iter().all(|s| s.sessions_created == 2));

    let mut db = Database::open(&path).unwrap();
    let plans: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM workout_plans WHERE user_id = ?1",
            [user.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(plans, 1);

    let sessions = Scheduler::new(&mut db).list_week(user, week()).unwrap();
    assert_eq!(sessions.len(), 2);

    // Every surviving session belongs to whichever save committed last
    let winner = sessions[0].plan_id.unwrap();
    assert!(saved.iter().any(|s| s.plan_id == winner));
    assert!(sessions.iter().all(|s| s.plan_id == Some(winner)));
    assert_eq!(sessions[0].title, sessions[1].title);
}

#[test]
fn test_concurrent_logging_numbers_sets_without_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coach.db");
    let user = Uuid::new_v4();

    let session = {
        let mut db = Database::open(&path).unwrap();
        db.seed_catalog().unwrap();
        let plan: PlanInput = serde_json::from_str(r#"{"sessions": [{"day": "Tuesday", "title": "Legs"}]}"#).unwrap();
        Scheduler::new(&mut db).save_plan(user, week(), &plan).unwrap();
        let id = Scheduler::new(&mut db).list_week(user, week()).unwrap()[0].id;
        Tracker::new(&mut db).start_session(user, id).unwrap();
        id
    };

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let path = path.clone();
            thread::spawn(move || {
                let mut db = Database::open(&path).unwrap();
                let set = NewSet::new("squat", 100.0 + i as f64, 5);
                Tracker::new(&mut db).log_set(user, session, &set).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut db = Database::open(&path).unwrap();
    assert!(SessionStore::new(db.connection()).get(user, session).unwrap().is_some());
    let mut numbers: Vec<u32> = Tracker::new(&mut db)
        .list_sets(user, session, "squat")
        .unwrap()
        .into_iter()
        .map(|log| log.set_number)
        .collect();
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}
