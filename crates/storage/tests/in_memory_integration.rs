use chrono::NaiveDate;
use rollcall_core::model::{AttendanceRoster, ClassId, LoginDraft, StudentId, StudentProfile};
use rollcall_core::time::fixed_clock;
use storage::demo::{self, DEMO_EMAIL, DEMO_PASSWORD};
use storage::repository::{
    AttendanceRepository, AuthGateway, ClassRepository, InMemoryRepository, StaffRepository,
    Storage, StorageError, StudentRepository,
};

async fn demo_repo() -> (InMemoryRepository, Storage) {
    let repo = InMemoryRepository::new();
    demo::seed(&repo, fixed_clock().today()).await.expect("seed");
    (repo.clone(), Storage::from_in_memory(repo))
}

#[tokio::test]
async fn roster_submission_lands_in_attendance_rows() {
    let (repo, storage) = demo_repo().await;
    let creds = LoginDraft::new(DEMO_EMAIL, DEMO_PASSWORD).validate().unwrap();
    let session = storage.auth.sign_in(&creds).await.expect("sign in");
    let staff = storage
        .staff
        .find_staff_by_user(&session.user_id)
        .await
        .unwrap()
        .expect("staff profile");
    let assignment = storage
        .staff
        .list_assignments(&staff.id, Some(1))
        .await
        .unwrap()
        .remove(0);

    let enrolled = storage
        .students
        .list_enrolled(&assignment.class.id)
        .await
        .unwrap();
    let mut roster = AttendanceRoster::new();
    roster.load(enrolled.iter().map(StudentProfile::to_roster_entry));
    roster.toggle(&enrolled[0].id);

    let today = fixed_clock().today();
    let before = repo.attendance_rows().unwrap().len();
    let records = roster.to_submission(&assignment.class.id, &assignment.subject, today);
    storage.attendance.insert_records(&records).await.unwrap();

    let rows = repo.attendance_rows().unwrap();
    assert_eq!(rows.len(), before + enrolled.len());
    let statuses = storage
        .attendance
        .statuses_for_session(&assignment.class.id, &assignment.subject, today)
        .await
        .unwrap();
    let tally = rollcall_core::model::StatusTally::from_statuses(&statuses);
    assert_eq!(tally.absent, 1);
    assert_eq!(tally.present as usize, enrolled.len() - 1);
}

#[tokio::test]
async fn statuses_on_only_counts_requested_classes_and_date() {
    let (_repo, storage) = demo_repo().await;
    let session_day = fixed_clock().days_ago(2);
    let creds = LoginDraft::new(DEMO_EMAIL, DEMO_PASSWORD).validate().unwrap();
    let session = storage.auth.sign_in(&creds).await.unwrap();
    let staff = storage
        .staff
        .find_staff_by_user(&session.user_id)
        .await
        .unwrap()
        .unwrap();
    let ids: Vec<ClassId> = storage
        .staff
        .list_assignments(&staff.id, None)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.class.id)
        .collect();

    assert_eq!(storage.attendance.statuses_on(&ids, session_day).await.unwrap().len(), 5);
    assert!(
        storage
            .attendance
            .statuses_on(&ids, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(storage.attendance.statuses_on(&[], session_day).await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_student_cannot_be_enrolled() {
    let (_repo, storage) = demo_repo().await;
    let programs = storage.classes.list_programs().await.unwrap();
    assert_eq!(programs.len(), 3);

    let err = storage
        .students
        .enroll(&ClassId::new("missing"), &StudentId::new("s-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn sign_out_clears_session() {
    let (_repo, storage) = demo_repo().await;
    let creds = LoginDraft::new(DEMO_EMAIL, DEMO_PASSWORD).validate().unwrap();
    storage.auth.sign_in(&creds).await.unwrap();
    assert!(storage.auth.current_session().await.unwrap().is_some());
    storage.auth.sign_out().await.unwrap();
    assert!(storage.auth.current_session().await.unwrap().is_none());
}
