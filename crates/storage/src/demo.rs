//! Sample data for running the app without a hosted backend.

use chrono::{Days, NaiveDate};
use rollcall_core::model::{
    AttendanceRecord, AttendanceStatus, ClassId, NewClass, Program, ProgramId, StaffId,
    StaffProfile, StudentId, StudentProfile, UserId,
};

use crate::repository::{
    AttendanceRepository, ClassRepository, InMemoryRepository, NewAssignmentRecord,
    StaffRepository, Storage, StorageError, StudentRepository,
};

pub const DEMO_EMAIL: &str = "demo@college.edu";
pub const DEMO_PASSWORD: &str = "attendance";

const PROGRAMS: [(&str, &str); 3] = [
    ("p-bca", "BCA"),
    ("p-bsc", "BSc Computer Science"),
    ("p-bcom", "BCom"),
];

const STUDENTS: [(&str, &str, &str); 10] = [
    ("s-01", "Aarav Mehta", "BCA-001"),
    ("s-02", "Diya Nair", "BCA-002"),
    ("s-03", "Ishaan Rao", "BCA-003"),
    ("s-04", "Kavya Iyer", "BCA-004"),
    ("s-05", "Meera Joshi", "BCA-005"),
    ("s-06", "Neil D'Souza", "BSC-001"),
    ("s-07", "Priya Sharma", "BSC-002"),
    ("s-08", "Rohan Kulkarni", "BSC-003"),
    ("s-09", "Sana Qureshi", "BSC-004"),
    ("s-10", "Vikram Singh", "BSC-005"),
];

/// Seed `repo` with a signed-up staff member, two taught classes, enrolled
/// students, and a recorded session two days before `today`.
///
/// # Errors
///
/// Returns `StorageError` if the repository rejects any row.
pub async fn seed(repo: &InMemoryRepository, today: NaiveDate) -> Result<(), StorageError> {
    let user_id = UserId::new("u-demo");
    let staff_id = StaffId::new("staff-demo");
    repo.add_account(DEMO_EMAIL, DEMO_PASSWORD, user_id.clone())?;
    repo.add_staff(StaffProfile::new(staff_id.clone(), user_id, "Demo Lecturer"))?;

    for (id, name) in PROGRAMS {
        repo.add_program(Program {
            id: ProgramId::new(id),
            name: name.to_string(),
        })?;
    }
    for (id, name, roll) in STUDENTS {
        let email = format!("{}@students.college.edu", roll.to_lowercase());
        repo.add_student(StudentProfile::new(StudentId::new(id), name, email, roll))?;
    }

    let bca = create_class(repo, &staff_id, "p-bca", 2, "A", "Data Structures").await?;
    let bsc = create_class(repo, &staff_id, "p-bsc", 1, "B", "Discrete Mathematics").await?;

    for (index, (id, _, _)) in STUDENTS.iter().enumerate() {
        let class_id = if index < 5 { &bca } else { &bsc };
        repo.enroll(class_id, &StudentId::new(*id)).await?;
    }

    let session_date = today.checked_sub_days(Days::new(2)).unwrap_or(today);
    let records: Vec<AttendanceRecord> = STUDENTS
        .iter()
        .take(5)
        .enumerate()
        .map(|(index, (id, _, _))| AttendanceRecord {
            class_id: bca.clone(),
            student_id: StudentId::new(*id),
            subject: "Data Structures".to_string(),
            date: session_date,
            status: if index == 3 {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::Present
            },
        })
        .collect();
    repo.insert_records(&records).await?;

    tracing::debug!(%session_date, "demo data seeded");
    Ok(())
}

/// An in-memory `Storage` pre-filled by [`seed`].
///
/// # Errors
///
/// Returns `StorageError` if seeding fails.
pub async fn demo_storage(today: NaiveDate) -> Result<Storage, StorageError> {
    let repo = InMemoryRepository::new();
    seed(&repo, today).await?;
    Ok(Storage::from_in_memory(repo))
}

async fn create_class(
    repo: &InMemoryRepository,
    staff_id: &StaffId,
    program: &str,
    year: u32,
    section: &str,
    subject: &str,
) -> Result<ClassId, StorageError> {
    let class = repo
        .insert_class(&NewClass {
            program_id: ProgramId::new(program),
            year,
            section: section.to_string(),
            academic_year: "2024-25".to_string(),
            room_number: Some(format!("R-{year}{section}")),
            capacity: Some(60),
            subject: subject.to_string(),
        })
        .await?;
    repo.insert_assignment(&NewAssignmentRecord {
        class_id: class.id.clone(),
        staff_id: staff_id.clone(),
        subject: subject.to_string(),
        role: "Instructor".to_string(),
    })
    .await?;
    Ok(class.id)
}
