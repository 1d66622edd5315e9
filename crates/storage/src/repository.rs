use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rollcall_core::model::{
    AttendanceRecord, AttendanceStatus, ClassAssignment, ClassId, ClassInfo, Credentials,
    NewClass, Program, ProgramId, StaffId, StaffProfile, StudentId, StudentProfile, UserId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A signed-in backend session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
    pub email: Option<String>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// How long before `expires_at` a session is already treated as expired.
pub const SESSION_REFRESH_MARGIN: Duration = Duration::seconds(60);

impl AuthSession {
    /// Whether the access token expires within [`SESSION_REFRESH_MARGIN`] of `now`.
    ///
    /// Sessions without an expiry never need a refresh.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - SESSION_REFRESH_MARGIN <= now)
    }
}

/// Row written to `class_staff` when a staff member takes on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignmentRecord {
    pub class_id: ClassId,
    pub staff_id: StaffId,
    pub subject: String,
    pub role: String,
}

/// Authentication against the hosted backend.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a session and remember it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unauthorized` for rejected credentials.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, StorageError>;

    /// The session remembered by the last successful sign-in, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session store is unavailable.
    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError>;

    /// Forget the current session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the sign-out.
    async fn sign_out(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Find the staff profile linked to a user account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_staff_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StaffProfile>, StorageError>;

    /// List the classes (with subject) taught by a staff member.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_assignments(
        &self,
        staff_id: &StaffId,
        limit: Option<u32>,
    ) -> Result<Vec<ClassAssignment>, StorageError>;

    /// Assign a staff member to a class.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the assignment already exists.
    async fn insert_assignment(&self, record: &NewAssignmentRecord) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Fetch a class with its program name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_class(&self, id: &ClassId) -> Result<Option<ClassInfo>, StorageError>;

    /// Create a class and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the class cannot be stored.
    async fn insert_class(&self, class: &NewClass) -> Result<ClassInfo, StorageError>;

    /// Delete a class. Deleting a missing class is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_class(&self, id: &ClassId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_programs(&self) -> Result<Vec<Program>, StorageError>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Students enrolled in a class, in enrollment order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_enrolled(&self, class_id: &ClassId) -> Result<Vec<StudentProfile>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn count_enrolled(&self, class_id: &ClassId) -> Result<u32, StorageError>;

    /// Any students, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_students(&self, limit: u32) -> Result<Vec<StudentProfile>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the student is already enrolled.
    async fn enroll(&self, class_id: &ClassId, student_id: &StudentId) -> Result<(), StorageError>;

    /// Removing a student who is not enrolled is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn unenroll(&self, class_id: &ClassId, student_id: &StudentId)
    -> Result<(), StorageError>;
}

/// Writer and readers for `attendance` rows.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Write a batch of attendance rows as-is (plain insert).
    ///
    /// Rows are unique per class, student, subject and date; nothing is
    /// written when any row repeats an existing one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` for a repeated row.
    /// Returns `StorageError` if the backend rejects the batch.
    async fn insert_records(&self, records: &[AttendanceRecord]) -> Result<(), StorageError>;

    /// Statuses of every row dated `date` in any of the given classes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn statuses_on(
        &self,
        class_ids: &[ClassId],
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError>;

    /// Most recent date on or after `since` with rows for this class and subject.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn latest_session_date(
        &self,
        class_id: &ClassId,
        subject: &str,
        since: NaiveDate,
    ) -> Result<Option<NaiveDate>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn statuses_for_session(
        &self,
        class_id: &ClassId,
        subject: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct StoredClass {
    id: ClassId,
    program_id: ProgramId,
    year: u32,
    section: String,
    academic_year: Option<String>,
    room_number: Option<String>,
    capacity: Option<u32>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<String, (String, UserId)>,
    session: Option<AuthSession>,
    staff: Vec<StaffProfile>,
    programs: Vec<Program>,
    classes: Vec<StoredClass>,
    assignments: Vec<NewAssignmentRecord>,
    students: Vec<StudentProfile>,
    enrollments: Vec<(ClassId, StudentId)>,
    attendance: Vec<AttendanceRecord>,
}

impl Tables {
    fn class_info(&self, stored: &StoredClass) -> ClassInfo {
        let program_name = self
            .programs
            .iter()
            .find(|program| program.id == stored.program_id)
            .map(|program| program.name.clone());
        ClassInfo {
            id: stored.id.clone(),
            program_name,
            year: stored.year,
            section: stored.section.clone(),
            academic_year: stored.academic_year.clone(),
            room_number: stored.room_number.clone(),
            capacity: stored.capacity,
        }
    }
}

/// Simple in-memory backend for tests and the offline demo.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Register a login account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn add_account(
        &self,
        email: &str,
        password: &str,
        user_id: UserId,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .accounts
            .insert(email.to_lowercase(), (password.to_string(), user_id));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn add_staff(&self, staff: StaffProfile) -> Result<(), StorageError> {
        self.lock()?.staff.push(staff);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn add_program(&self, program: Program) -> Result<(), StorageError> {
        self.lock()?.programs.push(program);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn add_student(&self, student: StudentProfile) -> Result<(), StorageError> {
        self.lock()?.students.push(student);
        Ok(())
    }

    /// All attendance rows written so far, in write order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store is poisoned.
    pub fn attendance_rows(&self) -> Result<Vec<AttendanceRecord>, StorageError> {
        Ok(self.lock()?.attendance.clone())
    }
}

#[async_trait]
impl AuthGateway for InMemoryRepository {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, StorageError> {
        let mut guard = self.lock()?;
        let email = credentials.email().to_lowercase();
        let user_id = match guard.accounts.get(&email) {
            Some((password, user_id)) if password == credentials.password() => user_id.clone(),
            _ => {
                return Err(StorageError::Unauthorized(
                    "Invalid login credentials".to_string(),
                ));
            }
        };
        let session = AuthSession {
            access_token: format!("memory-{}", uuid::Uuid::new_v4()),
            refresh_token: None,
            expires_at: None,
            user_id,
            email: Some(email),
        };
        guard.session = Some(session.clone());
        Ok(session)
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, StorageError> {
        Ok(self.lock()?.session.clone())
    }

    async fn sign_out(&self) -> Result<(), StorageError> {
        self.lock()?.session = None;
        Ok(())
    }
}

#[async_trait]
impl StaffRepository for InMemoryRepository {
    async fn find_staff_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StaffProfile>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .staff
            .iter()
            .find(|staff| &staff.user_id == user_id)
            .cloned())
    }

    async fn list_assignments(
        &self,
        staff_id: &StaffId,
        limit: Option<u32>,
    ) -> Result<Vec<ClassAssignment>, StorageError> {
        let guard = self.lock()?;
        let limit = limit.map_or(usize::MAX, |value| value as usize);
        let assignments = guard
            .assignments
            .iter()
            .filter(|row| &row.staff_id == staff_id)
            .filter_map(|row| {
                guard
                    .classes
                    .iter()
                    .find(|class| class.id == row.class_id)
                    .map(|class| ClassAssignment {
                        class: guard.class_info(class),
                        subject: row.subject.clone(),
                    })
            })
            .take(limit)
            .collect();
        Ok(assignments)
    }

    async fn insert_assignment(&self, record: &NewAssignmentRecord) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.classes.iter().any(|class| class.id == record.class_id) {
            return Err(StorageError::NotFound);
        }
        let exists = guard.assignments.iter().any(|row| {
            row.class_id == record.class_id
                && row.staff_id == record.staff_id
                && row.subject == record.subject
        });
        if exists {
            return Err(StorageError::Conflict);
        }
        guard.assignments.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl ClassRepository for InMemoryRepository {
    async fn get_class(&self, id: &ClassId) -> Result<Option<ClassInfo>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .classes
            .iter()
            .find(|class| &class.id == id)
            .map(|class| guard.class_info(class)))
    }

    async fn insert_class(&self, class: &NewClass) -> Result<ClassInfo, StorageError> {
        let mut guard = self.lock()?;
        if !guard
            .programs
            .iter()
            .any(|program| program.id == class.program_id)
        {
            return Err(StorageError::NotFound);
        }
        let stored = StoredClass {
            id: ClassId::new(uuid::Uuid::new_v4().to_string()),
            program_id: class.program_id.clone(),
            year: class.year,
            section: class.section.clone(),
            academic_year: Some(class.academic_year.clone()),
            room_number: class.room_number.clone(),
            capacity: class.capacity,
        };
        let info = guard.class_info(&stored);
        guard.classes.push(stored);
        Ok(info)
    }

    async fn delete_class(&self, id: &ClassId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.classes.retain(|class| &class.id != id);
        guard.assignments.retain(|row| &row.class_id != id);
        guard.enrollments.retain(|(class_id, _)| class_id != id);
        Ok(())
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StorageError> {
        Ok(self.lock()?.programs.clone())
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn list_enrolled(&self, class_id: &ClassId) -> Result<Vec<StudentProfile>, StorageError> {
        let guard = self.lock()?;
        let students = guard
            .enrollments
            .iter()
            .filter(|(enrolled_class, _)| enrolled_class == class_id)
            .filter_map(|(_, student_id)| {
                guard
                    .students
                    .iter()
                    .find(|student| &student.id == student_id)
                    .cloned()
            })
            .collect();
        Ok(students)
    }

    async fn count_enrolled(&self, class_id: &ClassId) -> Result<u32, StorageError> {
        let guard = self.lock()?;
        let count = guard
            .enrollments
            .iter()
            .filter(|(enrolled_class, _)| enrolled_class == class_id)
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }

    async fn list_students(&self, limit: u32) -> Result<Vec<StudentProfile>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .students
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn enroll(&self, class_id: &ClassId, student_id: &StudentId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.classes.iter().any(|class| &class.id == class_id)
            || !guard.students.iter().any(|student| &student.id == student_id)
        {
            return Err(StorageError::NotFound);
        }
        let already = guard
            .enrollments
            .iter()
            .any(|(c, s)| c == class_id && s == student_id);
        if already {
            return Err(StorageError::Conflict);
        }
        guard
            .enrollments
            .push((class_id.clone(), student_id.clone()));
        Ok(())
    }

    async fn unenroll(
        &self,
        class_id: &ClassId,
        student_id: &StudentId,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .enrollments
            .retain(|(c, s)| !(c == class_id && s == student_id));
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn insert_records(&self, records: &[AttendanceRecord]) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let mut seen: HashSet<(&ClassId, &StudentId, &str, NaiveDate)> = guard
            .attendance
            .iter()
            .map(|row| (&row.class_id, &row.student_id, row.subject.as_str(), row.date))
            .collect();
        for row in records {
            if !seen.insert((&row.class_id, &row.student_id, row.subject.as_str(), row.date)) {
                return Err(StorageError::Conflict);
            }
        }
        guard.attendance.extend_from_slice(records);
        Ok(())
    }

    async fn statuses_on(
        &self,
        class_ids: &[ClassId],
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .attendance
            .iter()
            .filter(|row| row.date == date && class_ids.contains(&row.class_id))
            .map(|row| row.status)
            .collect())
    }

    async fn latest_session_date(
        &self,
        class_id: &ClassId,
        subject: &str,
        since: NaiveDate,
    ) -> Result<Option<NaiveDate>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .attendance
            .iter()
            .filter(|row| &row.class_id == class_id && row.subject == subject && row.date >= since)
            .map(|row| row.date)
            .max())
    }

    async fn statuses_for_session(
        &self,
        class_id: &ClassId,
        subject: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceStatus>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .attendance
            .iter()
            .filter(|row| &row.class_id == class_id && row.subject == subject && row.date == date)
            .map(|row| row.status)
            .collect())
    }
}

/// Aggregates backend repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub auth: Arc<dyn AuthGateway>,
    pub staff: Arc<dyn StaffRepository>,
    pub classes: Arc<dyn ClassRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository, keeping the caller's handle usable for seeding.
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let auth: Arc<dyn AuthGateway> = Arc::new(repo.clone());
        let staff: Arc<dyn StaffRepository> = Arc::new(repo.clone());
        let classes: Arc<dyn ClassRepository> = Arc::new(repo.clone());
        let students: Arc<dyn StudentRepository> = Arc::new(repo.clone());
        let attendance: Arc<dyn AttendanceRepository> = Arc::new(repo);
        Self {
            auth,
            staff,
            classes,
            students,
            attendance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::model::LoginDraft;

    async fn seeded() -> (InMemoryRepository, ClassInfo) {
        let repo = InMemoryRepository::new();
        repo.add_program(Program {
            id: ProgramId::new("p1"),
            name: "BCA".into(),
        })
        .unwrap();
        let info = repo
            .insert_class(&NewClass {
                program_id: ProgramId::new("p1"),
                year: 2,
                section: "A".into(),
                academic_year: "2025".into(),
                room_number: None,
                capacity: None,
                subject: "Maths".into(),
            })
            .await
            .unwrap();
        (repo, info)
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let repo = InMemoryRepository::new();
        repo.add_account("staff@college.edu", "secret1", UserId::new("u1"))
            .unwrap();

        let wrong = LoginDraft::new("staff@college.edu", "secret2").validate().unwrap();
        assert!(matches!(
            repo.sign_in(&wrong).await,
            Err(StorageError::Unauthorized(_))
        ));
        assert!(repo.current_session().await.unwrap().is_none());

        let right = LoginDraft::new("Staff@College.edu", "secret1").validate().unwrap();
        let session = repo.sign_in(&right).await.unwrap();
        assert_eq!(session.user_id, UserId::new("u1"));
        assert!(repo.current_session().await.unwrap().is_some());

        repo.sign_out().await.unwrap();
        assert!(repo.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inserted_class_resolves_program_name() {
        let (_repo, info) = seeded().await;
        assert_eq!(info.display_name(), "BCA 2-A");
        assert_eq!(info.academic_year.as_deref(), Some("2025"));
    }

    #[tokio::test]
    async fn enroll_rejects_duplicates() {
        let (repo, info) = seeded().await;
        repo.add_student(StudentProfile::new(StudentId::new("s1"), "Asha", "a@x.io", "101"))
            .unwrap();

        repo.enroll(&info.id, &StudentId::new("s1")).await.unwrap();
        assert!(matches!(
            repo.enroll(&info.id, &StudentId::new("s1")).await,
            Err(StorageError::Conflict)
        ));
        assert_eq!(repo.count_enrolled(&info.id).await.unwrap(), 1);

        repo.unenroll(&info.id, &StudentId::new("s1")).await.unwrap();
        repo.unenroll(&info.id, &StudentId::new("s1")).await.unwrap();
        assert_eq!(repo.count_enrolled(&info.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_class_cascades_memberships() {
        let (repo, info) = seeded().await;
        repo.add_student(StudentProfile::new(StudentId::new("s1"), "Asha", "a@x.io", "101"))
            .unwrap();
        repo.enroll(&info.id, &StudentId::new("s1")).await.unwrap();

        repo.delete_class(&info.id).await.unwrap();
        assert!(repo.get_class(&info.id).await.unwrap().is_none());
        assert_eq!(repo.count_enrolled(&info.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_attendance_row_is_a_conflict() {
        let (repo, info) = seeded().await;
        let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let row = |student: &str, status| AttendanceRecord {
            class_id: info.id.clone(),
            student_id: StudentId::new(student),
            subject: "Maths".into(),
            date,
            status,
        };

        repo.insert_records(&[row("s1", AttendanceStatus::Present)])
            .await
            .unwrap();
        let err = repo
            .insert_records(&[
                row("s2", AttendanceStatus::Present),
                row("s1", AttendanceStatus::Absent),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert_eq!(repo.attendance_rows().unwrap().len(), 1);

        let next_day = AttendanceRecord {
            date: date.succ_opt().unwrap(),
            ..row("s1", AttendanceStatus::Absent)
        };
        repo.insert_records(&[next_day]).await.unwrap();
        assert_eq!(repo.attendance_rows().unwrap().len(), 2);
    }

    #[test]
    fn session_refresh_window() {
        let now = Utc::now();
        let session = |expires_at| AuthSession {
            access_token: "jwt".into(),
            refresh_token: Some("refresh".into()),
            expires_at,
            user_id: UserId::new("u1"),
            email: None,
        };
        assert!(!session(None).needs_refresh(now));
        assert!(!session(Some(now + Duration::minutes(10))).needs_refresh(now));
        assert!(session(Some(now + Duration::seconds(30))).needs_refresh(now));
        assert!(session(Some(now - Duration::minutes(1))).needs_refresh(now));
    }
}
