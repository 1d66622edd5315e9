use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rollcall_core::model::{
    ClassAssignment, ClassId, ClassInfo, NewClass, NewClassDraft, Program, ProgramId, StaffId,
    StaffProfile, StudentId, StudentProfile, UserId,
};
use services::{ClassService, ClassServiceError};
use storage::repository::{
    ClassRepository, InMemoryRepository, NewAssignmentRecord, StaffRepository, StorageError,
    StudentRepository,
};

/// Staff repository whose assignment writes always fail.
struct RejectingStaff(InMemoryRepository);

#[async_trait]
impl StaffRepository for RejectingStaff {
    async fn find_staff_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StaffProfile>, StorageError> {
        self.0.find_staff_by_user(user_id).await
    }

    async fn list_assignments(
        &self,
        staff_id: &StaffId,
        limit: Option<u32>,
    ) -> Result<Vec<ClassAssignment>, StorageError> {
        self.0.list_assignments(staff_id, limit).await
    }

    async fn insert_assignment(&self, _record: &NewAssignmentRecord) -> Result<(), StorageError> {
        Err(StorageError::Connection("class_staff is read-only".into()))
    }
}

/// Class repository that remembers the ids it created.
struct RecordingClasses {
    inner: InMemoryRepository,
    created: Mutex<Vec<ClassId>>,
}

#[async_trait]
impl ClassRepository for RecordingClasses {
    async fn get_class(&self, id: &ClassId) -> Result<Option<ClassInfo>, StorageError> {
        self.inner.get_class(id).await
    }

    async fn insert_class(&self, class: &NewClass) -> Result<ClassInfo, StorageError> {
        let info = self.inner.insert_class(class).await?;
        if let Ok(mut created) = self.created.lock() {
            created.push(info.id.clone());
        }
        Ok(info)
    }

    async fn delete_class(&self, id: &ClassId) -> Result<(), StorageError> {
        self.inner.delete_class(id).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>, StorageError> {
        self.inner.list_programs().await
    }
}

fn lecturer() -> StaffProfile {
    StaffProfile::new(StaffId::new("st-1"), UserId::new("u-1"), "Lecturer")
}

fn draft(subject: &str) -> NewClassDraft {
    NewClassDraft {
        program_id: Some(ProgramId::new("p-1")),
        year: "2".into(),
        section: "A".into(),
        academic_year: "2024-25".into(),
        room_number: String::new(),
        capacity: "40".into(),
        subject: subject.into(),
    }
}

fn repo_with_program() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.add_program(Program {
        id: ProgramId::new("p-1"),
        name: "BCA".into(),
    })
    .unwrap();
    repo
}

#[tokio::test]
async fn created_class_is_listed_for_its_creator() {
    let repo = Arc::new(repo_with_program());
    let service = ClassService::new(repo.clone(), repo.clone(), repo.clone());
    let staff = lecturer();

    let class = service.create_class(&staff, draft("Networks")).await.unwrap();
    assert_eq!(class.display_name(), "BCA 2-A");
    assert_eq!(class.capacity, Some(40));

    let cards = service.list_classes(&staff).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].subject, "Networks");
    assert_eq!(cards[0].student_count, 0);
}

#[tokio::test]
async fn failed_assignment_removes_created_class() {
    let repo = repo_with_program();
    let classes = Arc::new(RecordingClasses {
        inner: repo.clone(),
        created: Mutex::new(Vec::new()),
    });
    let service = ClassService::new(
        Arc::new(RejectingStaff(repo.clone())),
        classes.clone(),
        Arc::new(repo.clone()),
    );

    let err = service
        .create_class(&lecturer(), draft("Networks"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClassServiceError::Storage(StorageError::Connection(_))
    ));

    let created = classes.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert!(repo.get_class(&created[0]).await.unwrap().is_none());
    assert!(matches!(
        service.class_detail(&created[0]).await,
        Err(ClassServiceError::NotFound)
    ));
}

#[tokio::test]
async fn available_students_excludes_enrolled_and_sorts() {
    let repo = Arc::new(repo_with_program());
    for (id, name) in [("s1", "zoe"), ("s2", "Adam"), ("s3", "maya"), ("s4", "Ben")] {
        repo.add_student(StudentProfile::new(
            StudentId::new(id),
            name,
            format!("{id}@x.edu"),
            id.to_uppercase(),
        ))
        .unwrap();
    }
    let service = ClassService::new(repo.clone(), repo.clone(), repo.clone());
    let class = service.create_class(&lecturer(), draft("Maths")).await.unwrap();

    service.add_student(&class.id, &StudentId::new("s3")).await.unwrap();
    let names: Vec<String> = service
        .available_students(&class.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["Adam", "Ben", "zoe"]);

    let detail = service.class_detail(&class.id).await.unwrap();
    assert_eq!(detail.students.len(), 1);

    service.remove_student(&class.id, &StudentId::new("s3")).await.unwrap();
    assert_eq!(repo.count_enrolled(&class.id).await.unwrap(), 0);
}

#[tokio::test]
async fn enrolling_twice_surfaces_conflict() {
    let repo = Arc::new(repo_with_program());
    repo.add_student(StudentProfile::new(StudentId::new("s1"), "Asha", "", "1"))
        .unwrap();
    let service = ClassService::new(repo.clone(), repo.clone(), repo.clone());
    let class = service.create_class(&lecturer(), draft("Maths")).await.unwrap();

    service.add_student(&class.id, &StudentId::new("s1")).await.unwrap();
    let err = service
        .add_student(&class.id, &StudentId::new("s1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClassServiceError::Storage(StorageError::Conflict)));
}
