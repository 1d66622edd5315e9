use std::sync::Arc;

use rollcall_core::model::{ClassAssignment, StaffId, StaffProfile, UserId};
use storage::repository::{NewAssignmentRecord, StaffRepository, StorageError};

use super::test_harness::{
    ViewKind, demo_test_storage, mount, services_for, setup_view_harness,
};

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, false).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Staff Login"), "missing title in {html}");
    assert!(html.contains("Sign In"), "missing submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_recent_class() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Welcome back, Demo Lecturer"),
        "missing greeting in {html}"
    );
    assert!(html.contains("Recent Classes"), "missing heading in {html}");
    assert!(html.contains("Data Structures"), "missing subject in {html}");
    assert!(html.contains("4/5"), "missing counts in {html}");
    assert!(html.contains("80%"), "missing percentage in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn classes_view_smoke_lists_taught_classes() {
    let mut harness = setup_view_harness(ViewKind::Classes, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("My Classes"), "missing title in {html}");
    assert!(html.contains("BCA 2-A"), "missing BCA class in {html}");
    assert!(
        html.contains("BSc Computer Science 1-B"),
        "missing BSc class in {html}"
    );
    assert!(html.contains("5 students"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn class_detail_view_smoke_lists_enrolled_students() {
    let storage = demo_test_storage().await;
    let services = services_for(&storage, true).await;
    let staff = services.auth().current_staff().await.expect("staff");
    let cards = services.classes().list_classes(&staff).await.expect("cards");
    let bca = cards
        .iter()
        .find(|card| card.subject == "Data Structures")
        .expect("bca card");

    let mut harness = mount(services, ViewKind::ClassDetail(bca.class.id.to_string()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("BCA 2-A"), "missing class name in {html}");
    assert!(html.contains("Students (5)"), "missing count in {html}");
    assert!(html.contains("Aarav Mehta"), "missing student in {html}");
    assert!(!html.contains("Vikram Singh"), "unexpected student in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn new_class_view_smoke_lists_programs() {
    let mut harness = setup_view_harness(ViewKind::NewClass, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Select a program"), "missing placeholder in {html}");
    assert!(html.contains("BCom"), "missing program in {html}");
    assert!(html.contains("Create Class"), "missing submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attendance_view_smoke_waits_for_class_selection() {
    let mut harness = setup_view_harness(ViewKind::Attendance, true).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Take Attendance"), "missing title in {html}");
    assert!(html.contains("Select a class"), "missing picker in {html}");
    assert!(
        html.contains("Discrete Mathematics"),
        "missing class option in {html}"
    );
    assert!(
        html.contains("Select a class to load its students."),
        "missing prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn attendance_view_smoke_loads_selected_roster() {
    let storage = demo_test_storage().await;
    let services = services_for(&storage, true).await;
    let staff = services.auth().current_staff().await.expect("staff");
    let classes = services
        .attendance()
        .teaching_classes(&staff)
        .await
        .expect("classes");
    let index = classes
        .iter()
        .position(|assignment| assignment.subject == "Data Structures")
        .expect("bca assignment");

    let mut harness = mount(services, ViewKind::AttendanceFor(index));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Present: 5"), "missing present count in {html}");
    assert!(html.contains("Absent: 0"), "missing absent count in {html}");
    assert!(html.contains("100%"), "missing percentage in {html}");
    assert!(html.contains("Aarav Mehta"), "missing student in {html}");
    assert!(html.contains("BCA-005"), "missing roll number in {html}");
    assert!(!html.contains("Vikram Singh"), "unexpected student in {html}");
    assert!(
        html.contains("Submit Attendance"),
        "missing submit button in {html}"
    );
}

struct FailingAssignments {
    inner: Arc<dyn StaffRepository>,
}

#[async_trait::async_trait]
impl StaffRepository for FailingAssignments {
    async fn find_staff_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StaffProfile>, StorageError> {
        self.inner.find_staff_by_user(user_id).await
    }

    async fn list_assignments(
        &self,
        _staff_id: &StaffId,
        _limit: Option<u32>,
    ) -> Result<Vec<ClassAssignment>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn insert_assignment(&self, _record: &NewAssignmentRecord) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_error_state() {
    let mut storage = demo_test_storage().await;
    storage.staff = Arc::new(FailingAssignments {
        inner: Arc::clone(&storage.staff),
    });
    let services = services_for(&storage, true).await;

    let mut harness = mount(services, ViewKind::Dashboard);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("Something went wrong"),
        "missing error message in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}
