//! Row shapes exchanged with PostgREST and their conversion into domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::model::{
    AttendanceStatus, ClassAssignment, ClassId, ClassInfo, NewClass, Program, ProgramId, StaffId,
    StaffProfile, StudentId, StudentProfile, UserId,
};
use serde::{Deserialize, Serialize};

use crate::repository::{AuthSession, StorageError};

/// Column list for a class with its program name embedded.
pub(crate) const CLASS_COLUMNS: &str =
    "id,year,section,academic_year,room_number,capacity,program:programs(name)";

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: TokenUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<TokenResponse> for AuthSession {
    fn from(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_at
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            user_id: token.user.id,
            email: token.user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StaffRow {
    pub id: StaffId,
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<StaffRow> for StaffProfile {
    fn from(row: StaffRow) -> Self {
        StaffProfile::new(row.id, row.user_id, row.name.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgramRow {
    pub id: ProgramId,
    pub name: String,
}

impl From<ProgramRow> for Program {
    fn from(row: ProgramRow) -> Self {
        Program {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgramNameRow {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassRow {
    pub id: ClassId,
    pub year: u32,
    pub section: String,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub program: Option<ProgramNameRow>,
}

impl From<ClassRow> for ClassInfo {
    fn from(row: ClassRow) -> Self {
        ClassInfo {
            id: row.id,
            program_name: row.program.map(|program| program.name),
            year: row.year,
            section: row.section,
            academic_year: row.academic_year,
            room_number: row.room_number,
            capacity: row.capacity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentRow {
    pub subject: String,
    pub class: ClassRow,
}

impl From<AssignmentRow> for ClassAssignment {
    fn from(row: AssignmentRow) -> Self {
        ClassAssignment {
            class: row.class.into(),
            subject: row.subject,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentRow {
    pub id: StudentId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
}

impl From<StudentRow> for StudentProfile {
    fn from(row: StudentRow) -> Self {
        StudentProfile::new(
            row.id,
            row.name,
            row.email.unwrap_or_default(),
            row.roll_number.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentRow {
    pub student: StudentRow,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRow {
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DateRow {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewClassRow<'a> {
    pub program_id: &'a ProgramId,
    pub year: u32,
    pub section: &'a str,
    pub academic_year: &'a str,
    pub room_number: Option<&'a str>,
    pub capacity: Option<u32>,
}

impl<'a> From<&'a NewClass> for NewClassRow<'a> {
    fn from(class: &'a NewClass) -> Self {
        Self {
            program_id: &class.program_id,
            year: class.year,
            section: &class.section,
            academic_year: &class.academic_year,
            room_number: class.room_number.as_deref(),
            capacity: class.capacity,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentInsert<'a> {
    pub class_id: &'a ClassId,
    pub staff_id: &'a StaffId,
    pub subject: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentInsert<'a> {
    pub class_id: &'a ClassId,
    pub student_id: &'a StudentId,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.msg).or(parsed.error_description))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Map a non-success HTTP status and body to a `StorageError`.
pub(crate) fn status_error(status: u16, body: &str) -> StorageError {
    let message = error_message(body);
    match status {
        401 | 403 => StorageError::Unauthorized(message),
        404 | 406 => StorageError::NotFound,
        409 => StorageError::Conflict,
        _ => StorageError::Connection(format!("{status}: {message}")),
    }
}

/// GoTrue answers bad credentials with 400; treat that as an auth failure.
pub(crate) fn auth_status_error(status: u16, body: &str) -> StorageError {
    if status == 400 {
        StorageError::Unauthorized(error_message(body))
    } else {
        status_error(status, body)
    }
}

/// Total row count from a `Content-Range` header such as `0-24/30` or `*/0`.
pub(crate) fn content_range_total(header: &str) -> Option<u32> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

/// PostgREST `in.(...)` filter value with quoted members.
pub(crate) fn in_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = values
        .into_iter()
        .map(|value| format!("\"{}\"", value.replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

pub(crate) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}
