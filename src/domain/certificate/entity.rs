//! Certificate entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::course::CourseId;
use crate::domain::user::UserId;

/// A certificate issued to a user for completing a course.
///
/// The certificate number is the public handle used for verification; it is
/// safe to print on the certificate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    id: String,
    /// Public, human-readable verification number (`TPC-...`)
    certificate_number: String,
    user_id: UserId,
    course_id: CourseId,
    /// Course title at issuance time; survives later course edits
    course_title: String,
    issued_at: DateTime<Utc>,
}

impl Certificate {
    /// Issue a new certificate
    pub fn new(
        certificate_number: impl Into<String>,
        user_id: UserId,
        course_id: CourseId,
        course_title: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            certificate_number: certificate_number.into(),
            user_id,
            course_id,
            course_title: course_title.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn certificate_number(&self) -> &str {
        &self.certificate_number
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Restore persisted state. Used by repositories when loading rows.
    pub fn restore(
        id: String,
        certificate_number: String,
        user_id: UserId,
        course_id: CourseId,
        course_title: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            certificate_number,
            user_id,
            course_id,
            course_title,
            issued_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_creation() {
        let user = UserId::generate();
        let course = CourseId::generate();
        let cert = Certificate::new("TPC-ABCD1234", user.clone(), course.clone(), "Intro to Rust");

        assert_eq!(cert.certificate_number(), "TPC-ABCD1234");
        assert_eq!(cert.user_id(), &user);
        assert_eq!(cert.course_id(), &course);
        assert_eq!(cert.course_title(), "Intro to Rust");
    }
}
