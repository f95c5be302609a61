//! Certificate repository implementations

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::certificate::{Certificate, CertificateRepository};
use crate::domain::course::CourseId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of CertificateRepository
#[derive(Debug, Clone)]
pub struct PostgresCertificateRepository {
    pool: PgPool,
}

impl PostgresCertificateRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CERT_COLUMNS: &str = "id, certificate_number, user_id, course_id, course_title, issued_at";

#[async_trait]
impl CertificateRepository for PostgresCertificateRepository {
    async fn get(&self, id: &str) -> Result<Option<Certificate>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM certificates WHERE id = $1",
            CERT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get certificate: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_certificate(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Certificate>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM certificates WHERE certificate_number = $1",
            CERT_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to get certificate by number: {}", e))
        })?;

        match row {
            Some(row) => Ok(Some(row_to_certificate(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_for_user_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Certificate>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM certificates WHERE user_id = $1 AND course_id = $2",
            CERT_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(course_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to get certificate for course: {}", e))
        })?;

        match row {
            Some(row) => Ok(Some(row_to_certificate(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, certificate: Certificate) -> Result<Certificate, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO certificates (id, certificate_number, user_id, course_id,
                                      course_title, issued_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(certificate.id())
        .bind(certificate.certificate_number())
        .bind(certificate.user_id().as_str())
        .bind(certificate.course_id().as_str())
        .bind(certificate.course_title())
        .bind(certificate.issued_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("duplicate key") {
                DomainError::conflict("Certificate already issued for this course")
            } else {
                DomainError::storage(format!("Failed to store certificate: {}", e))
            }
        })?;

        Ok(certificate)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM certificates WHERE user_id = $1 ORDER BY issued_at DESC",
            CERT_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list certificates: {}", e)))?;

        let mut certificates = Vec::with_capacity(rows.len());

        for row in rows {
            certificates.push(row_to_certificate(&row)?);
        }

        Ok(certificates)
    }
}

fn row_to_certificate(row: &sqlx::postgres::PgRow) -> Result<Certificate, DomainError> {
    let user_id: String = row.get("user_id");
    let course_id: String = row.get("course_id");

    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(Certificate::restore(
        row.get("id"),
        row.get("certificate_number"),
        user_id,
        CourseId::new(course_id),
        row.get("course_title"),
        row.get("issued_at"),
    ))
}

/// In-memory implementation of CertificateRepository for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryCertificateRepository {
    certificates: Arc<RwLock<HashMap<String, Certificate>>>,
}

impl InMemoryCertificateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CertificateRepository for InMemoryCertificateRepository {
    async fn get(&self, id: &str) -> Result<Option<Certificate>, DomainError> {
        let certificates = self.certificates.read().await;
        Ok(certificates.get(id).cloned())
    }

    async fn get_by_number(&self, number: &str) -> Result<Option<Certificate>, DomainError> {
        let certificates = self.certificates.read().await;
        Ok(certificates
            .values()
            .find(|c| c.certificate_number() == number)
            .cloned())
    }

    async fn get_for_user_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Certificate>, DomainError> {
        let certificates = self.certificates.read().await;
        Ok(certificates
            .values()
            .find(|c| c.user_id() == user_id && c.course_id() == course_id)
            .cloned())
    }

    async fn create(&self, certificate: Certificate) -> Result<Certificate, DomainError> {
        let mut certificates = self.certificates.write().await;

        let duplicate = certificates.values().any(|c| {
            c.user_id() == certificate.user_id() && c.course_id() == certificate.course_id()
        });

        if duplicate {
            return Err(DomainError::conflict(
                "Certificate already issued for this course",
            ));
        }

        certificates.insert(certificate.id().to_string(), certificate.clone());
        Ok(certificate)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, DomainError> {
        let certificates = self.certificates.read().await;

        let mut result: Vec<Certificate> = certificates
            .values()
            .filter(|c| c.user_id() == user_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.issued_at().cmp(&a.issued_at()));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate(user: &UserId, course: &CourseId) -> Certificate {
        Certificate::new(
            format!("TPC-{}", &uuid::Uuid::new_v4().simple().to_string()[..10]),
            user.clone(),
            course.clone(),
            "Intro to Rust",
        )
    }

    #[tokio::test]
    async fn test_create_and_get_by_number() {
        let repo = InMemoryCertificateRepository::new();
        let cert = certificate(&UserId::generate(), &CourseId::generate());

        repo.create(cert.clone()).await.unwrap();

        let found = repo
            .get_by_number(cert.certificate_number())
            .await
            .unwrap();
        assert_eq!(found.unwrap().id(), cert.id());
    }

    #[tokio::test]
    async fn test_one_certificate_per_user_course() {
        let repo = InMemoryCertificateRepository::new();
        let user = UserId::generate();
        let course = CourseId::generate();

        repo.create(certificate(&user, &course)).await.unwrap();

        let result = repo.create(certificate(&user, &course)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let repo = InMemoryCertificateRepository::new();
        let user = UserId::generate();

        repo.create(certificate(&user, &CourseId::generate()))
            .await
            .unwrap();
        repo.create(certificate(&user, &CourseId::generate()))
            .await
            .unwrap();
        repo.create(certificate(&UserId::generate(), &CourseId::generate()))
            .await
            .unwrap();

        let mine = repo.list_for_user(&user).await.unwrap();
        assert_eq!(mine.len(), 2);
    }
}
