//! 요청 본문 검증.
//!
//! `validator` derive로 선언한 규칙을 실행하고, 실패를 필드별
//! [`FieldError`] 목록으로 변환합니다. 검증은 저장소에 접근하기 전에 끝납니다.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use campusjob_core::{CampusError, CampusResult, FieldError};

use crate::error::ApiError;

/// 공백만 있는 문자열 거부.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("비어 있을 수 없습니다".into()));
    }
    Ok(())
}

/// 검증 에러를 필드 이름, 메시지 순으로 정렬된 목록으로 변환.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();

    fields.sort_by(|a, b| (&a.field, &a.message).cmp(&(&b.field, &b.message)));
    fields
}

/// 요청 값 검증.
pub fn validate_request<T: Validate>(request: &T) -> CampusResult<()> {
    request
        .validate()
        .map_err(|errors| CampusError::Validation(field_errors(&errors)))
}

/// JSON 본문을 역직렬화한 뒤 검증까지 마친 값.
///
/// 역직렬화 실패(형식 오류, 필드 누락)도 400 `VALIDATION_ERROR`로 응답합니다.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| CampusError::invalid_field("body", rejection.body_text()))?;

        validate_request(&value)?;
        Ok(Self(value))
    }
}
