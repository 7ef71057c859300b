//! Utilidades de validación
//!
//! Expresiones regulares compartidas por los DTOs y el extractor
//! `ValidatedJson`, que rechaza cuerpos mal formados antes de llegar
//! a la lógica de negocio.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::utils::errors::AppError;

lazy_static! {
    /// Teléfono: dígitos, espacios, guiones y paréntesis, con prefijo + opcional
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()\-]{6,20}$").unwrap();

    /// Hora con forma HH:MM o HH:MM:SS (el rango se comprueba al confirmar)
    pub static ref TIME_SHAPE_REGEX: Regex = Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").unwrap();
}

/// Validar la forma de `preferred_time`
pub fn validate_time_shape(value: &str) -> Result<(), ValidationError> {
    if !TIME_SHAPE_REGEX.is_match(value) {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM[:SS]".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un texto no esté compuesto solo de espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Cuerpo JSON deserializado y validado
///
/// Un JSON inválido (incluido un estado desconocido) produce 400 en lugar
/// del 422 por defecto de axum.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("+34 600 123 456"));
        assert!(PHONE_REGEX.is_match("(555) 123-4567"));
        assert!(!PHONE_REGEX.is_match("12"));
        assert!(!PHONE_REGEX.is_match("call me maybe"));
    }

    #[test]
    fn test_validate_time_shape() {
        assert!(validate_time_shape("14:30").is_ok());
        assert!(validate_time_shape("09:05:00").is_ok());
        // La forma es correcta aunque la hora no exista
        assert!(validate_time_shape("25:99").is_ok());
        assert!(validate_time_shape("half past two").is_err());
        assert!(validate_time_shape("1430").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
