//! Autenticación JWT
//!
//! Extractores de axum que leen el header `Authorization: Bearer <token>`:
//!
//! - `AuthenticatedUser`: token obligatorio (401 si falta o es inválido).
//! - `AdminUser`: además exige rol `admin` (403 si no lo tiene).
//! - `MaybeUser`: token opcional; uno inválido se ignora.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::{
    models::auth::{AuthenticatedUser, UserRole},
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Decodificar el usuario del header. `Ok(None)` si no hay header.
pub fn bearer_user(parts: &Parts, secret: &str) -> Result<Option<AuthenticatedUser>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_header = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Header Authorization inválido".to_string()))?;
    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, secret)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;
    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| AppError::Unauthorized("Rol desconocido".to_string()))?;

    Ok(Some(AuthenticatedUser { user_id, role }))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        bearer_user(parts, &state.config.jwt_secret)?
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))
    }
}

/// Usuario autenticado con rol de administrador
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Forbidden(
                "Se requieren permisos de administrador".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// Usuario opcional (rutas públicas que aprovechan la sesión si existe)
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            bearer_user(parts, &state.config.jwt_secret).ok().flatten(),
        ))
    }
}
