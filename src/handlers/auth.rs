use crate::error::AppError;
use crate::models::auth::*;
use crate::AppState;
use axum::{
    extract::Extension,
    http::HeaderMap,
    response::Json,
    routing::{get, post, Router},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::json;
use std::sync::Arc;

pub fn auth_routes() -> Router {
    Router::new()
        .route("/registro", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verificar", get(verify_token))
}

async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email y contraseña son obligatorios".to_string(),
        ));
    }

    if state.store.find_user(email).await?.is_some() {
        return Err(AppError::UserExists);
    }

    let password_hash = hash_password(payload.password, state.config.bcrypt_cost).await?;

    // A concurrent registration can still win the race; the store reports it as a duplicate
    let user = state.store.create_user(email, &password_hash).await?;
    tracing::info!(user_id = user.id, email = %user.email, "👤 user registered");

    Ok(Json(MessageResponse {
        mensaje: format!("Usuario {} guardado correctamente.", user.email),
    }))
}

async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email y contraseña son obligatorios".to_string(),
        ));
    }

    let user = state
        .store
        .find_user(email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        tracing::warn!(email = %user.email, "login with incorrect password");
        return Err(AppError::IncorrectPassword);
    }

    let token = generate_jwt_token(&user.email, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(LoginResponse {
        estado: "exitoso".to_string(),
        mensaje: format!("Bienvenido de nuevo, {}", user.email),
        token,
    }))
}

async fn logout() -> Json<serde_json::Value> {
    Json(json!({
        "estado": "exitoso",
        "mensaje": "Sesión cerrada. Tu historial se ha conservado para tu próxima entrada."
    }))
}

async fn verify_token(
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth_str = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header format".to_string()))?;

    // Extract token from "Bearer <token>" format
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized(
            "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
        )
    })?;

    let claims = verify_jwt_token(token, &state.config.jwt_secret).map_err(|e| {
        tracing::warn!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    Ok(Json(json!({
        "success": true,
        "email": claims.sub,
        "exp": claims.exp,
    })))
}

// bcrypt is CPU-bound, keep it off the async workers
async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("error hashing password: {e}")))
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("password verification task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("error verifying password: {e}")))
}

pub fn generate_jwt_token(email: &str, secret: &str, valid_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = Duration::try_hours(valid_hours)
        .and_then(|validity| now.checked_add_signed(validity))
        .ok_or_else(|| AppError::Internal("token expiration out of range".to_string()))?;

    let claims = Claims {
        sub: email.to_string(),
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("error generating JWT token: {e}")))
}

pub fn verify_jwt_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get, post_json, send, state_without_assistant};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_register_twice_fails_second_time() {
        let state = state_without_assistant();
        let body = json!({"email": "ana@example.com", "password": "manzana"});

        let (status, value) = post_json(&state, "/registro", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["mensaje"], "Usuario ana@example.com guardado correctamente.");

        let (status, value) = post_json(&state, "/registro", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "El usuario ya existe");
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let state = state_without_assistant();
        post_json(&state, "/registro", json!({"email": "ana@example.com", "password": "manzana"})).await;

        let user = state.store.find_user("ana@example.com").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "manzana");
        assert!(bcrypt::verify("manzana", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let state = state_without_assistant();
        let (status, _) = post_json(&state, "/registro", json!({"email": "  ", "password": "x"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_unknown_wrong_and_correct_password() {
        let state = state_without_assistant();

        let (status, value) =
            post_json(&state, "/login", json!({"email": "ana@example.com", "password": "manzana"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["message"], "Usuario no registrado");

        post_json(&state, "/registro", json!({"email": "ana@example.com", "password": "manzana"})).await;

        let (status, value) =
            post_json(&state, "/login", json!({"email": "ana@example.com", "password": "pera"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], "Contraseña incorrecta");

        let (status, value) =
            post_json(&state, "/login", json!({"email": "ana@example.com", "password": "manzana"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["estado"], "exitoso");
        assert_eq!(value["mensaje"], "Bienvenido de nuevo, ana@example.com");

        let token = value["token"].as_str().unwrap();
        let claims = verify_jwt_token(token, "test-secret").unwrap();
        assert_eq!(claims.sub, "ana@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_verify_endpoint() {
        let state = state_without_assistant();
        let token = generate_jwt_token("ana@example.com", "test-secret", 1).unwrap();

        let (status, value) = send(
            crate::app(state.clone()),
            Method::GET,
            "/verificar",
            None,
            Some(token.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["email"], "ana@example.com");

        let (status, _) = send(crate::app(state.clone()), Method::GET, "/verificar", None, Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(&state, "/verificar").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_huge_validity_is_an_error_not_a_panic() {
        let err = generate_jwt_token("ana@example.com", "test-secret", i64::MAX).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let token = generate_jwt_token("ana@example.com", "other-secret", 1).unwrap();
        assert!(verify_jwt_token(&token, "test-secret").is_err());
    }

    #[tokio::test]
    async fn test_logout_acknowledges() {
        let state = state_without_assistant();
        let (status, value) = post_json(&state, "/logout", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["estado"], "exitoso");
    }
}
