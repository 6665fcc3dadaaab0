use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::model::role::Role;
use actix_web::{
    FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data,
};
use futures::future::{Ready, ready};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user belongs to a team
    pub team_id: Option<u64>,
}

/// Resolves the bearer token into a user, or a message explaining why not.
pub fn authenticate(header: Option<&str>, secret: &str) -> Result<AuthUser, String> {
    let header = header.ok_or("Missing Authorization header")?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must start with Bearer")?;

    let claims = verify_token(token, secret)?;
    let role = Role::from_claim(claims.role.as_deref()).ok_or("Invalid role")?;

    Ok(AuthUser {
        user_id: claims.user_id,
        username: claims.sub,
        role,
        team_id: claims.team_id,
    })
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // set by auth_middleware on protected scopes
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Config missing"),
                ));
            }
        };

        let header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        ready(authenticate(header, &config.jwt_secret).map_err(ErrorUnauthorized))
    }
}

impl AuthUser {
    pub fn require_hr_or_admin(&self) -> actix_web::Result<()> {
        if matches!(self.role, Role::Admin | Role::Hr) {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("HR/Admin only"))
        }
    }

    /// Guests are accounts still waiting for approval.
    pub fn require_staff(&self) -> actix_web::Result<()> {
        if self.role.is_staff_level() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Account not approved yet"))
        }
    }
}
