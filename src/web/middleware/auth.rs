use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::database::member_repo;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthenticatedMember {
    pub id: String,
    pub global_role: String,
}

impl AuthenticatedMember {
    pub fn is_global_admin(&self) -> bool {
        self.global_role == "global_admin"
    }
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

/// Resolves the caller to a member id and global role. The access token is
/// issued and verified by the external auth service; here only the payload's
/// `sub` claim is read and matched against the members table.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        });

    if let Some(token) = token {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            if let Ok(payload_bytes) = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]) {
                if let Ok(payload) = serde_json::from_slice::<JwtPayload>(&payload_bytes) {
                    if let Ok(Some(member)) =
                        member_repo::load_member(&state.pool, &payload.sub).await
                    {
                        request.extensions_mut().insert(AuthenticatedMember {
                            id: member.member_id,
                            global_role: member.global_role,
                        });
                        return next.run(request).await;
                    }
                }
            }
        }
    }

    Response::builder()
        .status(401)
        .body(axum::body::Body::from("Unauthorized - Please login"))
        .unwrap()
}
