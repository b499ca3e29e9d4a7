use actix_web::{
    FromRequest, HttpRequest,
    dev::Payload,
    error::{ErrorForbidden, ErrorUnauthorized},
    web::Data,
};
use futures::future::{Ready, ready};
use uuid::Uuid;

use crate::model::user::{Role, User};
use crate::store::AppState;

/// The user performing the request, resolved from the `X-Actor-Id` header
/// against the directory. There is no authentication layer; the header is
/// trusted as-is and merely identifies which directory entry is acting.
pub struct Actor(pub User);

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = match req
            .headers()
            .get("X-Actor-Id")
            .and_then(|h| h.to_str().ok())
        {
            Some(v) => v,
            None => return ready(Err(ErrorUnauthorized("Missing X-Actor-Id header"))),
        };

        let actor_id = match Uuid::parse_str(header) {
            Ok(id) => id,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid actor id"))),
        };

        let state = match req.app_data::<Data<AppState>>() {
            Some(s) => s,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "State missing",
                )));
            }
        };

        let users = match state.users() {
            Ok(users) => users,
            Err(e) => return ready(Err(e)),
        };

        match users.into_iter().find(|u| u.id == actor_id) {
            Some(user) => ready(Ok(Actor(user))),
            None => ready(Err(ErrorUnauthorized("Unknown actor"))),
        }
    }
}

impl Actor {
    /// Managers and HR review other people's timesheets.
    pub fn require_reviewer(&self) -> actix_web::Result<()> {
        if matches!(self.0.role, Role::Manager | Role::Hr) {
            Ok(())
        } else {
            Err(ErrorForbidden("Manager/HR only"))
        }
    }

    /// The employee directory is an HR surface.
    pub fn require_hr(&self) -> actix_web::Result<()> {
        if self.0.role == Role::Hr {
            Ok(())
        } else {
            Err(ErrorForbidden("HR only"))
        }
    }
}
