//! Login form flow: pre-checks, authentication, and where to go next.

use thiserror::Error;

use waypoint_core::{AuthenticatedPrincipal, DestinationUrl};
use waypoint_infra::{SessionSlot, UserDirectory};

use crate::session::AuthSession;

/// Where a freshly authenticated principal goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    AdminConsole,
    Redirect(DestinationUrl),
}

/// Login failures, phrased for the user.
///
/// `InvalidCredentials` never says which half was wrong.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("please fill in both identifier and secret")]
    MissingFields,

    #[error("incorrect identifier or secret")]
    InvalidCredentials,
}

pub fn landing_for(principal: &AuthenticatedPrincipal) -> Landing {
    if principal.is_admin {
        Landing::AdminConsole
    } else {
        Landing::Redirect(principal.destination_url.clone())
    }
}

/// Run the login form: blank fields never reach the directory.
pub async fn sign_in<D, S>(
    session: &mut AuthSession<D, S>,
    identifier: &str,
    secret: &str,
) -> Result<Landing, LoginError>
where
    D: UserDirectory,
    S: SessionSlot,
{
    if identifier.trim().is_empty() || secret.is_empty() {
        return Err(LoginError::MissingFields);
    }

    let principal = session
        .login(identifier, secret)
        .await
        .ok_or(LoginError::InvalidCredentials)?;

    Ok(landing_for(&principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use waypoint_core::{Identifier, NewUserRecord, Role};
    use waypoint_infra::{InMemoryDirectory, InMemorySessionSlot};

    fn session() -> AuthSession<Arc<InMemoryDirectory>, InMemorySessionSlot> {
        let dir = InMemoryDirectory::new();
        dir.seed(NewUserRecord {
            display_name: "Eva Admin".to_string(),
            identifier: Identifier::parse("00000000001").unwrap(),
            secret: "00000000001".to_string(),
            role: Role::Administrator,
            destination_url: DestinationUrl::parse("https://example.com/admin").unwrap(),
            is_admin: true,
        });
        dir.seed(NewUserRecord {
            display_name: "Ivo Operator".to_string(),
            identifier: Identifier::parse("12345678901").unwrap(),
            secret: "1234".to_string(),
            role: Role::Operator,
            destination_url: DestinationUrl::parse("https://example.com/ivo").unwrap(),
            is_admin: false,
        });
        let mut session = AuthSession::new(Arc::new(dir), InMemorySessionSlot::new());
        session.initialize();
        session
    }

    #[tokio::test]
    async fn admin_lands_on_console() {
        let mut session = session();
        let landing = sign_in(&mut session, "000.000.000-01", "00000000001").await;
        assert_eq!(landing, Ok(Landing::AdminConsole));
    }

    #[tokio::test]
    async fn user_is_redirected_to_destination() {
        let mut session = session();
        let landing = sign_in(&mut session, "12345678901", "1234").await.unwrap();
        match landing {
            Landing::Redirect(url) => assert_eq!(url.as_str(), "https://example.com/ivo"),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_any_call() {
        let mut session = session();
        session.directory().set_offline(true);

        assert_eq!(
            sign_in(&mut session, "  ", "1234").await,
            Err(LoginError::MissingFields)
        );
        assert_eq!(
            sign_in(&mut session, "12345678901", "").await,
            Err(LoginError::MissingFields)
        );
    }

    #[tokio::test]
    async fn wrong_identifier_and_wrong_secret_look_the_same() {
        let mut session = session();
        let unknown = sign_in(&mut session, "99999999999", "1234").await.unwrap_err();
        let wrong = sign_in(&mut session, "12345678901", "9999").await.unwrap_err();
        assert_eq!(unknown, wrong);
        assert_eq!(wrong.to_string(), "incorrect identifier or secret");
    }
}
