#![allow(clippy::unwrap_used)]

mod support;

use std::sync::Arc;

use secrecy::SecretString;

use moondash_core::{CoreError, Gateway, Role, Session, SessionManager, SignupRequest};
use support::{Call, FakeGateway};

fn manager(gateway: &Arc<FakeGateway>) -> SessionManager {
    SessionManager::new(Arc::clone(gateway) as Arc<dyn Gateway>)
}

fn password(raw: &str) -> SecretString {
    SecretString::from(raw)
}

#[tokio::test]
async fn restore_without_session_lands_silently() {
    let gw = FakeGateway::new();
    let sessions = manager(&gw);

    assert!(sessions.restore_session().await.is_none());
    assert_eq!(sessions.current(), Session::Landing);
    assert!(sessions.user().is_none());
}

#[tokio::test]
async fn restore_resolves_existing_identity() {
    let gw = FakeGateway::new();
    gw.sign_in_as(support::driver());
    let sessions = manager(&gw);
    let mut rx = sessions.subscribe();

    let user = sessions.restore_session().await.unwrap();

    assert_eq!(user.role, Role::Driver);
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());
}

#[tokio::test]
async fn login_rejects_empty_fields_before_network() {
    let gw = FakeGateway::new();
    let sessions = manager(&gw);

    let err = sessions.login("", &password("pw")).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    let err = sessions.login("neil@moon.io", &password("")).await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn bad_credentials_surface_as_authentication_error() {
    let gw = FakeGateway::new();
    gw.add_account("neil@moon.io", "right", support::customer());
    let sessions = manager(&gw);

    let err = sessions
        .login("neil@moon.io", &password("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Authentication { .. }), "{err:?}");
    assert_eq!(sessions.current(), Session::Landing);
    // One attempt, no retry, no identity lookup.
    assert_eq!(
        gw.calls(),
        vec![Call::Login {
            email: "neil@moon.io".into()
        }]
    );
}

#[tokio::test]
async fn login_resolves_user() {
    let gw = FakeGateway::new();
    gw.add_account("neil@moon.io", "right", support::customer());
    let sessions = manager(&gw);

    let user = sessions
        .login("neil@moon.io", &password("right"))
        .await
        .unwrap();

    assert_eq!(user.name, "Neil");
    assert_eq!(sessions.user().unwrap().id, user.id);
}

#[tokio::test]
async fn signup_always_creates_a_customer() {
    let gw = FakeGateway::new();
    let sessions = manager(&gw);

    let user = sessions
        .signup(&SignupRequest {
            email: "buzz@moon.io".into(),
            password: password("apollo11"),
            name: "Buzz".into(),
            address: "Sea of Tranquility".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.role, Role::Customer);
    assert_eq!(user.address.as_deref(), Some("Sea of Tranquility"));

    let identity = gw.current_identity().await.unwrap();
    assert_eq!(identity["role"], "customer");

    let calls = gw.calls();
    assert!(matches!(
        calls.first(),
        Some(Call::Signup { fields, .. }) if fields["role"] == "customer"
    ));
    assert!(calls.contains(&Call::Login {
        email: "buzz@moon.io".into()
    }));
}

#[tokio::test]
async fn signup_validation_happens_locally() {
    let gw = FakeGateway::new();
    let sessions = manager(&gw);

    let err = sessions
        .signup(&SignupRequest {
            email: "buzz@moon.io".into(),
            password: password("apollo11"),
            name: String::new(),
            address: "Sea of Tranquility".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "name"));
    assert!(gw.calls().is_empty());
}

#[tokio::test]
async fn duplicate_signup_is_rejected() {
    let gw = FakeGateway::new();
    gw.add_account("neil@moon.io", "pw", support::customer());
    let sessions = manager(&gw);

    let err = sessions
        .signup(&SignupRequest {
            email: "neil@moon.io".into(),
            password: password("pw2"),
            name: "Neil".into(),
            address: "Tranquility Base".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Authentication { .. }));
    assert_eq!(sessions.current(), Session::Landing);
}

#[tokio::test]
async fn logout_clears_identity_even_when_backend_fails() {
    let gw = FakeGateway::new();
    gw.sign_in_as(support::admin());
    gw.fail_logout();
    let sessions = manager(&gw);
    sessions.restore_session().await.unwrap();

    sessions.logout().await;

    assert_eq!(sessions.current(), Session::Landing);
    assert!(sessions.user().is_none());
    assert!(gw.calls().contains(&Call::Logout));
}
