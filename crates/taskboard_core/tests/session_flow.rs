use taskboard_core::{
    login, logout, require_session, LoginError, MemoryKvStore, Session, StorageGateway,
    DEMO_CREDENTIALS,
};

fn gateway() -> StorageGateway<MemoryKvStore> {
    StorageGateway::new(MemoryKvStore::new())
}

#[test]
fn demo_credentials_log_in_and_store_marker() {
    let mut gateway = gateway();

    let session = login(
        &mut gateway,
        DEMO_CREDENTIALS.email,
        DEMO_CREDENTIALS.password,
        true,
    )
    .unwrap();

    assert_eq!(session, Session::new("intern@demo.com"));
    assert_eq!(require_session(&gateway), Ok(session));
    assert!(gateway.should_remember());
}

#[test]
fn wrong_password_is_rejected_without_storing_anything() {
    let mut gateway = gateway();

    let err = login(&mut gateway, "intern@demo.com", "wrong", false).unwrap_err();

    assert_eq!(err, LoginError::InvalidCredentials);
    assert_eq!(require_session(&gateway), Err(LoginError::NotLoggedIn));
    assert!(gateway.store().is_empty());
}

#[test]
fn malformed_input_is_reported_before_credentials() {
    let mut gateway = gateway();
    assert_eq!(
        login(&mut gateway, "intern", "intern123", false),
        Err(LoginError::EmailInvalid)
    );
    assert_eq!(
        login(&mut gateway, "intern@demo.com", "", false),
        Err(LoginError::PasswordRequired)
    );
}

#[test]
fn logout_clears_unremembered_session() {
    let mut gateway = gateway();
    login(&mut gateway, "intern@demo.com", "intern123", false).unwrap();

    assert!(logout(&mut gateway));
    assert_eq!(gateway.read_user(), None);
    assert!(!gateway.should_remember());
}

#[test]
fn logout_keeps_remembered_session() {
    let mut gateway = gateway();
    login(&mut gateway, "intern@demo.com", "intern123", true).unwrap();

    assert!(!logout(&mut gateway));
    assert_eq!(
        require_session(&gateway),
        Ok(Session::new("intern@demo.com"))
    );
}
