//! # Sign-in flow: credential submission to navigation
//!
//! [`SignInFlow`] owns everything the sign-in form does between a keystroke and
//! the authenticated landing view. It is framework-free: the UI feeds it field
//! changes and submit events, reads [`ErrorState`] and [`FlowState`] back, and
//! injects the two side effects it cannot perform itself through [`FlowHooks`].
//!
//! ## States
//!
//! ```text
//! Idle ─► Submitting ─► Authenticated ─► SessionWritten ─► Navigated
//!              │
//!              └──────► Failed ─► (resubmit)
//! ```
//!
//! While a submission is in flight (`Submitting`, `Authenticated`,
//! `SessionWritten`) every further submission, password or federated, is
//! rejected with [`FlowError::InFlight`] before the provider is called.
//!
//! ## Session materialization
//!
//! | Path | Display name |
//! |------|--------------|
//! | password | looked up through the [`UserDirectory`]; absence or lookup failure writes no name |
//! | federated | taken from the identity object, which never carries one |
//!
//! The record is written through [`SessionRepository`], then `on_login` runs once
//! with the written record, then `navigate_home`. A storage failure stops the flow before either hook.

mod error;
mod form;

pub use error::{ErrorState, FlowError};
pub use form::{Field, FormInputs};

use std::cell::{Cell, RefCell};

use store::{KeyValueStore, SessionRecord, SessionRepository};

use crate::auth::IdentityProvider;
use crate::error::AuthError;
use crate::models::AuthenticatedUser;
use crate::users::UserDirectory;

/// Which button started the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInMethod {
    Password,
    Federated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting(SignInMethod),
    Authenticated(SignInMethod),
    SessionWritten,
    Navigated,
    Failed,
}

impl FlowState {
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            FlowState::Submitting(_) | FlowState::Authenticated(_) | FlowState::SessionWritten
        )
    }
}

/// Where the session's display name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayName {
    /// Ask the user directory.
    Lookup,
    /// Use the identity object as returned by the provider.
    FromIdentity,
}

/// Side effects owned by the rest of the application.
///
/// `on_login` receives the record that was just persisted so the app-wide
/// session can be updated before `navigate_home` runs.
pub struct FlowHooks {
    pub on_login: Box<dyn Fn(&SessionRecord)>,
    pub navigate_home: Box<dyn Fn()>,
}

impl FlowHooks {
    pub fn new(on_login: impl Fn(&SessionRecord) + 'static, navigate_home: impl Fn() + 'static) -> Self {
        Self {
            on_login: Box::new(on_login),
            navigate_home: Box::new(navigate_home),
        }
    }
}

/// The sign-in state machine.
pub struct SignInFlow<P: IdentityProvider, D: UserDirectory, S: KeyValueStore> {
    provider: P,
    directory: D,
    sessions: SessionRepository<S>,
    hooks: FlowHooks,
    form: RefCell<FormInputs>,
    error: RefCell<ErrorState>,
    state: Cell<FlowState>,
}

impl<P: IdentityProvider, D: UserDirectory, S: KeyValueStore> SignInFlow<P, D, S> {
    pub fn new(provider: P, directory: D, store: S, hooks: FlowHooks) -> Self {
        Self {
            provider,
            directory,
            sessions: SessionRepository::new(store),
            hooks,
            form: RefCell::new(FormInputs::default()),
            error: RefCell::new(ErrorState::default()),
            state: Cell::new(FlowState::Idle),
        }
    }

    pub fn state(&self) -> FlowState {
        self.state.get()
    }

    pub fn error_state(&self) -> ErrorState {
        self.error.borrow().clone()
    }

    pub fn form(&self) -> FormInputs {
        self.form.borrow().clone()
    }

    pub fn on_field_change(&self, name: &str, value: impl Into<String>) {
        self.form.borrow_mut().on_field_change(name, value);
    }

    /// Submit the current form values.
    pub async fn submit(&self) -> Result<SessionRecord, FlowError> {
        let FormInputs { email, password } = self.form();
        self.submit_credentials(&email, &password).await
    }

    /// Password sign-in.
    pub async fn submit_credentials(&self, email: &str, password: &str) -> Result<SessionRecord, FlowError> {
        self.begin(SignInMethod::Password)?;

        if let Some(err) = missing_credential(email, password) {
            tracing::debug!(code = %err.code, "rejecting empty credentials without a provider call");
            return self.finish(Err(err.into()));
        }

        let result = match self.provider.sign_in_with_password(email, password).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "signed in with password");
                self.state.set(FlowState::Authenticated(SignInMethod::Password));
                self.complete(&user, DisplayName::Lookup).await
            }
            Err(e) => {
                tracing::info!(code = %e.code, "password sign-in rejected");
                Err(e.into())
            }
        };
        self.finish(result)
    }

    /// Provider-hosted interactive sign-in.
    pub async fn submit_federated(&self) -> Result<SessionRecord, FlowError> {
        self.begin(SignInMethod::Federated)?;

        let result = match self.provider.sign_in_with_popup().await {
            Ok(signed_in) => {
                tracing::info!(uid = %signed_in.user.uid, "signed in with federated provider");
                tracing::debug!(
                    has_access_token = signed_in.access_token.is_some(),
                    "federated credential received"
                );
                self.state.set(FlowState::Authenticated(SignInMethod::Federated));
                self.complete(&signed_in.user, DisplayName::FromIdentity).await
            }
            Err(e) => {
                tracing::warn!(code = %e.code, message = %e.message, "federated sign-in failed");
                Err(e.into())
            }
        };
        self.finish(result)
    }

    /// Resolve the display name, persist the session record and notify the app.
    pub async fn materialize_session(
        &self,
        user: &AuthenticatedUser,
        display_name: DisplayName,
    ) -> Result<SessionRecord, FlowError> {
        let user_name = match display_name {
            DisplayName::Lookup => match self.directory.get_user_name(user).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(uid = %user.uid, error = %e, "display name lookup failed, continuing without it");
                    None
                }
            },
            DisplayName::FromIdentity => None,
        };

        let record = SessionRecord::new(user.uid.clone(), user.email.clone(), user_name);
        self.sessions.save(&record).await?;
        self.state.set(FlowState::SessionWritten);

        (self.hooks.on_login)(&record);
        Ok(record)
    }

    pub fn navigate_home(&self) {
        (self.hooks.navigate_home)();
        self.state.set(FlowState::Navigated);
    }

    fn begin(&self, method: SignInMethod) -> Result<(), FlowError> {
        if self.state.get().is_in_flight() {
            tracing::debug!(?method, "rejecting submission while another is in flight");
            return Err(FlowError::InFlight);
        }
        self.error.replace(ErrorState::default());
        self.state.set(FlowState::Submitting(method));
        Ok(())
    }

    async fn complete(&self, user: &AuthenticatedUser, display_name: DisplayName) -> Result<SessionRecord, FlowError> {
        let record = self.materialize_session(user, display_name).await?;
        self.navigate_home();
        Ok(record)
    }

    fn finish(&self, result: Result<SessionRecord, FlowError>) -> Result<SessionRecord, FlowError> {
        if let Err(e) = &result {
            if let Some((code, message)) = e.user_facing() {
                let next = self.error.borrow().record(code, message);
                self.error.replace(next);
            }
            self.state.set(FlowState::Failed);
        }
        result
    }
}

/// Empty fields fail the same way the provider would, without a round trip.
fn missing_credential(email: &str, password: &str) -> Option<AuthError> {
    if email.trim().is_empty() {
        Some(AuthError::from_rest("INVALID_EMAIL"))
    } else if password.is_empty() {
        Some(AuthError::from_rest("MISSING_PASSWORD"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use store::{MemoryStore, StoreError};
    use tokio::sync::oneshot;

    use crate::error::{codes, AuthError};
    use crate::models::FederatedSignIn;

    struct FakeProvider {
        password: Result<AuthenticatedUser, AuthError>,
        federated: Result<FederatedSignIn, AuthError>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        credentials: RefCell<Vec<(String, String)>>,
        popup_calls: Cell<usize>,
    }

    impl FakeProvider {
        fn accepting(uid: &str, email: &str) -> Self {
            Self {
                password: Ok(AuthenticatedUser::new(uid, email)),
                federated: Err(AuthError::popup_closed()),
                gate: RefCell::new(None),
                credentials: RefCell::new(Vec::new()),
                popup_calls: Cell::new(0),
            }
        }

        fn rejecting(err: AuthError) -> Self {
            Self {
                password: Err(err),
                ..Self::accepting("unused", "unused")
            }
        }

        fn federating(uid: &str, email: &str) -> Self {
            Self {
                federated: Ok(FederatedSignIn {
                    user: AuthenticatedUser::new(uid, email),
                    access_token: Some("google-access-token".to_string()),
                }),
                ..Self::accepting("unused", "unused")
            }
        }
    }

    impl IdentityProvider for FakeProvider {
        async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
            self.credentials
                .borrow_mut()
                .push((email.to_string(), password.to_string()));
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.password.clone()
        }

        async fn sign_in_with_popup(&self) -> Result<FederatedSignIn, AuthError> {
            self.popup_calls.set(self.popup_calls.get() + 1);
            self.federated.clone()
        }
    }

    struct FakeDirectory {
        result: Result<Option<String>, AuthError>,
        lookups: Cell<usize>,
    }

    impl FakeDirectory {
        fn returning(result: Result<Option<String>, AuthError>) -> Self {
            Self {
                result,
                lookups: Cell::new(0),
            }
        }
    }

    impl UserDirectory for FakeDirectory {
        async fn get_user_name(&self, _user: &AuthenticatedUser) -> Result<Option<String>, AuthError> {
            self.lookups.set(self.lookups.get() + 1);
            self.result.clone()
        }
    }

    /// MemoryStore that records every write and can be told to fail.
    #[derive(Clone, Default)]
    struct RecordingStore {
        inner: MemoryStore,
        writes: Rc<RefCell<Vec<(String, String)>>>,
        fail: bool,
    }

    impl RecordingStore {
        fn writes_to(&self, key: &str) -> Vec<String> {
            self.writes
                .borrow()
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .collect()
        }
    }

    impl KeyValueStore for RecordingStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("quota exceeded".to_string()));
            }
            self.writes
                .borrow_mut()
                .push((key.to_string(), value.to_string()));
            self.inner.set_item(key, value).await
        }
    }

    #[derive(Clone, Default)]
    struct Counters {
        logins: Rc<Cell<usize>>,
        last_login: Rc<RefCell<Option<SessionRecord>>>,
        navigations: Rc<Cell<usize>>,
    }

    impl Counters {
        fn hooks(&self) -> FlowHooks {
            let logins = self.logins.clone();
            let last_login = self.last_login.clone();
            let navigations = self.navigations.clone();
            FlowHooks::new(
                move |record: &SessionRecord| {
                    logins.set(logins.get() + 1);
                    last_login.replace(Some(record.clone()));
                },
                move || navigations.set(navigations.get() + 1),
            )
        }
    }

    fn make_flow(
        provider: FakeProvider,
        directory: FakeDirectory,
        store: RecordingStore,
        counters: &Counters,
    ) -> SignInFlow<FakeProvider, FakeDirectory, RecordingStore> {
        SignInFlow::new(provider, directory, store, counters.hooks())
    }

    #[tokio::test]
    async fn test_password_sign_in_writes_session_and_navigates() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(Some("Alice".to_string()))),
            store.clone(),
            &counters,
        );

        flow.on_field_change("email", "a@b.com");
        flow.on_field_change("password", "secret123");
        let record = flow.submit().await.unwrap();

        assert_eq!(record.uid, "U1");
        assert_eq!(
            flow.provider.credentials.borrow().as_slice(),
            &[("a@b.com".to_string(), "secret123".to_string())]
        );
        assert_eq!(store.writes_to("uid"), vec!["U1"]);
        assert_eq!(
            store.writes_to("userInfo"),
            vec![r#"{"email":"a@b.com","userName":"Alice"}"#]
        );
        assert_eq!(counters.logins.get(), 1);
        assert_eq!(counters.last_login.borrow().as_ref(), Some(&record));
        assert_eq!(counters.navigations.get(), 1);
        assert_eq!(flow.state(), FlowState::Navigated);
        assert!(!flow.error_state().is_error);
    }

    #[tokio::test]
    async fn test_wrong_password_projects_error_without_side_effects() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::rejecting(AuthError::from_rest("INVALID_PASSWORD")),
            FakeDirectory::returning(Ok(Some("Alice".to_string()))),
            store.clone(),
            &counters,
        );

        let err = flow.submit_credentials("a@b.com", "nope").await.unwrap_err();
        assert!(matches!(err, FlowError::Auth(ref e) if e.code == codes::WRONG_PASSWORD));

        let state = flow.error_state();
        assert!(state.is_error);
        assert_eq!(state.error_code, "auth/wrong-password");
        assert_eq!(state.error_messages.len(), 1);
        assert!(state.error_messages[0].starts_with("The password is invalid"));

        assert!(store.writes.borrow().is_empty());
        assert_eq!(flow.directory.lookups.get(), 0);
        assert_eq!(counters.logins.get(), 0);
        assert_eq!(counters.navigations.get(), 0);
        assert_eq!(flow.state(), FlowState::Failed);
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_provider() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(None)),
            store.clone(),
            &counters,
        );

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, FlowError::Auth(ref e) if e.code == codes::INVALID_EMAIL));

        flow.on_field_change("email", "a@b.com");
        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, FlowError::Auth(ref e) if e.code == codes::MISSING_PASSWORD));
        assert_eq!(flow.error_state().error_code, codes::MISSING_PASSWORD);

        assert!(flow.provider.credentials.borrow().is_empty());
        assert!(store.writes.borrow().is_empty());
        assert_eq!(counters.navigations.get(), 0);
        assert_eq!(flow.state(), FlowState::Failed);
    }

    #[tokio::test]
    async fn test_repeated_failures_show_only_latest_message() {
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::rejecting(AuthError::from_rest("INVALID_PASSWORD")),
            FakeDirectory::returning(Ok(None)),
            RecordingStore::default(),
            &counters,
        );

        let _ = flow.submit_credentials("a@b.com", "nope").await;
        let _ = flow.submit_credentials("a@b.com", "still nope").await;

        assert_eq!(flow.error_state().error_messages.len(), 1);
        assert_eq!(flow.provider.credentials.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_federated_sign_in_writes_no_user_name() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::federating("U2", "c@d.com"),
            FakeDirectory::returning(Ok(Some("Carol".to_string()))),
            store.clone(),
            &counters,
        );

        let record = flow.submit_federated().await.unwrap();

        assert!(record.user_info.user_name.is_none());
        assert_eq!(store.writes_to("uid"), vec!["U2"]);
        assert_eq!(store.writes_to("userInfo"), vec![r#"{"email":"c@d.com"}"#]);
        assert_eq!(flow.directory.lookups.get(), 0);
        assert_eq!(counters.logins.get(), 1);
        assert_eq!(counters.last_login.borrow().as_ref(), Some(&record));
        assert_eq!(counters.navigations.get(), 1);
    }

    #[tokio::test]
    async fn test_federated_failure_is_projected() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(None)),
            store.clone(),
            &counters,
        );

        let err = flow.submit_federated().await.unwrap_err();
        assert!(matches!(err, FlowError::Auth(_)));

        let state = flow.error_state();
        assert!(state.is_error);
        assert_eq!(state.error_code, codes::POPUP_CLOSED_BY_USER);
        assert!(store.writes.borrow().is_empty());
        assert_eq!(counters.navigations.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_user_record_is_success() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(None)),
            store.clone(),
            &counters,
        );

        flow.submit_credentials("a@b.com", "secret123").await.unwrap();

        assert_eq!(store.writes_to("userInfo"), vec![r#"{"email":"a@b.com"}"#]);
        assert_eq!(counters.navigations.get(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_no_name() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Err(AuthError::network("connection reset"))),
            store.clone(),
            &counters,
        );

        let record = flow.submit_credentials("a@b.com", "secret123").await.unwrap();

        assert!(record.user_info.user_name.is_none());
        assert_eq!(store.writes_to("uid"), vec!["U1"]);
        assert_eq!(counters.logins.get(), 1);
        assert_eq!(counters.navigations.get(), 1);
        assert!(!flow.error_state().is_error);
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_with_identical_content() {
        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(Some("Alice".to_string()))),
            store.clone(),
            &counters,
        );

        let first = flow.submit_credentials("a@b.com", "secret123").await.unwrap();
        let second = flow.submit_credentials("a@b.com", "secret123").await.unwrap();

        assert_eq!(first, second);
        let user_infos = store.writes_to("userInfo");
        assert_eq!(user_infos.len(), 2);
        assert_eq!(user_infos[0], user_infos[1]);
        assert_eq!(store.writes_to("uid"), vec!["U1", "U1"]);
        assert_eq!(counters.navigations.get(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_blocks_login_and_navigation() {
        let store = RecordingStore {
            fail: true,
            ..RecordingStore::default()
        };
        let counters = Counters::default();
        let flow = make_flow(
            FakeProvider::accepting("U1", "a@b.com"),
            FakeDirectory::returning(Ok(Some("Alice".to_string()))),
            store,
            &counters,
        );

        let err = flow.submit_credentials("a@b.com", "secret123").await.unwrap_err();
        assert!(matches!(err, FlowError::Storage(_)));
        assert_eq!(flow.error_state().error_code, codes::STORAGE_UNAVAILABLE);
        assert_eq!(counters.logins.get(), 0);
        assert_eq!(counters.navigations.get(), 0);
        assert_eq!(flow.state(), FlowState::Failed);
    }

    #[tokio::test]
    async fn test_second_submission_rejected_while_in_flight() {
        let (release, gate) = oneshot::channel();
        let provider = FakeProvider::accepting("U1", "a@b.com");
        provider.gate.replace(Some(gate));

        let store = RecordingStore::default();
        let counters = Counters::default();
        let flow = make_flow(
            provider,
            FakeDirectory::returning(Ok(Some("Alice".to_string()))),
            store.clone(),
            &counters,
        );

        let first = flow.submit_credentials("a@b.com", "secret123");
        let second = async {
            tokio::task::yield_now().await;
            assert!(flow.state().is_in_flight());
            let password = flow.submit_credentials("a@b.com", "secret123").await;
            let federated = flow.submit_federated().await;
            let _ = release.send(());
            (password, federated)
        };
        let (first, (password, federated)) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(password, Err(FlowError::InFlight)));
        assert!(matches!(federated, Err(FlowError::InFlight)));
        assert_eq!(flow.provider.credentials.borrow().len(), 1);
        assert_eq!(flow.provider.popup_calls.get(), 0);
        assert_eq!(store.writes_to("uid").len(), 1);
        assert_eq!(counters.navigations.get(), 1);
        assert!(!flow.error_state().is_error);
    }

    #[tokio::test]
    async fn test_new_attempt_resets_error_state() {
        let counters = Counters::default();
        let mut provider = FakeProvider::accepting("U1", "a@b.com");
        provider.federated = Err(AuthError::popup_blocked());
        let flow = make_flow(
            provider,
            FakeDirectory::returning(Ok(None)),
            RecordingStore::default(),
            &counters,
        );

        let _ = flow.submit_federated().await;
        assert!(flow.error_state().is_error);

        flow.submit_credentials("a@b.com", "secret123").await.unwrap();
        assert_eq!(flow.error_state(), ErrorState::default());
    }
}
