//! Request orchestration
//!
//! The [`Orchestrator`] sequences calls to the [`CodeService`], keeps the
//! [`Session`] up to date and tells the [`Presenter`] what to show. Every failure
//! is reported to the presenter as a notice *and* returned to the caller.

use chrono::Utc;
use codegen_core::api::{GenerationRequest, ValidationRequest};
use codegen_core::download::prepare_download;
use codegen_core::error::{InputError, ServiceError};
use codegen_core::language::Language;
use codegen_core::notice::{Action, Notice, DEFAULT_START_HINT};
use codegen_core::quality::{project_validation, ValidationView};
use codegen_core::session::Session;
use std::path::PathBuf;

use crate::client::CodeService;
use crate::prelude::Error;
use crate::presenter::Presenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The response was stored and displayed
    Generated,
    /// A response to a newer request had already been applied
    ///
    /// `generate` takes `&mut self`, so one orchestrator never overlaps its own
    /// requests. This mirrors [`Session::apply_generation`] refusing an older
    /// ticket rather than silently overwriting newer state.
    Stale,
}

/// Holds an action's busy state until dropped
struct BusyGuard<'a, P: Presenter> {
    presenter: &'a P,
    action: Action,
}

impl<'a, P: Presenter> BusyGuard<'a, P> {
    fn acquire(presenter: &'a P, action: Action) -> Self {
        log::debug!("{action:?} busy");
        presenter.set_busy(action, true);
        Self { presenter, action }
    }
}

impl<P: Presenter> Drop for BusyGuard<'_, P> {
    fn drop(&mut self) {
        log::debug!("{:?} idle", self.action);
        self.presenter.set_busy(self.action, false);
    }
}

pub struct Orchestrator<S, P> {
    service: S,
    presenter: P,
    session: Session,
    start_hint: String,
}

impl<S: CodeService, P: Presenter> Orchestrator<S, P> {
    pub fn new(service: S, presenter: P) -> Self {
        let orchestrator = Self {
            service,
            presenter,
            session: Session::new(),
            start_hint: DEFAULT_START_HINT.to_string(),
        };
        orchestrator.sync_affordances();
        orchestrator
    }

    /// Instructions shown when the health check fails
    pub fn with_start_hint(mut self, start_hint: impl Into<String>) -> Self {
        self.start_hint = start_hint.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Advisory liveness check, returns whether the service is healthy
    pub async fn check_health(&self) -> bool {
        match self.service.health().await {
            Ok(health) => {
                log::info!("Service healthy (model: {:?})", health.model);
                self.presenter
                    .notify(Notice::connected(health.model.as_deref()));
                true
            }
            Err(err) => {
                log::warn!("Health check failed: {err}");
                self.presenter.notify(Notice::disconnected(&self.start_hint));
                false
            }
        }
    }

    pub async fn generate(&mut self, query: &str, language: &Language) -> Result<GenerationOutcome, Error> {
        let request =
            GenerationRequest::new(query, language.clone()).map_err(|e| self.input_failure(e))?;

        let ticket = self.session.issue_ticket();
        let response = {
            let _busy = BusyGuard::acquire(&self.presenter, Action::Generate);
            self.service.generate(&request).await
        };

        let artifact = match response {
            Ok(artifact) => artifact,
            Err(err) => {
                self.sync_affordances();
                return Err(self.service_failure(Action::Generate, err));
            }
        };

        if !self.session.apply_generation(ticket, artifact) {
            log::warn!("Discarding stale generation response {ticket:?}");
            return Ok(GenerationOutcome::Stale);
        }

        self.presenter.show_generated_code(self.session.generated_code());
        self.presenter.clear_validation();
        self.sync_affordances();
        self.presenter.notify(Notice::generated());

        Ok(GenerationOutcome::Generated)
    }

    /// Validate the displayed code against `reference`
    pub async fn validate(&mut self, reference: &str, language: &Language) -> Result<ValidationView, Error> {
        // An empty `generated` makes the request report NothingToValidate, but only
        // after the reference has been checked.
        let generated = if self.session.has_artifact() {
            self.presenter.displayed_code()
        } else {
            String::new()
        };
        let request = ValidationRequest::new(generated, reference, language.clone())
            .map_err(|e| self.input_failure(e))?;

        let response = {
            let _busy = BusyGuard::acquire(&self.presenter, Action::Validate);
            self.service.validate(&request).await
        };

        let result = match response {
            Ok(result) => result,
            Err(err) => {
                self.sync_affordances();
                return Err(self.service_failure(Action::Validate, err));
            }
        };

        let view = project_validation(&result);
        self.session.record_validation(result);
        self.presenter.show_validation(&view);
        self.sync_affordances();
        self.presenter.notify(Notice::validated());

        Ok(view)
    }

    /// Save the generated code locally, returning where it was written
    pub fn download(&self, language: &Language) -> Result<PathBuf, Error> {
        let artifact = prepare_download(&self.session, language, Utc::now().timestamp_millis())
            .map_err(|e| self.input_failure(e))?;

        let path = self.presenter.save_file(&artifact).map_err(|e| {
            log::error!("Saving {} failed: {e}", artifact.filename);
            let err = Error::Save {
                path: artifact.filename.clone(),
                message: e.to_string(),
            };
            self.presenter.notify(Notice::error(err.to_string()));
            err
        })?;

        log::info!("Saved {} ({})", path.display(), artifact.mime_type);
        self.presenter.notify(Notice::downloaded());

        Ok(path)
    }

    fn sync_affordances(&self) {
        self.presenter.set_validate_enabled(self.session.can_validate());
    }

    fn input_failure(&self, err: InputError) -> Error {
        log::debug!("Rejected input: {err}");
        self.presenter.notify(Notice::from_input(&err));
        err.into()
    }

    fn service_failure(&self, action: Action, err: ServiceError) -> Error {
        match &err {
            ServiceError::Connectivity(detail) => log::error!("{action:?} failed: {detail}"),
            ServiceError::Application(message) => log::warn!("{action:?} rejected: {message}"),
        }
        self.presenter.notify(Notice::from_service(action, &err));
        err.into()
    }
}
