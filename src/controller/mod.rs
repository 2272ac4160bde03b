//! One form instance: its edit state, validation map and loading flags, and the
//! round trips that read and write them.
//!
//! The controller is generic over the request-dispatch collaborator
//! ([`CaseTransport`]) and the embedding application ([`HostEnvironment`]). Network
//! failures are converted into host notifications here and returned as typed errors.
//!
//! Every refresh carries a [`RequestTicket`]; only the response to the newest ticket is
//! applied, and nothing is applied once the form has been cancelled.

use crate::actions::{
    ComposedHandler, HandlerStep, ScriptRegistry, resolve_property, resolve_text,
};
use crate::config::FormConfig;
use crate::error::{FormError, TransportError};
use crate::interpreter::{LayoutInterpreter, RenderContext, RenderNode};
use crate::model::{RepeatKind, SetValuePair, ValidationErrors, View};
use crate::reference::{
    EditState, ReferenceTranslator, expand_relative_path, insert_blank_entry, pop_row,
    push_blank_row, remove_entry,
};
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;

mod host;
mod state;
mod transport;

pub use host::{HostEnvironment, Notification, NotificationLevel};
pub use state::{
    Assignment, AssignmentAction, AssignmentContext, FieldInput, FormSource, LivenessHandle,
    PreparedRefresh, RefreshOutcome, RepeatOperation, RequestTicket, RequestTracker,
    SubmitOutcome,
};
pub use transport::{
    CaseTransport, CreateCaseRequest, CreateCaseResponse, RefreshRequest, SaveRequest,
    SessionContext, SubmissionPayload, SubmitRequest, SubmitResponse,
};

const NO_ACTIONS_MESSAGE: &str = "Assignment does not have any actions configured.";
const ADD_GROUP_PROMPT: &str = "Please enter a name for the group.";
const REMOVE_GROUP_PROMPT: &str = "Please enter the name of the group to be deleted.";

/// Owns the state of one rendered form.
pub struct FormController<T: CaseTransport, H: HostEnvironment> {
    transport: T,
    host: H,
    session: SessionContext,
    interpreter: LayoutInterpreter,
    translator: ReferenceTranslator,
    scripts: ScriptRegistry,
    assignment: Option<AssignmentContext>,
    case_id: Option<String>,
    view: View,
    values: EditState,
    errors: ValidationErrors,
    loading: AHashSet<String>,
    requests: RequestTracker,
    liveness: LivenessHandle,
}

impl<T: CaseTransport, H: HostEnvironment> FormController<T, H> {
    /// Starts configuring a controller for the given collaborators.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let form = FormController::builder(transport, host, session)
    ///     .with_config(config)
    ///     .with_script("showHelp", |args| { println!("{:?}", args); Ok(()) })
    ///     .open(&assignment)
    ///     .await?;
    /// ```
    pub fn builder(transport: T, host: H, session: SessionContext) -> FormControllerBuilder<T, H> {
        FormControllerBuilder {
            transport,
            host,
            session,
            interpreter: None,
            config: FormConfig::default(),
            scripts: ScriptRegistry::new(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn values(&self) -> &EditState {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn assignment(&self) -> Option<&AssignmentContext> {
        self.assignment.as_ref()
    }

    /// The action the form currently submits against.
    pub fn active_action(&self) -> Option<&str> {
        self.assignment
            .as_ref()
            .map(|context| context.action_id.as_str())
    }

    pub fn case_id(&self) -> Option<&str> {
        self.assignment
            .as_ref()
            .map(|context| context.case_id.as_str())
            .or(self.case_id.as_deref())
    }

    pub fn is_loading(&self, reference: &str) -> bool {
        self.loading.contains(reference)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    /// A handle continuations can hold to check whether this form is still open.
    pub fn liveness(&self) -> LivenessHandle {
        self.liveness.clone()
    }

    pub fn is_disposed(&self) -> bool {
        !self.liveness.is_alive()
    }

    pub fn render(&self) -> Option<RenderNode> {
        self.render_at(Utc::now())
    }

    /// Renders the bound view, with relative timestamps measured from `now`.
    pub fn render_at(&self, now: DateTime<Utc>) -> Option<RenderNode> {
        let ctx = RenderContext::new(&self.values, &self.errors, &self.loading).at(now);
        self.interpreter.render(&self.view, &ctx)
    }

    /// The submission document derived from the current edit state.
    pub fn nested_document(&self) -> Result<Value, FormError> {
        Ok(self.translator.to_nested_document(&self.values)?)
    }

    /// Binds a new view or page. The edit state is rebuilt from scratch and any
    /// in-flight refresh is superseded.
    pub fn rebind(&mut self, source: FormSource) -> Result<(), FormError> {
        self.ensure_alive()?;
        let view = match source {
            FormSource::Assignment { context, view } => {
                self.case_id = Some(context.case_id.clone());
                self.assignment = Some(context);
                view
            }
            FormSource::Page { case_id, page } => {
                self.case_id = case_id;
                self.assignment = None;
                page
            }
        };
        self.requests.issue();
        self.errors.clear();
        self.replace_view(view, true);
        Ok(())
    }

    /// Makes `action_id` the active action of the bound assignment.
    pub fn set_active_action(&mut self, action_id: &str) -> Result<(), FormError> {
        let context = self.assignment.as_mut().ok_or(FormError::NoAssignment)?;
        debug!(
            "Active action of '{}' is now '{}'",
            context.assignment_id, action_id
        );
        context.action_id = action_id.to_string();
        Ok(())
    }

    /// Writes a user edit into the edit state.
    pub fn on_field_change(&mut self, reference: &str, input: FieldInput) -> Result<(), FormError> {
        self.ensure_alive()?;
        let value = input.into_value(&self.interpreter.config().date_format);
        debug!("Edit '{}' = {}", reference, value);
        self.values.insert(reference.to_string(), value);
        Ok(())
    }

    /// Applies an edit and then runs `handler`, so every step (including the payload
    /// of a refresh) observes the new value.
    pub async fn change_and_dispatch(
        &mut self,
        reference: &str,
        input: FieldInput,
        handler: &ComposedHandler,
    ) -> Result<(), FormError> {
        self.on_field_change(reference, input)?;
        self.dispatch(handler).await
    }

    /// Runs the steps of a composed handler in order, stopping at the first failure.
    pub async fn dispatch(&mut self, handler: &ComposedHandler) -> Result<(), FormError> {
        self.ensure_alive()?;
        for step in &handler.steps {
            match step {
                HandlerStep::PreventDefault => {}
                HandlerStep::SetValue { pairs } => self.apply_set_values(pairs),
                HandlerStep::Refresh { set_values } => {
                    self.refresh_with(set_values).await?;
                }
                HandlerStep::PerformAction { action_name } => {
                    self.perform_action(action_name).await?;
                }
                HandlerStep::RunScript {
                    function_name,
                    parameters,
                } => self.run_script(function_name, parameters)?,
                HandlerStep::OpenUrl {
                    url_base,
                    window_name,
                    window_options,
                } => self.open_url(url_base, window_name, window_options),
            }
        }
        Ok(())
    }

    fn apply_set_values(&mut self, pairs: &[SetValuePair]) {
        let resolved: Vec<(String, Value)> = pairs
            .iter()
            .map(|pair| {
                (
                    expand_relative_path(&pair.name).to_string(),
                    resolve_property(&pair.value, &self.values),
                )
            })
            .collect();
        self.values.extend(resolved);
    }

    fn run_script(&self, name: &str, parameters: &[Value]) -> Result<(), FormError> {
        let arguments: Vec<Value> = parameters
            .iter()
            .map(|parameter| resolve_property(parameter, &self.values))
            .collect();
        self.scripts.invoke(name, &arguments).map_err(|e| {
            self.host.notify(Notification::error(e.to_string()));
            FormError::from(e)
        })
    }

    fn open_url(&self, url_base: &Value, window_name: &str, window_options: &str) {
        let mut url = resolve_text(url_base, &self.values);
        if !url.starts_with("http") {
            url = format!("{}{}", self.interpreter.config().default_url_scheme, url);
        }
        debug!("Opening '{}' in window '{}'", url, window_name);
        self.host.open_window(&url, window_name, window_options);
    }

    /// Builds a refresh of the bound assignment and issues its ticket.
    ///
    /// `set_values` are resolved against the current edit state and written into the
    /// outgoing document only. Validation errors are cleared before the request goes out.
    pub fn prepare_refresh(&mut self, set_values: &[SetValuePair]) -> Result<PreparedRefresh, FormError> {
        self.ensure_alive()?;
        let context = self.assignment.as_ref().ok_or(FormError::NoAssignment)?;

        let mut document = self.translator.to_nested_document(&self.values)?;
        for pair in set_values {
            let value = resolve_property(&pair.value, &self.values);
            self.translator
                .add_entry(&mut document, expand_relative_path(&pair.name), value)?;
        }

        let request = RefreshRequest {
            case_id: context.case_id.clone(),
            assignment_id: context.assignment_id.clone(),
            action_id: context.action_id.clone(),
            payload: SubmissionPayload { content: document },
        };
        self.errors.clear();
        let ticket = self.requests.issue();
        debug!(
            "Prepared refresh #{} for action '{}'",
            ticket.seq(),
            request.action_id
        );

        Ok(PreparedRefresh {
            ticket,
            request,
            container: None,
        })
    }

    /// Applies the response to a prepared refresh.
    ///
    /// The container loading flag is released whatever the outcome. Responses to a
    /// closed form or to a superseded ticket are discarded without touching state.
    pub fn apply_refresh(
        &mut self,
        prepared: &PreparedRefresh,
        result: Result<View, TransportError>,
    ) -> Result<RefreshOutcome, FormError> {
        if let Some(container) = &prepared.container {
            self.loading.remove(container);
        }
        if !self.liveness.is_alive() {
            debug!(
                "Form closed; dropping response to refresh #{}",
                prepared.ticket.seq()
            );
            return Ok(RefreshOutcome::Disposed);
        }
        if !self.requests.is_latest(prepared.ticket) {
            warn!(
                "Discarding stale response to refresh #{}",
                prepared.ticket.seq()
            );
            return Ok(RefreshOutcome::Superseded);
        }

        match result {
            Ok(view) => {
                self.replace_view(view, false);
                Ok(RefreshOutcome::Applied)
            }
            Err(error) => Err(self.report(error)),
        }
    }

    /// Posts the current edit state and applies the re-evaluated view.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, FormError> {
        self.refresh_with(&[]).await
    }

    pub async fn refresh_with(
        &mut self,
        set_values: &[SetValuePair],
    ) -> Result<RefreshOutcome, FormError> {
        let prepared = self.prepare_refresh(set_values)?;
        let result = self.send_refresh(&prepared).await;
        self.apply_refresh(&prepared, result)
    }

    async fn send_refresh(&self, prepared: &PreparedRefresh) -> Result<View, TransportError> {
        let session = self.active_session()?;
        self.transport.refresh(session, &prepared.request).await
    }

    /// Adds or removes a row of the repeat container at `reference` in the outgoing
    /// document and marks the container as loading.
    ///
    /// PageList removal keeps the last row. PageGroup operations prompt for the key;
    /// `Ok(None)` means the prompt was cancelled and nothing was sent.
    pub fn prepare_repeat_edit(
        &mut self,
        reference: &str,
        kind: RepeatKind,
        operation: RepeatOperation,
    ) -> Result<Option<PreparedRefresh>, FormError> {
        self.ensure_alive()?;
        if self.loading.contains(reference) {
            return Err(FormError::RepeatBusy(reference.to_string()));
        }
        let context = self.assignment.clone().ok_or(FormError::NoAssignment)?;

        let mut document = self.translator.to_nested_document(&self.values)?;
        let container = self
            .translator
            .resolve_repeat_container(reference, kind, &mut document)?;

        match (kind, container) {
            (RepeatKind::List, Value::Array(rows)) => match operation {
                RepeatOperation::Add => push_blank_row(rows),
                RepeatOperation::Remove => {
                    if !pop_row(rows) {
                        debug!("Keeping the only row of '{}'", reference);
                    }
                }
            },
            (RepeatKind::Group, Value::Object(entries)) => {
                let message = match operation {
                    RepeatOperation::Add => ADD_GROUP_PROMPT,
                    RepeatOperation::Remove => REMOVE_GROUP_PROMPT,
                };
                let Some(key) = self.host.prompt(message, "") else {
                    debug!("Group edit on '{}' cancelled", reference);
                    return Ok(None);
                };
                let key = key.trim();
                if key.is_empty() {
                    return Err(FormError::EmptyGroupKey(reference.to_string()));
                }
                match operation {
                    RepeatOperation::Add => {
                        if !insert_blank_entry(entries, key) {
                            return Err(FormError::DuplicateGroupKey {
                                reference: reference.to_string(),
                                key: key.to_string(),
                            });
                        }
                    }
                    RepeatOperation::Remove => {
                        if !remove_entry(entries, key) {
                            debug!("Group '{}' has no entry '{}'", reference, key);
                        }
                    }
                }
            }
            _ => {}
        }

        self.loading.insert(reference.to_string());
        self.errors.clear();
        let ticket = self.requests.issue();
        debug!(
            "Prepared {:?} on '{}' as refresh #{}",
            operation,
            reference,
            ticket.seq()
        );

        Ok(Some(PreparedRefresh {
            ticket,
            request: RefreshRequest {
                case_id: context.case_id,
                assignment_id: context.assignment_id,
                action_id: context.action_id,
                payload: SubmissionPayload { content: document },
            },
            container: Some(reference.to_string()),
        }))
    }

    /// Adds or removes a repeat row and refreshes the form through the server.
    pub async fn edit_repeat(
        &mut self,
        reference: &str,
        kind: RepeatKind,
        operation: RepeatOperation,
    ) -> Result<RefreshOutcome, FormError> {
        let Some(prepared) = self.prepare_repeat_edit(reference, kind, operation)? else {
            return Ok(RefreshOutcome::Cancelled);
        };
        let result = self.send_refresh(&prepared).await;
        self.apply_refresh(&prepared, result)
    }

    /// Performs the active action with the current content.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, FormError> {
        self.ensure_alive()?;
        let context = self.assignment.clone().ok_or(FormError::NoAssignment)?;
        let content = self.translator.to_nested_document(&self.values)?;
        self.errors.clear();
        self.requests.issue();

        let request = SubmitRequest {
            case_id: context.case_id.clone(),
            assignment_id: context.assignment_id.clone(),
            action_id: context.action_id.clone(),
            payload: SubmissionPayload { content },
        };
        let result = match self.active_session() {
            Ok(session) => self.transport.perform_action(session, &request).await,
            Err(e) => Err(e),
        };
        let response = result.map_err(|e| self.report(e))?;
        self.ensure_alive()?;

        match response.next_assignment_id {
            Some(next) if next == context.assignment_id => {
                let action_id = response.next_action_id.unwrap_or(context.action_id);
                info!(
                    "Assignment '{}' continues with action '{}'",
                    next, action_id
                );
                self.load_action(&action_id).await?;
                Ok(SubmitOutcome::ActionChanged { action_id })
            }
            Some(next) => {
                info!(
                    "Case '{}' moved on to assignment '{}'",
                    context.case_id, next
                );
                Ok(SubmitOutcome::NextAssignment {
                    assignment_id: next,
                })
            }
            None => {
                info!("Case '{}' has no further assignment", context.case_id);
                Ok(SubmitOutcome::Completed {
                    next_page_id: response.next_page_id,
                })
            }
        }
    }

    /// Saves the current content to the case without closing the form.
    pub async fn save(&mut self) -> Result<(), FormError> {
        self.ensure_alive()?;
        let case_id = self.case_id().ok_or(FormError::NoAssignment)?.to_string();
        let etag = self
            .assignment
            .as_ref()
            .and_then(|context| context.etag.clone());
        let content = self.translator.to_nested_document(&self.values)?;

        let request = SaveRequest {
            case_id,
            etag,
            payload: SubmissionPayload { content },
        };
        let result = match self.active_session() {
            Ok(session) => self.transport.update_case(session, &request).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| self.report(e))?;
        info!("Saved case '{}'", request.case_id);
        self.host.notify(Notification::info("Case saved."));
        Ok(())
    }

    /// Closes the form. Responses that arrive afterwards are dropped.
    pub fn cancel(&mut self) {
        if self.liveness.is_alive() {
            info!("Closing form for '{}'", self.view.name);
            self.liveness.dispose();
            self.loading.clear();
        }
    }

    /// Loads the view of `action_name` and makes it the active action.
    pub async fn perform_action(&mut self, action_name: &str) -> Result<(), FormError> {
        self.ensure_alive()?;
        self.load_action(action_name).await
    }

    async fn load_action(&mut self, action_id: &str) -> Result<(), FormError> {
        let assignment_id = self
            .assignment
            .as_ref()
            .ok_or(FormError::NoAssignment)?
            .assignment_id
            .clone();
        self.requests.issue();

        let result = match self.active_session() {
            Ok(session) => {
                self.transport
                    .fetch_action_view(session, &assignment_id, action_id)
                    .await
            }
            Err(e) => Err(e),
        };
        let view = result.map_err(|e| self.report(e))?;
        self.ensure_alive()?;

        self.set_active_action(action_id)?;
        self.replace_view(view, true);
        Ok(())
    }

    /// Creates a case of `case_type_id` from the content of a `New` page.
    pub async fn create_case(&mut self, case_type_id: &str) -> Result<CreateCaseResponse, FormError> {
        self.ensure_alive()?;
        let content = self.translator.to_nested_document(&self.values)?;
        let request = CreateCaseRequest {
            case_type_id: case_type_id.to_string(),
            payload: SubmissionPayload { content },
        };
        let result = match self.active_session() {
            Ok(session) => self.transport.create_case(session, &request).await,
            Err(e) => Err(e),
        };
        let response = result.map_err(|e| self.report(e))?;
        info!("Created case '{}'", response.case_id);
        Ok(response)
    }

    fn replace_view(&mut self, view: View, force: bool) {
        if force || view != self.view {
            debug!("Re-initialising edit state from '{}'", view.name);
            self.values = self.interpreter.initial_values(&view);
        }
        self.view = view;
    }

    /// Records validation messages inline and notifies the host of anything else.
    fn report(&mut self, error: TransportError) -> FormError {
        match &error {
            TransportError::Validation(payload) => {
                debug!(
                    "Server returned {} validation message(s)",
                    payload.validation_messages.len()
                );
                self.errors.merge(payload);
            }
            other => {
                warn!("Request failed: {}", other);
                self.host.notify(Notification::error(other.to_string()));
            }
        }
        FormError::Transport(error)
    }

    fn active_session(&self) -> Result<&SessionContext, TransportError> {
        self.session.token().map(|_| &self.session)
    }

    fn ensure_alive(&self) -> Result<(), FormError> {
        if self.liveness.is_alive() {
            Ok(())
        } else {
            Err(FormError::Disposed)
        }
    }
}

/// Builder for [`FormController`].
pub struct FormControllerBuilder<T: CaseTransport, H: HostEnvironment> {
    transport: T,
    host: H,
    session: SessionContext,
    interpreter: Option<LayoutInterpreter>,
    config: FormConfig,
    scripts: ScriptRegistry,
}

impl<T: CaseTransport, H: HostEnvironment> FormControllerBuilder<T, H> {
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a preconfigured interpreter. Its configuration replaces any set with
    /// [`with_config`](Self::with_config).
    pub fn with_interpreter(mut self, interpreter: LayoutInterpreter) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    /// Registers a function `runScript` actions may call.
    pub fn with_script<F>(mut self, name: &str, script: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), String> + Send + Sync + 'static,
    {
        self.scripts.register(name, script);
        self
    }

    pub fn with_scripts(mut self, scripts: ScriptRegistry) -> Self {
        self.scripts = scripts;
        self
    }

    /// Binds the controller to an already loaded view or page.
    pub fn build(self, source: FormSource) -> FormController<T, H> {
        let interpreter = self.interpreter.unwrap_or_else(|| {
            LayoutInterpreter::builder()
                .with_config(self.config.clone())
                .build()
        });
        let translator = ReferenceTranslator::from_config(interpreter.config());

        let (assignment, case_id, view) = match source {
            FormSource::Assignment { context, view } => {
                let case_id = Some(context.case_id.clone());
                (Some(context), case_id, view)
            }
            FormSource::Page { case_id, page } => (None, case_id, page),
        };
        let values = interpreter.initial_values(&view);

        FormController {
            transport: self.transport,
            host: self.host,
            session: self.session,
            interpreter,
            translator,
            scripts: self.scripts,
            assignment,
            case_id,
            view,
            values,
            errors: ValidationErrors::new(),
            loading: AHashSet::new(),
            requests: RequestTracker::default(),
            liveness: LivenessHandle::new(),
        }
    }

    /// Opens `assignment` on its first action.
    ///
    /// An assignment without actions cannot be worked: the host is notified and
    /// `NoActions` is returned without creating a form.
    pub async fn open(self, assignment: &Assignment) -> Result<FormController<T, H>, FormError> {
        let Some(action) = assignment.actions.first() else {
            warn!("Assignment '{}' has no actions", assignment.id);
            self.host.notify(Notification::error(NO_ACTIONS_MESSAGE));
            return Err(FormError::NoActions {
                assignment_id: assignment.id.clone(),
            });
        };

        let result = match self.session.token() {
            Ok(_) => {
                self.transport
                    .fetch_action_view(&self.session, &assignment.id, &action.id)
                    .await
            }
            Err(e) => Err(e),
        };
        let view = match result {
            Ok(view) => view,
            Err(e) => {
                self.host.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        let context = AssignmentContext {
            case_id: assignment.case_id.clone(),
            assignment_id: assignment.id.clone(),
            action_id: action.id.clone(),
            etag: assignment.etag.clone(),
        };
        Ok(self.build(FormSource::Assignment { context, view }))
    }
}
