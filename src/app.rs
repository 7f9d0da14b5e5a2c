use crate::analysis::{analyze, AnalysisError, GeminiClient, GenerativeClient};
use crate::config::{self, Settings, APP_NAME, APP_VERSION};
use crate::enhancement::{EnhancementParameters, DEFAULT_CONTRAST_LIMIT, DEFAULT_DENOISE_STRENGTH};
use crate::image_pipeline::{ImageError, XrayImagePipeline};
use crate::message::Message;
use crate::model::loader::{load_xray, SUPPORTED_EXTENSIONS};
use crate::model::{
    AnalysisRequest, EnhancedXray, FocusSelection, FormError, LoadedXray, PatientForm,
    PatientRecord,
};
use crate::views::{
    analysis_panel, configuration_section, image_panel, patient_panel, AnalysisState,
    EnhancementControls,
};
use iced::widget::text::Wrapping;
use iced::widget::{button, column, container, horizontal_rule, row, scrollable, text};
use iced::{application, Alignment, Element, Length, Task, Theme};
use rfd::AsyncFileDialog;
use std::sync::Arc;

pub fn run() -> iced::Result {
    let _ = dotenvy::dotenv();
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config::DEFAULT_LOG_FILTER),
    )
    .format_timestamp_secs()
    .try_init();

    let settings = Settings::from_env();
    log::info!(
        "{APP_NAME} v{APP_VERSION} starting (model {}, timeout {}s)",
        settings.model,
        settings.timeout_secs
    );

    application(APP_NAME, App::update, App::view)
        .theme(App::theme)
        .window_size((1360.0, 900.0))
        .run_with(move || {
            let client = Arc::new(GeminiClient::from_settings(&settings));
            (App::new(settings, client), Task::none())
        })
}

pub struct App {
    settings: Settings,
    client: Arc<dyn GenerativeClient>,
    api_key_input: String,
    form: PatientForm,
    form_error: Option<FormError>,
    patient: Option<PatientRecord>,
    xray: Option<LoadedXray>,
    enhanced: Option<EnhancedXray>,
    denoise_strength: u8,
    contrast_limit: f32,
    enhancement_generation: u64,
    enhancing: bool,
    focus: FocusSelection,
    analysis: AnalysisState,
    analysis_generation: u64,
    last_error: Option<String>,
}

impl App {
    pub fn new(settings: Settings, client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            settings,
            client,
            api_key_input: String::new(),
            form: PatientForm::new(chrono::Local::now().date_naive()),
            form_error: None,
            patient: None,
            xray: None,
            enhanced: None,
            denoise_strength: DEFAULT_DENOISE_STRENGTH,
            contrast_limit: DEFAULT_CONTRAST_LIMIT,
            enhancement_generation: 0,
            enhancing: false,
            focus: FocusSelection::default(),
            analysis: AnalysisState::default(),
            analysis_generation: 0,
            last_error: None,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ApiKeyChanged(key) => {
                self.api_key_input = key;
                Task::none()
            }
            Message::NameChanged(value) => {
                self.form.name = value;
                Task::none()
            }
            Message::AgeChanged(value) => {
                self.form.age = value;
                Task::none()
            }
            Message::GenderSelected(gender) => {
                self.form.gender = gender;
                Task::none()
            }
            Message::ConditionToggled(condition, selected) => {
                self.form.set_condition(condition, selected);
                Task::none()
            }
            Message::ComplaintsChanged(value) => {
                self.form.complaints = value;
                Task::none()
            }
            Message::TreatmentsChanged(value) => {
                self.form.previous_treatments = value;
                Task::none()
            }
            Message::SmokingSelected(status) => {
                self.form.smoking = status;
                Task::none()
            }
            Message::LastVisitChanged(value) => {
                self.form.last_visit = value;
                Task::none()
            }
            Message::SavePatient => {
                match self.form.submit() {
                    Ok(record) => {
                        log::info!("Patient information saved");
                        self.patient = Some(record);
                        self.form_error = None;
                    }
                    Err(err) => {
                        log::warn!("Patient form rejected: {err}");
                        self.form_error = Some(err);
                    }
                }
                Task::none()
            }
            Message::PickImage => Task::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("Dental X-ray", SUPPORTED_EXTENSIONS)
                        .pick_file()
                        .await
                        .map(|handle| load_xray(handle.path().to_path_buf()))
                },
                Message::ImageLoaded,
            ),
            Message::ImageLoaded(None) => Task::none(),
            Message::ImageLoaded(Some(Ok(xray))) => {
                if let Some(hints) = &xray.hints {
                    if self.form.prefill_from(hints) {
                        log::info!("Prefilled patient form from DICOM header");
                    }
                }
                self.xray = Some(xray);
                self.enhanced = None;
                self.discard_analysis();
                self.last_error = None;
                self.start_enhancement()
            }
            Message::ImageLoaded(Some(Err(err))) => {
                log::error!("X-ray rejected: {err}");
                self.xray = None;
                self.enhanced = None;
                self.enhancing = false;
                self.discard_analysis();
                self.last_error = Some(err.to_string());
                Task::none()
            }
            Message::DenoiseChanged(strength) => {
                self.denoise_strength = strength;
                Task::none()
            }
            Message::ContrastChanged(limit) => {
                self.contrast_limit = (limit * 10.0).round() / 10.0;
                Task::none()
            }
            Message::ApplyEnhancement => self.start_enhancement(),
            Message::ResetEnhancement => {
                self.denoise_strength = DEFAULT_DENOISE_STRENGTH;
                self.contrast_limit = DEFAULT_CONTRAST_LIMIT;
                self.start_enhancement()
            }
            Message::EnhancementFinished(generation, _)
                if generation != self.enhancement_generation =>
            {
                log::debug!(
                    "Dropping superseded enhancement {generation} (current {})",
                    self.enhancement_generation
                );
                Task::none()
            }
            Message::EnhancementFinished(_, Ok(enhanced)) => {
                self.enhanced = Some(enhanced);
                self.enhancing = false;
                Task::none()
            }
            Message::EnhancementFinished(_, Err(err)) => {
                log::error!("Enhancement failed: {err}");
                self.enhancing = false;
                self.last_error = Some(err.to_string());
                Task::none()
            }
            Message::FocusToggled(area, selected) => {
                self.focus.set(area, selected);
                Task::none()
            }
            Message::GenerateAnalysis => self.start_analysis(),
            Message::AnalysisFinished(generation, _)
                if generation != self.analysis_generation =>
            {
                log::debug!("Dropping analysis {generation} for a replaced X-ray");
                self.analysis = AnalysisState::Idle;
                Task::none()
            }
            Message::AnalysisFinished(_, Ok(text)) => {
                self.analysis = AnalysisState::Done(text);
                Task::none()
            }
            Message::AnalysisFinished(_, Err(err)) => {
                log::error!("{err}");
                self.analysis = AnalysisState::Idle;
                self.last_error = Some(err.to_string());
                Task::none()
            }
            Message::DismissError => {
                self.last_error = None;
                Task::none()
            }
        }
    }

    fn start_enhancement(&mut self) -> Task<Message> {
        let Some(xray) = &self.xray else {
            return Task::none();
        };

        let params = match EnhancementParameters::new(self.denoise_strength, self.contrast_limit) {
            Ok(params) => params,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Task::none();
            }
        };

        self.enhancement_generation += 1;
        self.enhancing = true;
        let generation = self.enhancement_generation;
        let pixels = xray.pixels.clone();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    XrayImagePipeline::enhance_xray(&pixels, &params)
                })
                .await
                .unwrap_or_else(|err| Err(ImageError::Interrupted(err.to_string())))
            },
            move |result| Message::EnhancementFinished(generation, result),
        )
    }

    fn start_analysis(&mut self) -> Task<Message> {
        if self.analysis == AnalysisState::Running {
            return Task::none();
        }
        if self.enhancing {
            log::debug!("Analysis not started: enhancement still running");
            return Task::none();
        }

        let credential = match self.settings.resolve_credential(&self.api_key_input) {
            Ok(credential) => credential,
            Err(err) => {
                self.last_error = Some(err.to_string());
                return Task::none();
            }
        };

        let request = match AnalysisRequest::new(
            self.patient.as_ref(),
            &self.focus,
            self.enhanced.as_ref().map(|enhanced| &enhanced.encoded),
        ) {
            Ok(request) => request,
            Err(reason) => {
                log::debug!("Analysis not started: {reason}");
                return Task::none();
            }
        };

        self.analysis_generation += 1;
        self.analysis = AnalysisState::Running;
        self.last_error = None;
        let generation = self.analysis_generation;
        let client = Arc::clone(&self.client);

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    analyze(client.as_ref(), &request, &credential)
                })
                .await
                .unwrap_or_else(|err| {
                    Err(AnalysisError::ExternalService(format!(
                        "analysis worker stopped: {err}"
                    )))
                })
            },
            move |result| Message::AnalysisFinished(generation, result),
        )
    }

    /// Forgets any result tied to the previous X-ray. A request still in
    /// flight stays `Running` until it returns, and its result is dropped.
    fn discard_analysis(&mut self) {
        self.analysis_generation += 1;
        if self.analysis != AnalysisState::Running {
            self.analysis = AnalysisState::Idle;
        }
    }

    fn analysis_gate(&self) -> Result<(), crate::model::InputError> {
        AnalysisRequest::check(
            self.patient.as_ref(),
            self.enhanced.as_ref().map(|enhanced| &enhanced.encoded),
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let credential_missing = self
            .settings
            .resolve_credential(&self.api_key_input)
            .is_err();

        let mut sidebar = column![configuration_section(&self.api_key_input, credential_missing)]
            .spacing(16);
        sidebar = sidebar.push(patient_panel(
            &self.form,
            self.form_error.as_ref(),
            self.patient.as_ref(),
        ));
        let sidebar = container(scrollable(sidebar.padding(16)))
            .width(Length::Fixed(340.0))
            .height(Length::Fill);

        let main: Element<'_, Message> = if credential_missing {
            container(text("⚠️ Please provide an API key to continue.").size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Alignment::Center)
                .align_y(Alignment::Center)
                .into()
        } else {
            let upload_column = container(scrollable(image_panel(
                self.xray.as_ref(),
                self.enhanced.as_ref(),
                EnhancementControls {
                    denoise_strength: self.denoise_strength,
                    contrast_limit: self.contrast_limit,
                    enhancing: self.enhancing,
                },
            )))
            .padding(16)
            .width(Length::FillPortion(1));

            let analysis_column = container(analysis_panel(
                self.analysis_gate(),
                &self.focus,
                &self.analysis,
                self.enhancing,
            ))
            .padding(16)
            .width(Length::FillPortion(1))
            .height(Length::Fill);

            row![upload_column, analysis_column]
                .spacing(16)
                .height(Length::Fill)
                .into()
        };

        let mut content = column![
            text(format!("🦷 {APP_NAME}")).size(28),
            horizontal_rule(1)
        ]
        .spacing(12);

        if let Some(error) = &self.last_error {
            content = content.push(
                row![
                    text(error).size(16).wrapping(Wrapping::Word).width(Length::Fill),
                    button("Dismiss").on_press(Message::DismissError),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            );
        }

        content = content
            .push(main)
            .push(horizontal_rule(1))
            .push(
                container(text(format!("{APP_NAME} v{APP_VERSION}")).size(12))
                    .width(Length::Fill)
                    .align_x(Alignment::Center),
            );

        row![sidebar, content.padding(20).width(Length::Fill)]
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}
