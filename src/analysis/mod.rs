//! Prompt construction and the call to the hosted model.

mod client;
mod prompt;

use thiserror::Error;

use crate::model::AnalysisRequest;

pub use client::{GeminiClient, GenerativeClient};
pub use prompt::build_prompt;

pub const DISCLAIMER: &str = "⚠️ Medical Disclaimer: This analysis is generated by AI and is for \
informational purposes only. It should not be considered as a definitive diagnosis. Please \
consult with a qualified dental professional for accurate diagnosis and treatment planning.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No API key was supplied for the analysis service")]
    Authentication,

    #[error("Analysis service failed: {0}")]
    ExternalService(String),
}

/// Sends one analysis request and returns the model's text unmodified.
///
/// Fails with [`AnalysisError::Authentication`] before any network traffic
/// when the credential is blank. Nothing is retried or cached.
pub fn analyze(
    client: &dyn GenerativeClient,
    request: &AnalysisRequest,
    credential: &str,
) -> Result<String, AnalysisError> {
    if credential.trim().is_empty() {
        return Err(AnalysisError::Authentication);
    }

    let prompt = build_prompt(request.record(), request.focus());
    log::info!(
        "Requesting analysis ({} focus area(s), {} byte image)",
        request.focus().areas().len(),
        request.image().bytes.len()
    );

    let text = client.generate(credential.trim(), &prompt, request.image())?;
    log::info!("Analysis received ({} chars)", text.chars().count());
    Ok(text)
}

/// The text shown for a result: the model output followed by the notice.
pub fn with_disclaimer(text: &str) -> String {
    format!("{text}\n\n{DISCLAIMER}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        EncodedImage, FocusArea, FocusSelection, Gender, MedicalCondition, PatientRecord,
        SmokingStatus,
    };
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns the prompt it was given and remembers every call.
    #[derive(Default)]
    struct EchoClient {
        calls: AtomicUsize,
        last_key: Mutex<Option<String>>,
        last_image: Mutex<Option<EncodedImage>>,
    }

    impl GenerativeClient for EchoClient {
        fn generate(
            &self,
            api_key: &str,
            prompt: &str,
            image: &EncodedImage,
        ) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_key.lock().unwrap() = Some(api_key.to_string());
            *self.last_image.lock().unwrap() = Some(image.clone());
            Ok(prompt.to_string())
        }
    }

    struct FailingClient;

    impl GenerativeClient for FailingClient {
        fn generate(&self, _: &str, _: &str, _: &EncodedImage) -> Result<String, AnalysisError> {
            Err(AnalysisError::ExternalService("503 Service Unavailable".into()))
        }
    }

    fn request() -> AnalysisRequest {
        let record = PatientRecord {
            name: "Jane Doe".into(),
            age: 34,
            gender: Gender::Female,
            medical_history: [MedicalCondition::Diabetes].into_iter().collect(),
            complaints: "pain".into(),
            previous_treatments: "none".into(),
            smoking: SmokingStatus::NonSmoker,
            last_visit: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        };
        let focus: FocusSelection = [FocusArea::CavityDetection].into_iter().collect();
        let image = EncodedImage {
            mime_type: "image/png",
            bytes: vec![7; 32],
        };
        AnalysisRequest::new(Some(&record), &focus, Some(&image)).unwrap()
    }

    #[test]
    fn echo_stub_sees_the_templated_prompt() {
        let client = EchoClient::default();
        let text = analyze(&client, &request(), "secret").unwrap();
        for expected in ["Jane Doe", "34", "Diabetes", "Cavity Detection"] {
            assert!(text.contains(expected), "missing {expected}");
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.last_key.lock().unwrap().as_deref(), Some("secret"));
        assert_eq!(
            client.last_image.lock().unwrap().as_ref().map(|image| image.bytes.len()),
            Some(32)
        );
    }

    #[test]
    fn blank_credential_fails_without_calling_out() {
        let client = EchoClient::default();
        for credential in ["", "   "] {
            assert_eq!(
                analyze(&client, &request(), credential),
                Err(AnalysisError::Authentication)
            );
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn service_failures_propagate() {
        assert_eq!(
            analyze(&FailingClient, &request(), "key"),
            Err(AnalysisError::ExternalService("503 Service Unavailable".into()))
        );
    }

    #[test]
    fn every_call_reaches_the_client() {
        let client = EchoClient::default();
        let request = request();
        analyze(&client, &request, "key").unwrap();
        analyze(&client, &request, "key").unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn every_result_ends_with_the_disclaimer() {
        let shown = with_disclaimer("## Findings\nNo caries.");
        assert!(shown.starts_with("## Findings\nNo caries.\n\n"));
        assert!(shown.ends_with(DISCLAIMER));

        let empty = with_disclaimer("");
        assert!(empty.ends_with(DISCLAIMER));
    }
}
