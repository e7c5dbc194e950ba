use std::time::Duration;

use tracing::{event, Level};
use uuid::Uuid;

use crate::{
    error::Result,
    http::{Params, SixpackHttpClient},
    models::{ParticipateOptions, SessionOptions, SessionParams, SixpackResponse},
    validation::{check_alternatives, check_experiment_name, check_kpi},
};

const PARTICIPATE_ENDPOINT: &str = "/participate";
const CONVERT_ENDPOINT: &str = "/convert";

/// Random 128 bit visitor id in the hyphenated UUID form.
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}

/// Sixpack session for a single visitor.
///
/// Holds the visitor id and the transport settings, none of which change
/// after construction, so a session can be shared across tasks freely.
#[derive(Clone, Debug)]
pub struct Session {
    client_id: String,
    http_client: SixpackHttpClient,
}

impl Session {
    /// Creates a session, generating a client id when none is given. Nothing
    /// is validated here.
    pub fn new(client_id: Option<String>, options: SessionOptions, params: SessionParams) -> Self {
        Self {
            client_id: client_id.unwrap_or_else(generate_client_id),
            http_client: SixpackHttpClient::new(options, params),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn host(&self) -> &str {
        self.http_client.host()
    }

    pub fn timeout(&self) -> Duration {
        self.http_client.timeout()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.http_client.user_agent()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.http_client.ip_address()
    }

    /// Enrolls the visitor in `experiment_name` and returns the assigned alternative.
    ///
    /// The first alternative is the control. Invalid input is rejected before
    /// anything is sent; any network or server failure yields a `failed`
    /// response whose alternative is the control.
    pub async fn participate<S: AsRef<str>>(
        &self,
        api_key: &str,
        experiment_name: &str,
        alternatives: &[S],
        options: ParticipateOptions,
    ) -> Result<SixpackResponse> {
        check_experiment_name(experiment_name)?;
        check_alternatives(alternatives)?;
        let traffic_fraction = options.traffic_fraction.to_query_value()?;

        let mut params: Params = vec![
            ("client_id", self.client_id.clone()),
            ("api_key", api_key.to_string()),
            ("experiment", experiment_name.to_string()),
        ];
        params.extend(
            alternatives
                .iter()
                .map(|alt| ("alternatives", alt.as_ref().to_string())),
        );
        // lowercase true/false, the server lowercases before comparing
        params.push(("prefetch", options.prefetch.to_string()));

        if let Some(force) = options.force {
            if alternatives.iter().any(|alt| alt.as_ref() == force) {
                params.push(("force", force));
            } else {
                event!(
                    Level::DEBUG,
                    "Ignoring forced alternative {} for {}, not one of the alternatives",
                    force,
                    experiment_name
                );
            }
        }
        params.push(("traffic_fraction", traffic_fraction));

        let response = self
            .http_client
            .get_response(PARTICIPATE_ENDPOINT, params)
            .await;

        // validated above, there are at least two
        let control = alternatives[0].as_ref();
        if !response.is_ok() {
            event!(
                Level::DEBUG,
                "Participation in {} did not succeed, status {:?}",
                experiment_name,
                response.status
            );
        }
        Ok(response.with_default_alternative(control))
    }

    /// Records a conversion for the visitor, optionally against a named KPI.
    pub async fn convert(
        &self,
        api_key: &str,
        experiment_name: &str,
        kpi: Option<&str>,
    ) -> Result<SixpackResponse> {
        check_experiment_name(experiment_name)?;

        let mut params: Params = vec![
            ("api_key", api_key.to_string()),
            ("experiment", experiment_name.to_string()),
            ("client_id", self.client_id.clone()),
        ];

        // an empty kpi counts as no kpi
        if let Some(kpi) = kpi.filter(|kpi| !kpi.is_empty()) {
            check_kpi(kpi)?;
            params.push(("kpi", kpi.to_string()));
        }

        Ok(self.http_client.get_response(CONVERT_ENDPOINT, params).await)
    }
}
