//! The high-level client façade.
//!
//! [`SkinClient`] owns the API base URL and exposes one method per
//! endpoint, each delegating to the transport core with the endpoint's
//! result constructor. Generate calls answer with a queue job; the job is
//! polled by ID until it completes and the finished skin is fetched by
//! UUID.

use snafu::prelude::*;

use crate::{
    EndpointUrl,
    http::{HttpClient, HttpResponse},
    identity::ClientIdentity,
    model::{QueueJob, Skin},
    options::GenerateOptions,
    request::{RequestError, RequestHandler},
    response::{ApiResponse, WrappedResponse},
};

/// A typed result carrying a generated [`Skin`].
pub type SkinResult = ApiResponse<Skin>;

/// A typed result carrying a [`QueueJob`].
pub type QueueResult = ApiResponse<QueueJob>;

/// The error type of one façade call through a client backed by `C`.
pub type CallError<C, R> = ClientError<
    <C as HttpClient>::Error,
    <<C as HttpClient>::Response as HttpResponse>::Error,
    R,
>;

/// A client for the skin-generation API.
#[derive(Debug)]
pub struct SkinClient<C> {
    handler: RequestHandler<C>,
    base_url: EndpointUrl,
}

impl<C> SkinClient<C> {
    /// Creates a client from an identity, an HTTP client, and the API base
    /// URL (e.g. `https://api.mineskin.org/v2`).
    pub fn new(identity: ClientIdentity, http_client: C, base_url: EndpointUrl) -> Self {
        Self {
            handler: RequestHandler::new(identity, http_client),
            base_url,
        }
    }

    /// Returns the underlying request handler, for endpoints this façade
    /// does not cover.
    #[must_use]
    pub fn handler(&self) -> &RequestHandler<C> {
        &self.handler
    }
}

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12"))]
#[cfg_attr(
    docsrs,
    doc(cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_12")))
)]
impl SkinClient<reqwest::Client> {
    /// Creates a client backed by a fresh `reqwest` client honoring the
    /// identity's timeout and redirect settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend fails to initialize.
    pub fn with_reqwest(
        identity: ClientIdentity,
        base_url: EndpointUrl,
    ) -> reqwest::Result<Self> {
        let http_client = crate::http::client_for_identity(&identity)?;
        Ok(Self::new(identity, http_client, base_url))
    }
}

impl<C: HttpClient> SkinClient<C> {
    /// Queues skin generation from an uploaded image file.
    ///
    /// # Errors
    ///
    /// Returns an error for the usual failure classes, or when the endpoint
    /// path cannot be joined onto the base URL.
    pub async fn generate_from_upload(
        &self,
        filename: &str,
        file: &[u8],
        options: &GenerateOptions,
    ) -> Result<QueueResult, CallError<C, QueueResult>> {
        let url = self.base_url.join("queue").context(EndpointSnafu)?;
        self.handler
            .post_form_data_file(
                &url,
                "file",
                filename,
                file,
                &options.as_form_fields(),
                ApiResponse::from_field("job"),
            )
            .await
            .context(RequestSnafu)
    }

    /// Queues skin generation from an image URL the server fetches itself.
    ///
    /// # Errors
    ///
    /// Returns an error for the usual failure classes, or when the endpoint
    /// path cannot be joined onto the base URL.
    pub async fn generate_from_url(
        &self,
        image_url: &str,
        options: &GenerateOptions,
    ) -> Result<QueueResult, CallError<C, QueueResult>> {
        #[derive(serde::Serialize)]
        struct UrlGenerateBody<'a> {
            url: &'a str,
            #[serde(flatten)]
            options: &'a GenerateOptions,
        }

        let url = self.base_url.join("queue").context(EndpointSnafu)?;
        let body = UrlGenerateBody {
            url: image_url,
            options,
        };
        self.handler
            .post_json(&url, &body, ApiResponse::from_field("job"))
            .await
            .context(RequestSnafu)
    }

    /// Fetches the current state of a queued generate job.
    ///
    /// # Errors
    ///
    /// Returns an error for the usual failure classes, or when the endpoint
    /// path cannot be joined onto the base URL.
    pub async fn get_job(&self, id: &str) -> Result<QueueResult, CallError<C, QueueResult>> {
        let url = self
            .base_url
            .join(&format!("queue/{id}"))
            .context(EndpointSnafu)?;
        self.handler
            .get_json(&url, ApiResponse::from_field("job"))
            .await
            .context(RequestSnafu)
    }

    /// Fetches a generated skin by its UUID.
    ///
    /// # Errors
    ///
    /// Returns an error for the usual failure classes, or when the endpoint
    /// path cannot be joined onto the base URL.
    pub async fn get_skin(&self, uuid: &str) -> Result<SkinResult, CallError<C, SkinResult>> {
        let url = self
            .base_url
            .join(&format!("skins/{uuid}"))
            .context(EndpointSnafu)?;
        self.handler
            .get_json(&url, ApiResponse::from_field("skin"))
            .await
            .context(RequestSnafu)
    }
}

/// A failure of one façade call.
#[derive(Debug, Snafu)]
pub enum ClientError<HttpReqErr: crate::Error, HttpRespErr: crate::Error, R: WrappedResponse> {
    /// The endpoint path could not be joined onto the base URL.
    #[snafu(display("Invalid endpoint path"))]
    Endpoint {
        /// The underlying error.
        source: http::uri::InvalidUri,
    },
    /// The request itself failed; see [`RequestError`] for the classes.
    Request {
        /// The underlying error.
        source: RequestError<HttpReqErr, HttpRespErr, R>,
    },
}

impl<HttpReqErr, HttpRespErr, R> crate::Error for ClientError<HttpReqErr, HttpRespErr, R>
where
    HttpReqErr: crate::Error,
    HttpRespErr: crate::Error,
    R: WrappedResponse,
{
    fn is_retryable(&self) -> bool {
        match self {
            Self::Endpoint { .. } => false,
            Self::Request { source } => source.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use crate::IntoEndpointUrl as _;
    use crate::http::testing::StaticClient;
    use crate::model::JobStatus;

    use super::*;

    fn client(fake: &StaticClient) -> SkinClient<&StaticClient> {
        SkinClient::new(
            ClientIdentity::builder()
                .user_agent("skingen-tests/0.1")
                .build(),
            fake,
            "https://api.example.com/v2".into_endpoint_url().unwrap(),
        )
    }

    #[tokio::test]
    async fn generate_from_url_posts_to_the_queue() {
        let fake = StaticClient::new(
            StatusCode::ACCEPTED,
            r#"{"success": true, "job": {"id": "job-1", "status": "waiting"}}"#,
        );
        let result = client(&fake)
            .generate_from_url(
                "https://example.com/skin.png",
                &GenerateOptions::builder().name("My Skin").build(),
            )
            .await
            .unwrap();

        let job = result.into_body().unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.status, JobStatus::Waiting);

        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen[0].uri().path(), "/v2/queue");
        let body: serde_json::Value = serde_json::from_slice(seen[0].body()).unwrap();
        assert_eq!(body["url"], "https://example.com/skin.png");
        assert_eq!(body["name"], "My Skin");
    }

    #[tokio::test]
    async fn get_skin_targets_the_skin_by_uuid() {
        let fake = StaticClient::new(
            StatusCode::OK,
            r#"{
                "success": true,
                "skin": {
                    "uuid": "5f2d9c6b",
                    "name": null,
                    "variant": "classic",
                    "texture": {"data": {"value": "dg==", "signature": "cw=="}, "url": null}
                }
            }"#,
        );
        let result = client(&fake).get_skin("5f2d9c6b").await.unwrap();

        assert_eq!(result.body().unwrap().uuid, "5f2d9c6b");
        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen[0].uri().path(), "/v2/skins/5f2d9c6b");
        assert_eq!(seen[0].method(), http::Method::GET);
    }

    #[tokio::test]
    async fn generate_from_upload_sends_multipart() {
        let fake = StaticClient::new(
            StatusCode::ACCEPTED,
            r#"{"success": true, "job": {"id": "job-2", "status": "processing"}}"#,
        );
        let file = [0x89, 0x50, 0x4E, 0x47];
        let result = client(&fake)
            .generate_from_upload("skin.png", &file, &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(result.body().unwrap().status, JobStatus::Processing);
        let seen = fake.seen.lock().unwrap();
        let content_type = seen[0]
            .headers()
            .get(http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }
}
