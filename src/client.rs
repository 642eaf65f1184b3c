//! HTTP client for the expense service.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{
    Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    aggregation::Summary,
    api::{
        ApiResults, AudioRecordBody, Category, ExpenseApi, NewCategoryBody, NewRecord,
        NewRecordBody, Outcome, SummaryPayload, UserBody,
    },
    endpoints::{self, month_query},
    logging::{log_request, log_response},
    navigation::Period,
    record::{Credential, ExpenseRecord},
};

/// The request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Where the expense service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// The base URL of the service, e.g. "https://expenses.example.com/api".
    pub url: String,
    /// How long to wait for a response before giving up.
    pub timeout: Duration,
}

impl ApiConfig {
    /// A config for `url` with the default timeout.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Talks to the expense service over HTTP.
///
/// Create one client and pass it to whatever needs it. The client is cheap
/// to clone and clones share a connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service described by `config`.
    ///
    /// # Errors
    /// Returns [Error::Request] if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        credential: &Credential,
    ) -> Result<T, Error> {
        let url = self.url(path);
        log_request("GET", &url, None);

        let response = self
            .http
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, credential.header_value())
            .send()
            .await?;

        read_body(&url, response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> Result<T, Error> {
        let url = self.url(path);
        let body = serde_json::to_string(body)?;
        log_request("POST", &url, Some(&body));

        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, credential.header_value());
        }

        let response = request.send().await?;

        read_body(&url, response).await
    }
}

async fn read_body<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, Error> {
    let status = response.status();
    let text = response.text().await?;
    log_response(url, status.as_u16(), &text);

    if !status.is_success() {
        return Err(Error::UnexpectedStatus(status.as_u16()));
    }

    Ok(serde_json::from_str(&text)?)
}

impl ExpenseApi for ApiClient {
    async fn fetch_records(
        &self,
        period: Period,
        credential: &Credential,
    ) -> Result<Vec<ExpenseRecord>, Error> {
        let response: ApiResults<Vec<ExpenseRecord>> = self
            .get(endpoints::RECORDS, &month_query(period), credential)
            .await?;

        tracing::debug!("Fetched {} records for {period}", response.results.len());

        Ok(response.results)
    }

    async fn fetch_summary(&self, period: Period, credential: &Credential) -> Result<Summary, Error> {
        let response: ApiResults<SummaryPayload> = self
            .get(endpoints::EXPENSES, &month_query(period), credential)
            .await?;

        Ok(response.results.into())
    }

    async fn fetch_categories(&self, credential: &Credential) -> Result<Vec<Category>, Error> {
        let response: ApiResults<Vec<Category>> =
            self.get(endpoints::CATEGORIES, &[], credential).await?;

        Ok(response.results)
    }

    async fn submit_record(&self, credential: &Credential, record: &NewRecord) -> Result<(), Error> {
        let outcome: Outcome = self
            .post(
                endpoints::RECORDS,
                &NewRecordBody::from(record),
                Some(credential),
            )
            .await?;

        outcome.into_result()
    }

    async fn submit_audio_record(&self, credential: &Credential, audio: &[u8]) -> Result<(), Error> {
        let body = AudioRecordBody {
            base64: STANDARD.encode(audio),
        };
        tracing::debug!("Uploading {} bytes of audio", audio.len());

        let outcome: Outcome = self
            .post(endpoints::AUDIO_RECORDS, &body, Some(credential))
            .await?;

        outcome.into_result()
    }

    async fn submit_category(
        &self,
        credential: &Credential,
        name: &str,
        emoji: &str,
    ) -> Result<(), Error> {
        let outcome: Outcome = self
            .post(
                endpoints::CATEGORIES,
                &NewCategoryBody { name, emoji },
                Some(credential),
            )
            .await?;

        outcome.into_result()
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<Credential, Error> {
        let outcome: Outcome = self
            .post(endpoints::LOG_IN, &UserBody { username, password }, None)
            .await?;
        outcome.into_result()?;

        Ok(Credential::basic(username, password))
    }

    async fn sign_up(&self, username: &str, password: &str) -> Result<(), Error> {
        let outcome: Outcome = self
            .post(endpoints::SIGN_UP, &UserBody { username, password }, None)
            .await?;

        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use time::Month;

    use super::{ApiClient, ApiConfig};
    use crate::{
        Error,
        api::{ExpenseApi, NewRecord},
        navigation::Period,
        record::Credential,
    };

    #[derive(Clone, Default)]
    struct Captured {
        authorization: Arc<Mutex<Option<String>>>,
        query: Arc<Mutex<Option<(String, String)>>>,
        body: Arc<Mutex<Option<Value>>>,
    }

    fn authorization(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    async fn get_records(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Query(query): Query<std::collections::HashMap<String, String>>,
    ) -> Json<Value> {
        *captured.authorization.lock().unwrap() = authorization(&headers);
        *captured.query.lock().unwrap() = Some((query["year"].clone(), query["month"].clone()));

        Json(json!({"results": [
            {"category": "Food", "amount": 10, "emoji": "🍔", "recordedAt": 1700000000000u64},
            {"category": "Bus", "amount": 2.5, "emoji": "🚌"}
        ]}))
    }

    async fn get_expenses() -> Json<Value> {
        Json(json!({"results": {
            "totalExpenses": 12.5,
            "totalExpensesRecords": 2,
            "topCategories": [
                {"category": "Bus", "amount": 2.5, "emoji": "🚌"},
                {"category": "Food", "amount": 10, "emoji": "🍔"}
            ]
        }}))
    }

    async fn get_categories() -> Json<Value> {
        Json(json!({"results": [{"id": 1, "name": "Food", "emoji": "🍔"}]}))
    }

    async fn post_record(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        *captured.body.lock().unwrap() = Some(body);

        Json(json!({"results": "success", "message": "created"}))
    }

    async fn post_category() -> Json<Value> {
        Json(json!({"results": "failed", "message": "category already exists"}))
    }

    async fn post_audio(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
        *captured.body.lock().unwrap() = Some(body);

        Json(json!({"results": "success"}))
    }

    async fn post_log_in(Json(body): Json<Value>) -> Json<Value> {
        if body["password"] == "hunter2" {
            Json(json!({"results": "success"}))
        } else {
            Json(json!({"results": "failed", "message": "wrong password"}))
        }
    }

    async fn post_sign_up() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Serves a fake expense service on a random local port.
    async fn spawn_fake_service() -> (ApiClient, Captured) {
        let captured = Captured::default();
        let router = Router::new()
            .route("/records", get(get_records).post(post_record))
            .route("/expenses", get(get_expenses))
            .route("/categories", get(get_categories).post(post_category))
            .route("/audioRecords", post(post_audio))
            .route("/login", post(post_log_in))
            .route("/signup", post(post_sign_up))
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = ApiClient::new(&ApiConfig::new(&format!("http://{address}/"))).unwrap();

        (client, captured)
    }

    #[tokio::test]
    async fn fetch_records_sends_period_and_credential() {
        let (client, captured) = spawn_fake_service().await;
        let credential = Credential::new("dG9rZW4=");

        let records = client
            .fetch_records(Period::new(2024, Month::March), &credential)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].recorded_at, Some(1_700_000_000_000));
        assert_eq!(records[1].recorded_at, None);
        assert_eq!(
            captured.authorization.lock().unwrap().as_deref(),
            Some("Basic dG9rZW4=")
        );
        assert_eq!(
            captured.query.lock().unwrap().clone(),
            Some(("2024".to_owned(), "3".to_owned()))
        );
    }

    #[tokio::test]
    async fn fetch_summary_is_ranked() {
        let (client, _) = spawn_fake_service().await;

        let summary = client
            .fetch_summary(Period::new(2024, Month::March), &Credential::new("t"))
            .await
            .unwrap();

        assert_eq!(summary.total, 12.5);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.top_categories[0].category, "Food");
    }

    #[tokio::test]
    async fn fetch_categories_reads_results() {
        let (client, _) = spawn_fake_service().await;

        let categories = client.fetch_categories(&Credential::new("t")).await.unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Food");
        assert_eq!(categories[0].emoji, "🍔");
    }

    #[tokio::test]
    async fn submit_record_sends_seconds() {
        let (client, captured) = spawn_fake_service().await;
        let record = NewRecord {
            amount: 12.5,
            category: "Food".to_owned(),
            recorded_at: 1_700_000_000_000,
        };

        client
            .submit_record(&Credential::new("t"), &record)
            .await
            .unwrap();

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["recorded_at"], 1_700_000_000.0);
        assert_eq!(body["category"], "Food");
    }

    #[tokio::test]
    async fn rejected_category_returns_message() {
        let (client, _) = spawn_fake_service().await;

        let result = client
            .submit_category(&Credential::new("t"), "Food", "🍔")
            .await;

        assert_eq!(
            result,
            Err(Error::Rejected("category already exists".to_owned()))
        );
    }

    #[tokio::test]
    async fn audio_is_uploaded_as_base64() {
        let (client, captured) = spawn_fake_service().await;

        client
            .submit_audio_record(&Credential::new("t"), b"RIFF")
            .await
            .unwrap();

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["base64"], "UklGRg==");
    }

    #[tokio::test]
    async fn log_in_returns_basic_credential() {
        let (client, _) = spawn_fake_service().await;

        let credential = client.log_in("alice", "hunter2").await.unwrap();
        let rejected = client.log_in("alice", "wrong").await;

        assert_eq!(credential, Credential::basic("alice", "hunter2"));
        assert_eq!(rejected, Err(Error::Rejected("wrong password".to_owned())));
    }

    #[tokio::test]
    async fn server_error_is_unexpected_status() {
        let (client, _) = spawn_fake_service().await;

        let result = client.sign_up("alice", "hunter2").await;

        assert_eq!(result, Err(Error::UnexpectedStatus(500)));
    }
}
