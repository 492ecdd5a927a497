use crate::models::{Collection, PhraseKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,

    /// Server-provided `erro` field, when the error body carried one.
    pub detail: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
            detail: None,
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
            detail: None,
        }
    }

    /// Text for a user-facing notice: the server's `erro`, else the transport
    /// message for network failures, else `fallback`.
    pub fn user_detail(&self, fallback: &str) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        match self.kind {
            ApiErrorKind::Network => self.message.clone(),
            ApiErrorKind::Http | ApiErrorKind::Parse => fallback.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.erro)
            .filter(|s| !s.trim().is_empty());

        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
            detail,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self {
                api_url: String::new(),
            };
        };

        // We support BOTH `window.ENV.API_URL` and `window.ENV.api_url`.
        if let Some(env) = window.get("ENV") {
            if !env.is_undefined() && env.is_object() {
                for key in ["API_URL", "api_url"] {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self {
                                api_url: url_str.trim_end_matches('/').to_string(),
                            };
                        }
                    }
                }
            }
        }

        // Same-origin deployment: the backend also serves the static bundle.
        // reqwest on wasm needs an absolute URL, so resolve the origin here.
        Self {
            api_url: window.location().origin().unwrap_or_default(),
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) const PHRASES_PATH: &str = "/api/frases";
pub(crate) const EXPORT_TXT_PATH: &str = "/api/export/txt";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CreatePhraseRequest {
    pub tipo: PhraseKind,
    pub segmento: String,
    pub estrutura: String,
    pub texto: String,

    /// Only meaningful for conclusions; sent as `null` otherwise.
    pub letra_manual: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreatePhraseResponse {
    pub alias: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdatePhraseRequest {
    pub texto: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RenamePhraseRequest {
    pub alias_antigo: String,
    pub nova_letra: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct ErrorBody {
    #[serde(default)]
    erro: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    /// Collection endpoint, or a single phrase when `alias` is given.
    /// Aliases carry type markers such as `|` or `#`, so they are percent-encoded.
    pub(crate) fn phrase_url(&self, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => format!(
                "{}{}/{}",
                self.base_url,
                PHRASES_PATH,
                urlencoding::encode(alias)
            ),
            None => format!("{}{}", self.base_url, PHRASES_PATH),
        }
    }

    pub(crate) fn export_txt_url(&self) -> String {
        format!("{}{}", self.base_url, EXPORT_TXT_PATH)
    }

    async fn send(
        &self,
        method: reqwest::Method,
        url: String,
        body: Option<&impl Serialize>,
        ctx: &str,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let mut req = client.request(method, url);

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: String,
        body: Option<&impl Serialize>,
        ctx: &str,
    ) -> ApiResult<T> {
        let res = self.send(method, url, body, ctx).await?;
        res.json().await.map_err(ApiError::parse)
    }

    pub async fn get_collection(&self) -> ApiResult<Collection> {
        self.request_json(
            reqwest::Method::GET,
            self.phrase_url(None),
            None::<&()>,
            "Load phrases failed",
        )
        .await
    }

    pub async fn create_phrase(&self, req_body: &CreatePhraseRequest) -> ApiResult<CreatePhraseResponse> {
        self.request_json(
            reqwest::Method::POST,
            self.phrase_url(None),
            Some(req_body),
            "Create phrase failed",
        )
        .await
    }

    pub async fn update_phrase(&self, alias: &str, text: &str) -> ApiResult<()> {
        self.send(
            reqwest::Method::PUT,
            self.phrase_url(Some(alias)),
            Some(&UpdatePhraseRequest {
                texto: text.to_string(),
            }),
            "Update phrase failed",
        )
        .await
        .map(|_| ())
    }

    pub async fn delete_phrase(&self, alias: &str) -> ApiResult<()> {
        self.send(
            reqwest::Method::DELETE,
            self.phrase_url(Some(alias)),
            None::<&()>,
            "Delete phrase failed",
        )
        .await
        .map(|_| ())
    }

    pub async fn rename_phrase(&self, req_body: &RenamePhraseRequest) -> ApiResult<()> {
        self.send(
            reqwest::Method::PATCH,
            format!("{}{}/rename", self.base_url, PHRASES_PATH),
            Some(req_body),
            "Rename phrase failed",
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_url_percent_encodes_alias() {
        let client = ApiClient::new("http://localhost:5000".to_string());
        assert_eq!(
            client.phrase_url(Some("#abc1a")),
            "http://localhost:5000/api/frases/%23abc1a"
        );
        assert_eq!(
            client.phrase_url(Some("|omb1b")),
            "http://localhost:5000/api/frases/%7Comb1b"
        );
        assert_eq!(client.phrase_url(None), "http://localhost:5000/api/frases");
    }

    #[test]
    fn test_export_url() {
        let client = ApiClient::new(String::new());
        assert_eq!(client.export_txt_url(), "/api/export/txt");
    }

    #[test]
    fn test_create_request_contract_serialize() {
        let req = CreatePhraseRequest {
            tipo: PhraseKind::Body,
            segmento: "ABC".to_string(),
            estrutura: "1".to_string(),
            texto: "Texto".to_string(),
            letra_manual: None,
        };
        let v = serde_json::to_value(&req).expect("should serialize");
        assert_eq!(v["tipo"], "_");
        assert_eq!(v["segmento"], "ABC");
        assert_eq!(v["estrutura"], "1");
        assert_eq!(v["texto"], "Texto");
        assert!(v["letra_manual"].is_null());
    }

    #[test]
    fn test_create_response_contract_deserialize() {
        let json = r#"{"sucesso": "Frase adicionada", "alias": "_abc1b"}"#;
        let parsed: CreatePhraseResponse = serde_json::from_str(json).expect("should parse");
        assert_eq!(parsed.alias, "_abc1b");
    }

    #[test]
    fn test_rename_request_contract_serialize() {
        let v = serde_json::to_value(RenamePhraseRequest {
            alias_antigo: "_abc1a".to_string(),
            nova_letra: "c".to_string(),
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"alias_antigo": "_abc1a", "nova_letra": "c"}));
    }

    #[test]
    fn test_user_detail_prefers_server_then_transport_message() {
        let server = ApiError::http(
            reqwest::StatusCode::CONFLICT,
            r#"{"erro": "Alias já existe"}"#.to_string(),
            "Rename phrase failed",
        );
        assert_eq!(server.user_detail("Falha ao renomear"), "Alias já existe");

        let bare = ApiError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "oops".to_string(),
            "Rename phrase failed",
        );
        assert_eq!(bare.user_detail("Falha ao renomear"), "Falha ao renomear");

        let offline = ApiError {
            kind: ApiErrorKind::Network,
            message: "Failed to fetch".to_string(),
            detail: None,
        };
        assert_eq!(offline.user_detail("Falha ao renomear"), "Failed to fetch");
    }

    #[test]
    fn test_http_error_picks_up_server_detail() {
        let e = ApiError::http(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"erro": "Alias não encontrado"}"#.to_string(),
            "Rename phrase failed",
        );
        assert_eq!(e.kind, ApiErrorKind::Http);
        assert_eq!(e.detail.as_deref(), Some("Alias não encontrado"));
        assert!(e.to_string().contains("404"));
    }

    #[test]
    fn test_http_error_without_json_body_has_no_detail() {
        let e = ApiError::http(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            "<html>oops</html>".to_string(),
            "Rename phrase failed",
        );
        assert!(e.detail.is_none());
    }
}
