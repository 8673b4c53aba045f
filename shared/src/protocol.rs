use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::analysis::{History, UploadResponse};
use crate::chat::{ChatReply, ChatRequest};
use crate::profile::{ProfileData, ProfileEnvelope};
use crate::user::{AuthResponse, MeResponse};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a JSON body is sent with this method.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path, relative to the API base URL.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

/// Multipart resume upload. The file is sent as form field [`RESUME_FIELD`].
pub const UPLOAD_RESUME_PATH: &str = "/analysis/upload-resume";
pub const RESUME_FIELD: &str = "resume";

// =========================================================
// Request Definitions
// =========================================================

/// Exchange credentials for a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Create an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const PATH: &'static str = "/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Validate the current token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = MeResponse;
    const PATH: &'static str = "/auth/me";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Analyze a LinkedIn profile by URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInRequest {
    pub url: String,
}

impl ApiRequest for LinkedInRequest {
    type Response = UploadResponse;
    const PATH: &'static str = "/analysis/linkedin";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Skill gaps, roadmap and career matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRequest;

impl ApiRequest for HistoryRequest {
    type Response = History;
    const PATH: &'static str = "/analysis/history";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Fetch the editable profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = ProfileEnvelope;
    const PATH: &'static str = "/profile";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Persist the edited profile (the body is the profile itself)
impl ApiRequest for ProfileData {
    type Response = ProfileEnvelope;
    const PATH: &'static str = "/profile";
    const METHOD: HttpMethod = HttpMethod::Put;
}

/// Ask the AI assistant
impl ApiRequest for ChatRequest {
    type Response = ChatReply;
    const PATH: &'static str = "/ai/chat";
    const METHOD: HttpMethod = HttpMethod::Post;
}
